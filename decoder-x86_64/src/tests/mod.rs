mod legacy;
mod operand;
mod vex;

use decoder::{Decodable, ErrorKind, Reader};

use crate::{Decoder, DecoderOptions, Instruction, Mode};

fn decoder_for(mode: Mode) -> Decoder {
    Decoder::new(mode)
}

fn lenient(mode: Mode) -> Decoder {
    Decoder::new(mode).with_options(DecoderOptions::NO_INVALID_CHECK)
}

fn bytes_of(hex: &str) -> Vec<u8> {
    decoder::decode_hex(hex).unwrap_or_else(|| panic!("malformed test vector {hex:?}"))
}

/// decode `hex` and check that every byte is part of the instruction.
fn decode_under(decoder: &Decoder, hex: &str) -> Instruction {
    let data = bytes_of(hex);
    let mut reader = Reader::new(&data);
    match decoder.decode(&mut reader) {
        Ok(inst) => {
            assert_eq!(
                inst.len(),
                data.len(),
                "decoded {:?} from {} under decoder {} without consuming every byte",
                inst.code(),
                hex,
                decoder
            );
            inst
        }
        Err(err) => panic!("decode error ({}) for {} under decoder {}", err, hex, decoder),
    }
}

fn decode16(hex: &str) -> Instruction {
    decode_under(&decoder_for(Mode::Real), hex)
}

fn decode32(hex: &str) -> Instruction {
    decode_under(&decoder_for(Mode::Protected), hex)
}

fn decode64(hex: &str) -> Instruction {
    decode_under(&decoder_for(Mode::Long), hex)
}

/// decode `hex` expecting an error of `kind` after `size` bytes.
fn test_invalid_under(decoder: &Decoder, hex: &str, kind: ErrorKind, size: usize) {
    let data = bytes_of(hex);
    let mut reader = Reader::new(&data);
    match decoder.decode(&mut reader) {
        Ok(inst) => panic!(
            "decoded {:?} from {} under decoder {}",
            inst.code(),
            hex,
            decoder
        ),
        Err(err) => {
            assert_eq!(err.kind, kind, "wrong error for {} under decoder {}", hex, decoder);
            assert_eq!(err.size(), size, "wrong error size for {} under decoder {}", hex, decoder);
        }
    }
}

fn test_invalid(hex: &str, kind: ErrorKind, size: usize) {
    test_invalid_under(&Decoder::default(), hex, kind, size);
}

#[test]
fn exhausted_input() {
    test_invalid("", ErrorKind::ExhaustedInput, 0);
    test_invalid("66", ErrorKind::ExhaustedInput, 1);
    test_invalid("66 0F", ErrorKind::ExhaustedInput, 2);
    test_invalid("66 0FD8", ErrorKind::ExhaustedInput, 3);
    test_invalid("66 0FD8 80 000000", ErrorKind::ExhaustedInput, 7);
    test_invalid("62 F14D0B D8 50", ErrorKind::ExhaustedInput, 6);
    test_invalid("C4 E1", ErrorKind::ExhaustedInput, 2);
}

#[test]
fn too_long() {
    let prefixes = "66".repeat(12);
    let inst = decode64(&format!("{prefixes} 0FD8 C1"));
    assert_eq!(inst.len(), 15);

    let prefixes = "66".repeat(14);
    test_invalid(&format!("{prefixes} 0FD8 C1"), ErrorKind::TooLong, 15);
}

#[test]
fn unknown_opcodes() {
    test_invalid("90", ErrorKind::InvalidOpcode, 1);
    test_invalid("0F 0B", ErrorKind::InvalidOpcode, 2);
    test_invalid("0F38 00 C1", ErrorKind::InvalidOpcode, 3);
    test_invalid("0F3A 0F C1 00", ErrorKind::InvalidOpcode, 3);
}

#[test]
fn stream_resynchronises() {
    let data = bytes_of("0FD8C1 F30FD8C1 660FD8C1 0F");
    let decoder = decoder_for(Mode::Protected);
    let mut stream = decoder.stream(&data, 0x1000);

    let first = stream.next().unwrap().unwrap();
    assert_eq!(first.code(), crate::Code::Psubusb_P_Q);
    assert_eq!(first.ip(), 0x1000);
    assert_eq!(first.next_ip(), 0x1003);

    let err = stream.next().unwrap().unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOpcode);
    assert_eq!(err.size(), 4);
    assert_eq!(stream.ip(), 0x1007);

    let third = stream.next().unwrap().unwrap();
    assert_eq!(third.code(), crate::Code::Psubusb_VX_WX);
    assert_eq!(third.ip(), 0x1007);
    assert_eq!(stream.position(), 11);

    // a truncated trailing instruction ends the stream
    assert!(stream.next().is_none());
}

#[test]
fn decode_at_ip() {
    let data = bytes_of("66 0FD8 C1 0FD8 C1");
    let decoder = Decoder::default();
    let mut reader = Reader::new(&data);

    let first = decoder.decode_at(&mut reader, 0x4000).unwrap();
    let second = decoder.decode_at(&mut reader, first.next_ip()).unwrap();
    assert_eq!(second.ip(), 0x4004);
    assert_eq!(second.next_ip(), 0x4007);
    assert!(reader.is_empty());
    assert_eq!(decoder.max_width(), crate::MAX_INSTRUCTION_LEN);
}
