use decoder::ErrorKind;

use super::{decode16, decode32, decode64, decoder_for, lenient, test_invalid_under};
use crate::{Code, EncodingKind, MemorySize, Mnemonic, Mode, OpKind, RegSpec};

#[test]
fn mmx_forms_16bit() {
    let inst = decode16("0FD8 08");
    assert_eq!(inst.code(), Code::Psubusb_P_Q);
    assert_eq!(inst.mnemonic(), Mnemonic::Psubusb);
    assert_eq!(inst.encoding(), EncodingKind::Legacy);
    assert_eq!(inst.op_count(), 2);
    assert_eq!(inst.len(), 3);
    assert_eq!(inst.op_register(0), Some(RegSpec::mm(1)));
    assert_eq!(inst.op_kind(1), Some(OpKind::Memory));
    assert_eq!(inst.memory_base(), Some(RegSpec::bx()));
    assert_eq!(inst.memory_index(), Some(RegSpec::si()));
    assert_eq!(inst.memory_segment(), RegSpec::ds());
    assert_eq!(inst.memory_size(), MemorySize::Packed64_UInt8);
    assert_eq!(inst.memory_displ_size(), 0);

    let inst = decode16("0FD8 46 A5");
    assert_eq!(inst.memory_base(), Some(RegSpec::bp()));
    assert_eq!(inst.memory_index(), None);
    assert_eq!(inst.memory_segment(), RegSpec::ss());
    assert_eq!(inst.memory_displacement(), 0xffa5);
    assert_eq!(inst.memory_displ_size(), 1);
    assert_eq!(inst.constant_offsets().displacement_offset, 3);

    let inst = decode16("0FDB 06 3412");
    assert_eq!(inst.code(), Code::Pand_P_Q);
    assert_eq!(inst.memory_base(), None);
    assert_eq!(inst.memory_displacement(), 0x1234);
    assert_eq!(inst.memory_displ_size(), 2);
    assert_eq!(inst.memory_size(), MemorySize::UInt64);

    let inst = decode16("26 0FDF 4A 80");
    assert_eq!(inst.code(), Code::Pandn_P_Q);
    assert_eq!(inst.memory_base(), Some(RegSpec::bp()));
    assert_eq!(inst.memory_index(), Some(RegSpec::si()));
    assert_eq!(inst.memory_displacement(), 0xff80);
    assert_eq!(inst.segment_prefix(), Some(RegSpec::es()));
    assert_eq!(inst.memory_segment(), RegSpec::es());
    assert_eq!(inst.memory_size(), MemorySize::UInt64);

    // the mmx logic ops read a single qword, the sse forms a vector of them
    assert_eq!(decode16("0FDB 08").memory_size(), MemorySize::UInt64);
    assert_eq!(decode16("66 0FDB 08").memory_size(), MemorySize::Packed128_UInt64);
}

#[test]
fn sse_forms() {
    let inst = decode16("66 0FD8 08");
    assert_eq!(inst.code(), Code::Psubusb_VX_WX);
    assert_eq!(inst.op_register(0), Some(RegSpec::xmm(1)));
    assert_eq!(inst.memory_size(), MemorySize::Packed128_UInt8);
    assert_eq!(inst.len(), 4);

    let inst = decode32("66 0FD9 C1");
    assert_eq!(inst.code(), Code::Psubusw_VX_WX);
    assert_eq!(inst.op_register(0), Some(RegSpec::xmm(0)));
    assert_eq!(inst.op_register(1), Some(RegSpec::xmm(1)));
    assert!(!inst.has_memory_operand());

    let inst = decode32("66 66 0FDE C1");
    assert_eq!(inst.code(), Code::Pmaxub_VX_WX);

    for (hex, code) in [
        ("0FDA C1", Code::Pminub_P_Q),
        ("0FDC C1", Code::Paddusb_P_Q),
        ("0FDD C1", Code::Paddusw_P_Q),
        ("0FDE C1", Code::Pmaxub_P_Q),
        ("66 0FDA C1", Code::Pminub_VX_WX),
        ("66 0FDB C1", Code::Pand_VX_WX),
        ("66 0FDC C1", Code::Paddusb_VX_WX),
        ("66 0FDD C1", Code::Paddusw_VX_WX),
        ("66 0FDF C1", Code::Pandn_VX_WX),
    ] {
        assert_eq!(decode32(hex).code(), code, "{hex}");
    }
}

#[test]
fn addressing_32bit() {
    let inst = decode32("0FD8 08");
    assert_eq!(inst.memory_base(), Some(RegSpec::eax()));
    assert_eq!(inst.memory_index(), None);

    let inst = decode32("0FDA 04 8D 78563412");
    assert_eq!(inst.code(), Code::Pminub_P_Q);
    assert_eq!(inst.memory_base(), None);
    assert_eq!(inst.memory_index(), Some(RegSpec::ecx()));
    assert_eq!(inst.memory_index_scale(), 4);
    assert_eq!(inst.memory_displacement(), 0x12345678);
    assert_eq!(inst.memory_displ_size(), 4);
    let offsets = inst.constant_offsets();
    assert_eq!(offsets.displacement_offset, 4);
    assert_eq!(offsets.displacement_size, 4);

    let inst = decode32("0FDC 44 24 08");
    assert_eq!(inst.memory_base(), Some(RegSpec::esp()));
    assert_eq!(inst.memory_index(), None);
    assert_eq!(inst.memory_displacement(), 8);
    assert_eq!(inst.memory_segment(), RegSpec::ss());

    // `67` switches to 16-bit addressing and back
    let inst = decode32("67 0FD8 08");
    assert_eq!(inst.memory_base(), Some(RegSpec::bx()));
    assert_eq!(inst.memory_index(), Some(RegSpec::si()));
    let inst = decode16("67 0FD8 08");
    assert_eq!(inst.memory_base(), Some(RegSpec::eax()));
    assert_eq!(inst.len(), 4);
}

#[test]
fn addressing_64bit() {
    let inst = decode64("66 0FDB 05 10000000");
    assert_eq!(inst.code(), Code::Pand_VX_WX);
    assert_eq!(inst.memory_base(), Some(RegSpec::RIP));
    assert_eq!(inst.memory_displacement(), 0x10);
    assert_eq!(inst.memory_displ_size(), 8);
    assert_eq!(inst.len(), 8);
    let offsets = inst.constant_offsets();
    assert_eq!(offsets.displacement_offset, 4);
    assert_eq!(offsets.displacement_size, 4);

    let inst = decode64("67 66 0FDB 05 10000000");
    assert_eq!(inst.memory_base(), Some(RegSpec::EIP));
    assert_eq!(inst.memory_displ_size(), 4);

    let inst = decode64("66 42 0FD8 04 A0");
    assert_eq!(inst.memory_base(), Some(RegSpec::rax()));
    assert_eq!(inst.memory_index(), Some(RegSpec::q(12)));
    assert_eq!(inst.memory_index_scale(), 4);

    let inst = decode64("66 0FD8 04 24");
    assert_eq!(inst.memory_base(), Some(RegSpec::rsp()));
    assert_eq!(inst.memory_index(), None);
    assert_eq!(inst.memory_segment(), RegSpec::ss());

    let inst = decode64("66 0FD8 04 25 78563412");
    assert_eq!(inst.memory_base(), None);
    assert_eq!(inst.memory_index(), None);
    assert_eq!(inst.memory_displacement(), 0x12345678);
    assert_eq!(inst.memory_displ_size(), 8);

    let inst = decode64("66 41 0FD8 85 00010000");
    assert_eq!(inst.memory_base(), Some(RegSpec::q(13)));
    assert_eq!(inst.memory_displacement(), 0x100);
    assert_eq!(inst.memory_displ_size(), 8);
    assert_eq!(inst.len(), 9);
}

#[test]
fn rip_relative_target() {
    let decoder = decoder_for(Mode::Long);
    let data = decoder::decode_hex("66 0FDB 05 10000000").unwrap();
    let inst = decoder.decode_at(&mut decoder::Reader::new(&data), 0x1000).unwrap();
    assert_eq!(inst.ip_rel_memory_address(), Some(0x1018));

    let data = decoder::decode_hex("67 66 0FDB 05 F0FFFFFF").unwrap();
    let inst = decoder.decode_at(&mut decoder::Reader::new(&data), 0xffff_ffff_0000_0000).unwrap();
    assert_eq!(inst.ip_rel_memory_address(), Some(0xffff_fff9));
}

#[test]
fn rex() {
    let inst = decode64("66 44 0FD8 C1");
    assert_eq!(inst.op_register(0), Some(RegSpec::xmm(8)));
    assert_eq!(inst.op_register(1), Some(RegSpec::xmm(1)));

    // rex followed by another prefix is ignored
    let inst = decode64("44 66 0FD8 C1");
    assert_eq!(inst.op_register(0), Some(RegSpec::xmm(0)));

    // mmx registers can't be extended
    let inst = decode64("4D 0FD8 C1");
    assert_eq!(inst.op_register(0), Some(RegSpec::mm(0)));
    assert_eq!(inst.op_register(1), Some(RegSpec::mm(1)));

    // 0x40-0x4f aren't prefixes outside of 64-bit mode
    test_invalid_under(&decoder_for(Mode::Protected), "44 0FD8 C1", ErrorKind::InvalidOpcode, 1);
}

#[test]
fn segment_overrides() {
    let inst = decode64("64 26 66 0FD8 00");
    assert_eq!(inst.memory_segment(), RegSpec::fs());

    let inst = decode32("64 26 66 0FD8 00");
    assert_eq!(inst.memory_segment(), RegSpec::es());

    let inst = decode64("2E 65 66 0FD8 00");
    assert_eq!(inst.segment_prefix(), Some(RegSpec::gs()));
}

#[test]
fn mandatory_prefixes() {
    let inst = decode64("F3 0F58 C1");
    assert_eq!(inst.code(), Code::Addss_VX_WX);
    assert!(!inst.has_repe_prefix());

    let inst = decode64("F2 0F58 C1");
    assert_eq!(inst.code(), Code::Addsd_VX_WX);
    assert!(!inst.has_repne_prefix());

    // only the prefix picking the instruction is consumed
    let inst = decode64("F2 F3 0F5C C1");
    assert_eq!(inst.code(), Code::Subss_VX_WX);
    assert!(inst.has_repne_prefix());
    assert!(!inst.has_repe_prefix());

    // `66` doesn't replace a preceding `F3`
    let inst = decode64("F3 66 0F5D C1");
    assert_eq!(inst.code(), Code::Minss_VX_WX);

    let inst = decode64("0F59 48 10");
    assert_eq!(inst.code(), Code::Mulps_VX_WX);
    assert_eq!(inst.memory_size(), MemorySize::Packed128_Float32);
    assert_eq!(inst.memory_displacement(), 0x10);

    assert_eq!(decode64("66 0F5E C1").code(), Code::Divpd_VX_WX);
    assert_eq!(decode64("F2 0F5F 00").memory_size(), MemorySize::Float64);

    let decoder = decoder_for(Mode::Protected);
    test_invalid_under(&decoder, "F3 0FD8 08", ErrorKind::InvalidOpcode, 4);
    test_invalid_under(&decoder, "F2 0FDF C1", ErrorKind::InvalidOpcode, 4);
    test_invalid_under(&decoder, "66 F2 0FD8 C1", ErrorKind::InvalidOpcode, 5);
}

#[test]
fn lock() {
    test_invalid_under(
        &decoder_for(Mode::Protected),
        "F0 66 0FD8 C1",
        ErrorKind::InvalidPrefixes,
        5,
    );

    let data = decoder::decode_hex("F0 66 0FD8 C1").unwrap();
    let inst = lenient(Mode::Protected)
        .decode_at(&mut decoder::Reader::new(&data), 0)
        .unwrap();
    assert!(inst.has_lock_prefix());
    assert_eq!(inst.code(), Code::Psubusb_VX_WX);
}
