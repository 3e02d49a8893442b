//! Listing lines for decoded instructions.

use std::io::{self, Write};

use commands::OutputConfig;
use x86_64::{Decoder, ErrorKind, Instruction, RoundingControl};

/// The decoded record as one line: `EVEX_Vaddps_VZ_k1z_HZ_WZ_er_b [zmm2, zmm0, zmm3] mask=k3 zeroing rounding=RoundToNearest`.
pub fn format_instruction(inst: &Instruction) -> String {
    let operands: Vec<String> = inst.operands().map(|op| op.to_string()).collect();
    let mut out = format!("{:?} [{}]", inst.code(), operands.join(", "));

    if let Some(mask) = inst.op_mask() {
        out += &format!(" mask={mask}");
    }
    if inst.zeroing_masking() {
        out += " zeroing";
    }
    if inst.rounding_control() != RoundingControl::None {
        out += &format!(" rounding={:?}", inst.rounding_control());
    }
    if inst.suppress_all_exceptions() {
        out += " sae";
    }

    out
}

/// One line of a listing: address, optionally the raw bytes, then the instruction or error.
pub fn format_line(ip: u64, bytes: Option<(&[u8], usize)>, text: &str) -> String {
    let mut line = format!("{ip:>16x}:  ");
    if let Some((bytes, width)) = bytes {
        // `encode_hex_bytes_truncated` measures width in characters
        line += &decoder::encode_hex_bytes_truncated(bytes, width.max(1) * 3);
        line += " ";
    }
    line += text;
    line
}

/// Write a line for every instruction in `bytes`, returning how many failed to decode.
pub fn disassemble(
    out: &mut impl Write,
    decoder: &Decoder,
    bytes: &[u8],
    ip: u64,
    output: &OutputConfig,
) -> io::Result<usize> {
    let mut errors = 0;
    let mut offset = 0;

    log::trace!("[listing::disassemble] decoding {} bytes at {ip:#x} with {decoder}", bytes.len());

    for result in decoder.stream(bytes, ip) {
        let (addr, width, text) = match result {
            Ok(inst) => (inst.ip(), inst.len(), format_instruction(&inst)),
            Err(err) => {
                errors += 1;
                let addr = ip.wrapping_add(offset as u64);
                (addr, err.size(), format!("(bad: {})", err.kind))
            }
        };

        let raw = output.bytes.then(|| (&bytes[offset..offset + width], output.bytes_width));
        writeln!(out, "{}", format_line(addr, raw, &text))?;
        offset += width;
    }

    // the stream stops at a truncated instruction
    if offset < bytes.len() {
        errors += 1;
        let raw = output.bytes.then(|| (&bytes[offset..], output.bytes_width));
        let text = format!("(bad: {})", ErrorKind::ExhaustedInput);
        writeln!(out, "{}", format_line(ip.wrapping_add(offset as u64), raw, &text))?;
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::{disassemble, format_instruction, format_line};
    use commands::OutputConfig;
    use x86_64::{Decoder, DecoderOptions, Mode};

    fn listing(decoder: &Decoder, bytes: &[u8], ip: u64) -> (String, usize) {
        let mut out = Vec::new();
        let errors = disassemble(&mut out, decoder, bytes, ip, &OutputConfig::default()).unwrap();
        (String::from_utf8(out).unwrap(), errors)
    }

    fn format(mode: Mode, bytes: &[u8]) -> String {
        format_instruction(&x86_64::decode(mode, bytes).unwrap())
    }

    #[test]
    fn legacy() {
        assert_eq!(format(Mode::Long, &[0x66, 0x0f, 0xdb, 0xc1]), "Pand_VX_WX [xmm0, xmm1]");
        assert_eq!(
            format(Mode::Protected, &[0x0f, 0xd8, 0x44, 0x24, 0x08]),
            "Psubusb_P_Q [mm0, qword ss:[esp+0x8]]"
        );
    }

    #[test]
    fn evex() {
        assert_eq!(
            format(Mode::Long, &[0x62, 0xf1, 0x7c, 0x9b, 0x58, 0xd3]),
            "EVEX_Vaddps_VZ_k1z_HZ_WZ_er_b [zmm2, zmm0, zmm3] mask=k3 zeroing rounding=RoundToNearest"
        );
        assert_eq!(
            format(Mode::Long, &[0x62, 0xf1, 0xfd, 0x1b, 0x5f, 0xd3]),
            "EVEX_Vmaxpd_VZ_k1z_HZ_WZ_sae_b [zmm2, zmm0, zmm3] mask=k3 sae"
        );
        assert_eq!(
            format(Mode::Long, &[0x62, 0xf1, 0xfd, 0x58, 0xdb, 0x50, 0x01]),
            "EVEX_Vpandq_VZ_k1z_HZ_WZ_b [zmm2, zmm0, qword bcst ds:[rax+0x8]]"
        );
    }

    #[test]
    fn lines() {
        assert_eq!(
            format_line(0x1000, Some((&[0x66, 0x0f, 0xdb, 0xc1], 5)), "Pand_VX_WX [xmm0, xmm1]"),
            "            1000:  66 0f db c1     Pand_VX_WX [xmm0, xmm1]"
        );
        assert_eq!(format_line(0x10, None, "(bad)"), "              10:  (bad)");
    }

    #[test]
    fn truncated_tail() {
        let output = OutputConfig {
            bytes_width: 5,
            ..OutputConfig::default()
        };

        let mut out = Vec::new();
        let bytes = [0x66, 0x0f, 0xdb, 0xc1, 0x62, 0xf1];
        let decoder = Decoder::new(Mode::Long);
        let errors = disassemble(&mut out, &decoder, &bytes, 0x1000, &output).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(errors, 1);
        assert_eq!(
            lines,
            [
                "            1000:  66 0f db c1     Pand_VX_WX [xmm0, xmm1]",
                "            1004:  62 f1           (bad: exhausted input)",
            ]
        );
    }

    #[test]
    fn resumes_after_errors() {
        // `0F 74` isn't decoded, the `66 0F DB C1` after it is
        let bytes = [0x0f, 0x74, 0x66, 0x0f, 0xdb, 0xc1];
        let (text, errors) = listing(&Decoder::new(Mode::Long), &bytes, 0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(errors, 1);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("               0:  0f 74"));
        assert!(lines[1].ends_with("Pand_VX_WX [xmm0, xmm1]"));

        let lenient = Decoder::new(Mode::Long).with_options(DecoderOptions::NO_INVALID_CHECK);
        let (_, errors) = listing(&lenient, &[0x62, 0xf1, 0x7d, 0x88, 0xdb, 0xd3], 0);
        assert_eq!(errors, 0);
    }

    #[test]
    fn addresses_wrap() {
        let (text, errors) = listing(&Decoder::new(Mode::Long), &[0x0f, 0x74, 0x62], u64::MAX);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(errors, 2);
        assert!(lines[0].starts_with("ffffffffffffffff:  0f 74"));
        assert!(lines[1].starts_with("               1:  62"));
        assert!(lines[1].ends_with("(bad: exhausted input)"));
    }
}
