use decoder::ErrorKind;

use super::{decode16, decode32, decode64, decoder_for, lenient, test_invalid_under};
use crate::{Code, EncodingKind, MemorySize, Mode, RegSpec};

#[test]
fn vex2() {
    let inst = decode16("C5C9 D8 D3");
    assert_eq!(inst.code(), Code::VEX_Vpsubusb_VX_HX_WX);
    assert_eq!(inst.encoding(), EncodingKind::Vex);
    assert_eq!(inst.op_count(), 3);
    assert_eq!(inst.op_register(0), Some(RegSpec::xmm(2)));
    assert_eq!(inst.op_register(1), Some(RegSpec::xmm(6)));
    assert_eq!(inst.op_register(2), Some(RegSpec::xmm(3)));

    let inst = decode32("C5CD DC 10");
    assert_eq!(inst.code(), Code::VEX_Vpaddusb_VY_HY_WY);
    assert_eq!(inst.op_register(0), Some(RegSpec::ymm(2)));
    assert_eq!(inst.op_register(1), Some(RegSpec::ymm(6)));
    assert_eq!(inst.op_register(2), None);
    assert_eq!(inst.memory_base(), Some(RegSpec::eax()));
    assert_eq!(inst.memory_size(), MemorySize::Packed256_UInt8);

    // `VEX.R` only exists in 64-bit mode
    let inst = decode64("C549 D8 D3");
    assert_eq!(inst.op_register(0), Some(RegSpec::xmm(10)));
    assert_eq!(inst.op_register(1), Some(RegSpec::xmm(6)));
    assert_eq!(inst.op_register(2), Some(RegSpec::xmm(3)));
}

#[test]
fn vex3() {
    let inst = decode32("C4E149 DB D3");
    assert_eq!(inst.code(), Code::VEX_Vpand_VX_HX_WX);
    assert_eq!(inst.op_register(1), Some(RegSpec::xmm(6)));
    assert_eq!(inst.len(), 5);

    let inst = decode64("C44135 D8 D3");
    assert_eq!(inst.code(), Code::VEX_Vpsubusb_VY_HY_WY);
    assert_eq!(inst.op_register(0), Some(RegSpec::ymm(10)));
    assert_eq!(inst.op_register(1), Some(RegSpec::ymm(9)));
    assert_eq!(inst.op_register(2), Some(RegSpec::ymm(11)));

    // `VEX.W` is ignored
    let inst = decode64("C4E1C9 DF 00");
    assert_eq!(inst.code(), Code::VEX_Vpandn_VX_HX_WX);
    assert_eq!(inst.memory_base(), Some(RegSpec::rax()));
    assert_eq!(inst.memory_size(), MemorySize::Packed128_UInt64);

    // `VEX.X` extends a SIB index
    let inst = decode64("C4A149 D9 04 88");
    assert_eq!(inst.code(), Code::VEX_Vpsubusw_VX_HX_WX);
    assert_eq!(inst.memory_base(), Some(RegSpec::rax()));
    assert_eq!(inst.memory_index(), Some(RegSpec::q(9)));
    assert_eq!(inst.memory_index_scale(), 4);
}

#[test]
fn arithmetic() {
    // scalar forms ignore `VEX.L`
    let inst = decode64("C5CE 5E D3");
    assert_eq!(inst.code(), Code::VEX_Vdivss_VX_HX_WX);
    assert_eq!(inst.op_register(1), Some(RegSpec::xmm(6)));

    let inst = decode64("C5CD 5F 10");
    assert_eq!(inst.code(), Code::VEX_Vmaxpd_VY_HY_WY);
    assert_eq!(inst.memory_size(), MemorySize::Packed256_Float64);

    let inst = decode64("C5C8 58 D3");
    assert_eq!(inst.code(), Code::VEX_Vaddps_VX_HX_WX);

    let inst = decode64("C5CB 59 50 10");
    assert_eq!(inst.code(), Code::VEX_Vmulsd_VX_HX_WX);
    assert_eq!(inst.memory_size(), MemorySize::Float64);
    // no compressed displacement outside of `EVEX`
    assert_eq!(inst.memory_displacement(), 0x10);
}

#[test]
fn invalid() {
    let decoder = decoder_for(Mode::Long);

    // the integer ops only exist with `VEX.pp = 66`
    test_invalid_under(&decoder, "C5C8 D8 D3", ErrorKind::InvalidOpcode, 4);
    test_invalid_under(&decoder, "C5CA DB D3", ErrorKind::InvalidOpcode, 4);

    // an empty table entry fails before modrm
    test_invalid_under(&decoder, "C4E1C9 70 D3", ErrorKind::InvalidOpcode, 4);

    // map select
    test_invalid_under(&decoder, "C4E049 D8 D3", ErrorKind::InvalidOpcode, 3);
    test_invalid_under(&decoder, "C4E249 D8 D3", ErrorKind::InvalidOpcode, 4);
    test_invalid_under(&decoder, "C4E349 D8 D3", ErrorKind::InvalidOpcode, 4);

    // mandatory prefix or rex before vex
    test_invalid_under(&decoder, "66 C5C9 D8 D3", ErrorKind::InvalidPrefixes, 3);
    test_invalid_under(&decoder, "F3 C5C9 D8 D3", ErrorKind::InvalidPrefixes, 3);
    test_invalid_under(&decoder, "48 C5C9 D8 D3", ErrorKind::InvalidPrefixes, 3);
    test_invalid_under(&decoder, "F0 C5C9 D8 D3", ErrorKind::InvalidPrefixes, 5);

    let data = decoder::decode_hex("66 C5C9 D8 D3").unwrap();
    let inst = lenient(Mode::Long)
        .decode_at(&mut decoder::Reader::new(&data), 0)
        .unwrap();
    assert_eq!(inst.code(), Code::VEX_Vpsubusb_VX_HX_WX);
}

#[test]
fn les_lds_outside_long_mode() {
    for mode in [Mode::Real, Mode::Protected] {
        let decoder = decoder_for(mode);
        test_invalid_under(&decoder, "C5 09 D8 10", ErrorKind::InvalidOpcode, 2);
        test_invalid_under(&decoder, "C4 01 49 D8 10", ErrorKind::InvalidOpcode, 2);
        test_invalid_under(&decoder, "62 01 4D 0B D8 10", ErrorKind::InvalidOpcode, 2);
    }

    // the same bytes start a vex prefix in 64-bit mode
    let inst = decode64("C509 D8 10");
    assert_eq!(inst.code(), Code::VEX_Vpsubusb_VX_HX_WX);
    assert_eq!(inst.op_register(0), Some(RegSpec::xmm(10)));
    assert_eq!(inst.op_register(1), Some(RegSpec::xmm(14)));
}
