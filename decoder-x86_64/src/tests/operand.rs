use super::{decode16, decode32, decode64};
use crate::{MemoryOperand, MemorySize, Operand, RegSpec};

fn operands(inst: &crate::Instruction) -> Vec<String> {
    inst.operands().map(|op| op.to_string()).collect()
}

#[test]
fn registers() {
    assert_eq!(operands(&decode32("0FD8 C1")), ["mm0", "mm1"]);
    assert_eq!(operands(&decode64("66 45 0FDB C1")), ["xmm8", "xmm9"]);
    assert_eq!(operands(&decode64("C5CD DC D3")), ["ymm2", "ymm6", "ymm3"]);
    assert_eq!(operands(&decode64("62 E24D48 76 D3")), ["zmm18", "zmm6", "zmm3"]);
}

#[test]
fn memory() {
    assert_eq!(
        operands(&decode64("66 42 0FD8 04 A0")),
        ["xmm0", "xmmword ds:[rax+r12*4]"]
    );
    assert_eq!(operands(&decode16("0FD8 46 A5")), ["mm0", "qword ss:[bp+0xffa5]"]);
    assert_eq!(operands(&decode32("0FDA 04 8D 78563412")), [
        "mm0",
        "qword ds:[ecx*4+0x12345678]"
    ]);
    assert_eq!(operands(&decode64("66 0FDB 05 10000000")), ["xmm0", "xmmword ds:[rip+0x10]"]);
    assert_eq!(operands(&decode64("64 66 0FD8 04 25 00000000")), [
        "xmm0",
        "xmmword fs:[0x0]"
    ]);
    assert_eq!(operands(&decode64("F2 0F58 00")), ["xmm0", "qword ds:[rax]"]);
    assert_eq!(operands(&decode64("62 F17D48 DB 50 01")), [
        "zmm2",
        "zmm0",
        "zmmword ds:[rax+0x40]"
    ]);
}

#[test]
fn memory_operand() {
    let inst = decode64("66 0FD8 44 24 08");
    let Some(Operand::Memory(mem)) = inst.operand(1) else {
        panic!("expected a memory operand, got {:?}", inst.operand(1));
    };

    assert_eq!(
        mem,
        MemoryOperand {
            segment: RegSpec::ss(),
            base: Some(RegSpec::rsp()),
            index: None,
            scale: 1,
            displacement: 8,
            size: MemorySize::Packed128_UInt8,
        }
    );
    assert_eq!(inst.operand(0), Some(Operand::Register(RegSpec::xmm(0))));
    assert_eq!(inst.operand(2), None);
}
