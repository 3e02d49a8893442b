//! opcode handlers, the nodes of the decode tables.
//!
//! every table entry is a tree of `Handler`s, the inner nodes pick a child by some part of
//! the encoding (mandatory prefix, `W`, vector length) and the leaves fill in the
//! instruction's operands.

use decoder::ErrorKind;

use crate::decoder::Context;
use crate::instruction::RoundingControl;
use crate::register::{RegSpec, RegisterBank};
use crate::{Code, MemorySize};

/// how an `EVEX` memory operand scales its 8-bit displacement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TupleType {
    /// not compressed, `N = 1`.
    None,
    /// full vector that can be replaced by a broadcast element.
    Full128,
    Full256,
    Full512,
    /// full vector without broadcast support.
    FullMem128,
    FullMem256,
    FullMem512,
    /// a single scalar element.
    Tuple1Scalar,
}

impl TupleType {
    /// the `N` of `disp8*N`.
    pub(crate) const fn disp8_scale(self, broadcast: bool, w: bool) -> u32 {
        let element = if w { 8 } else { 4 };
        match self {
            Self::None => 1,
            Self::Full128 | Self::Full256 | Self::Full512 if broadcast => element,
            Self::Full128 | Self::FullMem128 => 16,
            Self::Full256 | Self::FullMem256 => 32,
            Self::Full512 | Self::FullMem512 => 64,
            Self::Tuple1Scalar => element,
        }
    }
}

/// what `EVEX.b` means when modrm selects a register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rounding {
    /// nothing, the encoding is invalid.
    None,
    /// embedded rounding, `EVEX.L'L` holds the rounding mode.
    Embedded,
    /// suppress all exceptions, no rounding mode.
    SaeOnly,
}

#[allow(non_camel_case_types)]
#[derive(Debug)]
pub(crate) enum Handler {
    Invalid,
    /// indexed by `MandatoryPrefix`.
    MandatoryPrefix([&'static Handler; 4]),
    /// indexed by `W`.
    W([&'static Handler; 2]),
    /// indexed by `L` or `L'L`.
    VectorLength([&'static Handler; 4]),
    /// like `VectorLength`, except that `EVEX.b` on a register operand selects the 512-bit
    /// entry since `L'L` then holds a rounding mode.
    VectorLengthEr([&'static Handler; 4]),
    /// `mm, mm/m64`.
    P_Q { code: Code, mem: MemorySize },
    /// `xmm, xmm/m128`, or a scalar from memory.
    VW { code: Code, mem: MemorySize },
    /// `VEX` three operand form, `reg, vvvv, rm`.
    VHW {
        bank: RegisterBank,
        code: Code,
        mem: MemorySize,
    },
    /// `EVEX` three operand form with an opmask, `reg {k}{z}, vvvv, rm`.
    VkHW {
        bank: RegisterBank,
        code: Code,
        tuple: TupleType,
        mem: MemorySize,
        bcst: Option<MemorySize>,
        rounding: Rounding,
    },
}

impl Handler {
    /// walk down from this node and decode the leaf reached, modrm already read.
    pub(crate) fn decode(&'static self, cx: &mut Context) -> Result<(), ErrorKind> {
        let mut handler = self;
        loop {
            handler = match *handler {
                Handler::Invalid => return Err(ErrorKind::InvalidOpcode),
                Handler::MandatoryPrefix(ref table) => {
                    cx.clear_mandatory_prefix();
                    table[cx.state.mandatory_prefix as usize]
                }
                Handler::W(ref table) => table[cx.state.w as usize],
                Handler::VectorLength(ref table) => table[cx.state.vector_length as usize],
                Handler::VectorLengthEr(ref table) => {
                    if cx.state.modbits == 3 && cx.state.b {
                        table[2]
                    } else {
                        table[cx.state.vector_length as usize]
                    }
                }
                Handler::P_Q { code, mem } => return decode_p_q(cx, code, mem),
                Handler::VW { code, mem } => return decode_vw(cx, code, mem),
                Handler::VHW { bank, code, mem } => return decode_vhw(cx, bank, code, mem),
                Handler::VkHW {
                    bank,
                    code,
                    tuple,
                    mem,
                    bcst,
                    rounding,
                } => return decode_vkhw(cx, bank, code, tuple, mem, bcst, rounding),
            };
        }
    }
}

fn decode_p_q(cx: &mut Context, code: Code, mem: MemorySize) -> Result<(), ErrorKind> {
    cx.inst.code = code;
    cx.inst.operand_count = 2;

    // mmx registers ignore `REX.R` and `REX.B`
    cx.inst.set_register(0, RegSpec::mm(cx.state.reg));
    if cx.state.modbits == 3 {
        cx.inst.set_register(1, RegSpec::mm(cx.state.rm));
    } else {
        cx.read_op_mem(TupleType::None)?;
        cx.inst.set_memory(1, mem);
    }

    Ok(())
}

fn decode_vw(cx: &mut Context, code: Code, mem: MemorySize) -> Result<(), ErrorKind> {
    cx.inst.code = code;
    cx.inst.operand_count = 2;

    let reg = cx.reg_operand(RegisterBank::X);
    cx.inst.set_register(0, reg);
    if cx.state.modbits == 3 {
        let reg = cx.rm_operand(RegisterBank::X);
        cx.inst.set_register(1, reg);
    } else {
        cx.read_op_mem(TupleType::None)?;
        cx.inst.set_memory(1, mem);
    }

    Ok(())
}

fn decode_vhw(
    cx: &mut Context,
    bank: RegisterBank,
    code: Code,
    mem: MemorySize,
) -> Result<(), ErrorKind> {
    cx.inst.code = code;
    cx.inst.operand_count = 3;

    let reg = cx.reg_operand(bank);
    cx.inst.set_register(0, reg);
    let reg = cx.vvvv_operand(bank);
    cx.inst.set_register(1, reg);
    if cx.state.modbits == 3 {
        let reg = cx.rm_operand(bank);
        cx.inst.set_register(2, reg);
    } else {
        cx.read_op_mem(TupleType::None)?;
        cx.inst.set_memory(2, mem);
    }

    Ok(())
}

fn decode_vkhw(
    cx: &mut Context,
    bank: RegisterBank,
    code: Code,
    tuple: TupleType,
    mem: MemorySize,
    bcst: Option<MemorySize>,
    rounding: Rounding,
) -> Result<(), ErrorKind> {
    cx.inst.code = code;
    cx.inst.operand_count = 3;

    let reg = cx.reg_operand(bank);
    cx.inst.set_register(0, reg);
    let reg = cx.vvvv_operand(bank);
    cx.inst.set_register(1, reg);
    if cx.state.modbits == 3 {
        let reg = cx.rm_operand(bank);
        cx.inst.set_register(2, reg);
        if cx.state.b {
            match rounding {
                Rounding::None => cx.invalid(ErrorKind::InvalidOperand)?,
                Rounding::Embedded => {
                    cx.inst.rounding = RoundingControl::from_ll(cx.state.vector_length)
                }
                Rounding::SaeOnly => cx.inst.sae = true,
            }
        }
    } else if cx.state.b {
        cx.read_op_mem(tuple)?;
        match bcst {
            Some(bcst) => {
                cx.inst.broadcast = true;
                cx.inst.set_memory(2, bcst);
            }
            None => {
                cx.invalid(ErrorKind::InvalidOperand)?;
                cx.inst.set_memory(2, mem);
            }
        }
    } else {
        cx.read_op_mem(tuple)?;
        cx.inst.set_memory(2, mem);
    }

    if cx.state.aaa != 0 {
        cx.inst.op_mask = Some(RegSpec::mask(cx.state.aaa));
    }
    cx.inst.zeroing = cx.state.z;

    Ok(())
}
