use std::fmt;

use crate::{Code, EncodingKind, MemorySize, Mnemonic, RegSpec};

/// whether an operand is a register or a memory reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    Register,
    Memory,
}

/// the rounding mode selected by an `{er}` operand, see `EVEX.L'L` with `EVEX.b`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RoundingControl {
    #[default]
    None,
    RoundToNearest,
    RoundDown,
    RoundUp,
    RoundTowardZero,
}

impl RoundingControl {
    /// the rounding mode encoded by `EVEX.L'L` when `EVEX.b` is set on a register operand.
    pub(crate) const fn from_ll(ll: u8) -> Self {
        match ll & 3 {
            0 => Self::RoundToNearest,
            1 => Self::RoundDown,
            2 => Self::RoundUp,
            _ => Self::RoundTowardZero,
        }
    }
}

/// where the displacement lives within the instruction's bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ConstantOffsets {
    /// offset of the displacement from the first byte of the instruction.
    pub displacement_offset: usize,

    /// size of the displacement in bytes, 0 if there is none.
    pub displacement_size: usize,
}

/// the memory reference of an instruction, as one value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemoryOperand {
    pub segment: RegSpec,
    pub base: Option<RegSpec>,
    pub index: Option<RegSpec>,
    pub scale: u8,
    pub displacement: u32,
    pub size: MemorySize,
}

/// an operand of a decoded instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Register(RegSpec),
    Memory(MemoryOperand),
}

/// legacy prefixes that survived decoding.
///
/// `F2`/`F3` consumed as a mandatory prefix are not reported as `repne`/`repe`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Prefixes {
    bits: u8,
}

impl Prefixes {
    const LOCK: u8 = 0b001;
    const REPE: u8 = 0b010;
    const REPNE: u8 = 0b100;

    #[inline]
    pub fn lock(&self) -> bool {
        self.bits & Self::LOCK != 0
    }

    #[inline]
    pub fn repe(&self) -> bool {
        self.bits & Self::REPE != 0
    }

    #[inline]
    pub fn repne(&self) -> bool {
        self.bits & Self::REPNE != 0
    }

    #[inline]
    pub(crate) fn set_lock(&mut self) {
        self.bits |= Self::LOCK;
    }

    #[inline]
    pub(crate) fn set_repe(&mut self) {
        self.bits |= Self::REPE;
    }

    #[inline]
    pub(crate) fn set_repne(&mut self) {
        self.bits |= Self::REPNE;
    }

    #[inline]
    pub(crate) fn clear_repe(&mut self) {
        self.bits &= !Self::REPE;
    }

    #[inline]
    pub(crate) fn clear_repne(&mut self) {
        self.bits &= !Self::REPNE;
    }
}

/// an `x86` instruction.
///
/// typically a code will be inspected by [`Instruction::code()`], and an instruction has
/// [`Instruction::op_count()`] many operands. operands are provided by
/// [`Instruction::operand()`], or piecewise by [`Instruction::op_kind()`],
/// [`Instruction::op_register()`] and the `memory_*` accessors. at most one operand is a
/// memory reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Instruction {
    pub(crate) ip: u64,
    pub(crate) code: Code,
    pub(crate) length: u8,
    pub(crate) operand_count: u8,
    pub(crate) op_kinds: [Option<OpKind>; 3],
    pub(crate) regs: [Option<RegSpec>; 3],
    pub(crate) prefixes: Prefixes,
    pub(crate) segment_prefix: Option<RegSpec>,
    pub(crate) mem_base: Option<RegSpec>,
    pub(crate) mem_index: Option<RegSpec>,
    pub(crate) scale: u8,
    pub(crate) disp: u32,
    pub(crate) displ_size: u8,
    pub(crate) displ_offset: u8,
    pub(crate) mem_size: MemorySize,
    pub(crate) op_mask: Option<RegSpec>,
    pub(crate) zeroing: bool,
    pub(crate) broadcast: bool,
    pub(crate) sae: bool,
    pub(crate) rounding: RoundingControl,
}

impl Instruction {
    pub(crate) fn set_register(&mut self, idx: usize, reg: RegSpec) {
        self.op_kinds[idx] = Some(OpKind::Register);
        self.regs[idx] = Some(reg);
    }

    pub(crate) fn set_memory(&mut self, idx: usize, size: MemorySize) {
        self.op_kinds[idx] = Some(OpKind::Memory);
        self.mem_size = size;
    }

    #[inline]
    pub fn code(&self) -> Code {
        self.code
    }

    #[inline]
    pub fn mnemonic(&self) -> Mnemonic {
        self.code.mnemonic()
    }

    #[inline]
    pub fn encoding(&self) -> EncodingKind {
        self.code.encoding()
    }

    #[inline]
    pub fn op_count(&self) -> usize {
        self.operand_count as usize
    }

    /// length of the instruction in bytes, prefixes included.
    #[inline]
    pub fn len(&self) -> usize {
        self.length as usize
    }

    /// address the instruction was decoded at.
    #[inline]
    pub fn ip(&self) -> u64 {
        self.ip
    }

    /// address of the byte following this instruction.
    #[inline]
    pub fn next_ip(&self) -> u64 {
        self.ip.wrapping_add(self.length as u64)
    }

    #[inline]
    pub fn prefixes(&self) -> Prefixes {
        self.prefixes
    }

    #[inline]
    pub fn has_lock_prefix(&self) -> bool {
        self.prefixes.lock()
    }

    #[inline]
    pub fn has_repe_prefix(&self) -> bool {
        self.prefixes.repe()
    }

    #[inline]
    pub fn has_repne_prefix(&self) -> bool {
        self.prefixes.repne()
    }

    /// the explicit segment override, if one applied.
    #[inline]
    pub fn segment_prefix(&self) -> Option<RegSpec> {
        self.segment_prefix
    }

    pub fn op_kind(&self, idx: usize) -> Option<OpKind> {
        if idx < self.op_count() {
            self.op_kinds[idx]
        } else {
            None
        }
    }

    /// the register of operand `idx`, `None` for memory operands.
    pub fn op_register(&self, idx: usize) -> Option<RegSpec> {
        match self.op_kind(idx)? {
            OpKind::Register => self.regs[idx],
            OpKind::Memory => None,
        }
    }

    pub fn operand(&self, idx: usize) -> Option<Operand> {
        match self.op_kind(idx)? {
            OpKind::Register => self.regs[idx].map(Operand::Register),
            OpKind::Memory => Some(Operand::Memory(MemoryOperand {
                segment: self.memory_segment(),
                base: self.mem_base,
                index: self.mem_index,
                scale: self.memory_index_scale(),
                displacement: self.disp,
                size: self.mem_size,
            })),
        }
    }

    pub fn operands(&self) -> impl Iterator<Item = Operand> + '_ {
        (0..self.op_count()).filter_map(|idx| self.operand(idx))
    }

    /// whether any operand references memory.
    pub fn has_memory_operand(&self) -> bool {
        (0..self.op_count()).any(|idx| self.op_kinds[idx] == Some(OpKind::Memory))
    }

    /// the segment a memory operand is relative to.
    ///
    /// an explicit override wins, otherwise `bp`, `ebp`, `rbp`, `esp` and `rsp` based accesses
    /// go through `ss` and everything else through `ds`.
    pub fn memory_segment(&self) -> RegSpec {
        if let Some(segment) = self.segment_prefix {
            return segment;
        }

        match self.mem_base {
            Some(base) if base.is_stack_base() => RegSpec::ss(),
            _ => RegSpec::ds(),
        }
    }

    #[inline]
    pub fn memory_base(&self) -> Option<RegSpec> {
        self.mem_base
    }

    #[inline]
    pub fn memory_index(&self) -> Option<RegSpec> {
        self.mem_index
    }

    /// 1, 2, 4 or 8.
    #[inline]
    pub fn memory_index_scale(&self) -> u8 {
        1 << self.scale
    }

    /// the displacement, already scaled for `EVEX` compressed displacements.
    #[inline]
    pub fn memory_displacement(&self) -> u32 {
        self.disp
    }

    /// encoded size of the displacement: 0, 1, 2, 4, or 8 for a 32-bit displacement
    /// under 64-bit addressing.
    #[inline]
    pub fn memory_displ_size(&self) -> u8 {
        self.displ_size
    }

    #[inline]
    pub fn memory_size(&self) -> MemorySize {
        self.mem_size
    }

    /// the opmask register, `None` when `k0` was encoded.
    #[inline]
    pub fn op_mask(&self) -> Option<RegSpec> {
        self.op_mask
    }

    #[inline]
    pub fn zeroing_masking(&self) -> bool {
        self.zeroing
    }

    #[inline]
    pub fn merging_masking(&self) -> bool {
        !self.zeroing
    }

    #[inline]
    pub fn rounding_control(&self) -> RoundingControl {
        self.rounding
    }

    #[inline]
    pub fn suppress_all_exceptions(&self) -> bool {
        self.sae
    }

    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.broadcast
    }

    pub fn constant_offsets(&self) -> ConstantOffsets {
        let displacement_size = match self.displ_size {
            8 => 4,
            size => size as usize,
        };

        ConstantOffsets {
            displacement_offset: if displacement_size == 0 {
                0
            } else {
                self.displ_offset as usize
            },
            displacement_size,
        }
    }

    /// target of an `rip`/`eip`-relative memory operand.
    pub fn ip_rel_memory_address(&self) -> Option<u64> {
        let base = self.mem_base?;
        if !self.has_memory_operand() {
            return None;
        }

        let target = self.next_ip().wrapping_add(self.disp as i32 as i64 as u64);
        if base == RegSpec::RIP {
            Some(target)
        } else if base == RegSpec::EIP {
            Some(target & 0xffff_ffff)
        } else {
            None
        }
    }
}

impl decoder::Decoded for Instruction {
    #[inline]
    fn width(&self) -> usize {
        self.length as usize
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Register(reg) => f.write_str(reg.name()),
            Operand::Memory(mem) => {
                write!(f, "{} {}:[", mem.size, mem.segment)?;
                let mut sep = "";
                if let Some(base) = mem.base {
                    write!(f, "{base}")?;
                    sep = "+";
                }
                if let Some(index) = mem.index {
                    write!(f, "{sep}{index}*{}", mem.scale)?;
                    sep = "+";
                }
                if mem.displacement != 0 || sep.is_empty() {
                    write!(f, "{sep}{:#x}", mem.displacement)?;
                }
                f.write_str("]")
            }
        }
    }
}
