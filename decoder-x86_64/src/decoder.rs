use std::fmt;
use std::ops::BitOr;

use decoder::{Decodable, Error, ErrorKind, Reader};

use crate::handlers::{Handler, TupleType};
use crate::instruction::Instruction;
use crate::register::{RegSpec, RegisterBank};
use crate::tables;
use crate::EncodingKind;

/// no x86 instruction, prefixes included, may be longer than this.
pub const MAX_INSTRUCTION_LEN: usize = 15;

/// the processor mode instructions are decoded under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// 16-bit code.
    Real,
    /// 32-bit code.
    Protected,
    /// 64-bit code.
    Long,
}

impl Mode {
    pub fn from_bitness(bitness: u32) -> Option<Self> {
        match bitness {
            16 => Some(Self::Real),
            32 => Some(Self::Protected),
            64 => Some(Self::Long),
            _ => None,
        }
    }

    pub fn bitness(self) -> u32 {
        match self {
            Self::Real => 16,
            Self::Protected => 32,
            Self::Long => 64,
        }
    }

    fn address_size(self) -> AddressSize {
        match self {
            Self::Real => AddressSize::Bits16,
            Self::Protected => AddressSize::Bits32,
            Self::Long => AddressSize::Bits64,
        }
    }
}

/// knobs changing how strictly encodings are validated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct DecoderOptions {
    bits: u32,
}

impl DecoderOptions {
    pub const NONE: Self = Self { bits: 0 };

    /// accept encodings a processor would `#UD` on but that still have an unambiguous
    /// meaning: `LOCK` on non-lockable instructions, `VEX`/`EVEX` after `66`/`F2`/`F3`/`REX`,
    /// zeroing without an opmask and misplaced broadcasts.
    pub const NO_INVALID_CHECK: Self = Self { bits: 1 };

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl BitOr for DecoderOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decoder {
    mode: Mode,
    options: DecoderOptions,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Mode::Long)
    }
}

impl fmt::Display for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x86 {}-bit decoder", self.mode.bitness())?;
        if self.options.contains(DecoderOptions::NO_INVALID_CHECK) {
            f.write_str(" (no invalid check)")?;
        }
        Ok(())
    }
}

impl Decoder {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            options: DecoderOptions::NONE,
        }
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// decode a single instruction located at `ip`.
    ///
    /// on error the reader has consumed `Error::size()` bytes, those the decoder looked at
    /// before giving up.
    pub fn decode_at(&self, reader: &mut Reader, ip: u64) -> Result<Instruction, Error> {
        reader.mark();

        let mut inst = Instruction {
            ip,
            ..Default::default()
        };

        let mut cx = Context {
            words: reader,
            inst: &mut inst,
            state: State::new(self.mode),
            mode: self.mode,
            invalid_check: !self.options.contains(DecoderOptions::NO_INVALID_CHECK),
        };

        match read_instruction(&mut cx) {
            Ok(()) => {
                inst.length = reader.offset() as u8;
                Ok(inst)
            }
            Err(kind) => Err(Error::new(kind, reader.offset())),
        }
    }

    /// iterate over every instruction in `data`, the first located at `ip`.
    pub fn stream<'data>(&self, data: &'data [u8], ip: u64) -> crate::Stream<'data> {
        crate::Stream {
            reader: Reader::new(data),
            decoder: *self,
            ip,
        }
    }
}

impl Decodable for Decoder {
    type Instruction = Instruction;

    fn decode(&self, reader: &mut Reader) -> Result<Self::Instruction, Error> {
        self.decode_at(reader, 0)
    }

    fn max_width(&self) -> usize {
        MAX_INSTRUCTION_LEN
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AddressSize {
    Bits16,
    Bits32,
    Bits64,
}

/// the prefix selecting between instructions sharing an opcode, in `VEX.pp` order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum MandatoryPrefix {
    #[default]
    None = 0,
    P66 = 1,
    PF3 = 2,
    PF2 = 3,
}

impl MandatoryPrefix {
    const fn from_pp(pp: u8) -> Self {
        match pp & 3 {
            0 => Self::None,
            1 => Self::P66,
            2 => Self::PF3,
            _ => Self::PF2,
        }
    }
}

/// everything learned about the current instruction that isn't part of the result.
#[derive(Copy, Clone, Debug)]
pub(crate) struct State {
    pub modrm: u8,
    pub modbits: u8,
    pub reg: u8,
    pub rm: u8,
    /// `REX.R`/`VEX.R`/`EVEX.R`, 0 or 8.
    pub extra_register_base: u8,
    /// `REX.X`/`VEX.X`/`EVEX.X` applied to a SIB index, 0 or 8.
    pub extra_index_register_base: u8,
    /// `REX.B`/`VEX.B`/`EVEX.B`, 0 or 8.
    pub extra_base_register_base: u8,
    /// `EVEX.R'`, 0 or 16.
    pub extra_register_base_evex: u8,
    /// `EVEX.X` applied to a register in modrm `rm`, 0 or 16.
    pub extra_base_register_base_evex: u8,
    pub vvvv: u8,
    pub aaa: u8,
    pub vector_length: u8,
    pub mandatory_prefix: MandatoryPrefix,
    pub address_size: AddressSize,
    pub encoding: EncodingKind,
    pub has_rex: bool,
    pub w: bool,
    pub z: bool,
    pub b: bool,
}

impl State {
    fn new(mode: Mode) -> Self {
        Self {
            modrm: 0,
            modbits: 0,
            reg: 0,
            rm: 0,
            extra_register_base: 0,
            extra_index_register_base: 0,
            extra_base_register_base: 0,
            extra_register_base_evex: 0,
            extra_base_register_base_evex: 0,
            vvvv: 0,
            aaa: 0,
            vector_length: 0,
            mandatory_prefix: MandatoryPrefix::None,
            address_size: mode.address_size(),
            encoding: EncodingKind::Legacy,
            has_rex: false,
            w: false,
            z: false,
            b: false,
        }
    }
}

/// a decode in progress.
pub(crate) struct Context<'r, 'data> {
    pub words: &'r mut Reader<'data>,
    pub inst: &'r mut Instruction,
    pub state: State,
    pub mode: Mode,
    pub invalid_check: bool,
}

const MEM_REGS_16: [(RegSpec, Option<RegSpec>); 8] = [
    (RegSpec::bx(), Some(RegSpec::si())),
    (RegSpec::bx(), Some(RegSpec::di())),
    (RegSpec::bp(), Some(RegSpec::si())),
    (RegSpec::bp(), Some(RegSpec::di())),
    (RegSpec::si(), None),
    (RegSpec::di(), None),
    (RegSpec::bp(), None),
    (RegSpec::bx(), None),
];

impl Context<'_, '_> {
    #[inline]
    pub fn is_long(&self) -> bool {
        self.mode == Mode::Long
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, ErrorKind> {
        if self.words.offset() >= MAX_INSTRUCTION_LEN {
            return Err(ErrorKind::TooLong);
        }

        self.words.next().ok_or(ErrorKind::ExhaustedInput)
    }

    fn read_u16(&mut self) -> Result<u16, ErrorKind> {
        Ok(u16::from_le_bytes([self.read_u8()?, self.read_u8()?]))
    }

    fn read_u32(&mut self) -> Result<u32, ErrorKind> {
        let mut buf = [0u8; 4];
        for byte in buf.iter_mut() {
            *byte = self.read_u8()?;
        }
        Ok(u32::from_le_bytes(buf))
    }

    fn read_modrm(&mut self) -> Result<(), ErrorKind> {
        let modrm = self.read_u8()?;
        self.set_modrm(modrm);
        Ok(())
    }

    fn set_modrm(&mut self, modrm: u8) {
        self.state.modrm = modrm;
        self.state.modbits = modrm >> 6;
        self.state.reg = (modrm >> 3) & 7;
        self.state.rm = modrm & 7;
    }

    /// fail with `kind` unless invalid encodings are accepted.
    #[inline]
    pub fn invalid(&self, kind: ErrorKind) -> Result<(), ErrorKind> {
        if self.invalid_check {
            Err(kind)
        } else {
            Ok(())
        }
    }

    /// undo the side effects of a legacy prefix that turned out to select the instruction.
    pub fn clear_mandatory_prefix(&mut self) {
        if self.state.encoding != EncodingKind::Legacy {
            return;
        }

        match self.state.mandatory_prefix {
            MandatoryPrefix::PF3 => self.inst.prefixes.clear_repe(),
            MandatoryPrefix::PF2 => self.inst.prefixes.clear_repne(),
            MandatoryPrefix::P66 | MandatoryPrefix::None => {}
        }
    }

    /// register named by modrm `reg`, with every extension bit the encoding carries.
    #[inline]
    pub fn reg_operand(&self, bank: RegisterBank) -> RegSpec {
        let num = self.state.reg + self.state.extra_register_base + self.state.extra_register_base_evex;
        RegSpec { num, bank }
    }

    /// register named by modrm `rm` when `mod == 3`.
    #[inline]
    pub fn rm_operand(&self, bank: RegisterBank) -> RegSpec {
        let num =
            self.state.rm + self.state.extra_base_register_base + self.state.extra_base_register_base_evex;
        RegSpec { num, bank }
    }

    /// register named by `VEX.vvvv`/`EVEX.V'vvvv`.
    #[inline]
    pub fn vvvv_operand(&self, bank: RegisterBank) -> RegSpec {
        RegSpec {
            num: self.state.vvvv,
            bank,
        }
    }

    /// the `N` of `disp8*N`, 1 outside of `EVEX`.
    fn disp8_scale(&self, tuple: TupleType) -> u32 {
        tuple.disp8_scale(self.state.b, self.state.w)
    }

    fn set_displacement(&mut self, size: u8) {
        self.inst.displ_size = size;
        self.inst.displ_offset = self.words.offset() as u8;
    }

    fn read_disp8(&mut self, tuple: TupleType) -> Result<u32, ErrorKind> {
        self.set_displacement(1);
        let disp = self.read_u8()? as i8 as i32 as u32;
        Ok(disp.wrapping_mul(self.disp8_scale(tuple)))
    }

    /// decode the memory operand selected by modrm, `mod != 3`.
    pub fn read_op_mem(&mut self, tuple: TupleType) -> Result<(), ErrorKind> {
        debug_assert!(self.state.modbits != 3);
        match self.state.address_size {
            AddressSize::Bits16 => self.read_op_mem_16(tuple),
            AddressSize::Bits32 => self.read_op_mem_32_or_64(RegisterBank::D, tuple),
            AddressSize::Bits64 => self.read_op_mem_32_or_64(RegisterBank::Q, tuple),
        }
    }

    fn read_op_mem_16(&mut self, tuple: TupleType) -> Result<(), ErrorKind> {
        let (base, index) = MEM_REGS_16[self.state.rm as usize];
        match self.state.modbits {
            0 if self.state.rm == 0b110 => {
                self.set_displacement(2);
                self.inst.disp = self.read_u16()? as u32;
                return Ok(());
            }
            0 => {}
            1 => self.inst.disp = self.read_disp8(tuple)? as u16 as u32,
            _ => {
                self.set_displacement(2);
                self.inst.disp = self.read_u16()? as u32;
            }
        }

        self.inst.mem_base = Some(base);
        self.inst.mem_index = index;
        Ok(())
    }

    fn read_op_mem_32_or_64(&mut self, bank: RegisterBank, tuple: TupleType) -> Result<(), ErrorKind> {
        // a 32-bit displacement is reported as 8 bytes wide under 64-bit addressing
        let disp32_size = if bank == RegisterBank::Q { 8 } else { 4 };
        let base = RegSpec {
            num: self.state.rm + self.state.extra_base_register_base,
            bank,
        };

        let sib = match (self.state.modbits, self.state.rm) {
            (0, 0b100) => {
                let sib = self.read_u8()?;
                if sib & 7 == 0b101 {
                    self.set_displacement(disp32_size);
                    self.inst.disp = self.read_u32()?;
                }
                sib
            }
            (0, 0b101) => {
                self.set_displacement(disp32_size);
                self.inst.disp = self.read_u32()?;
                if self.is_long() {
                    self.inst.mem_base = Some(if bank == RegisterBank::Q {
                        RegSpec::RIP
                    } else {
                        RegSpec::EIP
                    });
                }
                return Ok(());
            }
            (0, _) => {
                self.inst.mem_base = Some(base);
                return Ok(());
            }
            (1, 0b100) => {
                let sib = self.read_u8()?;
                self.inst.disp = self.read_disp8(tuple)?;
                sib
            }
            (1, _) => {
                self.inst.disp = self.read_disp8(tuple)?;
                self.inst.mem_base = Some(base);
                return Ok(());
            }
            (_, 0b100) => {
                let sib = self.read_u8()?;
                self.set_displacement(disp32_size);
                self.inst.disp = self.read_u32()?;
                sib
            }
            (_, _) => {
                self.set_displacement(disp32_size);
                self.inst.disp = self.read_u32()?;
                self.inst.mem_base = Some(base);
                return Ok(());
            }
        };

        let index = ((sib >> 3) & 7) + self.state.extra_index_register_base;
        // an index of `esp`/`rsp` means no index
        if index != 4 {
            self.inst.mem_index = Some(RegSpec { num: index, bank });
        }
        self.inst.scale = sib >> 6;

        let base = sib & 7;
        if !(base == 0b101 && self.state.modbits == 0) {
            self.inst.mem_base = Some(RegSpec {
                num: base + self.state.extra_base_register_base,
                bank,
            });
        }

        Ok(())
    }
}

fn legacy_segment(prefix: u8) -> RegSpec {
    match prefix {
        0x26 => RegSpec::es(),
        0x2e => RegSpec::cs(),
        0x36 => RegSpec::ss(),
        _ => RegSpec::ds(),
    }
}

fn read_instruction(cx: &mut Context) -> Result<(), ErrorKind> {
    let mut rex = None;

    let opcode = loop {
        let b = cx.read_u8()?;
        match b {
            0x26 | 0x2e | 0x36 | 0x3e => {
                // in 64-bit mode, `fs` and `gs` can't be replaced by the null segments
                let pinned = cx.is_long()
                    && matches!(cx.inst.segment_prefix, Some(seg) if seg == RegSpec::fs() || seg == RegSpec::gs());
                if !pinned {
                    cx.inst.segment_prefix = Some(legacy_segment(b));
                }
            }
            0x64 => cx.inst.segment_prefix = Some(RegSpec::fs()),
            0x65 => cx.inst.segment_prefix = Some(RegSpec::gs()),
            0x66 => {
                if cx.state.mandatory_prefix == MandatoryPrefix::None {
                    cx.state.mandatory_prefix = MandatoryPrefix::P66;
                }
            }
            0x67 => {
                cx.state.address_size = match (cx.mode, cx.state.address_size) {
                    (Mode::Long, _) => AddressSize::Bits32,
                    (_, AddressSize::Bits16) => AddressSize::Bits32,
                    _ => AddressSize::Bits16,
                };
            }
            0xf0 => cx.inst.prefixes.set_lock(),
            0xf2 => {
                cx.inst.prefixes.set_repne();
                cx.state.mandatory_prefix = MandatoryPrefix::PF2;
            }
            0xf3 => {
                cx.inst.prefixes.set_repe();
                cx.state.mandatory_prefix = MandatoryPrefix::PF3;
            }
            0x40..=0x4f if cx.is_long() => {
                rex = Some(b);
                continue;
            }
            _ => break b,
        }

        // rex only applies when it's the last prefix
        rex = None;
    };

    if let Some(rex) = rex {
        cx.state.has_rex = true;
        cx.state.w = rex & 0b1000 != 0;
        cx.state.extra_register_base = (rex & 0b0100) << 1;
        cx.state.extra_index_register_base = (rex & 0b0010) << 2;
        cx.state.extra_base_register_base = (rex & 0b0001) << 3;
    }

    match opcode {
        0x0f => {
            let opcode = cx.read_u8()?;
            if opcode == 0x38 || opcode == 0x3a {
                // none of the three-byte legacy maps are decoded
                cx.read_u8()?;
                return Err(ErrorKind::InvalidOpcode);
            }
            decode_table(cx, tables::LEGACY_0F[opcode as usize])?;
        }
        0xc4 | 0xc5 | 0x62 => {
            let payload = cx.read_u8()?;

            // outside of 64-bit mode these are `les`, `lds` and `bound` unless modrm selects a
            // register, which those instructions can't encode
            if !cx.is_long() && payload >> 6 != 0b11 {
                return Err(ErrorKind::InvalidOpcode);
            }

            if cx.state.has_rex || cx.state.mandatory_prefix != MandatoryPrefix::None {
                cx.invalid(ErrorKind::InvalidPrefixes)?;
            }

            match opcode {
                0xc5 => read_vex2(cx, payload)?,
                0xc4 => read_vex3(cx, payload)?,
                _ => read_evex(cx, payload)?,
            }
        }
        _ => return Err(ErrorKind::InvalidOpcode),
    }

    // nothing decoded here accepts a lock prefix
    if cx.inst.prefixes.lock() {
        cx.invalid(ErrorKind::InvalidPrefixes)?;
    }

    Ok(())
}

fn decode_table(cx: &mut Context, handler: &'static Handler) -> Result<(), ErrorKind> {
    if let Handler::Invalid = handler {
        return Err(ErrorKind::InvalidOpcode);
    }

    cx.read_modrm()?;
    handler.decode(cx)
}

fn read_vex2(cx: &mut Context, payload: u8) -> Result<(), ErrorKind> {
    cx.state.encoding = EncodingKind::Vex;

    if cx.is_long() && payload & 0x80 == 0 {
        cx.state.extra_register_base = 8;
    }

    // outside of 64-bit mode the top bit of `vvvv` is forced clear by the modrm check
    cx.state.vvvv = (!payload >> 3) & 0b1111;
    cx.state.vector_length = (payload >> 2) & 1;
    cx.state.mandatory_prefix = MandatoryPrefix::from_pp(payload);

    let opcode = cx.read_u8()?;
    decode_table(cx, tables::VEX_0F[opcode as usize])
}

fn read_vex3(cx: &mut Context, b1: u8) -> Result<(), ErrorKind> {
    cx.state.encoding = EncodingKind::Vex;

    let b2 = cx.read_u8()?;
    cx.state.w = b2 & 0x80 != 0;
    cx.state.vector_length = (b2 >> 2) & 1;
    cx.state.mandatory_prefix = MandatoryPrefix::from_pp(b2);

    if cx.is_long() {
        cx.state.vvvv = (!b2 >> 3) & 0b1111;
        let inverted = !b1;
        cx.state.extra_register_base = (inverted >> 4) & 8;
        cx.state.extra_index_register_base = (inverted >> 3) & 8;
        cx.state.extra_base_register_base = (inverted >> 2) & 8;
    } else {
        cx.state.vvvv = (!b2 >> 3) & 0b111;
    }

    let table = match b1 & 0x1f {
        1 => &tables::VEX_0F,
        2 => &tables::VEX_0F38,
        3 => &tables::VEX_0F3A,
        _ => return Err(ErrorKind::InvalidOpcode),
    };

    let opcode = cx.read_u8()?;
    decode_table(cx, table[opcode as usize])
}

fn read_evex(cx: &mut Context, p0: u8) -> Result<(), ErrorKind> {
    let p1 = cx.read_u8()?;
    let p2 = cx.read_u8()?;

    // the one bit above `pp` is reserved and must be 1, clear is the `MVEX` encoding
    if p1 & 0b100 == 0 {
        return Err(ErrorKind::InvalidOpcode);
    }

    // the two bits above `mm` are reserved and must be 0
    if p0 & 0b1100 != 0 {
        return Err(ErrorKind::InvalidOpcode);
    }

    cx.state.encoding = EncodingKind::Evex;
    cx.state.mandatory_prefix = MandatoryPrefix::from_pp(p1);
    cx.state.w = p1 & 0x80 != 0;

    cx.state.aaa = p2 & 0b111;
    cx.state.z = p2 & 0x80 != 0;
    if cx.state.z && cx.state.aaa == 0 {
        cx.invalid(ErrorKind::InvalidOperand)?;
    }

    cx.state.b = p2 & 0x10 != 0;
    cx.state.vector_length = (p2 >> 5) & 0b11;

    if cx.is_long() {
        cx.state.vvvv = ((!p1 >> 3) & 0b1111) + ((!p2 & 0b1000) << 1);
        let inverted = !p0;
        cx.state.extra_register_base = (inverted >> 4) & 8;
        cx.state.extra_index_register_base = (inverted & 0x40) >> 3;
        cx.state.extra_base_register_base_evex = (inverted & 0x40) >> 2;
        cx.state.extra_base_register_base = (inverted >> 2) & 8;
        cx.state.extra_register_base_evex = inverted & 0x10;
    } else {
        cx.state.vvvv = (!p1 >> 3) & 0b111;
    }

    let table = match p0 & 0b11 {
        1 => &tables::EVEX_0F,
        2 => &tables::EVEX_0F38,
        3 => &tables::EVEX_0F3A,
        _ => return Err(ErrorKind::InvalidOpcode),
    };

    let opcode = cx.read_u8()?;
    decode_table(cx, table[opcode as usize])
}
