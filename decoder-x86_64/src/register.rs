use std::fmt;
use std::hash::{Hash, Hasher};

/// an `x86` register, including its number and bank.
///
/// ```
/// use x86_64::{RegSpec, RegisterBank};
///
/// assert_eq!(RegSpec::xmm(12).num(), 12);
/// assert_eq!(RegSpec::xmm(12).bank(), RegisterBank::X);
/// assert_eq!(RegSpec::zmm(31).name(), "zmm31");
/// ```
#[derive(Copy, Clone, Debug, PartialOrd, Ord, Eq, PartialEq)]
pub struct RegSpec {
    pub(crate) num: u8,
    pub(crate) bank: RegisterBank,
}

impl Hash for RegSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let code = ((self.bank as u16) << 8) | (self.num as u16);
        code.hash(state);
    }
}

/// the kind of register a `RegSpec` names.
///
/// this corresponds to the register's size, but is by the register's usage in the instruction
/// set; `rax` and `mm0` are the same size, but different banks (`Q` and `MM` respectively).
#[derive(Copy, Clone, Debug, PartialOrd, Ord, Eq, PartialEq, Hash)]
pub enum RegisterBank {
    /// 16-bit general purpose registers.
    W,
    /// 32-bit general purpose registers.
    D,
    /// 64-bit general purpose registers.
    Q,
    /// segment registers.
    S,
    /// `eip`, only ever the base of an `eip`-relative memory operand.
    EIP,
    /// `rip`, only ever the base of a `rip`-relative memory operand.
    RIP,
    /// mmx registers.
    MM,
    /// 128-bit vector registers.
    X,
    /// 256-bit vector registers.
    Y,
    /// 512-bit vector registers.
    Z,
    /// avx-512 opmask registers.
    K,
}

impl RegisterBank {
    /// the number of registers addressable in this bank.
    pub const fn count(self) -> u8 {
        match self {
            Self::W | Self::D | Self::Q => 16,
            Self::S => 6,
            Self::EIP | Self::RIP => 1,
            Self::MM | Self::K => 8,
            Self::X | Self::Y | Self::Z => 32,
        }
    }

    /// width of any register in this bank, in bytes.
    pub const fn size(self) -> u8 {
        match self {
            Self::W | Self::S => 2,
            Self::D | Self::EIP => 4,
            Self::Q | Self::RIP | Self::MM | Self::K => 8,
            Self::X => 16,
            Self::Y => 32,
            Self::Z => 64,
        }
    }
}

const REG_NAMES_W: [&str; 16] = [
    "ax", "cx", "dx", "bx", "sp", "bp", "si", "di", "r8w", "r9w", "r10w", "r11w", "r12w", "r13w",
    "r14w", "r15w",
];

const REG_NAMES_D: [&str; 16] = [
    "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi", "r8d", "r9d", "r10d", "r11d", "r12d",
    "r13d", "r14d", "r15d",
];

const REG_NAMES_Q: [&str; 16] = [
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12", "r13",
    "r14", "r15",
];

const REG_NAMES_S: [&str; 6] = ["es", "cs", "ss", "ds", "fs", "gs"];

const REG_NAMES_MM: [&str; 8] = ["mm0", "mm1", "mm2", "mm3", "mm4", "mm5", "mm6", "mm7"];

const REG_NAMES_K: [&str; 8] = ["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7"];

const REG_NAMES_X: [&str; 32] = [
    "xmm0", "xmm1", "xmm2", "xmm3", "xmm4", "xmm5", "xmm6", "xmm7", "xmm8", "xmm9", "xmm10",
    "xmm11", "xmm12", "xmm13", "xmm14", "xmm15", "xmm16", "xmm17", "xmm18", "xmm19", "xmm20",
    "xmm21", "xmm22", "xmm23", "xmm24", "xmm25", "xmm26", "xmm27", "xmm28", "xmm29", "xmm30",
    "xmm31",
];

const REG_NAMES_Y: [&str; 32] = [
    "ymm0", "ymm1", "ymm2", "ymm3", "ymm4", "ymm5", "ymm6", "ymm7", "ymm8", "ymm9", "ymm10",
    "ymm11", "ymm12", "ymm13", "ymm14", "ymm15", "ymm16", "ymm17", "ymm18", "ymm19", "ymm20",
    "ymm21", "ymm22", "ymm23", "ymm24", "ymm25", "ymm26", "ymm27", "ymm28", "ymm29", "ymm30",
    "ymm31",
];

const REG_NAMES_Z: [&str; 32] = [
    "zmm0", "zmm1", "zmm2", "zmm3", "zmm4", "zmm5", "zmm6", "zmm7", "zmm8", "zmm9", "zmm10",
    "zmm11", "zmm12", "zmm13", "zmm14", "zmm15", "zmm16", "zmm17", "zmm18", "zmm19", "zmm20",
    "zmm21", "zmm22", "zmm23", "zmm24", "zmm25", "zmm26", "zmm27", "zmm28", "zmm29", "zmm30",
    "zmm31",
];

macro_rules! register {
    ($bank:ident, $name:ident => $num:expr, $($tail:tt)+) => {
        #[inline]
        pub const fn $name() -> RegSpec {
            RegSpec { bank: RegisterBank::$bank, num: $num }
        }

        register!($bank, $($tail)*);
    };
    ($bank:ident, $name:ident => $num:expr) => {
        #[inline]
        pub const fn $name() -> RegSpec {
            RegSpec { bank: RegisterBank::$bank, num: $num }
        }
    };
}

impl RegSpec {
    /// the register `rip`. this register is in the bank `RIP`, which contains only it.
    pub const RIP: RegSpec = RegSpec::rip();

    /// the register `eip`. this register is in the bank `EIP`, which contains only it.
    pub const EIP: RegSpec = RegSpec::eip();

    /// build a register from its bank and number, rejecting numbers the bank can't hold.
    #[inline]
    pub const fn from_parts(num: u8, bank: RegisterBank) -> Option<RegSpec> {
        if num < bank.count() {
            Some(RegSpec { num, bank })
        } else {
            None
        }
    }

    /// the number of this register in its `RegisterBank`.
    ///
    /// for many registers this is a number in the name, but for the general purpose registers
    /// the first eight are `rax`, `rcx`, `rdx`, `rbx`, `rsp`, `rbp`, `rsi`, and `rdi` (or
    /// `eXX` for the 32-bit forms, `XX` for 16-bit forms).
    #[inline]
    pub const fn num(&self) -> u8 {
        self.num
    }

    #[inline]
    pub const fn bank(&self) -> RegisterBank {
        self.bank
    }

    /// width of the register, in bytes.
    #[inline]
    pub const fn size(&self) -> u8 {
        self.bank.size()
    }

    /// return a human-friendly name for this register.
    pub fn name(&self) -> &'static str {
        let idx = self.num as usize;
        match self.bank {
            RegisterBank::W => REG_NAMES_W[idx],
            RegisterBank::D => REG_NAMES_D[idx],
            RegisterBank::Q => REG_NAMES_Q[idx],
            RegisterBank::S => REG_NAMES_S[idx],
            RegisterBank::EIP => "eip",
            RegisterBank::RIP => "rip",
            RegisterBank::MM => REG_NAMES_MM[idx],
            RegisterBank::X => REG_NAMES_X[idx],
            RegisterBank::Y => REG_NAMES_Y[idx],
            RegisterBank::Z => REG_NAMES_Z[idx],
            RegisterBank::K => REG_NAMES_K[idx],
        }
    }

    /// construct a `RegSpec` for mmx reg `num`
    #[inline]
    pub fn mm(num: u8) -> RegSpec {
        if num >= 8 {
            panic!("invalid x86 mmx reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::MM,
        }
    }

    /// construct a `RegSpec` for xmm reg `num`
    #[inline]
    pub fn xmm(num: u8) -> RegSpec {
        if num >= 32 {
            panic!("invalid x86 xmm reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::X,
        }
    }

    /// construct a `RegSpec` for ymm reg `num`
    #[inline]
    pub fn ymm(num: u8) -> RegSpec {
        if num >= 32 {
            panic!("invalid x86 ymm reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::Y,
        }
    }

    /// construct a `RegSpec` for zmm reg `num`
    #[inline]
    pub fn zmm(num: u8) -> RegSpec {
        if num >= 32 {
            panic!("invalid x86 zmm reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::Z,
        }
    }

    /// construct a `RegSpec` for mask reg `num`
    #[inline]
    pub fn mask(num: u8) -> RegSpec {
        if num >= 8 {
            panic!("invalid x86 mask reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::K,
        }
    }

    /// construct a `RegSpec` for 64-bit general purpose reg `num`
    #[inline]
    pub fn q(num: u8) -> RegSpec {
        if num >= 16 {
            panic!("invalid x86 qword reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::Q,
        }
    }

    /// construct a `RegSpec` for 32-bit general purpose reg `num`
    #[inline]
    pub fn d(num: u8) -> RegSpec {
        if num >= 16 {
            panic!("invalid x86 dword reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::D,
        }
    }

    /// construct a `RegSpec` for 16-bit general purpose reg `num`
    #[inline]
    pub fn w(num: u8) -> RegSpec {
        if num >= 16 {
            panic!("invalid x86 word reg {}", num);
        }

        RegSpec {
            num,
            bank: RegisterBank::W,
        }
    }

    register!(W, ax => 0, cx => 1, dx => 2, bx => 3, sp => 4, bp => 5, si => 6, di => 7);
    register!(D, eax => 0, ecx => 1, edx => 2, ebx => 3, esp => 4, ebp => 5, esi => 6, edi => 7);
    register!(Q, rax => 0, rcx => 1, rdx => 2, rbx => 3, rsp => 4, rbp => 5, rsi => 6, rdi => 7);
    register!(S, es => 0, cs => 1, ss => 2, ds => 3, fs => 4, gs => 5);
    register!(EIP, eip => 0);
    register!(RIP, rip => 0);

    /// `true` for the registers that pick `ss` as the default segment when used as a base.
    #[inline]
    pub(crate) fn is_stack_base(&self) -> bool {
        matches!(self.bank, RegisterBank::W | RegisterBank::D | RegisterBank::Q)
            && (self.num == 4 || self.num == 5)
            && !(self.bank == RegisterBank::W && self.num == 4)
    }
}

impl fmt::Display for RegSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
