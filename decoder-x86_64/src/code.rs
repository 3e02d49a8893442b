use std::fmt;

/// which prefix scheme an instruction was encoded with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EncodingKind {
    Legacy,
    Vex,
    Evex,
}

macro_rules! mnemonics {
    ($($name:ident => $text:literal,)*) => {
        /// an instruction's mnemonic, shared by every operand form of the instruction.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum Mnemonic {
            $($name,)*
        }

        impl Mnemonic {
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => $text,)*
                }
            }
        }
    };
}

mnemonics! {
    Invalid => "(bad)",
    Psubusb => "psubusb",
    Psubusw => "psubusw",
    Pminub => "pminub",
    Pand => "pand",
    Paddusb => "paddusb",
    Paddusw => "paddusw",
    Pmaxub => "pmaxub",
    Pandn => "pandn",
    Vpsubusb => "vpsubusb",
    Vpsubusw => "vpsubusw",
    Vpminub => "vpminub",
    Vpand => "vpand",
    Vpandd => "vpandd",
    Vpandq => "vpandq",
    Vpaddusb => "vpaddusb",
    Vpaddusw => "vpaddusw",
    Vpmaxub => "vpmaxub",
    Vpandn => "vpandn",
    Vpandnd => "vpandnd",
    Vpandnq => "vpandnq",
    Vpshldvw => "vpshldvw",
    Vpshldvd => "vpshldvd",
    Vpshldvq => "vpshldvq",
    Vpshrdvw => "vpshrdvw",
    Vpshrdvd => "vpshrdvd",
    Vpshrdvq => "vpshrdvq",
    Vpermi2b => "vpermi2b",
    Vpermi2w => "vpermi2w",
    Vpermi2d => "vpermi2d",
    Vpermi2q => "vpermi2q",
    Vpermi2ps => "vpermi2ps",
    Vpermi2pd => "vpermi2pd",
    Addps => "addps",
    Addpd => "addpd",
    Addss => "addss",
    Addsd => "addsd",
    Mulps => "mulps",
    Mulpd => "mulpd",
    Mulss => "mulss",
    Mulsd => "mulsd",
    Subps => "subps",
    Subpd => "subpd",
    Subss => "subss",
    Subsd => "subsd",
    Minps => "minps",
    Minpd => "minpd",
    Minss => "minss",
    Minsd => "minsd",
    Divps => "divps",
    Divpd => "divpd",
    Divss => "divss",
    Divsd => "divsd",
    Maxps => "maxps",
    Maxpd => "maxpd",
    Maxss => "maxss",
    Maxsd => "maxsd",
    Vaddps => "vaddps",
    Vaddpd => "vaddpd",
    Vaddss => "vaddss",
    Vaddsd => "vaddsd",
    Vmulps => "vmulps",
    Vmulpd => "vmulpd",
    Vmulss => "vmulss",
    Vmulsd => "vmulsd",
    Vsubps => "vsubps",
    Vsubpd => "vsubpd",
    Vsubss => "vsubss",
    Vsubsd => "vsubsd",
    Vminps => "vminps",
    Vminpd => "vminpd",
    Vminss => "vminss",
    Vminsd => "vminsd",
    Vdivps => "vdivps",
    Vdivpd => "vdivpd",
    Vdivss => "vdivss",
    Vdivsd => "vdivsd",
    Vmaxps => "vmaxps",
    Vmaxpd => "vmaxpd",
    Vmaxss => "vmaxss",
    Vmaxsd => "vmaxsd",
}

macro_rules! codes {
    ($($encoding:ident { $($code:ident => $mnemonic:ident,)* })*) => {
        /// an instruction's mnemonic together with the shape of its operands.
        ///
        /// the suffix names the operands: `P`/`Q` are mmx registers (from modrm `reg`/`rm`),
        /// `V`/`H`/`W` are vector registers from modrm `reg`, `vvvv` and modrm `rm` (or memory),
        /// with `X`, `Y`, `Z` giving their width. `k1z` is an opmask with optional zeroing,
        /// `_b` allows a broadcast memory operand, `_er` embedded rounding, `_sae` suppressed
        /// exceptions.
        #[allow(non_camel_case_types)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
        pub enum Code {
            #[default]
            Invalid,
            $($($code,)*)*
        }

        impl Code {
            pub const fn mnemonic(self) -> Mnemonic {
                match self {
                    Self::Invalid => Mnemonic::Invalid,
                    $($(Self::$code => Mnemonic::$mnemonic,)*)*
                }
            }

            pub const fn encoding(self) -> EncodingKind {
                match self {
                    Self::Invalid => EncodingKind::Legacy,
                    $($(Self::$code => EncodingKind::$encoding,)*)*
                }
            }
        }
    };
}

codes! {
    Legacy {
        Psubusb_P_Q => Psubusb,
        Psubusb_VX_WX => Psubusb,
        Psubusw_P_Q => Psubusw,
        Psubusw_VX_WX => Psubusw,
        Pminub_P_Q => Pminub,
        Pminub_VX_WX => Pminub,
        Pand_P_Q => Pand,
        Pand_VX_WX => Pand,
        Paddusb_P_Q => Paddusb,
        Paddusb_VX_WX => Paddusb,
        Paddusw_P_Q => Paddusw,
        Paddusw_VX_WX => Paddusw,
        Pmaxub_P_Q => Pmaxub,
        Pmaxub_VX_WX => Pmaxub,
        Pandn_P_Q => Pandn,
        Pandn_VX_WX => Pandn,

        Addps_VX_WX => Addps,
        Addpd_VX_WX => Addpd,
        Addss_VX_WX => Addss,
        Addsd_VX_WX => Addsd,
        Mulps_VX_WX => Mulps,
        Mulpd_VX_WX => Mulpd,
        Mulss_VX_WX => Mulss,
        Mulsd_VX_WX => Mulsd,
        Subps_VX_WX => Subps,
        Subpd_VX_WX => Subpd,
        Subss_VX_WX => Subss,
        Subsd_VX_WX => Subsd,
        Minps_VX_WX => Minps,
        Minpd_VX_WX => Minpd,
        Minss_VX_WX => Minss,
        Minsd_VX_WX => Minsd,
        Divps_VX_WX => Divps,
        Divpd_VX_WX => Divpd,
        Divss_VX_WX => Divss,
        Divsd_VX_WX => Divsd,
        Maxps_VX_WX => Maxps,
        Maxpd_VX_WX => Maxpd,
        Maxss_VX_WX => Maxss,
        Maxsd_VX_WX => Maxsd,
    }

    Vex {
        VEX_Vpsubusb_VX_HX_WX => Vpsubusb,
        VEX_Vpsubusb_VY_HY_WY => Vpsubusb,
        VEX_Vpsubusw_VX_HX_WX => Vpsubusw,
        VEX_Vpsubusw_VY_HY_WY => Vpsubusw,
        VEX_Vpminub_VX_HX_WX => Vpminub,
        VEX_Vpminub_VY_HY_WY => Vpminub,
        VEX_Vpand_VX_HX_WX => Vpand,
        VEX_Vpand_VY_HY_WY => Vpand,
        VEX_Vpaddusb_VX_HX_WX => Vpaddusb,
        VEX_Vpaddusb_VY_HY_WY => Vpaddusb,
        VEX_Vpaddusw_VX_HX_WX => Vpaddusw,
        VEX_Vpaddusw_VY_HY_WY => Vpaddusw,
        VEX_Vpmaxub_VX_HX_WX => Vpmaxub,
        VEX_Vpmaxub_VY_HY_WY => Vpmaxub,
        VEX_Vpandn_VX_HX_WX => Vpandn,
        VEX_Vpandn_VY_HY_WY => Vpandn,

        VEX_Vaddps_VX_HX_WX => Vaddps,
        VEX_Vaddps_VY_HY_WY => Vaddps,
        VEX_Vaddpd_VX_HX_WX => Vaddpd,
        VEX_Vaddpd_VY_HY_WY => Vaddpd,
        VEX_Vaddss_VX_HX_WX => Vaddss,
        VEX_Vaddsd_VX_HX_WX => Vaddsd,
        VEX_Vmulps_VX_HX_WX => Vmulps,
        VEX_Vmulps_VY_HY_WY => Vmulps,
        VEX_Vmulpd_VX_HX_WX => Vmulpd,
        VEX_Vmulpd_VY_HY_WY => Vmulpd,
        VEX_Vmulss_VX_HX_WX => Vmulss,
        VEX_Vmulsd_VX_HX_WX => Vmulsd,
        VEX_Vsubps_VX_HX_WX => Vsubps,
        VEX_Vsubps_VY_HY_WY => Vsubps,
        VEX_Vsubpd_VX_HX_WX => Vsubpd,
        VEX_Vsubpd_VY_HY_WY => Vsubpd,
        VEX_Vsubss_VX_HX_WX => Vsubss,
        VEX_Vsubsd_VX_HX_WX => Vsubsd,
        VEX_Vminps_VX_HX_WX => Vminps,
        VEX_Vminps_VY_HY_WY => Vminps,
        VEX_Vminpd_VX_HX_WX => Vminpd,
        VEX_Vminpd_VY_HY_WY => Vminpd,
        VEX_Vminss_VX_HX_WX => Vminss,
        VEX_Vminsd_VX_HX_WX => Vminsd,
        VEX_Vdivps_VX_HX_WX => Vdivps,
        VEX_Vdivps_VY_HY_WY => Vdivps,
        VEX_Vdivpd_VX_HX_WX => Vdivpd,
        VEX_Vdivpd_VY_HY_WY => Vdivpd,
        VEX_Vdivss_VX_HX_WX => Vdivss,
        VEX_Vdivsd_VX_HX_WX => Vdivsd,
        VEX_Vmaxps_VX_HX_WX => Vmaxps,
        VEX_Vmaxps_VY_HY_WY => Vmaxps,
        VEX_Vmaxpd_VX_HX_WX => Vmaxpd,
        VEX_Vmaxpd_VY_HY_WY => Vmaxpd,
        VEX_Vmaxss_VX_HX_WX => Vmaxss,
        VEX_Vmaxsd_VX_HX_WX => Vmaxsd,
    }

    Evex {
        EVEX_Vpsubusb_VX_k1z_HX_WX => Vpsubusb,
        EVEX_Vpsubusb_VY_k1z_HY_WY => Vpsubusb,
        EVEX_Vpsubusb_VZ_k1z_HZ_WZ => Vpsubusb,
        EVEX_Vpsubusw_VX_k1z_HX_WX => Vpsubusw,
        EVEX_Vpsubusw_VY_k1z_HY_WY => Vpsubusw,
        EVEX_Vpsubusw_VZ_k1z_HZ_WZ => Vpsubusw,
        EVEX_Vpminub_VX_k1z_HX_WX => Vpminub,
        EVEX_Vpminub_VY_k1z_HY_WY => Vpminub,
        EVEX_Vpminub_VZ_k1z_HZ_WZ => Vpminub,
        EVEX_Vpandd_VX_k1z_HX_WX_b => Vpandd,
        EVEX_Vpandd_VY_k1z_HY_WY_b => Vpandd,
        EVEX_Vpandd_VZ_k1z_HZ_WZ_b => Vpandd,
        EVEX_Vpandq_VX_k1z_HX_WX_b => Vpandq,
        EVEX_Vpandq_VY_k1z_HY_WY_b => Vpandq,
        EVEX_Vpandq_VZ_k1z_HZ_WZ_b => Vpandq,
        EVEX_Vpaddusb_VX_k1z_HX_WX => Vpaddusb,
        EVEX_Vpaddusb_VY_k1z_HY_WY => Vpaddusb,
        EVEX_Vpaddusb_VZ_k1z_HZ_WZ => Vpaddusb,
        EVEX_Vpaddusw_VX_k1z_HX_WX => Vpaddusw,
        EVEX_Vpaddusw_VY_k1z_HY_WY => Vpaddusw,
        EVEX_Vpaddusw_VZ_k1z_HZ_WZ => Vpaddusw,
        EVEX_Vpmaxub_VX_k1z_HX_WX => Vpmaxub,
        EVEX_Vpmaxub_VY_k1z_HY_WY => Vpmaxub,
        EVEX_Vpmaxub_VZ_k1z_HZ_WZ => Vpmaxub,
        EVEX_Vpandnd_VX_k1z_HX_WX_b => Vpandnd,
        EVEX_Vpandnd_VY_k1z_HY_WY_b => Vpandnd,
        EVEX_Vpandnd_VZ_k1z_HZ_WZ_b => Vpandnd,
        EVEX_Vpandnq_VX_k1z_HX_WX_b => Vpandnq,
        EVEX_Vpandnq_VY_k1z_HY_WY_b => Vpandnq,
        EVEX_Vpandnq_VZ_k1z_HZ_WZ_b => Vpandnq,

        EVEX_Vpshldvw_VX_k1z_HX_WX => Vpshldvw,
        EVEX_Vpshldvw_VY_k1z_HY_WY => Vpshldvw,
        EVEX_Vpshldvw_VZ_k1z_HZ_WZ => Vpshldvw,
        EVEX_Vpshldvd_VX_k1z_HX_WX_b => Vpshldvd,
        EVEX_Vpshldvd_VY_k1z_HY_WY_b => Vpshldvd,
        EVEX_Vpshldvd_VZ_k1z_HZ_WZ_b => Vpshldvd,
        EVEX_Vpshldvq_VX_k1z_HX_WX_b => Vpshldvq,
        EVEX_Vpshldvq_VY_k1z_HY_WY_b => Vpshldvq,
        EVEX_Vpshldvq_VZ_k1z_HZ_WZ_b => Vpshldvq,
        EVEX_Vpshrdvw_VX_k1z_HX_WX => Vpshrdvw,
        EVEX_Vpshrdvw_VY_k1z_HY_WY => Vpshrdvw,
        EVEX_Vpshrdvw_VZ_k1z_HZ_WZ => Vpshrdvw,
        EVEX_Vpshrdvd_VX_k1z_HX_WX_b => Vpshrdvd,
        EVEX_Vpshrdvd_VY_k1z_HY_WY_b => Vpshrdvd,
        EVEX_Vpshrdvd_VZ_k1z_HZ_WZ_b => Vpshrdvd,
        EVEX_Vpshrdvq_VX_k1z_HX_WX_b => Vpshrdvq,
        EVEX_Vpshrdvq_VY_k1z_HY_WY_b => Vpshrdvq,
        EVEX_Vpshrdvq_VZ_k1z_HZ_WZ_b => Vpshrdvq,
        EVEX_Vpermi2b_VX_k1z_HX_WX => Vpermi2b,
        EVEX_Vpermi2b_VY_k1z_HY_WY => Vpermi2b,
        EVEX_Vpermi2b_VZ_k1z_HZ_WZ => Vpermi2b,
        EVEX_Vpermi2w_VX_k1z_HX_WX => Vpermi2w,
        EVEX_Vpermi2w_VY_k1z_HY_WY => Vpermi2w,
        EVEX_Vpermi2w_VZ_k1z_HZ_WZ => Vpermi2w,
        EVEX_Vpermi2d_VX_k1z_HX_WX_b => Vpermi2d,
        EVEX_Vpermi2d_VY_k1z_HY_WY_b => Vpermi2d,
        EVEX_Vpermi2d_VZ_k1z_HZ_WZ_b => Vpermi2d,
        EVEX_Vpermi2q_VX_k1z_HX_WX_b => Vpermi2q,
        EVEX_Vpermi2q_VY_k1z_HY_WY_b => Vpermi2q,
        EVEX_Vpermi2q_VZ_k1z_HZ_WZ_b => Vpermi2q,
        EVEX_Vpermi2ps_VX_k1z_HX_WX_b => Vpermi2ps,
        EVEX_Vpermi2ps_VY_k1z_HY_WY_b => Vpermi2ps,
        EVEX_Vpermi2ps_VZ_k1z_HZ_WZ_b => Vpermi2ps,
        EVEX_Vpermi2pd_VX_k1z_HX_WX_b => Vpermi2pd,
        EVEX_Vpermi2pd_VY_k1z_HY_WY_b => Vpermi2pd,
        EVEX_Vpermi2pd_VZ_k1z_HZ_WZ_b => Vpermi2pd,

        EVEX_Vaddps_VX_k1z_HX_WX_b => Vaddps,
        EVEX_Vaddps_VY_k1z_HY_WY_b => Vaddps,
        EVEX_Vaddps_VZ_k1z_HZ_WZ_er_b => Vaddps,
        EVEX_Vaddpd_VX_k1z_HX_WX_b => Vaddpd,
        EVEX_Vaddpd_VY_k1z_HY_WY_b => Vaddpd,
        EVEX_Vaddpd_VZ_k1z_HZ_WZ_er_b => Vaddpd,
        EVEX_Vaddss_VX_k1z_HX_WX_er => Vaddss,
        EVEX_Vaddsd_VX_k1z_HX_WX_er => Vaddsd,
        EVEX_Vmulps_VX_k1z_HX_WX_b => Vmulps,
        EVEX_Vmulps_VY_k1z_HY_WY_b => Vmulps,
        EVEX_Vmulps_VZ_k1z_HZ_WZ_er_b => Vmulps,
        EVEX_Vmulpd_VX_k1z_HX_WX_b => Vmulpd,
        EVEX_Vmulpd_VY_k1z_HY_WY_b => Vmulpd,
        EVEX_Vmulpd_VZ_k1z_HZ_WZ_er_b => Vmulpd,
        EVEX_Vmulss_VX_k1z_HX_WX_er => Vmulss,
        EVEX_Vmulsd_VX_k1z_HX_WX_er => Vmulsd,
        EVEX_Vsubps_VX_k1z_HX_WX_b => Vsubps,
        EVEX_Vsubps_VY_k1z_HY_WY_b => Vsubps,
        EVEX_Vsubps_VZ_k1z_HZ_WZ_er_b => Vsubps,
        EVEX_Vsubpd_VX_k1z_HX_WX_b => Vsubpd,
        EVEX_Vsubpd_VY_k1z_HY_WY_b => Vsubpd,
        EVEX_Vsubpd_VZ_k1z_HZ_WZ_er_b => Vsubpd,
        EVEX_Vsubss_VX_k1z_HX_WX_er => Vsubss,
        EVEX_Vsubsd_VX_k1z_HX_WX_er => Vsubsd,
        EVEX_Vminps_VX_k1z_HX_WX_b => Vminps,
        EVEX_Vminps_VY_k1z_HY_WY_b => Vminps,
        EVEX_Vminps_VZ_k1z_HZ_WZ_sae_b => Vminps,
        EVEX_Vminpd_VX_k1z_HX_WX_b => Vminpd,
        EVEX_Vminpd_VY_k1z_HY_WY_b => Vminpd,
        EVEX_Vminpd_VZ_k1z_HZ_WZ_sae_b => Vminpd,
        EVEX_Vminss_VX_k1z_HX_WX_sae => Vminss,
        EVEX_Vminsd_VX_k1z_HX_WX_sae => Vminsd,
        EVEX_Vdivps_VX_k1z_HX_WX_b => Vdivps,
        EVEX_Vdivps_VY_k1z_HY_WY_b => Vdivps,
        EVEX_Vdivps_VZ_k1z_HZ_WZ_er_b => Vdivps,
        EVEX_Vdivpd_VX_k1z_HX_WX_b => Vdivpd,
        EVEX_Vdivpd_VY_k1z_HY_WY_b => Vdivpd,
        EVEX_Vdivpd_VZ_k1z_HZ_WZ_er_b => Vdivpd,
        EVEX_Vdivss_VX_k1z_HX_WX_er => Vdivss,
        EVEX_Vdivsd_VX_k1z_HX_WX_er => Vdivsd,
        EVEX_Vmaxps_VX_k1z_HX_WX_b => Vmaxps,
        EVEX_Vmaxps_VY_k1z_HY_WY_b => Vmaxps,
        EVEX_Vmaxps_VZ_k1z_HZ_WZ_sae_b => Vmaxps,
        EVEX_Vmaxpd_VX_k1z_HX_WX_b => Vmaxpd,
        EVEX_Vmaxpd_VY_k1z_HY_WY_b => Vmaxpd,
        EVEX_Vmaxpd_VZ_k1z_HZ_WZ_sae_b => Vmaxpd,
        EVEX_Vmaxss_VX_k1z_HX_WX_sae => Vmaxss,
        EVEX_Vmaxsd_VX_k1z_HX_WX_sae => Vmaxsd,
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
