use super::{mandatory_prefix, table, vector_length, vector_length_er, w, Table, INVALID};
use crate::handlers::{Handler, Rounding, TupleType};
use crate::register::RegisterBank;
use crate::{Code, MemorySize};

macro_rules! vkhw {
    (@leaf $bank:ident, $code:ident, $tuple:ident, $mem:ident, $bcst:expr, $rounding:ident) => {
        &Handler::VkHW {
            bank: RegisterBank::$bank,
            code: Code::$code,
            tuple: TupleType::$tuple,
            mem: MemorySize::$mem,
            bcst: $bcst,
            rounding: Rounding::$rounding,
        }
    };
    ($bank:ident, $code:ident, $tuple:ident, $mem:ident) => {
        vkhw!(@leaf $bank, $code, $tuple, $mem, None, None)
    };
    ($bank:ident, $code:ident, $tuple:ident, $mem:ident, $bcst:ident) => {
        vkhw!(@leaf $bank, $code, $tuple, $mem, Some(MemorySize::$bcst), None)
    };
}

/// a leaf where `EVEX.b` on a register operand selects `$rounding`.
macro_rules! vkhw_er {
    ($rounding:ident, $bank:ident, $code:ident, $tuple:ident, $mem:ident) => {
        vkhw!(@leaf $bank, $code, $tuple, $mem, None, $rounding)
    };
    ($rounding:ident, $bank:ident, $code:ident, $tuple:ident, $mem:ident, $bcst:ident) => {
        vkhw!(@leaf $bank, $code, $tuple, $mem, Some(MemorySize::$bcst), $rounding)
    };
}

/// only defined with `EVEX.pp = 66`.
macro_rules! p66 {
    ($handler:expr) => {
        mandatory_prefix!(INVALID, $handler, INVALID, INVALID)
    };
}

/// full vector forms without broadcast, by vector length.
macro_rules! full_mem {
    ($x:ident, $y:ident, $z:ident, [$m128:ident, $m256:ident, $m512:ident]) => {
        vector_length!(
            vkhw!(X, $x, FullMem128, $m128),
            vkhw!(Y, $y, FullMem256, $m256),
            vkhw!(Z, $z, FullMem512, $m512),
        )
    };
}

/// full vector forms that accept a broadcast element, by vector length.
macro_rules! full {
    (
        $x:ident,
        $y:ident,
        $z:ident,
        [$m128:ident, $m256:ident, $m512:ident],
        [$b128:ident, $b256:ident, $b512:ident]
    ) => {
        vector_length!(
            vkhw!(X, $x, Full128, $m128, $b128),
            vkhw!(Y, $y, Full256, $m256, $b256),
            vkhw!(Z, $z, Full512, $m512, $b512),
        )
    };
}

/// `ps` and `pd` forms with `W` fixed to the element size, and scalar forms ignoring `L'L`.
macro_rules! avx512_arith {
    (
        $rounding:ident,
        [$psx:ident, $psy:ident, $psz:ident],
        [$pdx:ident, $pdy:ident, $pdz:ident],
        $ss:ident,
        $sd:ident
    ) => {
        mandatory_prefix!(
            w!(
                vector_length_er!(
                    vkhw!(X, $psx, Full128, Packed128_Float32, Broadcast128_Float32),
                    vkhw!(Y, $psy, Full256, Packed256_Float32, Broadcast256_Float32),
                    vkhw_er!($rounding, Z, $psz, Full512, Packed512_Float32, Broadcast512_Float32),
                ),
                INVALID,
            ),
            w!(
                INVALID,
                vector_length_er!(
                    vkhw!(X, $pdx, Full128, Packed128_Float64, Broadcast128_Float64),
                    vkhw!(Y, $pdy, Full256, Packed256_Float64, Broadcast256_Float64),
                    vkhw_er!($rounding, Z, $pdz, Full512, Packed512_Float64, Broadcast512_Float64),
                ),
            ),
            w!(vkhw_er!($rounding, X, $ss, Tuple1Scalar, Float32), INVALID),
            w!(INVALID, vkhw_er!($rounding, X, $sd, Tuple1Scalar, Float64)),
        )
    };
}

pub(crate) static EVEX_0F: Table = table(&[
    (
        0x58,
        avx512_arith!(
            Embedded,
            [EVEX_Vaddps_VX_k1z_HX_WX_b, EVEX_Vaddps_VY_k1z_HY_WY_b, EVEX_Vaddps_VZ_k1z_HZ_WZ_er_b],
            [EVEX_Vaddpd_VX_k1z_HX_WX_b, EVEX_Vaddpd_VY_k1z_HY_WY_b, EVEX_Vaddpd_VZ_k1z_HZ_WZ_er_b],
            EVEX_Vaddss_VX_k1z_HX_WX_er,
            EVEX_Vaddsd_VX_k1z_HX_WX_er
        ),
    ),
    (
        0x59,
        avx512_arith!(
            Embedded,
            [EVEX_Vmulps_VX_k1z_HX_WX_b, EVEX_Vmulps_VY_k1z_HY_WY_b, EVEX_Vmulps_VZ_k1z_HZ_WZ_er_b],
            [EVEX_Vmulpd_VX_k1z_HX_WX_b, EVEX_Vmulpd_VY_k1z_HY_WY_b, EVEX_Vmulpd_VZ_k1z_HZ_WZ_er_b],
            EVEX_Vmulss_VX_k1z_HX_WX_er,
            EVEX_Vmulsd_VX_k1z_HX_WX_er
        ),
    ),
    (
        0x5c,
        avx512_arith!(
            Embedded,
            [EVEX_Vsubps_VX_k1z_HX_WX_b, EVEX_Vsubps_VY_k1z_HY_WY_b, EVEX_Vsubps_VZ_k1z_HZ_WZ_er_b],
            [EVEX_Vsubpd_VX_k1z_HX_WX_b, EVEX_Vsubpd_VY_k1z_HY_WY_b, EVEX_Vsubpd_VZ_k1z_HZ_WZ_er_b],
            EVEX_Vsubss_VX_k1z_HX_WX_er,
            EVEX_Vsubsd_VX_k1z_HX_WX_er
        ),
    ),
    (
        0x5d,
        avx512_arith!(
            SaeOnly,
            [EVEX_Vminps_VX_k1z_HX_WX_b, EVEX_Vminps_VY_k1z_HY_WY_b, EVEX_Vminps_VZ_k1z_HZ_WZ_sae_b],
            [EVEX_Vminpd_VX_k1z_HX_WX_b, EVEX_Vminpd_VY_k1z_HY_WY_b, EVEX_Vminpd_VZ_k1z_HZ_WZ_sae_b],
            EVEX_Vminss_VX_k1z_HX_WX_sae,
            EVEX_Vminsd_VX_k1z_HX_WX_sae
        ),
    ),
    (
        0x5e,
        avx512_arith!(
            Embedded,
            [EVEX_Vdivps_VX_k1z_HX_WX_b, EVEX_Vdivps_VY_k1z_HY_WY_b, EVEX_Vdivps_VZ_k1z_HZ_WZ_er_b],
            [EVEX_Vdivpd_VX_k1z_HX_WX_b, EVEX_Vdivpd_VY_k1z_HY_WY_b, EVEX_Vdivpd_VZ_k1z_HZ_WZ_er_b],
            EVEX_Vdivss_VX_k1z_HX_WX_er,
            EVEX_Vdivsd_VX_k1z_HX_WX_er
        ),
    ),
    (
        0x5f,
        avx512_arith!(
            SaeOnly,
            [EVEX_Vmaxps_VX_k1z_HX_WX_b, EVEX_Vmaxps_VY_k1z_HY_WY_b, EVEX_Vmaxps_VZ_k1z_HZ_WZ_sae_b],
            [EVEX_Vmaxpd_VX_k1z_HX_WX_b, EVEX_Vmaxpd_VY_k1z_HY_WY_b, EVEX_Vmaxpd_VZ_k1z_HZ_WZ_sae_b],
            EVEX_Vmaxss_VX_k1z_HX_WX_sae,
            EVEX_Vmaxsd_VX_k1z_HX_WX_sae
        ),
    ),
    (
        0xd8,
        p66!(full_mem!(
            EVEX_Vpsubusb_VX_k1z_HX_WX,
            EVEX_Vpsubusb_VY_k1z_HY_WY,
            EVEX_Vpsubusb_VZ_k1z_HZ_WZ,
            [Packed128_UInt8, Packed256_UInt8, Packed512_UInt8]
        )),
    ),
    (
        0xd9,
        p66!(full_mem!(
            EVEX_Vpsubusw_VX_k1z_HX_WX,
            EVEX_Vpsubusw_VY_k1z_HY_WY,
            EVEX_Vpsubusw_VZ_k1z_HZ_WZ,
            [Packed128_UInt16, Packed256_UInt16, Packed512_UInt16]
        )),
    ),
    (
        0xda,
        p66!(full_mem!(
            EVEX_Vpminub_VX_k1z_HX_WX,
            EVEX_Vpminub_VY_k1z_HY_WY,
            EVEX_Vpminub_VZ_k1z_HZ_WZ,
            [Packed128_UInt8, Packed256_UInt8, Packed512_UInt8]
        )),
    ),
    (
        0xdb,
        p66!(w!(
            full!(
                EVEX_Vpandd_VX_k1z_HX_WX_b,
                EVEX_Vpandd_VY_k1z_HY_WY_b,
                EVEX_Vpandd_VZ_k1z_HZ_WZ_b,
                [Packed128_UInt32, Packed256_UInt32, Packed512_UInt32],
                [Broadcast128_UInt32, Broadcast256_UInt32, Broadcast512_UInt32]
            ),
            full!(
                EVEX_Vpandq_VX_k1z_HX_WX_b,
                EVEX_Vpandq_VY_k1z_HY_WY_b,
                EVEX_Vpandq_VZ_k1z_HZ_WZ_b,
                [Packed128_UInt64, Packed256_UInt64, Packed512_UInt64],
                [Broadcast128_UInt64, Broadcast256_UInt64, Broadcast512_UInt64]
            ),
        )),
    ),
    (
        0xdc,
        p66!(full_mem!(
            EVEX_Vpaddusb_VX_k1z_HX_WX,
            EVEX_Vpaddusb_VY_k1z_HY_WY,
            EVEX_Vpaddusb_VZ_k1z_HZ_WZ,
            [Packed128_UInt8, Packed256_UInt8, Packed512_UInt8]
        )),
    ),
    (
        0xdd,
        p66!(full_mem!(
            EVEX_Vpaddusw_VX_k1z_HX_WX,
            EVEX_Vpaddusw_VY_k1z_HY_WY,
            EVEX_Vpaddusw_VZ_k1z_HZ_WZ,
            [Packed128_UInt16, Packed256_UInt16, Packed512_UInt16]
        )),
    ),
    (
        0xde,
        p66!(full_mem!(
            EVEX_Vpmaxub_VX_k1z_HX_WX,
            EVEX_Vpmaxub_VY_k1z_HY_WY,
            EVEX_Vpmaxub_VZ_k1z_HZ_WZ,
            [Packed128_UInt8, Packed256_UInt8, Packed512_UInt8]
        )),
    ),
    (
        0xdf,
        p66!(w!(
            full!(
                EVEX_Vpandnd_VX_k1z_HX_WX_b,
                EVEX_Vpandnd_VY_k1z_HY_WY_b,
                EVEX_Vpandnd_VZ_k1z_HZ_WZ_b,
                [Packed128_UInt32, Packed256_UInt32, Packed512_UInt32],
                [Broadcast128_UInt32, Broadcast256_UInt32, Broadcast512_UInt32]
            ),
            full!(
                EVEX_Vpandnq_VX_k1z_HX_WX_b,
                EVEX_Vpandnq_VY_k1z_HY_WY_b,
                EVEX_Vpandnq_VZ_k1z_HZ_WZ_b,
                [Packed128_UInt64, Packed256_UInt64, Packed512_UInt64],
                [Broadcast128_UInt64, Broadcast256_UInt64, Broadcast512_UInt64]
            ),
        )),
    ),
]);

pub(crate) static EVEX_0F38: Table = table(&[
    (
        0x70,
        p66!(w!(
            INVALID,
            full_mem!(
                EVEX_Vpshldvw_VX_k1z_HX_WX,
                EVEX_Vpshldvw_VY_k1z_HY_WY,
                EVEX_Vpshldvw_VZ_k1z_HZ_WZ,
                [Packed128_UInt16, Packed256_UInt16, Packed512_UInt16]
            ),
        )),
    ),
    (
        0x71,
        p66!(w!(
            full!(
                EVEX_Vpshldvd_VX_k1z_HX_WX_b,
                EVEX_Vpshldvd_VY_k1z_HY_WY_b,
                EVEX_Vpshldvd_VZ_k1z_HZ_WZ_b,
                [Packed128_UInt32, Packed256_UInt32, Packed512_UInt32],
                [Broadcast128_UInt32, Broadcast256_UInt32, Broadcast512_UInt32]
            ),
            full!(
                EVEX_Vpshldvq_VX_k1z_HX_WX_b,
                EVEX_Vpshldvq_VY_k1z_HY_WY_b,
                EVEX_Vpshldvq_VZ_k1z_HZ_WZ_b,
                [Packed128_UInt64, Packed256_UInt64, Packed512_UInt64],
                [Broadcast128_UInt64, Broadcast256_UInt64, Broadcast512_UInt64]
            ),
        )),
    ),
    (
        0x72,
        p66!(w!(
            INVALID,
            full_mem!(
                EVEX_Vpshrdvw_VX_k1z_HX_WX,
                EVEX_Vpshrdvw_VY_k1z_HY_WY,
                EVEX_Vpshrdvw_VZ_k1z_HZ_WZ,
                [Packed128_UInt16, Packed256_UInt16, Packed512_UInt16]
            ),
        )),
    ),
    (
        0x73,
        p66!(w!(
            full!(
                EVEX_Vpshrdvd_VX_k1z_HX_WX_b,
                EVEX_Vpshrdvd_VY_k1z_HY_WY_b,
                EVEX_Vpshrdvd_VZ_k1z_HZ_WZ_b,
                [Packed128_UInt32, Packed256_UInt32, Packed512_UInt32],
                [Broadcast128_UInt32, Broadcast256_UInt32, Broadcast512_UInt32]
            ),
            full!(
                EVEX_Vpshrdvq_VX_k1z_HX_WX_b,
                EVEX_Vpshrdvq_VY_k1z_HY_WY_b,
                EVEX_Vpshrdvq_VZ_k1z_HZ_WZ_b,
                [Packed128_UInt64, Packed256_UInt64, Packed512_UInt64],
                [Broadcast128_UInt64, Broadcast256_UInt64, Broadcast512_UInt64]
            ),
        )),
    ),
    (
        0x75,
        p66!(w!(
            full_mem!(
                EVEX_Vpermi2b_VX_k1z_HX_WX,
                EVEX_Vpermi2b_VY_k1z_HY_WY,
                EVEX_Vpermi2b_VZ_k1z_HZ_WZ,
                [Packed128_Int8, Packed256_Int8, Packed512_Int8]
            ),
            full_mem!(
                EVEX_Vpermi2w_VX_k1z_HX_WX,
                EVEX_Vpermi2w_VY_k1z_HY_WY,
                EVEX_Vpermi2w_VZ_k1z_HZ_WZ,
                [Packed128_Int16, Packed256_Int16, Packed512_Int16]
            ),
        )),
    ),
    (
        0x76,
        p66!(w!(
            full!(
                EVEX_Vpermi2d_VX_k1z_HX_WX_b,
                EVEX_Vpermi2d_VY_k1z_HY_WY_b,
                EVEX_Vpermi2d_VZ_k1z_HZ_WZ_b,
                [Packed128_Int32, Packed256_Int32, Packed512_Int32],
                [Broadcast128_Int32, Broadcast256_Int32, Broadcast512_Int32]
            ),
            full!(
                EVEX_Vpermi2q_VX_k1z_HX_WX_b,
                EVEX_Vpermi2q_VY_k1z_HY_WY_b,
                EVEX_Vpermi2q_VZ_k1z_HZ_WZ_b,
                [Packed128_Int64, Packed256_Int64, Packed512_Int64],
                [Broadcast128_Int64, Broadcast256_Int64, Broadcast512_Int64]
            ),
        )),
    ),
    (
        0x77,
        p66!(w!(
            full!(
                EVEX_Vpermi2ps_VX_k1z_HX_WX_b,
                EVEX_Vpermi2ps_VY_k1z_HY_WY_b,
                EVEX_Vpermi2ps_VZ_k1z_HZ_WZ_b,
                [Packed128_Float32, Packed256_Float32, Packed512_Float32],
                [Broadcast128_Float32, Broadcast256_Float32, Broadcast512_Float32]
            ),
            full!(
                EVEX_Vpermi2pd_VX_k1z_HX_WX_b,
                EVEX_Vpermi2pd_VY_k1z_HY_WY_b,
                EVEX_Vpermi2pd_VZ_k1z_HZ_WZ_b,
                [Packed128_Float64, Packed256_Float64, Packed512_Float64],
                [Broadcast128_Float64, Broadcast256_Float64, Broadcast512_Float64]
            ),
        )),
    ),
]);

/// nothing in the `0F3A` map is decoded under `EVEX`.
pub(crate) static EVEX_0F3A: Table = table(&[]);
