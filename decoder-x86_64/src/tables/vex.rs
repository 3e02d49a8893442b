use super::{mandatory_prefix, table, vector_length, Table, INVALID};
use crate::handlers::Handler;
use crate::register::RegisterBank;
use crate::{Code, MemorySize};

macro_rules! vhw {
    ($bank:ident, $code:ident, $mem:ident) => {
        &Handler::VHW {
            bank: RegisterBank::$bank,
            code: Code::$code,
            mem: MemorySize::$mem,
        }
    };
}

/// integer op only defined with `VEX.pp = 66`, `W` ignored.
macro_rules! packed_int {
    ($x:ident, $x_mem:ident, $y:ident, $y_mem:ident) => {
        mandatory_prefix!(
            INVALID,
            vector_length!(vhw!(X, $x, $x_mem), vhw!(Y, $y, $y_mem)),
            INVALID,
            INVALID,
        )
    };
}

/// packed forms by vector length, scalar forms ignore `VEX.L`.
macro_rules! avx_arith {
    ($psx:ident, $psy:ident, $pdx:ident, $pdy:ident, $ss:ident, $sd:ident) => {
        mandatory_prefix!(
            vector_length!(
                vhw!(X, $psx, Packed128_Float32),
                vhw!(Y, $psy, Packed256_Float32),
            ),
            vector_length!(
                vhw!(X, $pdx, Packed128_Float64),
                vhw!(Y, $pdy, Packed256_Float64),
            ),
            vhw!(X, $ss, Float32),
            vhw!(X, $sd, Float64),
        )
    };
}

pub(crate) static VEX_0F: Table = table(&[
    (
        0x58,
        avx_arith!(
            VEX_Vaddps_VX_HX_WX,
            VEX_Vaddps_VY_HY_WY,
            VEX_Vaddpd_VX_HX_WX,
            VEX_Vaddpd_VY_HY_WY,
            VEX_Vaddss_VX_HX_WX,
            VEX_Vaddsd_VX_HX_WX
        ),
    ),
    (
        0x59,
        avx_arith!(
            VEX_Vmulps_VX_HX_WX,
            VEX_Vmulps_VY_HY_WY,
            VEX_Vmulpd_VX_HX_WX,
            VEX_Vmulpd_VY_HY_WY,
            VEX_Vmulss_VX_HX_WX,
            VEX_Vmulsd_VX_HX_WX
        ),
    ),
    (
        0x5c,
        avx_arith!(
            VEX_Vsubps_VX_HX_WX,
            VEX_Vsubps_VY_HY_WY,
            VEX_Vsubpd_VX_HX_WX,
            VEX_Vsubpd_VY_HY_WY,
            VEX_Vsubss_VX_HX_WX,
            VEX_Vsubsd_VX_HX_WX
        ),
    ),
    (
        0x5d,
        avx_arith!(
            VEX_Vminps_VX_HX_WX,
            VEX_Vminps_VY_HY_WY,
            VEX_Vminpd_VX_HX_WX,
            VEX_Vminpd_VY_HY_WY,
            VEX_Vminss_VX_HX_WX,
            VEX_Vminsd_VX_HX_WX
        ),
    ),
    (
        0x5e,
        avx_arith!(
            VEX_Vdivps_VX_HX_WX,
            VEX_Vdivps_VY_HY_WY,
            VEX_Vdivpd_VX_HX_WX,
            VEX_Vdivpd_VY_HY_WY,
            VEX_Vdivss_VX_HX_WX,
            VEX_Vdivsd_VX_HX_WX
        ),
    ),
    (
        0x5f,
        avx_arith!(
            VEX_Vmaxps_VX_HX_WX,
            VEX_Vmaxps_VY_HY_WY,
            VEX_Vmaxpd_VX_HX_WX,
            VEX_Vmaxpd_VY_HY_WY,
            VEX_Vmaxss_VX_HX_WX,
            VEX_Vmaxsd_VX_HX_WX
        ),
    ),
    (
        0xd8,
        packed_int!(
            VEX_Vpsubusb_VX_HX_WX,
            Packed128_UInt8,
            VEX_Vpsubusb_VY_HY_WY,
            Packed256_UInt8
        ),
    ),
    (
        0xd9,
        packed_int!(
            VEX_Vpsubusw_VX_HX_WX,
            Packed128_UInt16,
            VEX_Vpsubusw_VY_HY_WY,
            Packed256_UInt16
        ),
    ),
    (
        0xda,
        packed_int!(
            VEX_Vpminub_VX_HX_WX,
            Packed128_UInt8,
            VEX_Vpminub_VY_HY_WY,
            Packed256_UInt8
        ),
    ),
    (
        0xdb,
        packed_int!(
            VEX_Vpand_VX_HX_WX,
            Packed128_UInt64,
            VEX_Vpand_VY_HY_WY,
            Packed256_UInt64
        ),
    ),
    (
        0xdc,
        packed_int!(
            VEX_Vpaddusb_VX_HX_WX,
            Packed128_UInt8,
            VEX_Vpaddusb_VY_HY_WY,
            Packed256_UInt8
        ),
    ),
    (
        0xdd,
        packed_int!(
            VEX_Vpaddusw_VX_HX_WX,
            Packed128_UInt16,
            VEX_Vpaddusw_VY_HY_WY,
            Packed256_UInt16
        ),
    ),
    (
        0xde,
        packed_int!(
            VEX_Vpmaxub_VX_HX_WX,
            Packed128_UInt8,
            VEX_Vpmaxub_VY_HY_WY,
            Packed256_UInt8
        ),
    ),
    (
        0xdf,
        packed_int!(
            VEX_Vpandn_VX_HX_WX,
            Packed128_UInt64,
            VEX_Vpandn_VY_HY_WY,
            Packed256_UInt64
        ),
    ),
]);

/// nothing in the `0F38` and `0F3A` maps is decoded under `VEX`.
pub(crate) static VEX_0F38: Table = table(&[]);
pub(crate) static VEX_0F3A: Table = table(&[]);
