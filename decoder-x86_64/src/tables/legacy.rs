use super::{mandatory_prefix, table, Table, INVALID};
use crate::handlers::Handler;
use crate::{Code, MemorySize};

macro_rules! p_q {
    ($code:ident, $mem:ident) => {
        &Handler::P_Q {
            code: Code::$code,
            mem: MemorySize::$mem,
        }
    };
}

macro_rules! vw {
    ($code:ident, $mem:ident) => {
        &Handler::VW {
            code: Code::$code,
            mem: MemorySize::$mem,
        }
    };
}

/// an mmx form without a prefix and an sse form behind `66`.
macro_rules! mmx_sse {
    ($mmx:ident, $mmx_mem:ident, $sse:ident, $sse_mem:ident) => {
        mandatory_prefix!(p_q!($mmx, $mmx_mem), vw!($sse, $sse_mem), INVALID, INVALID)
    };
}

/// `ps`, `pd`, `ss` and `sd` forms selected by the mandatory prefix.
macro_rules! sse_arith {
    ($ps:ident, $pd:ident, $ss:ident, $sd:ident) => {
        mandatory_prefix!(
            vw!($ps, Packed128_Float32),
            vw!($pd, Packed128_Float64),
            vw!($ss, Float32),
            vw!($sd, Float64),
        )
    };
}

pub(crate) static LEGACY_0F: Table = table(&[
    (0x58, sse_arith!(Addps_VX_WX, Addpd_VX_WX, Addss_VX_WX, Addsd_VX_WX)),
    (0x59, sse_arith!(Mulps_VX_WX, Mulpd_VX_WX, Mulss_VX_WX, Mulsd_VX_WX)),
    (0x5c, sse_arith!(Subps_VX_WX, Subpd_VX_WX, Subss_VX_WX, Subsd_VX_WX)),
    (0x5d, sse_arith!(Minps_VX_WX, Minpd_VX_WX, Minss_VX_WX, Minsd_VX_WX)),
    (0x5e, sse_arith!(Divps_VX_WX, Divpd_VX_WX, Divss_VX_WX, Divsd_VX_WX)),
    (0x5f, sse_arith!(Maxps_VX_WX, Maxpd_VX_WX, Maxss_VX_WX, Maxsd_VX_WX)),
    (0xd8, mmx_sse!(Psubusb_P_Q, Packed64_UInt8, Psubusb_VX_WX, Packed128_UInt8)),
    (0xd9, mmx_sse!(Psubusw_P_Q, Packed64_UInt16, Psubusw_VX_WX, Packed128_UInt16)),
    (0xda, mmx_sse!(Pminub_P_Q, Packed64_UInt8, Pminub_VX_WX, Packed128_UInt8)),
    (0xdb, mmx_sse!(Pand_P_Q, UInt64, Pand_VX_WX, Packed128_UInt64)),
    (0xdc, mmx_sse!(Paddusb_P_Q, Packed64_UInt8, Paddusb_VX_WX, Packed128_UInt8)),
    (0xdd, mmx_sse!(Paddusw_P_Q, Packed64_UInt16, Paddusw_VX_WX, Packed128_UInt16)),
    (0xde, mmx_sse!(Pmaxub_P_Q, Packed64_UInt8, Pmaxub_VX_WX, Packed128_UInt8)),
    (0xdf, mmx_sse!(Pandn_P_Q, UInt64, Pandn_VX_WX, Packed128_UInt64)),
]);
