//! decode tables, one per opcode map and encoding, each indexed by the opcode byte.

mod evex;
mod legacy;
mod vex;

use crate::handlers::Handler;

pub(crate) use evex::{EVEX_0F, EVEX_0F38, EVEX_0F3A};
pub(crate) use legacy::LEGACY_0F;
pub(crate) use vex::{VEX_0F, VEX_0F38, VEX_0F3A};

pub(crate) type Table = [&'static Handler; 256];

pub(crate) const INVALID: &Handler = &Handler::Invalid;

/// build a table where every opcode not listed in `entries` is invalid.
const fn table(entries: &[(u8, &'static Handler)]) -> Table {
    let mut table = [INVALID; 256];
    let mut idx = 0;
    while idx < entries.len() {
        let (opcode, handler) = entries[idx];
        table[opcode as usize] = handler;
        idx += 1;
    }
    table
}

/// `[none, 66, F3, F2]`.
macro_rules! mandatory_prefix {
    ($none:expr, $p66:expr, $pf3:expr, $pf2:expr $(,)?) => {
        &$crate::handlers::Handler::MandatoryPrefix([$none, $p66, $pf3, $pf2])
    };
}

/// `[W0, W1]`.
macro_rules! w {
    ($w0:expr, $w1:expr $(,)?) => {
        &$crate::handlers::Handler::W([$w0, $w1])
    };
}

/// `[128, 256, 512]`, `L'L = 3` is always invalid.
macro_rules! vector_length {
    ($l128:expr, $l256:expr $(,)?) => {
        &$crate::handlers::Handler::VectorLength([$l128, $l256, $crate::tables::INVALID, $crate::tables::INVALID])
    };
    ($l128:expr, $l256:expr, $l512:expr $(,)?) => {
        &$crate::handlers::Handler::VectorLength([$l128, $l256, $l512, $crate::tables::INVALID])
    };
}

macro_rules! vector_length_er {
    ($l128:expr, $l256:expr, $l512:expr $(,)?) => {
        &$crate::handlers::Handler::VectorLengthEr([$l128, $l256, $l512, $crate::tables::INVALID])
    };
}

pub(crate) use {mandatory_prefix, vector_length, vector_length_er, w};
