//! # `x86_64`, a decoder for the x86 family of instruction sets
//!
//! decodes machine code under 16-, 32- and 64-bit modes into an [`Instruction`], a flat record
//! of the instruction's operands, prefixes and `EVEX` features (opmask, zeroing, broadcast,
//! embedded rounding).
//!
//! ```
//! use x86_64::{Code, Mode, RegSpec};
//!
//! let inst = x86_64::decode(Mode::Long, &[0x66, 0x0f, 0xdb, 0xc1]).unwrap();
//! assert_eq!(inst.code(), Code::Pand_VX_WX);
//! assert_eq!(inst.op_register(0), Some(RegSpec::xmm(0)));
//! assert_eq!(inst.op_register(1), Some(RegSpec::xmm(1)));
//! assert_eq!(inst.len(), 4);
//! ```
//!
//! decoding is table driven: each opcode map has a table of handler trees that select an
//! instruction form by mandatory prefix, `W` and vector length.

mod code;
mod decoder;
mod handlers;
mod instruction;
mod memory_size;
mod register;
mod tables;

#[cfg(test)]
mod tests;

pub use crate::code::{Code, EncodingKind, Mnemonic};
pub use crate::decoder::{Decoder, DecoderOptions, Mode, MAX_INSTRUCTION_LEN};
pub use crate::instruction::{
    ConstantOffsets, Instruction, MemoryOperand, OpKind, Operand, Prefixes, RoundingControl,
};
pub use crate::memory_size::MemorySize;
pub use crate::register::{RegSpec, RegisterBank};

pub use ::decoder::{Error, ErrorKind, Reader};

/// decode the first instruction in `data`, located at address 0.
pub fn decode(mode: Mode, data: &[u8]) -> Result<Instruction, Error> {
    Decoder::new(mode).decode_at(&mut Reader::new(data), 0)
}

/// every instruction in a buffer, see [`Decoder::stream`].
///
/// an invalid encoding is yielded as an error and decoding resumes after the bytes it
/// consumed. iteration ends once the buffer runs out, a truncated instruction at the end of
/// the buffer isn't reported.
pub struct Stream<'data> {
    pub(crate) reader: Reader<'data>,
    pub(crate) decoder: Decoder,
    pub(crate) ip: u64,
}

impl Stream<'_> {
    /// address of the next instruction to be decoded.
    pub fn ip(&self) -> u64 {
        self.ip
    }

    /// offset into the buffer of the next instruction to be decoded.
    pub fn position(&self) -> usize {
        self.reader.total_offset()
    }
}

impl Iterator for Stream<'_> {
    type Item = Result<Instruction, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.decoder.decode_at(&mut self.reader, self.ip);
        let width = self.reader.offset();
        self.ip = self.ip.wrapping_add(width as u64);

        match result {
            Err(err) if err.kind == ErrorKind::ExhaustedInput => None,
            result => Some(result),
        }
    }
}
