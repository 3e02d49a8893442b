//! Shared behaviour required between decoder crates.

use std::fmt;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Error {
    /// What kind of error happened in decoding an instruction.
    pub kind: ErrorKind,

    /// How many bytes in the stream did the invalid instruction consume.
    size: u8,
}

impl Error {
    pub fn new(kind: ErrorKind, size: usize) -> Self {
        Self {
            kind,
            size: size as u8,
        }
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} after {} byte(s)", self.kind, self.size)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    /// Opcode in instruction is impossible/unknown.
    InvalidOpcode,

    /// Operand in instruction is impossible/unknown.
    InvalidOperand,

    /// Prefix in instruction is impossible/unknown.
    InvalidPrefixes,

    /// There weren't any bytes left in the stream to decode.
    ExhaustedInput,

    /// Impossibly long instruction (x86/64 specific).
    TooLong,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidOpcode => "invalid opcode",
            Self::InvalidOperand => "invalid operand",
            Self::InvalidPrefixes => "invalid prefixes",
            Self::ExhaustedInput => "exhausted input",
            Self::TooLong => "instruction too long",
        })
    }
}

pub trait Decoded {
    fn width(&self) -> usize;
}

pub trait Decodable {
    type Instruction: Decoded;

    fn decode(&self, reader: &mut Reader) -> Result<Self::Instruction, Error>;
    fn max_width(&self) -> usize;
}

pub struct Reader<'data> {
    data: &'data [u8],
    position: usize,
    mark: usize,
}

impl<'data> Reader<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self {
            data,
            position: 0,
            mark: 0,
        }
    }

    #[inline]
    pub fn next(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    /// read `buf`-many items from this reader in bulk. if `Reader` cannot read `buf`-many items,
    /// nothing is consumed and `None` is returned.
    #[inline]
    pub fn next_n(&mut self, buf: &mut [u8]) -> Option<()> {
        let end = self.position.checked_add(buf.len())?;
        let src = self.data.get(self.position..end)?;
        buf.copy_from_slice(src);
        self.position = end;
        Some(())
    }

    /// mark the current position as where to measure `offset` against.
    #[inline]
    pub fn mark(&mut self) {
        self.mark = self.position;
    }

    /// the difference, between the current `Reader` position and its last `mark`.
    /// when created, a `Reader`'s initial position is `mark`ed, so creating a `Reader` and
    /// immediately calling `offset()` must return 0.
    #[inline]
    pub fn offset(&self) -> usize {
        self.position - self.mark
    }

    /// the difference, between the current `Reader` position and the initial offset
    /// when constructed.
    #[inline]
    pub fn total_offset(&self) -> usize {
        self.position
    }

    /// bytes between the last `mark` and the current position.
    #[inline]
    pub fn marked(&self) -> &'data [u8] {
        &self.data[self.mark..self.position]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }
}

const HEX_NUGGET: [u8; 16] = *b"0123456789abcdef";

/// Encode bytes as 2 digit hex number separated by a space with a leading space.
pub fn encode_hex_bytes(bytes: &[u8]) -> String {
    let mut buffer = String::with_capacity(bytes.len() * 3);

    for byte in bytes {
        buffer.push(HEX_NUGGET[(byte >> 4) as usize] as char);
        buffer.push(HEX_NUGGET[(byte & 0b1111) as usize] as char);
        buffer.push(' ');
    }

    buffer
}

/// Truncates string past the max width with a '..'.
pub fn encode_hex_bytes_truncated(bytes: &[u8], max_width: usize) -> String {
    assert!(max_width > 2, "max width most be at least 2");

    // truncation has to occur
    if bytes.len() * 3 > max_width {
        let mut buffer = encode_hex_bytes(&bytes[..max_width / 3 - 1]);
        buffer.push_str("..  ");
        return buffer;
    }

    let mut buffer = encode_hex_bytes(bytes);
    let pad = max_width - buffer.len();
    buffer.extend(std::iter::repeat(' ').take(pad));
    buffer
}

/// Parse space separated hex, as written in listings: `"62 F14D0B D8 50 01"`.
///
/// Whitespace between nibble pairs is optional, an odd number of nibbles is rejected.
pub fn decode_hex(text: &str) -> Option<Vec<u8>> {
    let nibbles: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| (b as char).to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;

    if nibbles.len() % 2 != 0 {
        return None;
    }

    Some(nibbles.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

#[cfg(test)]
mod tests {
    use super::Reader;

    #[test]
    fn encode_hex_bytes() {
        assert_eq!(super::encode_hex_bytes(&[0x10, 0x12, 0x3]), "10 12 03 ");
        assert_eq!(super::encode_hex_bytes(&[0x10]), "10 ");
        assert_eq!(
            super::encode_hex_bytes(&[0xff, 0x1, 0x1, 0x1]),
            "ff 01 01 01 "
        );
    }

    #[test]
    fn encode_hex_bytes_truncted() {
        assert_eq!(
            super::encode_hex_bytes_truncated(&[0x10, 0x12, 0x3], 6),
            "10 ..  "
        );

        assert_eq!(
            super::encode_hex_bytes_truncated(&[0x10, 0x12, 0x3], 9),
            "10 12 03 "
        );

        assert_eq!(
            super::encode_hex_bytes_truncated(&[0x10, 0x12, 0x3], 10),
            "10 12 03  "
        );

        assert_eq!(
            super::encode_hex_bytes_truncated(&[0x10, 0x12, 0x3], 11),
            "10 12 03   "
        );
    }

    #[test]
    fn decode_hex() {
        assert_eq!(
            super::decode_hex("62 F14D0B D8 50 01"),
            Some(vec![0x62, 0xf1, 0x4d, 0x0b, 0xd8, 0x50, 0x01])
        );
        assert_eq!(super::decode_hex("0fd8"), Some(vec![0x0f, 0xd8]));
        assert_eq!(super::decode_hex(""), Some(vec![]));
        assert_eq!(super::decode_hex("0fd"), None);
        assert_eq!(super::decode_hex("0g"), None);
    }

    #[test]
    fn reader_offsets() {
        let data = [1, 2, 3, 4, 5];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.offset(), 0);
        assert_eq!(reader.next(), Some(1));
        reader.mark();
        assert_eq!(reader.next(), Some(2));

        let mut buf = [0u8; 2];
        assert_eq!(reader.next_n(&mut buf), Some(()));
        assert_eq!(buf, [3, 4]);
        assert_eq!(reader.offset(), 3);
        assert_eq!(reader.total_offset(), 4);
        assert_eq!(reader.marked(), &[2, 3, 4]);

        // a short bulk read consumes nothing
        assert_eq!(reader.next_n(&mut buf), None);
        assert_eq!(reader.next(), Some(5));
        assert!(reader.is_empty());
        assert_eq!(reader.next(), None);
    }
}
