use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use commands::{ARGS, CONFIG};
use object::{Architecture, Object, ObjectSection, SectionKind};
use x86_64::{Decoder, DecoderOptions, Mode};

mod listing;

macro_rules! exit {
    ($($arg:tt)*) => {{
        log::strong!($($arg)*);
        std::process::exit(1);
    }};
}

enum Error {
    IO(std::io::Error),
    Object(object::Error),
    UnknownArchitecture(Architecture),
    InvalidHex(String),
    NoInput,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(err) => write!(f, "{err}"),
            Error::Object(err) => write!(f, "failed to parse object: {err}"),
            Error::UnknownArchitecture(arch) => {
                write!(f, "object targets {arch:?}, only x86 can be decoded")
            }
            Error::InvalidHex(arg) => write!(f, "'{arg}' isn't valid hex"),
            Error::NoInput => write!(f, "nothing to decode, see --help"),
        }
    }
}

/// Executable bytes and where they're loaded.
struct Section<'data> {
    name: Cow<'data, str>,
    addr: u64,
    bytes: Cow<'data, [u8]>,
}

fn decoder_for(bitness: u32, invalid_check: bool) -> Decoder {
    let mode = Mode::from_bitness(bitness).unwrap_or(Mode::Long);
    let decoder = Decoder::new(mode);

    if invalid_check {
        decoder
    } else {
        decoder.with_options(DecoderOptions::NO_INVALID_CHECK)
    }
}

fn invalid_check() -> bool {
    !ARGS.no_invalid_check && CONFIG.decoder.invalid_check
}

fn bitness_of(arch: Architecture) -> Result<u32, Error> {
    match arch {
        Architecture::X86_64 | Architecture::X86_64_X32 => Ok(64),
        Architecture::I386 => Ok(32),
        arch => Err(Error::UnknownArchitecture(arch)),
    }
}

/// Print every instruction in `bytes`, returning how many failed to decode.
fn disassemble(decoder: &Decoder, bytes: &[u8], ip: u64) -> Result<usize, Error> {
    let mut stdout = std::io::stdout().lock();
    listing::disassemble(&mut stdout, decoder, bytes, ip, &CONFIG.output).map_err(Error::IO)
}

/// Every executable section of `obj` that could be read.
fn text_sections<'data>(obj: &object::File<'data>) -> Vec<Section<'data>> {
    let mut sections = Vec::new();

    for section in obj.sections().filter(|s| s.kind() == SectionKind::Text) {
        let name = match section.name() {
            Ok(name) => Cow::Owned(name.to_string()),
            _ => Cow::Borrowed("unnamed"),
        };

        let bytes = match section.uncompressed_data() {
            Ok(bytes) => bytes,
            Err(..) => {
                log::warn!("[disx::text_sections] failed to decompress section {name}.");
                continue;
            }
        };

        sections.push(Section {
            name,
            addr: section.address(),
            bytes,
        });
    }

    sections
}

fn disassemble_object(path: &Path) -> Result<usize, Error> {
    let binary = std::fs::read(path).map_err(Error::IO)?;
    let obj = object::File::parse(&binary[..]).map_err(Error::Object)?;
    let bitness = match ARGS.bitness {
        Some(bitness) => bitness,
        None => bitness_of(obj.architecture())?,
    };

    let decoder = decoder_for(bitness, invalid_check());
    let sections = text_sections(&obj);

    if sections.is_empty() {
        log::warn!("[disx::disassemble_object] {path:?} has no executable sections.");
    }

    let mut errors = 0;
    for section in sections {
        let end = section.addr.wrapping_add(section.bytes.len() as u64);
        println!("\n{} <{:x}..{:x}>:", section.name, section.addr, end);
        errors += disassemble(&decoder, &section.bytes, section.addr)?;
    }

    Ok(errors)
}

fn disassemble_hex(args: &[String]) -> Result<usize, Error> {
    let mut bytes = Vec::new();
    for arg in args {
        let decoded = decoder::decode_hex(arg).ok_or_else(|| Error::InvalidHex(arg.clone()))?;
        bytes.extend(decoded);
    }

    let bitness = ARGS.bitness.unwrap_or(CONFIG.decoder.bitness);
    let ip = ARGS.ip.unwrap_or(CONFIG.decoder.ip);
    disassemble(&decoder_for(bitness, invalid_check()), &bytes, ip)
}

fn main() {
    ARGS.validate_args();

    if let Ok(mut logger) = log::LOGGER.lock() {
        logger.set_verbose(ARGS.debug);
        logger.set_colored(CONFIG.output.color);
    }

    let result = match ARGS.path {
        Some(ref path) => disassemble_object(path),
        None if !ARGS.hex.is_empty() => disassemble_hex(&ARGS.hex),
        None => Err(Error::NoInput),
    };

    match result {
        Ok(0) => {}
        Ok(errors) => log::notify!("[disx] {errors} invalid instruction(s)."),
        Err(err) => exit!("{err}"),
    }
}
