use std::fmt;
use std::path::{Path, PathBuf};

use crate::cfg::parse_address;

macro_rules! exit {
    ($code:expr => $($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit($code);
    }};
}

pub const HELP: &str = "OVERVIEW: x86 instruction decoder

USAGE: disx [options] [HEX]...

Decodes every HEX argument as one stream of machine code, or the executable
sections of an object when one is given.

OPTIONS:
  -H, --help               Print usage information
  -D, --disassemble        Path to object you're disassembling
  -C, --config             Path to config used for disassembling
  -b, --bitness            Decode as 16, 32 or 64-bit code
  -I, --ip                 Address of the first instruction
  -N, --no-invalid-check   Accept encodings a processor would reject
  -B, --debug              Enable verbose internal info";

const ABBRV: &[&str] = &["-H", "-D", "-C", "-b", "-I", "-N", "-B"];
const NAMES: &[&str] = &[
    "--help",
    "--disassemble",
    "--config",
    "--bitness",
    "--ip",
    "--no-invalid-check",
    "--debug",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Usage information was asked for.
    Help,
    /// Flag expects a value but got none.
    MissingValue(&'static str),
    /// Flag was given more than once.
    Repeated(&'static str),
    InvalidBitness(String),
    InvalidAddress(String),
    /// Unknown flag, with the closest known one if it's a likely typo.
    Unknown(String, Option<&'static str>),
    /// Both an object and hex input were given.
    Conflict,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Help => f.write_str(HELP),
            Error::MissingValue(flag) => write!(f, "Flag '{flag}' expects a value."),
            Error::Repeated(what) => write!(f, "{what} already given."),
            Error::InvalidBitness(arg) => {
                write!(f, "Bitness '{arg}' isn't one of 16, 32 or 64.")
            }
            Error::InvalidAddress(arg) => write!(f, "Address '{arg}' isn't a valid number."),
            Error::Unknown(arg, Some(guess)) => {
                write!(f, "Unknown cmd arg '{arg}' did you mean '{guess}'?")
            }
            Error::Unknown(arg, None) => write!(f, "Unknown cmd arg '{arg}' was entered."),
            Error::Conflict => f.write_str("Can't decode both an object and hex input."),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    /// Path to object being disassembled.
    pub path: Option<PathBuf>,

    /// Optional path to config.
    pub config: Option<PathBuf>,

    /// Overrides the configured bitness.
    pub bitness: Option<u32>,

    /// Overrides the configured address of the first instruction.
    pub ip: Option<u64>,

    /// Accept encodings a processor would reject.
    pub no_invalid_check: bool,

    /// Echo internal traces.
    pub debug: bool,

    /// Machine code given on the command line, as hex.
    pub hex: Vec<String>,
}

/// Closest known flag to `unknown`, if it's less than 4 `steps` away.
fn best_guess(unknown: &str) -> Option<&'static str> {
    let mut distance = u32::MAX;
    let mut best_guess = "";
    for name in NAMES {
        let d = triple_accel::levenshtein_exp(unknown.as_bytes(), name.as_bytes());
        if d < distance {
            distance = d;
            best_guess = name;
        }
    }

    (distance < 4).then_some(best_guess)
}

fn value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, Error> {
    match args.next() {
        Some(arg) if !NAMES.contains(&arg.as_str()) && !ABBRV.contains(&arg.as_str()) => Ok(arg),
        _ => Err(Error::MissingValue(flag)),
    }
}

impl Cli {
    pub fn parse() -> Self {
        match Self::parse_from(std::env::args().skip(1)) {
            Ok(cli) => cli,
            Err(Error::Help) => exit!(0 => "{HELP}"),
            Err(err) => exit!(1 => "{err}"),
        }
    }

    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self, Error> {
        let mut cli = Cli::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-H" | "--help" => return Err(Error::Help),
                "-D" | "--disassemble" => {
                    let path = value(&mut args, "--disassemble")?;
                    if cli.path.is_some() {
                        return Err(Error::Repeated("Path to object"));
                    }
                    cli.path = Some(PathBuf::from(path));
                }
                "-C" | "--config" => {
                    let path = value(&mut args, "--config")?;
                    if cli.config.is_some() {
                        return Err(Error::Repeated("Path to config"));
                    }
                    cli.config = Some(PathBuf::from(path));
                }
                "-b" | "--bitness" => {
                    let bitness = value(&mut args, "--bitness")?;
                    if cli.bitness.is_some() {
                        return Err(Error::Repeated("Bitness"));
                    }
                    cli.bitness = match bitness.parse() {
                        Ok(bits @ (16 | 32 | 64)) => Some(bits),
                        _ => return Err(Error::InvalidBitness(bitness)),
                    };
                }
                "-I" | "--ip" => {
                    let ip = value(&mut args, "--ip")?;
                    if cli.ip.is_some() {
                        return Err(Error::Repeated("Address"));
                    }
                    cli.ip = Some(parse_address(&ip).ok_or(Error::InvalidAddress(ip))?);
                }
                "-N" | "--no-invalid-check" => {
                    if cli.no_invalid_check {
                        return Err(Error::Repeated("No invalid check flag"));
                    }
                    cli.no_invalid_check = true;
                }
                "-B" | "--debug" => {
                    if cli.debug {
                        return Err(Error::Repeated("Debug flag"));
                    }
                    cli.debug = true
                }
                unknown if unknown.starts_with('-') => {
                    return Err(Error::Unknown(unknown.to_string(), best_guess(unknown)));
                }
                hex => cli.hex.push(hex.to_string()),
            }
        }

        if cli.path.is_some() && !cli.hex.is_empty() {
            return Err(Error::Conflict);
        }

        Ok(cli)
    }

    /// Check that the paths given exist, exiting if they don't.
    pub fn validate_args(&self) {
        if let Some(ref path) = self.path {
            if !path.exists() {
                exit!(1 => "Object {path:?} does not exist.");
            }
        }

        if let Some(ref cfg) = self.config {
            if !Path::new(cfg).exists() {
                exit!(1 => "Config {cfg:?} does not exist.");
            }
        }
    }
}
