mod cfg;
mod cli;

pub use cfg::{parse_address, Config, DecoderConfig, OutputConfig};
pub use cli::{Cli, Error as CliError, HELP};
use once_cell::sync::Lazy;

pub static ARGS: Lazy<cli::Cli> = Lazy::new(cli::Cli::parse);

pub static CONFIG: Lazy<cfg::Config> = Lazy::new(|| cfg::Config::parse(ARGS.config.as_deref()));
