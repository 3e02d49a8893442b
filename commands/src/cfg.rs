use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub decoder: DecoderConfig,
    pub output: OutputConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DecoderConfig {
    /// 16, 32 or 64.
    pub bitness: u32,
    /// Address of the first instruction of hex input.
    #[serde(deserialize_with = "address")]
    pub ip: u64,
    pub invalid_check: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Show the bytes of each instruction.
    pub bytes: bool,
    /// Most bytes shown before truncating.
    pub bytes_width: usize,
    /// Color diagnostics.
    pub color: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            bitness: defaults::bitness(),
            ip: 0,
            invalid_check: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bytes: true,
            bytes_width: defaults::bytes_width(),
            color: true,
        }
    }
}

mod defaults {
    pub fn bitness() -> u32 {
        64
    }
    pub fn bytes_width() -> usize {
        10
    }
}

impl Config {
    /// Where the config is looked for when none is given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("disx").join("config.yaml"))
    }

    pub fn parse(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Self::default(),
        };

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => {
                log::trace!("[cfg::parse] no config at {path:?}");
                return Self::default();
            }
        };

        log::trace!("[cfg::parse] reading config {path:?}");
        Self::from_yaml(&raw)
    }

    /// Parse `raw`, falling back to the defaults on malformed input.
    pub fn from_yaml(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }

        let mut config: Self = match serde_yaml::from_str(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("[cfg::parse] {err}");

                // parse everything as default
                return Self::default();
            }
        };

        if !matches!(config.decoder.bitness, 16 | 32 | 64) {
            log::warn!(
                "[cfg::parse] bitness {} isn't one of 16, 32 or 64, using {}",
                config.decoder.bitness,
                defaults::bitness()
            );
            config.decoder.bitness = defaults::bitness();
        }

        if config.output.bytes_width == 0 {
            config.output.bytes_width = defaults::bytes_width();
        }

        config
    }
}

/// Parse a decimal or `0x` prefixed hexadecimal address.
pub fn parse_address(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => s.replace('_', "").parse().ok(),
    }
}

fn address<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    struct AddressParsing;
    impl<'de> Visitor<'de> for AddressParsing {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("expected an address, as a number or a hex string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u64::try_from(v).map_err(|_| E::custom(format!("negative address {v}")))
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
            parse_address(s).ok_or_else(|| E::custom(format!("invalid address {s:?}")))
        }
    }

    deserializer.deserialize_any(AddressParsing)
}

#[cfg(test)]
mod tests {
    use super::{parse_address, Config};

    #[test]
    fn defaults() {
        let config = Config::from_yaml("");
        assert_eq!(config, Config::default());
        assert_eq!(config.decoder.bitness, 64);
        assert!(config.decoder.invalid_check);
        assert!(config.output.bytes);
        assert_eq!(config.output.bytes_width, 10);
    }

    #[test]
    fn partial() {
        let config = Config::from_yaml("decoder:\n  bitness: 32\n  ip: \"0x401000\"\n");
        assert_eq!(config.decoder.bitness, 32);
        assert_eq!(config.decoder.ip, 0x401000);
        assert!(config.decoder.invalid_check);
        assert_eq!(config.output, Config::default().output);

        let config = Config::from_yaml("decoder:\n  ip: 4096\noutput:\n  bytes: false\n");
        assert_eq!(config.decoder.ip, 4096);
        assert!(!config.output.bytes);
    }

    #[test]
    fn malformed() {
        assert_eq!(Config::from_yaml("decoder: [1, 2"), Config::default());
        assert_eq!(Config::from_yaml("decoder:\n  ip: \"nope\"\n"), Config::default());
        assert_eq!(Config::from_yaml("decoder:\n  bitness: 8\n").decoder.bitness, 64);
    }

    #[test]
    fn addresses() {
        assert_eq!(parse_address("0x1000"), Some(0x1000));
        assert_eq!(parse_address("0XFFFF_0000"), Some(0xffff_0000));
        assert_eq!(parse_address("4096"), Some(4096));
        assert_eq!(parse_address("-1"), None);
        assert_eq!(parse_address("0x"), None);
    }
}
