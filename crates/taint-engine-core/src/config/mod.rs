use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod loader;
pub mod types;

pub use loader::{CONFIG_FILE_FALLBACK, CONFIG_FILE_PRIMARY, ConfigSource, LoadedConfig, load_from_dir};
pub use types::{Config, RawConfig, RuleLevel, RuleOverride};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidRuleCode {
        key: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(
                    f,
                    "failed to read config file '{}': {source}",
                    path.display()
                )
            }
            Self::Parse { path, source } => {
                write!(
                    f,
                    "failed to parse config file '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidRuleCode { key } => {
                write!(f, "rule override key '{key}' is not a valid rule code")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidRuleCode { .. } => None,
        }
    }
}
