use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

use crate::errors::ConfigError;
use crate::generators::{CharacterClass, DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH};

pub const LENGTH_ENV: &str = "RASPUTIN_LENGTH";

/// Defaults read from `config.json`. The file is optional and never written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub default_classes: Vec<String>,
    pub length: usize,
    pub log_level: String,
    /// File the values came from; `None` when running on defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_classes: vec![CharacterClass::Lowercase.name().to_string()],
            length: DEFAULT_LENGTH,
            log_level: String::from("warn"),
            source: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rasputin").join("config.json"))
    }

    /// Loads `path`, or the default location when `None`, then applies
    /// `RASPUTIN_LENGTH`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, Self::default_path(), std::env::var(LENGTH_ENV).ok())
    }

    /// A missing file at `default_path` yields the defaults; a missing
    /// explicit `path` is an error.
    pub fn load_from(
        path: Option<&Path>,
        default_path: Option<PathBuf>,
        env_length: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match (path, default_path) {
            (Some(path), _) => Self::read_file(path)?,
            (None, Some(path)) => match Self::read_file(&path) {
                Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                    Self::default()
                }
                other => other?,
            },
            (None, None) => Self::default(),
        };

        if let Some(value) = env_length {
            config.length = value.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not an integer: {}", LENGTH_ENV, value))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            return Err(ConfigError::Invalid(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH, MAX_LENGTH, self.length
            )));
        }

        self.log_level.parse::<LevelFilter>().map_err(|_| {
            ConfigError::Invalid(format!("unknown log level: {}", self.log_level))
        })?;

        self.classes()?;
        Ok(())
    }

    /// The configured default classes. May be empty, which only fails once
    /// something is generated.
    pub fn classes(&self) -> Result<Vec<CharacterClass>, ConfigError> {
        self.default_classes
            .iter()
            .map(|name| name.parse().map_err(ConfigError::Invalid))
            .collect()
    }
}
