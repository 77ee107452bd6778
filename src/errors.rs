use std::path::PathBuf;

use crate::generators::{MAX_LENGTH, MIN_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("at least one character class must be selected")]
    InvalidRequest,

    #[error(
        "invalid length `{0}`: must be an integer between {min} and {max}",
        min = MIN_LENGTH,
        max = MAX_LENGTH
    )]
    InvalidLength(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error returned from `main`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("clipboard error: {0}")]
    Clipboard(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_length_message_names_input_and_bounds() {
        let e = GenerationError::InvalidLength(String::from("abc"));
        assert_eq!(
            e.to_string(),
            "invalid length `abc`: must be an integer between 1 and 512"
        );
    }

    #[test]
    fn app_error_is_transparent_for_generation_errors() {
        let e = AppError::from(GenerationError::InvalidRequest);
        assert_eq!(e.to_string(), "at least one character class must be selected");
    }
}
