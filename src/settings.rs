use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::config::Config;
use crate::errors::{ConfigError, GenerationError};
use crate::generators::{CharacterClass, DEFAULT_LENGTH, GenerationRequest, parse_length};

/// Current selection: which classes are checked and the requested length.
///
/// Unlike a `GenerationRequest` this may be empty; that is only reported
/// when a request is built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    classes: BTreeSet<CharacterClass>,
    length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            classes: BTreeSet::from([CharacterClass::Lowercase]),
            length: DEFAULT_LENGTH,
        }
    }
}

impl Settings {
    pub fn new<I>(classes: I, length: usize) -> Self
    where
        I: IntoIterator<Item = CharacterClass>,
    {
        Self {
            classes: classes.into_iter().collect(),
            length,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.classes()?, config.length))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns whether the class is enabled afterwards.
    pub fn toggle(&mut self, class: CharacterClass) -> bool {
        let enabled = if self.classes.remove(&class) {
            false
        } else {
            self.classes.insert(class)
        };
        debug!(%class, enabled, "toggled character class");

        enabled
    }

    pub fn is_enabled(&self, class: CharacterClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn set_length(&mut self, input: &str) -> Result<usize, GenerationError> {
        self.length = parse_length(input)?;
        Ok(self.length)
    }

    pub fn request(&self) -> Result<GenerationRequest, GenerationError> {
        if self.classes.is_empty() {
            return Err(GenerationError::InvalidRequest);
        }

        Ok(GenerationRequest {
            classes: self.classes.clone(),
            length: self.length,
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for class in CharacterClass::ALL {
            let mark = if self.is_enabled(class) { 'x' } else { ' ' };
            write!(f, "[{}] {} ", mark, class)?;
        }
        write!(f, "length={}", self.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lowercase_only() {
        let settings = Settings::default();
        assert!(settings.is_enabled(CharacterClass::Lowercase));
        assert!(!settings.is_enabled(CharacterClass::Uppercase));
        assert_eq!(settings.length(), 8);
        assert_eq!(
            settings.to_string(),
            "[x] lowercase [ ] uppercase [ ] numeric [ ] special length=8"
        );
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut settings = Settings::default();
        let original = settings.clone();

        assert!(settings.toggle(CharacterClass::Special));
        assert!(!settings.toggle(CharacterClass::Special));
        assert_eq!(settings, original);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut settings = Settings::new(CharacterClass::ALL, 100);
        settings.reset();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn invalid_length_keeps_previous_value() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_length("32"), Ok(32));
        assert!(settings.set_length("1000").is_err());
        assert_eq!(settings.length(), 32);
    }

    #[test]
    fn empty_selection_is_invalid_request() {
        let mut settings = Settings::default();
        settings.toggle(CharacterClass::Lowercase);
        assert_eq!(settings.request(), Err(GenerationError::InvalidRequest));
    }

    #[test]
    fn from_config_uses_configured_classes() {
        let config = Config {
            default_classes: vec![String::from("uppercase"), String::from("numeric")],
            length: 20,
            ..Config::default()
        };
        let request = Settings::from_config(&config).unwrap().request().unwrap();
        assert_eq!(
            request,
            GenerationRequest::new([CharacterClass::Uppercase, CharacterClass::Numeric], 20)
        );
    }
}
