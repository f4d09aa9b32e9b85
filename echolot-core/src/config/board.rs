//! Board sensor wiring
//!
//! Pin numbers are board numbers (as printed on the board), the same
//! numbers the scripted `setup` calls take.
//!
//! ```toml
//! [ultrasonic]
//! trigger_pin = 1
//! echo_pin = 2
//!
//! [encoder]
//! pin = 5
//! ```

use echolot_hal::{GpioPlatform, PinId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DriverError, PinRole};
use crate::pins::check_pin;

/// HC-SR04 wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UltrasonicConfig {
    /// Trigger output pin
    pub trigger_pin: PinId,
    /// Echo input pin (must be interrupt capable)
    pub echo_pin: PinId,
}

impl UltrasonicConfig {
    /// Check both pins against the platform
    pub fn validate<P: GpioPlatform + ?Sized>(&self, platform: &P) -> Result<(), DriverError> {
        check_pin(platform, PinRole::Trigger, self.trigger_pin)?;
        check_pin(platform, PinRole::Echo, self.echo_pin)
    }
}

/// Optical encoder wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EncoderConfig {
    /// Counting input pin (must be interrupt capable)
    pub pin: PinId,
}

impl EncoderConfig {
    /// Check the pin against the platform
    pub fn validate<P: GpioPlatform + ?Sized>(&self, platform: &P) -> Result<(), DriverError> {
        check_pin(platform, PinRole::Counter, self.pin)
    }
}

/// Sensors fitted to a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Range finder, if fitted
    #[cfg_attr(feature = "serde", serde(default))]
    pub ultrasonic: Option<UltrasonicConfig>,
    /// Edge counter, if fitted
    #[cfg_attr(feature = "serde", serde(default))]
    pub encoder: Option<EncoderConfig>,
}

impl BoardConfig {
    /// Check every fitted sensor against the platform
    ///
    /// Runs the same checks as driver setup, so a bad board file is
    /// rejected before any pin is reconfigured.
    pub fn validate<P: GpioPlatform + ?Sized>(&self, platform: &P) -> Result<(), DriverError> {
        if let Some(ultrasonic) = &self.ultrasonic {
            ultrasonic.validate(platform)?;
        }
        if let Some(encoder) = &self.encoder {
            encoder.validate(platform)?;
        }
        Ok(())
    }
}

/// Errors loading a board file
#[cfg(feature = "toml")]
#[derive(Debug)]
pub enum ConfigError {
    /// File is not valid TOML or does not match the schema
    Parse(toml::de::Error),
    /// A configured pin is unusable on this platform
    Pin(DriverError),
}

#[cfg(feature = "toml")]
impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "board file: {}", e),
            ConfigError::Pin(e) => write!(f, "board file: {}", e),
        }
    }
}

#[cfg(feature = "toml")]
impl BoardConfig {
    /// Parse a board file without validating it
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Parse)
    }

    /// Parse a board file and validate it against the platform
    pub fn load<P: GpioPlatform + ?Sized>(s: &str, platform: &P) -> Result<Self, ConfigError> {
        let config = Self::from_toml_str(s)?;
        config.validate(platform).map_err(ConfigError::Pin)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::tests::Board;

    #[test]
    fn test_empty_board_is_valid() {
        assert!(BoardConfig::default().validate(&Board).is_ok());
    }

    #[test]
    fn test_validate_reports_first_bad_pin() {
        let config = BoardConfig {
            ultrasonic: Some(UltrasonicConfig {
                trigger_pin: 1,
                echo_pin: 0,
            }),
            encoder: Some(EncoderConfig { pin: 40 }),
        };

        assert_eq!(
            config.validate(&Board),
            Err(DriverError::InvalidPin {
                role: PinRole::Echo,
                pin: 0
            })
        );
    }

    #[test]
    fn test_validate_encoder() {
        let config = BoardConfig {
            ultrasonic: None,
            encoder: Some(EncoderConfig { pin: 40 }),
        };

        assert_eq!(
            config.validate(&Board),
            Err(DriverError::InvalidPin {
                role: PinRole::Counter,
                pin: 40
            })
        );
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_load_toml() {
        let src = r#"
            [ultrasonic]
            trigger_pin = 1
            echo_pin = 2

            [encoder]
            pin = 5
        "#;

        let config = BoardConfig::load(src, &Board).unwrap();
        assert_eq!(
            config.ultrasonic,
            Some(UltrasonicConfig {
                trigger_pin: 1,
                echo_pin: 2
            })
        );
        assert_eq!(config.encoder, Some(EncoderConfig { pin: 5 }));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_load_toml_missing_sections() {
        let config = BoardConfig::load("[encoder]\npin = 3\n", &Board).unwrap();
        assert_eq!(config.ultrasonic, None);
        assert_eq!(config.encoder, Some(EncoderConfig { pin: 3 }));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_load_toml_rejects_bad_pin() {
        let err = BoardConfig::load("[encoder]\npin = 0\n", &Board).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Pin(DriverError::InvalidPin {
                role: PinRole::Counter,
                pin: 0
            })
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_load_toml_parse_error() {
        let err = BoardConfig::from_toml_str("[encoder]\npin = \"five\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
