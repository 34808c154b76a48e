//! Pin specifications from machine configuration
//!
//! Pins are named in configuration files with short strings:
//!
//! - `gpio.12` - physical pin 12
//! - `expander.3` - channel 3 of the I/O expander
//! - `no_pin` - explicitly unused
//!
//! followed by any number of `:`-separated options:
//!
//! - `pu` / `pd` - pull-up / pull-down
//! - `low` - active low
//! - `high` - active high (the default, accepted for symmetry)
//!
//! Parsing is case-insensitive, so `GPIO.4:PU` equals `gpio.4:pu`.

use core::fmt;
use core::str::FromStr;

use pinmap_hal::PinNum;

use crate::attributes::PinAttributes;
use crate::registry::GPIO_LIMIT;

/// Where a configured pin lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinSource {
    /// Pin is not connected
    NoPin,
    /// Physical GPIO pin
    Gpio(PinNum),
    /// Channel on the I/O expander
    Expander(u8),
}

/// Parsed pin specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSpec {
    /// Pin location
    pub source: PinSource,
    /// Options given after the location
    pub attributes: PinAttributes,
}

impl PinSpec {
    /// Unconnected pin
    pub const NO_PIN: Self = Self {
        source: PinSource::NoPin,
        attributes: PinAttributes::NONE,
    };

    /// Physical pin with no options
    pub const fn gpio(pin: PinNum) -> Self {
        Self {
            source: PinSource::Gpio(pin),
            attributes: PinAttributes::NONE,
        }
    }

    /// Check if the spec names an actual pin
    pub fn is_defined(&self) -> bool {
        self.source != PinSource::NoPin
    }

    /// Check if the pin is active low
    pub fn is_active_low(&self) -> bool {
        self.attributes.contains(PinAttributes::ACTIVE_LOW)
    }

    /// Physical pin number, if the spec names a GPIO
    pub fn gpio_pin(&self) -> Option<PinNum> {
        match self.source {
            PinSource::Gpio(pin) => Some(pin),
            _ => None,
        }
    }

    /// Expander bit, if the spec names an expander channel
    pub fn expander_bit(&self) -> Option<u8> {
        match self.source {
            PinSource::Expander(bit) => Some(bit),
            _ => None,
        }
    }
}

/// Error parsing a pin specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinSpecError {
    /// Location is not `gpio`, `expander` or `no_pin`
    UnknownSource,
    /// Missing or malformed pin number
    InvalidNumber,
    /// GPIO number is not a physical pin
    OutOfRange,
    /// Option is not `pu`, `pd`, `low` or `high`
    UnknownOption,
    /// Options given for `no_pin`
    OptionsOnNoPin,
    /// Both `pu` and `pd` requested
    ConflictingPull,
}

impl fmt::Display for PinSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PinSpecError::UnknownSource => "unknown pin source",
            PinSpecError::InvalidNumber => "invalid pin number",
            PinSpecError::OutOfRange => "pin number is not a physical GPIO",
            PinSpecError::UnknownOption => "unknown pin option",
            PinSpecError::OptionsOnNoPin => "no_pin does not take options",
            PinSpecError::ConflictingPull => "pull-up and pull-down are exclusive",
        };
        f.write_str(msg)
    }
}

impl FromStr for PinSpec {
    type Err = PinSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        // split always yields at least one item
        let location = parts.next().unwrap_or("");

        if location.eq_ignore_ascii_case("no_pin") {
            if parts.next().is_some() {
                return Err(PinSpecError::OptionsOnNoPin);
            }
            return Ok(Self::NO_PIN);
        }

        let (kind, number) = location
            .split_once('.')
            .ok_or(PinSpecError::UnknownSource)?;
        let number: u8 = number.parse().map_err(|_| PinSpecError::InvalidNumber)?;

        let source = if kind.eq_ignore_ascii_case("gpio") {
            if number >= GPIO_LIMIT {
                return Err(PinSpecError::OutOfRange);
            }
            PinSource::Gpio(number)
        } else if kind.eq_ignore_ascii_case("expander") {
            PinSource::Expander(number)
        } else {
            return Err(PinSpecError::UnknownSource);
        };

        let mut attributes = PinAttributes::NONE;
        for option in parts {
            if option.eq_ignore_ascii_case("pu") {
                attributes |= PinAttributes::PULL_UP;
            } else if option.eq_ignore_ascii_case("pd") {
                attributes |= PinAttributes::PULL_DOWN;
            } else if option.eq_ignore_ascii_case("low") {
                attributes |= PinAttributes::ACTIVE_LOW;
            } else if !option.eq_ignore_ascii_case("high") {
                return Err(PinSpecError::UnknownOption);
            }
        }

        if attributes.contains(PinAttributes::PULL_UP | PinAttributes::PULL_DOWN) {
            return Err(PinSpecError::ConflictingPull);
        }

        Ok(Self { source, attributes })
    }
}

#[cfg(any(test, feature = "serde"))]
impl<'de> serde::Deserialize<'de> for PinSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SpecVisitor;

        impl serde::de::Visitor<'_> for SpecVisitor {
            type Value = PinSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a pin specification such as \"gpio.12:pu\"")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<PinSpec, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(SpecVisitor)
    }
}
