//! Pin attribute sets
//!
//! A [`PinAttributes`] value is the capability set a virtual pin is asked to
//! adopt. The compatibility layer builds one from a raw mode bitmask by
//! testing each mode bit on its own.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

use pinmap_hal::mode;

/// Set of requested pin attributes
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinAttributes(u16);

impl PinAttributes {
    /// No attributes
    pub const NONE: Self = Self(0);
    /// Pin is read
    pub const INPUT: Self = Self(1 << 0);
    /// Pin is driven
    pub const OUTPUT: Self = Self(1 << 1);
    /// Pull-up resistor
    pub const PULL_UP: Self = Self(1 << 2);
    /// Pull-down resistor
    pub const PULL_DOWN: Self = Self(1 << 3);
    /// Logical high is electrical low
    pub const ACTIVE_LOW: Self = Self(1 << 4);
    /// Output starts in the logical "on" state
    pub const INITIAL_ON: Self = Self(1 << 5);

    const NAMES: [(Self, &'static str); 6] = [
        (Self::INPUT, "Input"),
        (Self::OUTPUT, "Output"),
        (Self::PULL_UP, "PullUp"),
        (Self::PULL_DOWN, "PullDown"),
        (Self::ACTIVE_LOW, "ActiveLow"),
        (Self::INITIAL_ON, "InitialOn"),
    ];

    const ALL_BITS: u16 = 0x3F;

    /// Raw bit representation
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Build a set from raw bits, dropping bits with no attribute
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    /// True if no attribute is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every attribute in `other` is also set in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if `self` and `other` share at least one attribute
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Translate a [`mode`] bitmask into an attribute set
    ///
    /// Each mode bit is tested independently, so combined modes such as
    /// `INPUT | PULLUP` yield both attributes. Unknown bits are ignored.
    pub const fn from_mode_bits(bits: u8) -> Self {
        let mut attr = Self::NONE;
        if bits & mode::OUTPUT == mode::OUTPUT {
            attr = attr.union(Self::OUTPUT);
        }
        if bits & mode::INPUT == mode::INPUT {
            attr = attr.union(Self::INPUT);
        }
        if bits & mode::PULLUP == mode::PULLUP {
            attr = attr.union(Self::PULL_UP);
        }
        if bits & mode::PULLDOWN == mode::PULLDOWN {
            attr = attr.union(Self::PULL_DOWN);
        }
        attr
    }

    /// Translate the direction and pull part of the set back into mode bits
    ///
    /// `ACTIVE_LOW` and `INITIAL_ON` have no mode bit and are dropped.
    pub const fn to_mode_bits(self) -> u8 {
        let mut bits = 0;
        if self.contains(Self::OUTPUT) {
            bits |= mode::OUTPUT;
        }
        if self.contains(Self::INPUT) {
            bits |= mode::INPUT;
        }
        if self.contains(Self::PULL_UP) {
            bits |= mode::PULLUP;
        }
        if self.contains(Self::PULL_DOWN) {
            bits |= mode::PULLDOWN;
        }
        bits
    }
}

impl BitOr for PinAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for PinAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PinAttributes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for PinAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PinAttributes {
    fn format(&self, f: defmt::Formatter) {
        if self.is_empty() {
            defmt::write!(f, "None");
            return;
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    defmt::write!(f, " | ");
                }
                defmt::write!(f, "{=str}", name);
                first = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_pullup_translation() {
        let attr = PinAttributes::from_mode_bits(mode::INPUT | mode::PULLUP);
        assert_eq!(attr, PinAttributes::INPUT | PinAttributes::PULL_UP);
        assert!(!attr.contains(PinAttributes::OUTPUT));
        assert!(!attr.contains(PinAttributes::PULL_DOWN));
    }

    #[test]
    fn test_output_only_translation() {
        let attr = PinAttributes::from_mode_bits(mode::OUTPUT);
        assert_eq!(attr, PinAttributes::OUTPUT);
    }

    #[test]
    fn test_zero_mode_is_empty() {
        assert!(PinAttributes::from_mode_bits(0).is_empty());
        // Bits outside the known modes are ignored
        assert!(PinAttributes::from_mode_bits(0xF0).is_empty());
    }

    #[test]
    fn test_every_combination_round_trips() {
        for bits in 0..16u8 {
            assert_eq!(PinAttributes::from_mode_bits(bits).to_mode_bits(), bits);
        }
    }

    #[test]
    fn test_to_mode_bits_drops_polarity() {
        let attr = PinAttributes::OUTPUT | PinAttributes::ACTIVE_LOW | PinAttributes::INITIAL_ON;
        assert_eq!(attr.to_mode_bits(), mode::OUTPUT);
    }

    #[test]
    fn test_from_bits_truncate() {
        let attr = PinAttributes::OUTPUT | PinAttributes::ACTIVE_LOW;
        assert_eq!(PinAttributes::from_bits_truncate(attr.bits()), attr);
        assert_eq!(PinAttributes::from_bits_truncate(0xFFC0), PinAttributes::NONE);
    }

    #[test]
    fn test_set_operations() {
        let mut attr = PinAttributes::NONE;
        attr |= PinAttributes::INPUT;
        attr |= PinAttributes::PULL_DOWN;

        assert!(attr.contains(PinAttributes::INPUT));
        assert!(attr.intersects(PinAttributes::PULL_UP | PinAttributes::PULL_DOWN));
        assert!(!attr.intersects(PinAttributes::OUTPUT));
        assert_eq!(attr & PinAttributes::INPUT, PinAttributes::INPUT);
    }

    #[test]
    fn test_debug_lists_names() {
        assert_eq!(format!("{:?}", PinAttributes::NONE), "None");
        assert_eq!(
            format!("{:?}", PinAttributes::INPUT | PinAttributes::PULL_UP),
            "Input | PullUp"
        );
    }
}
