//! GPIO access
//!
//! Physical pins are reached two ways: by number through [`RawGpio`], or as
//! an owned [`DigitalPin`] that can be wrapped and given a synthetic number.

/// Numeric pin identifier
///
/// Physical pins live below the registry's GPIO limit, synthetic pins at or
/// above it.
pub type PinNum = u8;

/// Pin mode bits accepted by [`RawGpio::pin_mode`]
///
/// Every capability is a separate bit so callers can combine them freely
/// (e.g. `INPUT | PULLUP`).
pub mod mode {
    /// Pin reads its level
    pub const INPUT: u8 = 0x01;
    /// Pin drives its level
    pub const OUTPUT: u8 = 0x02;
    /// Internal pull-up enabled
    pub const PULLUP: u8 = 0x04;
    /// Internal pull-down enabled
    pub const PULLDOWN: u8 = 0x08;

    /// Input with pull-up
    pub const INPUT_PULLUP: u8 = INPUT | PULLUP;
    /// Input with pull-down
    pub const INPUT_PULLDOWN: u8 = INPUT | PULLDOWN;
}

/// Single pin owned by a chip HAL
///
/// The counterpart of [`RawGpio`] for one pin that has already been taken
/// out of the bank. Levels are electrical; polarity is handled above.
pub trait DigitalPin {
    /// Configure direction and pulls from a combination of [`mode`] bits
    fn set_mode(&mut self, mode: u8);

    /// Drive the pin to `high`
    fn set_level(&mut self, high: bool);

    /// Level last driven
    fn output_level(&self) -> bool;

    /// Level present on the pad
    fn input_level(&self) -> bool;
}

/// Raw access to the physical GPIO bank, keyed by pin number
///
/// Only ever called with physical pin numbers. Implementations decide what
/// happens for numbers the chip does not have.
pub trait RawGpio {
    /// Configure a pin from a combination of [`mode`] bits
    fn pin_mode(&mut self, pin: PinNum, mode: u8);

    /// Read the level of a pin
    fn digital_read(&mut self, pin: PinNum) -> bool;

    /// Drive a pin high or low
    fn digital_write(&mut self, pin: PinNum, high: bool);
}

impl<T: RawGpio + ?Sized> RawGpio for &mut T {
    fn pin_mode(&mut self, pin: PinNum, mode: u8) {
        (**self).pin_mode(pin, mode)
    }

    fn digital_read(&mut self, pin: PinNum) -> bool {
        (**self).digital_read(pin)
    }

    fn digital_write(&mut self, pin: PinNum, high: bool) {
        (**self).digital_write(pin, high)
    }
}
