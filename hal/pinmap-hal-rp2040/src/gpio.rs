//! GPIO bank for the RP2040
//!
//! Pads are taken from a [`PinBank`] by their configured GPIO number and
//! handed to [`RpGpio`], after which they are driven through [`RawGpio`]
//! like any other physical pin. Numbers that were never inserted are
//! ignored and read low.

use embassy_rp::gpio::{AnyPin, Flex, Pull};
use embassy_rp::Peri;
use pinmap_hal::{mode, DigitalPin, PinNum, RawGpio};

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when taking or inserting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already handed out, or already in the bank
    AlreadyTaken,
    /// Pin was kept back for another peripheral
    Reserved,
}

/// GPIO pads not yet assigned, looked up by number
///
/// Built once from the peripherals so configured pin numbers select the
/// pad, instead of the firmware naming `PIN_n` directly. Pads used by
/// other peripherals (I2C, UART, ...) are passed in as `None`.
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
    reserved: u32,
}

impl PinBank {
    /// Create a bank from the free pads; `None` marks a reserved pad
    pub fn new(pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT]) -> Self {
        let reserved = pins
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.is_none())
            .fold(0, |mask, (i, _)| mask | (1 << i));
        Self { pins, reserved }
    }

    /// Take the pad for a GPIO number
    pub fn take(&mut self, pin_num: PinNum) -> Result<Peri<'static, AnyPin>, PinError> {
        let slot = self
            .pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?;
        match slot.take() {
            Some(pin) => Ok(pin),
            None if self.reserved & (1 << pin_num) != 0 => Err(PinError::Reserved),
            None => Err(PinError::AlreadyTaken),
        }
    }

    /// Check if a pad can still be taken
    pub fn is_available(&self, pin_num: PinNum) -> bool {
        matches!(self.pins.get(pin_num as usize), Some(Some(_)))
    }
}

/// Physical pin bank
pub struct RpGpio {
    pins: [Option<Flex<'static>>; GPIO_COUNT],
}

impl Default for RpGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl RpGpio {
    /// Create an empty bank
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT],
        }
    }

    /// Add a pin to the bank under its GPIO number
    ///
    /// The pin starts as a floating input.
    pub fn insert(&mut self, pin_num: PinNum, pin: Peri<'static, AnyPin>) -> Result<(), PinError> {
        let slot = self
            .pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?;
        if slot.is_some() {
            return Err(PinError::AlreadyTaken);
        }

        let mut flex = Flex::new(pin);
        flex.set_as_input();
        *slot = Some(flex);
        Ok(())
    }

    /// Check if a pin number is in the bank
    pub fn contains(&self, pin_num: PinNum) -> bool {
        matches!(self.pins.get(pin_num as usize), Some(Some(_)))
    }

    fn flex(&mut self, pin_num: PinNum) -> Option<&mut Flex<'static>> {
        self.pins.get_mut(pin_num as usize)?.as_mut()
    }
}

impl RawGpio for RpGpio {
    fn pin_mode(&mut self, pin: PinNum, bits: u8) {
        match self.flex(pin) {
            Some(flex) => apply_mode(flex, bits),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("pin_mode on GPIO {} which is not in the bank", pin);
            }
        }
    }

    fn digital_read(&mut self, pin: PinNum) -> bool {
        self.flex(pin).map(|flex| flex.is_high()).unwrap_or(false)
    }

    fn digital_write(&mut self, pin: PinNum, high: bool) {
        if let Some(flex) = self.flex(pin) {
            if high {
                flex.set_high();
            } else {
                flex.set_low();
            }
        }
    }
}

/// Set pulls and direction of `flex` from mode bits
fn apply_mode(flex: &mut Flex<'_>, bits: u8) {
    let pull = if bits & mode::PULLUP != 0 {
        Pull::Up
    } else if bits & mode::PULLDOWN != 0 {
        Pull::Down
    } else {
        Pull::None
    };
    flex.set_pull(pull);

    if bits & mode::OUTPUT != 0 {
        flex.set_as_output();
    } else {
        flex.set_as_input();
    }
}

/// Single RP2040 pin as a [`DigitalPin`]
///
/// Lets a physical pin be wrapped in a `SharedPin` and given a synthetic
/// number, e.g. to apply active-low handling in one place.
pub struct FlexPin<'d>(pub Flex<'d>);

impl<'d> FlexPin<'d> {
    /// Configure `pin` as an output, initially low
    pub fn output(pin: Peri<'d, AnyPin>) -> Self {
        let mut flex = Flex::new(pin);
        flex.set_low();
        flex.set_as_output();
        Self(flex)
    }
}

impl DigitalPin for FlexPin<'_> {
    fn set_mode(&mut self, bits: u8) {
        apply_mode(&mut self.0, bits);
    }

    fn set_level(&mut self, high: bool) {
        self.0.set_level(high.into());
    }

    fn output_level(&self) -> bool {
        self.0.is_set_high()
    }

    fn input_level(&self) -> bool {
        self.0.is_high()
    }
}
