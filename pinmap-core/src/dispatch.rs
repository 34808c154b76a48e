//! Number-keyed pin access for physical and virtual pins
//!
//! [`GpioDispatch`] is the single entry point for code that addresses pins
//! by number. Numbers below [`GPIO_LIMIT`] go straight to the raw GPIO
//! bank; anything above is looked up in the registry. Callers never need
//! to know which kind of pin they are talking to.
//!
//! Access to a synthetic number whose slot is empty is not an error:
//! reads return low, writes and mode changes are dropped.

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use pinmap_hal::{PinNum, RawGpio};

use crate::attributes::PinAttributes;
use crate::registry::{PinRegistry, DEFAULT_CAPACITY, GPIO_LIMIT};

/// Routes pin operations to hardware or to the registry
pub struct GpioDispatch<'r, 'p, G, M: RawMutex = NoopRawMutex, const N: usize = DEFAULT_CAPACITY>
{
    gpio: G,
    registry: &'r PinRegistry<'p, M, N>,
}

impl<'r, 'p, G: RawGpio, M: RawMutex, const N: usize> GpioDispatch<'r, 'p, G, M, N> {
    /// Create a dispatcher over a raw GPIO bank and a registry
    pub fn new(gpio: G, registry: &'r PinRegistry<'p, M, N>) -> Self {
        Self { gpio, registry }
    }

    /// Configure a pin from [`mode`](pinmap_hal::mode) bits
    ///
    /// Physical pins receive the bits unchanged. Virtual pins receive the
    /// equivalent [`PinAttributes`].
    pub fn pin_mode(&mut self, pin: PinNum, mode: u8) {
        if pin < GPIO_LIMIT {
            self.gpio.pin_mode(pin, mode);
            return;
        }

        match self.registry.lookup(pin) {
            Some(virtual_pin) => virtual_pin.set_attributes(PinAttributes::from_mode_bits(mode)),
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("pin_mode on unmapped pin {}", pin);
            }
        }
    }

    /// Read the level of a pin
    ///
    /// Unmapped virtual pins read low.
    pub fn digital_read(&mut self, pin: PinNum) -> bool {
        if pin < GPIO_LIMIT {
            return self.gpio.digital_read(pin);
        }

        self.registry
            .lookup(pin)
            .map(|virtual_pin| virtual_pin.read())
            .unwrap_or(false)
    }

    /// Drive a pin high or low
    pub fn digital_write(&mut self, pin: PinNum, high: bool) {
        if pin < GPIO_LIMIT {
            self.gpio.digital_write(pin, high);
            return;
        }

        match self.registry.lookup(pin) {
            Some(virtual_pin) => virtual_pin.write(high),
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("digital_write on unmapped pin {}", pin);
            }
        }
    }

    /// Registry used for virtual pins
    pub fn registry(&self) -> &'r PinRegistry<'p, M, N> {
        self.registry
    }

    /// Raw GPIO bank
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Raw GPIO bank (mutable)
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Give back the raw GPIO bank
    pub fn into_inner(self) -> G {
        self.gpio
    }
}
