//! Simulated pin
//!
//! A virtual pin with no hardware behind it. Useful for dry runs, for
//! loop-back testing of code that only knows pin numbers, and as a
//! placeholder while real hardware is being brought up.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use pinmap_core::{PinAttributes, VirtualPin};

/// Pin whose level lives in memory
///
/// As an output it latches whatever is written. As an input it reports the
/// level set with [`SimulatedPin::drive`], or the pull resistor's level
/// while nothing drives it.
#[derive(Debug, Default)]
pub struct SimulatedPin {
    /// Electrical level latched by the last write
    output: AtomicBool,
    /// Externally driven level (only meaningful while `driven`)
    external: AtomicBool,
    driven: AtomicBool,
    attributes: AtomicU16,
}

impl SimulatedPin {
    /// Create a floating pin with no attributes
    pub const fn new() -> Self {
        Self {
            output: AtomicBool::new(false),
            external: AtomicBool::new(false),
            driven: AtomicBool::new(false),
            attributes: AtomicU16::new(0),
        }
    }

    /// Simulate an external signal on the pin (electrical level)
    pub fn drive(&self, high: bool) {
        self.external.store(high, Ordering::Relaxed);
        self.driven.store(true, Ordering::Relaxed);
    }

    /// Stop driving the pin externally
    pub fn float(&self) {
        self.driven.store(false, Ordering::Relaxed);
    }

    /// Electrical level currently latched by the output
    pub fn output_level(&self) -> bool {
        self.output.load(Ordering::Relaxed)
    }

    /// Attributes last applied
    pub fn attributes(&self) -> PinAttributes {
        PinAttributes::from_bits_truncate(self.attributes.load(Ordering::Relaxed))
    }

    fn active_low(&self) -> bool {
        self.attributes().contains(PinAttributes::ACTIVE_LOW)
    }

    /// Electrical level seen on the pin
    fn electrical_level(&self) -> bool {
        let attributes = self.attributes();
        if attributes.contains(PinAttributes::INPUT) {
            if self.driven.load(Ordering::Relaxed) {
                return self.external.load(Ordering::Relaxed);
            }
            if attributes.contains(PinAttributes::PULL_UP) {
                return true;
            }
            if attributes.contains(PinAttributes::PULL_DOWN) {
                return false;
            }
        }
        self.output_level()
    }
}

impl VirtualPin for SimulatedPin {
    fn write(&self, high: bool) {
        self.output.store(high != self.active_low(), Ordering::Relaxed);
    }

    fn read(&self) -> bool {
        self.electrical_level() != self.active_low()
    }

    fn set_attributes(&self, attributes: PinAttributes) {
        self.attributes.store(attributes.bits(), Ordering::Relaxed);
        if attributes.contains(PinAttributes::OUTPUT) {
            self.write(attributes.contains(PinAttributes::INITIAL_ON));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinmap_core::{mode, GpioDispatch, PinMapper, PinRegistry};
    use pinmap_hal::{PinNum, RawGpio};

    struct NoGpio;

    impl RawGpio for NoGpio {
        fn pin_mode(&mut self, _pin: PinNum, _mode: u8) {}

        fn digital_read(&mut self, _pin: PinNum) -> bool {
            false
        }

        fn digital_write(&mut self, _pin: PinNum, _high: bool) {}
    }

    #[test]
    fn test_output_latches_writes() {
        let pin = SimulatedPin::new();
        pin.set_attributes(PinAttributes::OUTPUT);

        pin.write(true);
        assert!(pin.read());
        assert!(pin.output_level());

        pin.write(false);
        assert!(!pin.read());
    }

    #[test]
    fn test_active_low_inverts() {
        let pin = SimulatedPin::new();
        pin.set_attributes(PinAttributes::OUTPUT | PinAttributes::ACTIVE_LOW);

        // Turning off an active-low output drives the line high
        assert!(pin.output_level());

        pin.write(true);
        assert!(!pin.output_level());
        assert!(pin.read());
    }

    #[test]
    fn test_initial_on() {
        let pin = SimulatedPin::new();
        pin.set_attributes(PinAttributes::OUTPUT | PinAttributes::INITIAL_ON);
        assert!(pin.read());
    }

    #[test]
    fn test_input_pulls() {
        let pin = SimulatedPin::new();

        pin.set_attributes(PinAttributes::INPUT | PinAttributes::PULL_UP);
        assert!(pin.read());

        pin.set_attributes(PinAttributes::INPUT | PinAttributes::PULL_DOWN);
        assert!(!pin.read());
    }

    #[test]
    fn test_input_follows_external_signal() {
        let pin = SimulatedPin::new();
        pin.set_attributes(PinAttributes::INPUT | PinAttributes::PULL_UP);

        pin.drive(false);
        assert!(!pin.read());

        pin.float();
        assert!(pin.read());
    }

    #[test]
    fn test_attributes_round_trip() {
        let pin = SimulatedPin::new();
        let attributes = PinAttributes::INPUT | PinAttributes::ACTIVE_LOW;
        pin.set_attributes(attributes);
        assert_eq!(pin.attributes(), attributes);
    }

    #[test]
    fn test_through_dispatch() {
        let pin = SimulatedPin::new();
        let registry: PinRegistry<'_> = PinRegistry::new();
        let mapper = PinMapper::new(&registry, &pin);
        let id = mapper.pin_num().unwrap();
        let mut dispatch = GpioDispatch::new(NoGpio, &registry);

        dispatch.pin_mode(id, mode::INPUT_PULLUP);
        assert!(dispatch.digital_read(id));
        pin.drive(false);
        assert!(!dispatch.digital_read(id));

        dispatch.pin_mode(id, mode::OUTPUT);
        dispatch.digital_write(id, true);
        assert!(pin.output_level());
    }
}
