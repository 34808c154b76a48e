//! HAL pin shared through the registry
//!
//! HAL pins take `&mut self`, the registry only hands out `&self`. A
//! [`SharedPin`] owns the HAL pin behind a blocking mutex so it can be
//! registered and reached by number like any other virtual pin.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use pinmap_core::{PinAttributes, VirtualPin};
use pinmap_hal::DigitalPin;

struct Inner<P> {
    pin: P,
    attributes: PinAttributes,
}

impl<P: DigitalPin> Inner<P> {
    fn active_low(&self) -> bool {
        self.attributes.contains(PinAttributes::ACTIVE_LOW)
    }
}

/// Virtual pin wrapping a HAL pin
///
/// The pin and its attributes share one lock, so a level is always
/// translated with the polarity in force when it reaches the pad.
pub struct SharedPin<M: RawMutex, P> {
    inner: Mutex<M, RefCell<Inner<P>>>,
}

impl<M: RawMutex, P: DigitalPin> SharedPin<M, P> {
    /// Wrap a HAL pin
    pub const fn new(pin: P) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                pin,
                attributes: PinAttributes::NONE,
            })),
        }
    }

    /// Attributes last applied
    pub fn attributes(&self) -> PinAttributes {
        self.inner.lock(|inner| inner.borrow().attributes)
    }

    /// Run `f` with exclusive access to the wrapped pin
    pub fn with_pin<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        self.inner.lock(|inner| f(&mut inner.borrow_mut().pin))
    }

    /// Give back the wrapped pin
    pub fn into_inner(self) -> P {
        self.inner.into_inner().into_inner().pin
    }
}

impl<M, P> VirtualPin for SharedPin<M, P>
where
    M: RawMutex + Sync,
    P: DigitalPin + Send,
{
    fn write(&self, high: bool) {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let level = high != inner.active_low();
            inner.pin.set_level(level);
        });
    }

    fn read(&self) -> bool {
        self.inner.lock(|inner| {
            let inner = inner.borrow();
            inner.pin.input_level() != inner.active_low()
        })
    }

    /// Apply direction and pulls to the HAL pin
    ///
    /// Outputs get their initial level before the direction changes so the
    /// pad never glitches through the wrong state.
    fn set_attributes(&self, attributes: PinAttributes) {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            inner.attributes = attributes;
            if attributes.contains(PinAttributes::OUTPUT) {
                let level = attributes.contains(PinAttributes::INITIAL_ON) != inner.active_low();
                inner.pin.set_level(level);
            }
            inner.pin.set_mode(attributes.to_mode_bits());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use pinmap_core::{mode, GpioDispatch, PinMapper, PinRegistry};
    use pinmap_hal::{PinNum, RawGpio};

    type TestPin = SharedPin<CriticalSectionRawMutex, MockPin>;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
        mode: Option<u8>,
        writes: usize,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                mode: None,
                writes: 0,
            }
        }
    }

    impl DigitalPin for MockPin {
        fn set_mode(&mut self, bits: u8) {
            self.mode = Some(bits);
        }

        fn set_level(&mut self, high: bool) {
            self.high = high;
            self.writes += 1;
        }

        fn output_level(&self) -> bool {
            self.high
        }

        fn input_level(&self) -> bool {
            self.high
        }
    }

    struct NoGpio;

    impl RawGpio for NoGpio {
        fn pin_mode(&mut self, _pin: PinNum, _mode: u8) {}

        fn digital_read(&mut self, _pin: PinNum) -> bool {
            false
        }

        fn digital_write(&mut self, _pin: PinNum, _high: bool) {}
    }

    #[test]
    fn test_write_reaches_hal_pin() {
        let shared = TestPin::new(MockPin::new());

        shared.write(true);
        assert!(shared.with_pin(|pin| pin.output_level()));
        assert!(shared.read());

        shared.write(false);
        assert!(!shared.read());
        assert_eq!(shared.into_inner().writes, 2);
    }

    #[test]
    fn test_active_low_output() {
        let shared = TestPin::new(MockPin::new());

        // Configuring as output switches it off, which is electrical high
        shared.set_attributes(PinAttributes::OUTPUT | PinAttributes::ACTIVE_LOW);
        assert!(shared.with_pin(|pin| pin.output_level()));
        assert!(!shared.read());

        shared.write(true);
        assert!(!shared.with_pin(|pin| pin.output_level()));
        assert!(shared.read());
    }

    #[test]
    fn test_output_configuration_is_one_step() {
        let shared = TestPin::new(MockPin::new());

        shared.set_attributes(
            PinAttributes::OUTPUT | PinAttributes::ACTIVE_LOW | PinAttributes::INITIAL_ON,
        );

        // Initial level uses the new polarity and is written exactly once
        let pin = shared.into_inner();
        assert!(!pin.high);
        assert_eq!(pin.writes, 1);
        assert_eq!(pin.mode, Some(mode::OUTPUT));
    }

    #[test]
    fn test_input_attributes_reach_hal_pin() {
        let shared = TestPin::new(MockPin::new());

        shared.set_attributes(PinAttributes::INPUT | PinAttributes::PULL_UP);

        assert_eq!(
            shared.attributes(),
            PinAttributes::INPUT | PinAttributes::PULL_UP
        );
        assert_eq!(shared.with_pin(|pin| pin.mode), Some(mode::INPUT_PULLUP));
        assert_eq!(shared.with_pin(|pin| pin.writes), 0);
    }

    #[test]
    fn test_pin_mode_through_dispatch() {
        let shared = TestPin::new(MockPin::new());
        let registry: PinRegistry<'_> = PinRegistry::new();
        let mapper = PinMapper::new(&registry, &shared);
        let id = mapper.pin_num().unwrap();
        let mut dispatch = GpioDispatch::new(NoGpio, &registry);

        dispatch.pin_mode(id, mode::OUTPUT);
        assert_eq!(shared.with_pin(|pin| pin.mode), Some(mode::OUTPUT));

        dispatch.pin_mode(id, mode::INPUT_PULLDOWN);
        assert_eq!(shared.with_pin(|pin| pin.mode), Some(mode::INPUT_PULLDOWN));
    }
}
