//! Virtual pin trait
//!
//! Anything that behaves like a digital pin can be registered: expander
//! channels, simulated pins, pins borrowed from other drivers.

use crate::attributes::PinAttributes;

/// Pin-like object reachable through a synthetic pin number
///
/// All methods take `&self` because the registry only holds shared
/// references. Implementations that need mutation use atomics or a
/// blocking mutex. `write` and `read` may be called from interrupt context
/// and must not block.
///
/// Pins must be `Sync` so a registry locked with `CriticalSectionRawMutex`
/// can live in a `static` and be reached from interrupt handlers.
pub trait VirtualPin: Sync {
    /// Set the logical level of the pin
    fn write(&self, high: bool);

    /// Read the logical level of the pin
    fn read(&self) -> bool;

    /// Apply a requested attribute set (direction, pulls, polarity)
    fn set_attributes(&self, attributes: PinAttributes);
}

impl<T: VirtualPin + ?Sized> VirtualPin for &T {
    fn write(&self, high: bool) {
        (**self).write(high)
    }

    fn read(&self) -> bool {
        (**self).read()
    }

    fn set_attributes(&self, attributes: PinAttributes) {
        (**self).set_attributes(attributes)
    }
}
