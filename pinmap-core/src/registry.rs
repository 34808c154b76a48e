//! Virtual pin registry
//!
//! Fixed-capacity slot table that hands out synthetic pin numbers above the
//! physical GPIO range. Slot `i` is addressed as pin `i + GPIO_LIMIT`.
//!
//! Slots are only claimed and released through [`PinMapper`](crate::PinMapper);
//! dispatch code reads them with [`PinRegistry::lookup`]. Lookups copy the
//! stored reference out of the lock and never scan the table, so they are
//! bounded and allocation-free.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use pinmap_hal::PinNum;

use crate::pin::VirtualPin;

/// First pin number not backed by physical hardware
pub const GPIO_LIMIT: PinNum = 64;

/// Default number of virtual pin slots
///
/// `GPIO_LIMIT + DEFAULT_CAPACITY` covers the whole `u8` pin number space.
pub const DEFAULT_CAPACITY: usize = 192;

/// True if `pin` lies in the synthetic part of the address space
pub const fn is_virtual(pin: PinNum) -> bool {
    pin >= GPIO_LIMIT
}

type Slot<'p> = Cell<Option<&'p dyn VirtualPin>>;

/// Slot table mapping synthetic pin numbers to virtual pins
///
/// `M` selects the locking discipline. [`NoopRawMutex`] is enough when
/// claim, release and dispatch all run in one execution context. With
/// `CriticalSectionRawMutex` the registry is `Sync`, so it can be a
/// `static` shared with interrupt handlers that dispatch while setup code
/// claims slots.
pub struct PinRegistry<'p, M: RawMutex = NoopRawMutex, const N: usize = DEFAULT_CAPACITY> {
    slots: Mutex<M, [Slot<'p>; N]>,
}

impl<'p, M: RawMutex, const N: usize> Default for PinRegistry<'p, M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p, M: RawMutex, const N: usize> PinRegistry<'p, M, N> {
    const FITS_PIN_NUM: () = assert!(
        N + GPIO_LIMIT as usize <= PinNum::MAX as usize + 1,
        "registry capacity exceeds the pin number space"
    );

    /// Create an empty registry
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS_PIN_NUM;
        Self {
            slots: Mutex::new([const { Cell::new(None) }; N]),
        }
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of occupied slots
    pub fn claimed(&self) -> usize {
        self.slots
            .lock(|slots| slots.iter().filter(|slot| slot.get().is_some()).count())
    }

    /// Check if a synthetic pin number currently has a pin behind it
    pub fn is_claimed(&self, id: PinNum) -> bool {
        self.lookup(id).is_some()
    }

    /// Get the pin stored for a synthetic pin number
    ///
    /// Returns `None` for empty slots and for numbers outside the table,
    /// including physical pin numbers.
    pub fn lookup(&self, id: PinNum) -> Option<&'p dyn VirtualPin> {
        let index = Self::slot_index(id)?;
        self.slots.lock(|slots| slots[index].get())
    }

    /// Store `pin` in the lowest free slot and return its pin number
    ///
    /// Returns `None` when every slot is occupied.
    pub(crate) fn claim(&self, pin: &'p dyn VirtualPin) -> Option<PinNum> {
        let index = self.slots.lock(|slots| {
            let index = slots.iter().position(|slot| slot.get().is_none())?;
            slots[index].set(Some(pin));
            Some(index)
        });

        match index {
            Some(index) => {
                // Fits: checked against N at compile time
                let id = index as PinNum + GPIO_LIMIT;
                #[cfg(feature = "defmt")]
                defmt::debug!("Claimed virtual pin {}", id);
                Some(id)
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::error!("No free virtual pin slot ({} in use)", N);
                None
            }
        }
    }

    /// Empty the slot behind `id`
    ///
    /// Releasing an empty slot or a number outside the table does nothing.
    pub(crate) fn release(&self, id: PinNum) {
        if let Some(index) = Self::slot_index(id) {
            self.slots.lock(|slots| slots[index].set(None));
            #[cfg(feature = "defmt")]
            defmt::debug!("Released virtual pin {}", id);
        }
    }

    fn slot_index(id: PinNum) -> Option<usize> {
        let index = id.checked_sub(GPIO_LIMIT)? as usize;
        (index < N).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingPin;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use proptest::prelude::*;

    type TestRegistry<'p> = PinRegistry<'p, NoopRawMutex, 4>;

    fn same_pin(a: &dyn VirtualPin, b: &dyn VirtualPin) -> bool {
        core::ptr::addr_eq(a as *const dyn VirtualPin, b as *const dyn VirtualPin)
    }

    #[test]
    fn test_first_claim_is_gpio_limit() {
        let pin = RecordingPin::new();
        let registry = TestRegistry::new();

        assert_eq!(registry.claim(&pin), Some(GPIO_LIMIT));
        assert!(registry.is_claimed(GPIO_LIMIT));
        assert_eq!(registry.claimed(), 1);
    }

    #[test]
    fn test_claims_are_sequential() {
        let pins = [
            RecordingPin::new(),
            RecordingPin::new(),
            RecordingPin::new(),
        ];
        let registry = TestRegistry::new();

        for (i, pin) in pins.iter().enumerate() {
            assert_eq!(registry.claim(pin), Some(GPIO_LIMIT + i as PinNum));
        }
    }

    #[test]
    fn test_lookup_returns_claimed_pin() {
        let a = RecordingPin::new();
        let b = RecordingPin::new();
        let registry = TestRegistry::new();

        let id_a = registry.claim(&a).unwrap();
        let id_b = registry.claim(&b).unwrap();

        assert!(same_pin(registry.lookup(id_a).unwrap(), &a));
        assert!(same_pin(registry.lookup(id_b).unwrap(), &b));
    }

    #[test]
    fn test_release_reuses_lowest_slot() {
        let pins = [
            RecordingPin::new(),
            RecordingPin::new(),
            RecordingPin::new(),
        ];
        let registry = TestRegistry::new();

        for pin in &pins {
            registry.claim(pin).unwrap();
        }

        registry.release(GPIO_LIMIT + 2);
        registry.release(GPIO_LIMIT);
        assert_eq!(registry.claimed(), 1);

        // Lowest free index first
        assert_eq!(registry.claim(&pins[0]), Some(GPIO_LIMIT));
        assert_eq!(registry.claim(&pins[2]), Some(GPIO_LIMIT + 2));
    }

    #[test]
    fn test_claim_when_full() {
        let pin = RecordingPin::new();
        let registry = TestRegistry::new();

        for _ in 0..registry.capacity() {
            assert!(registry.claim(&pin).is_some());
        }

        assert_eq!(registry.claim(&pin), None);
        assert_eq!(registry.claim(&pin), None);
        assert_eq!(registry.claimed(), 4);
    }

    #[test]
    fn test_lookup_outside_table() {
        let pin = RecordingPin::new();
        let registry = TestRegistry::new();
        registry.claim(&pin).unwrap();

        // Physical pins and numbers past the last slot are never claimed
        assert!(registry.lookup(0).is_none());
        assert!(registry.lookup(GPIO_LIMIT - 1).is_none());
        assert!(registry.lookup(GPIO_LIMIT + 4).is_none());
        assert!(registry.lookup(PinNum::MAX).is_none());

        // Releasing outside the table is harmless
        registry.release(3);
        registry.release(PinNum::MAX);
        assert_eq!(registry.claimed(), 1);
    }

    #[test]
    fn test_default_capacity_covers_pin_space() {
        let pin = RecordingPin::new();
        let registry: PinRegistry<'_> = PinRegistry::new();

        for _ in 0..DEFAULT_CAPACITY - 1 {
            registry.claim(&pin).unwrap();
        }

        assert_eq!(registry.claim(&pin), Some(PinNum::MAX));
        assert_eq!(registry.claim(&pin), None);
    }

    #[test]
    fn test_critical_section_registry_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<PinRegistry<'static, CriticalSectionRawMutex>>();
        assert_sync::<PinRegistry<'static, CriticalSectionRawMutex, 8>>();
    }

    #[test]
    fn test_static_registry_reached_from_another_context() {
        static PIN: RecordingPin = RecordingPin::new();
        static REGISTRY: PinRegistry<'static, CriticalSectionRawMutex, 4> = PinRegistry::new();

        let id = REGISTRY.claim(&PIN).unwrap();
        std::thread::spawn(move || {
            if let Some(pin) = REGISTRY.lookup(id) {
                pin.write(true);
            }
        })
        .join()
        .unwrap();

        assert_eq!(PIN.writes(), [true]);
        REGISTRY.release(id);
        assert_eq!(REGISTRY.claimed(), 0);
    }

    #[test]
    fn test_is_virtual() {
        assert!(!is_virtual(0));
        assert!(!is_virtual(GPIO_LIMIT - 1));
        assert!(is_virtual(GPIO_LIMIT));
        assert!(is_virtual(PinNum::MAX));
    }

    proptest! {
        #[test]
        fn prop_claims_unique_increasing(count in 1usize..=DEFAULT_CAPACITY) {
            let pin = RecordingPin::new();
            let registry: PinRegistry<'_> = PinRegistry::new();

            let mut previous = None;
            for _ in 0..count {
                let id = registry.claim(&pin).unwrap();
                prop_assert_ne!(id, 0);
                if let Some(previous) = previous {
                    prop_assert_eq!(id, previous + 1);
                }
                previous = Some(id);
            }
            prop_assert_eq!(registry.claimed(), count);
        }

        #[test]
        fn prop_release_then_claim_returns_same_id(
            count in 1usize..=16,
            victim in 0usize..16,
        ) {
            let victim = victim % count;
            let pin = RecordingPin::new();
            let registry = PinRegistry::<NoopRawMutex, 16>::new();

            for _ in 0..count {
                registry.claim(&pin).unwrap();
            }

            let id = GPIO_LIMIT + victim as PinNum;
            registry.release(id);
            prop_assert!(!registry.is_claimed(id));
            prop_assert_eq!(registry.claim(&pin), Some(id));
        }
    }
}
