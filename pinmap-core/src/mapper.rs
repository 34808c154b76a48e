//! Owning handle for one registry slot
//!
//! A [`PinMapper`] is the only way to claim or release a slot. Creating one
//! from a pin claims the lowest free slot; dropping or overwriting it
//! releases that slot again. The handle is move-only, so a slot never has
//! two owners.

use core::fmt;

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use pinmap_hal::PinNum;

use crate::error::MapError;
use crate::pin::VirtualPin;
use crate::registry::{PinRegistry, DEFAULT_CAPACITY};

/// Exclusive owner of a synthetic pin number
///
/// # Example
///
/// ```
/// use core::sync::atomic::{AtomicBool, Ordering};
/// use pinmap_core::{PinAttributes, PinMapper, PinRegistry, VirtualPin};
///
/// struct Led(AtomicBool);
///
/// impl VirtualPin for Led {
///     fn write(&self, high: bool) { self.0.store(high, Ordering::Relaxed) }
///     fn read(&self) -> bool { self.0.load(Ordering::Relaxed) }
///     fn set_attributes(&self, _: PinAttributes) {}
/// }
///
/// let led = Led(AtomicBool::new(false));
/// let registry: PinRegistry<'_> = PinRegistry::new();
///
/// let mapper = PinMapper::new(&registry, &led);
/// assert_eq!(mapper.pin_num(), Some(64));
///
/// drop(mapper);
/// assert_eq!(registry.claimed(), 0);
/// ```
pub struct PinMapper<'r, 'p, M: RawMutex = NoopRawMutex, const N: usize = DEFAULT_CAPACITY> {
    registry: &'r PinRegistry<'p, M, N>,
    id: Option<PinNum>,
}

impl<'r, 'p, M: RawMutex, const N: usize> PinMapper<'r, 'p, M, N> {
    /// Create a handle that owns nothing
    ///
    /// Does not touch the registry.
    pub const fn unassigned(registry: &'r PinRegistry<'p, M, N>) -> Self {
        Self { registry, id: None }
    }

    /// Claim a slot for `pin`
    ///
    /// # Errors
    /// [`MapError::Exhausted`] if every slot is in use.
    pub fn try_new(
        registry: &'r PinRegistry<'p, M, N>,
        pin: &'p dyn VirtualPin,
    ) -> Result<Self, MapError> {
        let id = registry
            .claim(pin)
            .ok_or(MapError::Exhausted { capacity: N })?;
        Ok(Self {
            registry,
            id: Some(id),
        })
    }

    /// Claim a slot for `pin`, treating exhaustion as fatal
    ///
    /// Running out of slots is a configuration error: carrying on with an
    /// unmapped pin would silently swallow every later access to it.
    ///
    /// # Panics
    /// If every slot is in use.
    pub fn new(registry: &'r PinRegistry<'p, M, N>, pin: &'p dyn VirtualPin) -> Self {
        match Self::try_new(registry, pin) {
            Ok(mapper) => mapper,
            Err(e) => panic!("{}", e),
        }
    }

    /// Synthetic pin number owned by this handle
    pub fn pin_num(&self) -> Option<PinNum> {
        self.id
    }

    /// Check if this handle owns a slot
    pub fn is_assigned(&self) -> bool {
        self.id.is_some()
    }

    /// Move the slot out into a new handle, leaving `self` unassigned
    pub fn take(&mut self) -> Self {
        Self {
            registry: self.registry,
            id: self.id.take(),
        }
    }

    /// Release the slot owned by `self` (if any) and adopt `other`'s
    ///
    /// `other` is left unassigned. Its slot is not released.
    pub fn assign_from(&mut self, other: &mut Self) {
        self.reset();
        self.id = other.id.take();
    }

    /// Release the owned slot, if any
    pub fn reset(&mut self) {
        if let Some(id) = self.id.take() {
            self.registry.release(id);
        }
    }
}

impl<M: RawMutex, const N: usize> Drop for PinMapper<'_, '_, M, N> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<M: RawMutex, const N: usize> fmt::Debug for PinMapper<'_, '_, M, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinMapper").field("id", &self.id).finish()
    }
}

#[cfg(feature = "defmt")]
impl<M: RawMutex, const N: usize> defmt::Format for PinMapper<'_, '_, M, N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PinMapper {{ id: {} }}", self.id);
    }
}
