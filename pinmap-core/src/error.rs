//! Error types

use core::fmt;

/// Failure to map a virtual pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MapError {
    /// Every slot of the registry is in use
    Exhausted {
        /// Number of slots in the registry
        capacity: usize,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Exhausted { capacity } => write!(
                f,
                "cannot claim pin: all {} virtual pin slots are in use",
                capacity
            ),
        }
    }
}
