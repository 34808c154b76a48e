//! Virtual pin registry
//!
//! Lets software-defined pins (I/O expanders, simulated pins, pins owned by
//! other drivers) be addressed through the same numeric pin API as the
//! physical GPIO bank:
//!
//! - [`PinRegistry`] - fixed-capacity slot table of virtual pins
//! - [`PinMapper`] - owning handle that claims and releases one slot
//! - [`GpioDispatch`] - `pin_mode` / `digital_read` / `digital_write` routed
//!   by pin number to hardware or to the registry
//! - [`PinAttributes`] - capability set requested from a virtual pin
//! - [`config::PinSpec`] - pin names as written in machine configuration
//!
//! Pin numbers below [`GPIO_LIMIT`] are physical. Slot `i` of the registry
//! is pin `GPIO_LIMIT + i`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod attributes;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mapper;
pub mod pin;
pub mod registry;

#[cfg(test)]
mod mock;

pub use attributes::PinAttributes;
pub use dispatch::GpioDispatch;
pub use error::MapError;
pub use mapper::PinMapper;
pub use pin::VirtualPin;
pub use registry::{is_virtual, PinRegistry, DEFAULT_CAPACITY, GPIO_LIMIT};

pub use pinmap_hal::{mode, PinNum};
