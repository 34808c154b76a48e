//! Virtual pin implementations
//!
//! Concrete [`VirtualPin`](pinmap_core::VirtualPin) types that can be
//! registered with a `PinRegistry`:
//!
//! - [`SimulatedPin`] - level held in memory, for dry runs and tests
//! - [`SharedPin`] - a HAL pin made reachable by number
//! - [`PortExpander`] / [`ExpanderPin`] - bits of a PCF8574-style I2C expander
//! - [`HalI2c`] - any `embedded-hal` I2C master as the expander's bus

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod expander;
pub mod shared;
pub mod sim;

pub use bus::HalI2c;
pub use expander::{ExpanderError, ExpanderPin, PortExpander};
pub use shared::SharedPin;
pub use sim::SimulatedPin;
