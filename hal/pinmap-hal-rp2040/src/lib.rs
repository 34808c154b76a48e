//! RP2040-specific HAL for the pinmap registry
//!
//! Implements the `pinmap-hal` traits on top of `embassy-rp`:
//!
//! - [`gpio::PinBank`] - free pads taken by configured GPIO number
//! - [`gpio::RpGpio`] - number-keyed access to the physical pin bank
//! - [`gpio::FlexPin`] - a single pin usable as a `pinmap_hal::DigitalPin`

#![no_std]

pub mod gpio;

pub use gpio::{FlexPin, PinBank, PinError, RpGpio, GPIO_COUNT};
