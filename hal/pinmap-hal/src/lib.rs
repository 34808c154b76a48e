//! Pinmap Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the virtual pin registry sits on
//! top of. Chip-specific crates (RP2040, ...) implement them so the same
//! registry and drivers run unchanged on every board.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pinmap-core (registry + dispatch)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinmap-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  pinmap-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::DigitalPin`] - A single pin owned by a chip HAL
//! - [`gpio::RawGpio`] - Number-keyed access to the physical pin bank
//! - [`i2c::I2cBus`] - I2C bus operations (used by port expanders)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::{mode, DigitalPin, PinNum, RawGpio};
pub use i2c::I2cBus;
