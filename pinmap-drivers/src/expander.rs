//! I2C port expander pins
//!
//! Supports PCF8574-style 8-bit quasi-bidirectional expanders. The chip
//! has no direction register: a bit written low pulls the line down, a bit
//! written high releases it (weak pull-up) so it can be read as an input.
//!
//! Pin writes only update a shadow of the output port, so they are cheap
//! enough for interrupt context. [`PortExpander::flush`] pushes the shadow
//! to the chip and [`PortExpander::refresh`] fetches the input port; both
//! run from a task that owns the bus.

use core::cell::Cell;
use core::fmt;
use core::sync::atomic::{AtomicU16, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use pinmap_core::{PinAttributes, VirtualPin};
use pinmap_hal::I2cBus;

/// Number of pins on the expander
pub const EXPANDER_PINS: u8 = 8;

/// Default 7-bit address of a PCF8574 with A0-A2 tied low
pub const DEFAULT_ADDRESS: u8 = 0x20;

/// Expander error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExpanderError {
    /// Bit number is not on the expander
    InvalidPin(u8),
}

impl fmt::Display for ExpanderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpanderError::InvalidPin(bit) => write!(
                f,
                "expander pin {} out of range (0-{})",
                bit,
                EXPANDER_PINS - 1
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PortState {
    /// Shadow of the output port
    output: u8,
    /// Last input port value read from the chip
    input: u8,
    /// Shadow differs from what the chip holds
    dirty: bool,
}

/// 8-bit I2C port expander
pub struct PortExpander<M: RawMutex> {
    address: u8,
    state: Mutex<M, Cell<PortState>>,
}

impl<M: RawMutex> PortExpander<M> {
    /// Create an expander at a 7-bit I2C address
    ///
    /// Starts with every line released (all ones), the chip's power-on
    /// state. Nothing is written until the first [`flush`](Self::flush).
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            state: Mutex::new(Cell::new(PortState {
                output: 0xFF,
                input: 0xFF,
                dirty: false,
            })),
        }
    }

    /// I2C address of the chip
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Get the pin for one bit of the port
    ///
    /// # Errors
    /// [`ExpanderError::InvalidPin`] if `bit` is 8 or more.
    pub fn pin(&self, bit: u8) -> Result<ExpanderPin<'_, M>, ExpanderError> {
        if bit >= EXPANDER_PINS {
            return Err(ExpanderError::InvalidPin(bit));
        }
        Ok(ExpanderPin {
            expander: self,
            bit,
            attributes: AtomicU16::new(PinAttributes::NONE.bits()),
        })
    }

    /// Current shadow of the output port
    pub fn output_port(&self) -> u8 {
        self.state.lock(|state| state.get().output)
    }

    /// Input port as of the last [`refresh`](Self::refresh)
    pub fn input_port(&self) -> u8 {
        self.state.lock(|state| state.get().input)
    }

    /// Check if the shadow has changes not yet written to the chip
    pub fn is_dirty(&self) -> bool {
        self.state.lock(|state| state.get().dirty)
    }

    /// Write the output shadow to the chip if it changed
    ///
    /// Returns `true` if a write was issued. On a bus error the shadow stays
    /// dirty so the next flush retries.
    pub fn flush<B: I2cBus>(&self, bus: &mut B) -> Result<bool, B::Error> {
        let pending = self.state.lock(|state| {
            let mut s = state.get();
            if !s.dirty {
                return None;
            }
            s.dirty = false;
            state.set(s);
            Some(s.output)
        });

        let Some(output) = pending else {
            return Ok(false);
        };

        if let Err(e) = bus.write(self.address, &[output]) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Expander {=u8:#x} write failed", self.address);
            self.mark_dirty();
            return Err(e);
        }
        Ok(true)
    }

    /// Read the input port from the chip
    pub fn refresh<B: I2cBus>(&self, bus: &mut B) -> Result<u8, B::Error> {
        let mut buf = [0u8; 1];
        bus.read(self.address, &mut buf)?;
        self.state.lock(|state| {
            let mut s = state.get();
            s.input = buf[0];
            state.set(s);
        });
        Ok(buf[0])
    }

    fn mark_dirty(&self) {
        self.state.lock(|state| {
            let mut s = state.get();
            s.dirty = true;
            state.set(s);
        });
    }

    fn set_output_bit(&self, bit: u8, high: bool) {
        self.state.lock(|state| {
            let mut s = state.get();
            let output = if high {
                s.output | (1 << bit)
            } else {
                s.output & !(1 << bit)
            };
            if output != s.output {
                s.output = output;
                s.dirty = true;
                state.set(s);
            }
        });
    }
}

/// One bit of a [`PortExpander`]
pub struct ExpanderPin<'e, M: RawMutex> {
    expander: &'e PortExpander<M>,
    bit: u8,
    /// Attribute bits; plain load/store only, thumbv6m has no CAS
    attributes: AtomicU16,
}

impl<M: RawMutex> ExpanderPin<'_, M> {
    /// Bit number on the port
    pub fn bit(&self) -> u8 {
        self.bit
    }

    /// Attributes last applied
    pub fn attributes(&self) -> PinAttributes {
        PinAttributes::from_bits_truncate(self.attributes.load(Ordering::Relaxed))
    }

    fn active_low(&self) -> bool {
        self.attributes().contains(PinAttributes::ACTIVE_LOW)
    }

    fn is_input(&self) -> bool {
        let attributes = self.attributes();
        attributes.contains(PinAttributes::INPUT) && !attributes.contains(PinAttributes::OUTPUT)
    }
}

impl<M: RawMutex + Sync> VirtualPin for ExpanderPin<'_, M> {
    fn write(&self, high: bool) {
        self.expander
            .set_output_bit(self.bit, high != self.active_low());
    }

    fn read(&self) -> bool {
        let port = if self.is_input() {
            self.expander.input_port()
        } else {
            self.expander.output_port()
        };
        let level = port & (1 << self.bit) != 0;
        level != self.active_low()
    }

    fn set_attributes(&self, attributes: PinAttributes) {
        self.attributes.store(attributes.bits(), Ordering::Relaxed);
        if attributes.contains(PinAttributes::OUTPUT) {
            self.write(attributes.contains(PinAttributes::INITIAL_ON));
        } else if attributes.contains(PinAttributes::INPUT) {
            // Quasi-bidirectional: release the line so it can be read
            self.expander.set_output_bit(self.bit, true);
        }
    }
}
