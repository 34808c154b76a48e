//! Test doubles shared by the unit tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use pinmap_hal::{PinNum, RawGpio};

use crate::attributes::PinAttributes;
use crate::pin::VirtualPin;

/// Virtual pin that records what was done to it
pub struct RecordingPin {
    level: AtomicBool,
    writes: Mutex<Vec<bool>>,
    attributes: Mutex<Option<PinAttributes>>,
}

impl RecordingPin {
    pub const fn new() -> Self {
        Self {
            level: AtomicBool::new(false),
            writes: Mutex::new(Vec::new()),
            attributes: Mutex::new(None),
        }
    }

    pub fn with_level(level: bool) -> Self {
        let pin = Self::new();
        pin.level.store(level, Ordering::Relaxed);
        pin
    }

    /// Every level written so far, oldest first
    pub fn writes(&self) -> Vec<bool> {
        self.writes.lock().unwrap().clone()
    }

    /// Attributes last applied, if any
    pub fn attributes(&self) -> Option<PinAttributes> {
        *self.attributes.lock().unwrap()
    }
}

impl VirtualPin for RecordingPin {
    fn write(&self, high: bool) {
        self.level.store(high, Ordering::Relaxed);
        self.writes.lock().unwrap().push(high);
    }

    fn read(&self) -> bool {
        self.level.load(Ordering::Relaxed)
    }

    fn set_attributes(&self, attributes: PinAttributes) {
        *self.attributes.lock().unwrap() = Some(attributes);
    }
}

/// One call into [`MockGpio`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioCall {
    Mode(PinNum, u8),
    Read(PinNum),
    Write(PinNum, bool),
}

/// Raw GPIO bank that records every call
pub struct MockGpio {
    pub calls: Vec<GpioCall>,
    pub levels: [bool; 64],
}

impl MockGpio {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            levels: [false; 64],
        }
    }
}

impl RawGpio for MockGpio {
    fn pin_mode(&mut self, pin: PinNum, mode: u8) {
        self.calls.push(GpioCall::Mode(pin, mode));
    }

    fn digital_read(&mut self, pin: PinNum) -> bool {
        self.calls.push(GpioCall::Read(pin));
        self.levels[pin as usize]
    }

    fn digital_write(&mut self, pin: PinNum, high: bool) {
        self.calls.push(GpioCall::Write(pin, high));
        self.levels[pin as usize] = high;
    }
}
