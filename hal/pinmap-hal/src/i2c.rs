//! Minimal I2C master interface
//!
//! Port expanders only ever move whole port bytes, so the bus needs plain
//! addressed reads and writes and nothing else.

/// Blocking I2C master
///
/// Addresses are 7-bit. Implementations must not retry on their own; the
/// expander keeps its shadow dirty and retries on the next flush.
pub trait I2cBus {
    /// Bus failure reported by the implementation
    type Error;

    /// Send `data` to the device at `address`
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` from the device at `address`
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(address, buf)
    }
}

/// Bus clock for PCF8574-class expanders (fast mode, 400 kHz)
pub const EXPANDER_BUS_HZ: u32 = 400_000;
