//! Adapter from `embedded-hal` I2C to [`I2cBus`]
//!
//! Lets any chip HAL that implements `embedded_hal::i2c::I2c` drive a
//! [`PortExpander`](crate::PortExpander).

use embedded_hal::i2c::I2c;
use pinmap_hal::I2cBus;

/// `embedded-hal` I2C master usable as an [`I2cBus`]
pub struct HalI2c<B>(pub B);

impl<B: I2c> I2cBus for HalI2c<B> {
    type Error = B::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(address, buf)
    }
}
