use embedded_hal::i2c::I2c;

/// Register-level access to one device on a bus.
///
/// This is the boundary to the physical transport.  The driver never retries; timeouts and
/// retry policies belong to the implementation of this trait.
pub trait Transport {
    type Error: core::fmt::Debug;

    fn read_u8(&mut self, register: u8) -> Result<u8, Self::Error>;
    fn write_u8(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Read two consecutive registers, the first one being the high byte.
    fn read_u16_be(&mut self, register: u8) -> Result<u16, Self::Error>;
    /// Write two consecutive registers, the first one receiving the high byte.
    fn write_u16_be(&mut self, register: u8, value: u16) -> Result<(), Self::Error>;

    /// Release the transport.
    fn close(self) -> Result<(), Self::Error>;
}

/// Opens transports to a device `address` on bus number `bus`.
///
/// Implemented for every `FnMut(address, bus) -> Result<T, T::Error>` closure.
pub trait Connect {
    type Transport: Transport;

    fn open(
        &mut self,
        address: u8,
        bus: u8,
    ) -> Result<Self::Transport, <Self::Transport as Transport>::Error>;
}

impl<F, T> Connect for F
where
    T: Transport,
    F: FnMut(u8, u8) -> Result<T, T::Error>,
{
    type Transport = T;

    fn open(&mut self, address: u8, bus: u8) -> Result<T, T::Error> {
        self(address, bus)
    }
}

/// [`Transport`] over any `embedded-hal` I2C bus.
///
/// Registers are read with a write-read of the register address and written with a single
/// write of address plus payload.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cTransport<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the underlying bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Transport for I2cTransport<I2C> {
    type Error = I2C::Error;

    fn read_u8(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut buf = [0x00];
        self.i2c.write_read(self.address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn write_u8(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_u16_be(&mut self, register: u8) -> Result<u16, Self::Error> {
        let mut buf = [0x00; 2];
        self.i2c.write_read(self.address, &[register], &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn write_u16_be(&mut self, register: u8, value: u16) -> Result<(), Self::Error> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c.write(self.address, &[register, hi, lo])
    }

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}
