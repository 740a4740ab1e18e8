use embedded_hal::digital::{self as hal_digital, ErrorType};

use crate::{Direction, Error, Level, Mcp23017, Transport};

/// Representation of one expander pin.
///
/// `Pin` is not constructed directly; it borrows an opened device through
/// [`Mcp23017::pin()`].  Every call goes through the device session and therefore holds the bus
/// lock, so it can be handed to code written against the `embedded-hal` digital traits.
pub struct Pin<'a, T> {
    device: &'a mut Mcp23017<T>,
    pin: u8,
}

impl<'a, T: Transport> Pin<'a, T> {
    pub(crate) fn new(device: &'a mut Mcp23017<T>, pin: u8) -> Self {
        Self { device, pin }
    }

    pub fn number(&self) -> u8 {
        self.pin
    }

    pub fn set_mode(&mut self, mode: Direction) -> Result<(), Error<T::Error>> {
        self.device.pin_mode(self.pin, mode)
    }

    pub fn set_pull_up(&mut self, enabled: bool) -> Result<(), Error<T::Error>> {
        self.device.set_pull_up(self.pin, enabled)
    }

    pub fn set_level(&mut self, level: Level) -> Result<(), Error<T::Error>> {
        self.device.digital_write(self.pin, level)
    }

    pub fn level(&mut self) -> Result<Level, Error<T::Error>> {
        self.device.digital_read(self.pin)
    }

    /// Level last written to this pin, from the cached GPIO value.
    pub fn cached_level(&self) -> Level {
        // a set bit drives the pin low
        Level::from(!self.device.cached_bit(self.pin))
    }
}

impl<'a, T: Transport> ErrorType for Pin<'a, T> {
    type Error = Error<T::Error>;
}

impl<'a, T: Transport> hal_digital::InputPin for Pin<'a, T> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level().map(bool::from)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|b| !b)
    }
}

impl<'a, T: Transport> hal_digital::OutputPin for Pin<'a, T> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(Level::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(Level::High)
    }
}

impl<'a, T: Transport> hal_digital::StatefulOutputPin for Pin<'a, T> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.cached_level() == Level::High)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.cached_level() == Level::Low)
    }
}
