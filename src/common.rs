/// Pin direction.
///
/// IODIR encodes an input as a set bit and an output as a cleared bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Input,
    Output,
}

impl Direction {
    pub(crate) fn bit(self) -> bool {
        matches!(self, Direction::Input)
    }

    /// IODIR byte putting all eight pins of a port into this direction.
    pub(crate) fn port_mask(self) -> u8 {
        if self.bit() {
            0xff
        } else {
            0x00
        }
    }
}

/// Logic level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> bool {
        level == Level::High
    }
}

/// Condition that raises an interrupt-on-change for a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptMode {
    /// Any change compared to the previous pin value.
    Change,
    /// Pin goes low (compared against DEFVAL = 1).
    Falling,
    /// Pin goes high (compared against DEFVAL = 0).
    Rising,
}

/// Configuration applied when a device is opened and every time it is reset.
///
/// A session takes a copy at open time, so changing a `Config` afterwards does not affect
/// already opened devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pin_mode: Direction,
    values: [u8; 2],
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction of all 16 pins after a reset.  Defaults to [`Direction::Input`].
    pub fn set_default_pin_mode(&mut self, mode: Direction) -> &mut Self {
        self.pin_mode = mode;
        self
    }

    /// Output latch values of port A and port B after a reset.  Default to zero.
    pub fn set_default_values(&mut self, port_a: u8, port_b: u8) -> &mut Self {
        self.values = [port_a, port_b];
        self
    }

    pub fn default_pin_mode(&self) -> Direction {
        self.pin_mode
    }

    pub fn default_values(&self) -> (u8, u8) {
        (self.values[0], self.values[1])
    }

    /// Value a reset writes to `register` in `bank`.
    pub(crate) fn reset_value(&self, register: crate::Register, bank: crate::Bank) -> u8 {
        match register {
            crate::Register::IoDir => self.pin_mode.port_mask(),
            crate::Register::Gpio | crate::Register::OLat => self.values[bank as usize],
            other => other.reset_value(),
        }
    }
}
