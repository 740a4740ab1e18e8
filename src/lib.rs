//! Driver for the MCP23017 16-bit I2C GPIO expander.
//!
//! Several expanders may share one physical bus.  Every session opened through the same
//! [`BusLocks`] on the same bus number serializes its register traffic with the others, and
//! each session keeps a shadow copy of what it wrote to the device.
//!
//! ```no_run
//! # use embedded_hal::i2c::ErrorKind;
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! use mcp23017::{BusLocks, Config, Direction, I2cTransport, Level, Mcp23017};
//!
//! let locks = BusLocks::new();
//! let mut connect = |address: u8, _bus: u8| -> Result<_, ErrorKind> {
//!     Ok(I2cTransport::new(i2c.clone(), address))
//! };
//!
//! let mut dev = Mcp23017::open(&mut connect, &locks, 1, 0, &Config::new()).unwrap();
//! dev.pin_mode(3, Direction::Output).unwrap();
//! dev.digital_write(3, Level::High).unwrap();
//! dev.close().unwrap();
//! ```

mod bus;
mod common;
mod device;
mod error;
mod mutex;
mod pin;
pub mod registers;

pub use bus::{Connect, I2cTransport, Transport};
pub use common::{Config, Direction, InterruptMode, Level};
pub use device::{Mcp23017, BASE_ADDRESS, INTERRUPT_NONE, MAX_DEVICE_INDEX};
pub use error::Error;
pub use mutex::{BusLock, BusLocks};
pub use pin::Pin;
pub use registers::{Bank, Register};
