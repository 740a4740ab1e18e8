//! Session with one `MCP23017` "16-Bit I/O Expander with Serial Interface"
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/devicedoc/20001952c.pdf
//!
//! The MCP23017 offers two eight-bit GPIO ports.  It has three address pins, so eight devices
//! can coexist on an I2C bus.  Pins are numbered `0..=15`, port A being pins 0 to 7.
//!
//! When passing 16-bit values to this driver, the upper byte corresponds to port B and the lower
//! byte corresponds to port A.
use crate::registers::{bank_for_pin, bit_index, Bank, Register, RegisterCache};
use crate::{
    BusLock, BusLocks, Config, Connect, Direction, Error, InterruptMode, Level, Transport,
};

/// I2C address of device index 0.
pub const BASE_ADDRESS: u8 = 0x20;
/// Highest device index selectable with the A2..A0 address pins.
pub const MAX_DEVICE_INDEX: u8 = 7;
/// Returned by [`Mcp23017::last_interrupt_pin_raw`] when no pin can be reported.
pub const INTERRUPT_NONE: u8 = 0xff;

const IOCON_MIRROR: u8 = 1 << 6;
const IOCON_ODR: u8 = 1 << 2;
const IOCON_INTPOL: u8 = 1 << 1;

/// Register access with the shadow copy.  Callers hold the bus lock.
struct Driver<T> {
    transport: T,
    cache: RegisterCache,
    config: Config,
}

impl<T: Transport> Driver<T> {
    fn read(&mut self, register: Register, bank: Bank) -> Result<u8, Error<T::Error>> {
        let addr = register.address(bank);
        self.transport
            .read_u8(addr)
            .map_err(|cause| Error::Transport {
                register: addr,
                cause,
            })
    }

    fn write(&mut self, register: Register, bank: Bank, value: u8) -> Result<(), Error<T::Error>> {
        let addr = register.address(bank);
        log::trace!("Write 0x{value:02x} to register 0x{addr:02x}");
        self.transport
            .write_u8(addr, value)
            .map_err(|cause| Error::Transport {
                register: addr,
                cause,
            })?;
        self.cache.set(register, bank, value);
        Ok(())
    }

    fn update(
        &mut self,
        register: Register,
        bank: Bank,
        mask_set: u8,
        mask_clear: u8,
    ) -> Result<(), Error<T::Error>> {
        let mut value = self.read(register, bank)?;
        value |= mask_set;
        value &= !mask_clear;
        self.write(register, bank, value)
    }

    fn update_pin(
        &mut self,
        register: Register,
        pin: u8,
        set: bool,
    ) -> Result<(), Error<T::Error>> {
        let mask = 1 << bit_index(pin);
        let bank = bank_for_pin(pin);
        if set {
            self.update(register, bank, mask, 0)
        } else {
            self.update(register, bank, 0, mask)
        }
    }

    fn reset(&mut self) -> Result<(), Error<T::Error>> {
        for register in Register::ALL {
            for bank in Bank::ALL {
                let value = self.config.reset_value(register, bank);
                self.write(register, bank, value)?;
            }
        }
        Ok(())
    }

    fn rewrite(&mut self) -> Result<(), Error<T::Error>> {
        for register in Register::ALL.into_iter().filter(|r| r.is_cacheable()) {
            for bank in Bank::ALL {
                let value = self.cache.get(register, bank);
                self.write(register, bank, value)?;
            }
        }
        Ok(())
    }

    fn last_interrupt_pin(&mut self) -> Result<Option<u8>, Error<T::Error>> {
        for (bank, offset) in [(Bank::A, 0), (Bank::B, 8)] {
            let flags = self.read(Register::IntF, bank)?;
            if flags != 0 {
                return Ok(Some(flags.trailing_zeros() as u8 + offset));
            }
        }
        Ok(None)
    }
}

/// An opened MCP23017.
///
/// Every operation holds the lock of the device's bus for its full duration, so read-modify-write
/// sequences never interleave with traffic from other sessions on the same bus.
pub struct Mcp23017<T> {
    driver: Driver<T>,
    lock: BusLock,
    address: u8,
}

impl<T: Transport> Mcp23017<T> {
    /// Open device `device_index` (`0..=7`, the A2..A0 strapping) on bus number `bus`.
    ///
    /// All 22 registers are written to the values described by `config` before the session is
    /// returned.  If that fails the transport is closed again and [`Error::DeviceInit`] is
    /// returned.
    pub fn open<C>(
        connect: &mut C,
        locks: &BusLocks,
        bus: u8,
        device_index: u8,
        config: &Config,
    ) -> Result<Self, Error<T::Error>>
    where
        C: Connect<Transport = T>,
    {
        if device_index > MAX_DEVICE_INDEX {
            return Err(Error::InvalidAddress(device_index));
        }
        let address = BASE_ADDRESS + device_index;

        let transport = connect
            .open(address, bus)
            .map_err(|cause| Error::TransportOpen {
                address,
                bus,
                cause,
            })?;

        let mut device = Self {
            driver: Driver {
                transport,
                cache: RegisterCache::from_fn(|register, bank| config.reset_value(register, bank)),
                config: *config,
            },
            lock: locks.acquire(bus),
            address,
        };

        match device.reset() {
            Ok(()) => {
                log::debug!("Opened MCP23017 0x{address:02x} on bus {bus}");
                Ok(device)
            }
            Err(err) => {
                log::warn!("Initialising MCP23017 0x{address:02x} on bus {bus} failed: {err:?}");
                if let Err(close_err) = device.driver.transport.close() {
                    log::warn!("Closing MCP23017 0x{address:02x} failed: {close_err:?}");
                }
                Err(match err {
                    Error::Transport { register, cause } => Error::DeviceInit {
                        address,
                        register,
                        cause,
                    },
                    other => other,
                })
            }
        }
    }

    fn check_pin(pin: u8) -> Result<(), Error<T::Error>> {
        if pin > 15 {
            Err(Error::InvalidPin(pin))
        } else {
            Ok(())
        }
    }

    /// I2C address of the device.
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn bus(&self) -> u8 {
        self.lock.bus()
    }

    /// Configuration this session resets to.
    pub fn config(&self) -> &Config {
        &self.driver.config
    }

    /// Last value this session wrote to a register.
    pub fn cached(&self, register: Register, bank: Bank) -> u8 {
        self.driver.cache.get(register, bank)
    }

    /// Write all registers back to the session's [`Config`].
    ///
    /// Not transactional: on failure the registers before the failing one have been written,
    /// the rest keep their old contents.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        log::debug!("Resetting MCP23017 0x{:02x}", self.address);
        self.lock.lock(|| self.driver.reset())
    }

    /// Re-send the cached values of IODIR, INTCON and GPIO, e.g. after the device lost power.
    ///
    /// Stops at the first failing register.
    pub fn rewrite(&mut self) -> Result<(), Error<T::Error>> {
        log::debug!(
            "Rewriting cached registers of MCP23017 0x{:02x}",
            self.address
        );
        self.lock.lock(|| self.driver.rewrite())
    }

    /// Whether the device answers a register read.
    pub fn is_present(&mut self) -> bool {
        self.lock
            .lock(|| self.driver.read(Register::IoDir, Bank::A))
            .is_ok()
    }

    pub fn pin_mode(&mut self, pin: u8, mode: Direction) -> Result<(), Error<T::Error>> {
        Self::check_pin(pin)?;
        self.lock
            .lock(|| self.driver.update_pin(Register::IoDir, pin, mode.bit()))
    }

    /// Drive an output pin.
    ///
    /// The other pins of the port are taken from the cached GPIO value rather than read back,
    /// since a live read returns input levels too.  The wiring this driver targets drives the
    /// pin low for a set bit.
    pub fn digital_write(&mut self, pin: u8, level: Level) -> Result<(), Error<T::Error>> {
        Self::check_pin(pin)?;
        let bank = bank_for_pin(pin);
        let mask = 1 << bit_index(pin);
        self.lock.lock(|| {
            let latch = self.driver.cache.get(Register::Gpio, bank);
            let value = match level {
                Level::Low => latch | mask,
                Level::High => latch & !mask,
            };
            self.driver.write(Register::Gpio, bank, value)
        })
    }

    /// Read the live level of a pin.
    pub fn digital_read(&mut self, pin: u8) -> Result<Level, Error<T::Error>> {
        Self::check_pin(pin)?;
        let value = self
            .lock
            .lock(|| self.driver.read(Register::Gpio, bank_for_pin(pin)))?;
        Ok(Level::from(value & (1 << bit_index(pin)) != 0))
    }

    pub fn set_pull_up(&mut self, pin: u8, enabled: bool) -> Result<(), Error<T::Error>> {
        Self::check_pin(pin)?;
        self.lock
            .lock(|| self.driver.update_pin(Register::GpPu, pin, enabled))
    }

    /// Write both GPIO registers in one transaction.
    ///
    /// The lower byte of `value` goes to GPIOA, the upper byte to GPIOB.
    pub fn write_gpio_ab(&mut self, value: u16) -> Result<(), Error<T::Error>> {
        let addr = Register::Gpio.address(Bank::A);
        self.lock.lock(|| {
            // the first byte on the wire lands in GPIOA
            self.driver
                .transport
                .write_u16_be(addr, value.swap_bytes())
                .map_err(|cause| Error::Transport {
                    register: addr,
                    cause,
                })?;
            let [low, high] = value.to_le_bytes();
            self.driver.cache.set(Register::Gpio, Bank::A, low);
            self.driver.cache.set(Register::Gpio, Bank::B, high);
            Ok(())
        })
    }

    /// Read both GPIO registers in one transaction.
    ///
    /// GPIOA is returned in the lower byte, GPIOB in the upper byte.
    pub fn read_gpio_ab(&mut self) -> Result<u16, Error<T::Error>> {
        let addr = Register::Gpio.address(Bank::A);
        self.lock.lock(|| {
            self.driver
                .transport
                .read_u16_be(addr)
                .map(u16::swap_bytes)
                .map_err(|cause| Error::Transport {
                    register: addr,
                    cause,
                })
        })
    }

    pub fn read_gpio(&mut self, bank: Bank) -> Result<u8, Error<T::Error>> {
        self.lock.lock(|| self.driver.read(Register::Gpio, bank))
    }

    /// Configure the interrupt outputs of both ports.
    ///
    /// - `mirror`: INTA and INTB are ORed together.
    /// - `open_drain`: interrupt pins are open-drain, which overrides `polarity`.
    /// - `polarity`: level of an active interrupt pin.
    ///
    /// Power-on state is `(false, false, Level::Low)`.  The ports are written one after the
    /// other, a failure on port B leaves port A configured.
    pub fn setup_interrupts(
        &mut self,
        mirror: bool,
        open_drain: bool,
        polarity: Level,
    ) -> Result<(), Error<T::Error>> {
        let mut mask_set = 0;
        let mut mask_clear = 0;
        for (bit, enabled) in [
            (IOCON_MIRROR, mirror),
            (IOCON_ODR, open_drain),
            (IOCON_INTPOL, polarity == Level::High),
        ] {
            if enabled {
                mask_set |= bit;
            } else {
                mask_clear |= bit;
            }
        }

        self.lock.lock(|| {
            for bank in Bank::ALL {
                self.driver
                    .update(Register::IoCon, bank, mask_set, mask_clear)?;
            }
            Ok(())
        })
    }

    /// Enable interrupt-on-change for `pin`.
    pub fn setup_interrupt_pin(
        &mut self,
        pin: u8,
        mode: InterruptMode,
    ) -> Result<(), Error<T::Error>> {
        Self::check_pin(pin)?;
        self.lock.lock(|| {
            match mode {
                InterruptMode::Change => {
                    self.driver.update_pin(Register::IntCon, pin, false)?;
                }
                InterruptMode::Falling => {
                    self.driver.update_pin(Register::IntCon, pin, true)?;
                    self.driver.update_pin(Register::DefVal, pin, true)?;
                }
                InterruptMode::Rising => {
                    self.driver.update_pin(Register::IntCon, pin, true)?;
                    self.driver.update_pin(Register::DefVal, pin, false)?;
                }
            }
            self.driver.update_pin(Register::GpIntEn, pin, true)
        })
    }

    /// Disable interrupt-on-change for `pin`.
    pub fn disable_interrupt_pin(&mut self, pin: u8) -> Result<(), Error<T::Error>> {
        Self::check_pin(pin)?;
        self.lock
            .lock(|| self.driver.update_pin(Register::GpIntEn, pin, false))
    }

    /// Lowest-numbered pin with its interrupt flag set, port A first.
    ///
    /// Port B is only read when no flag is set on port A.
    pub fn last_interrupt_pin(&mut self) -> Result<Option<u8>, Error<T::Error>> {
        self.lock.lock(|| self.driver.last_interrupt_pin())
    }

    /// Like [`last_interrupt_pin`][Self::last_interrupt_pin], but folds both "no interrupt" and
    /// read failures into [`INTERRUPT_NONE`].
    pub fn last_interrupt_pin_raw(&mut self) -> u8 {
        match self.last_interrupt_pin() {
            Ok(Some(pin)) => pin,
            Ok(None) => INTERRUPT_NONE,
            Err(err) => {
                log::debug!("Reading interrupt flags failed: {err:?}");
                INTERRUPT_NONE
            }
        }
    }

    /// Level captured when the interrupt of [`last_interrupt_pin`][Self::last_interrupt_pin]
    /// fired.
    pub fn last_interrupt_pin_value(&mut self) -> Result<Level, Error<T::Error>> {
        self.lock.lock(|| {
            let Some(pin) = self.driver.last_interrupt_pin()? else {
                return Err(Error::NoInterruptPending);
            };
            let captured = self.driver.read(Register::IntCap, bank_for_pin(pin))?;
            Ok(Level::from(captured & (1 << bit_index(pin)) != 0))
        })
    }

    /// Handle to a single pin, usable through the `embedded-hal` digital traits.
    pub fn pin(&mut self, pin: u8) -> Result<crate::Pin<'_, T>, Error<T::Error>> {
        Self::check_pin(pin)?;
        Ok(crate::Pin::new(self, pin))
    }

    /// Whether the cached GPIO bit of `pin` is set.
    pub(crate) fn cached_bit(&self, pin: u8) -> bool {
        self.driver.cache.get(Register::Gpio, bank_for_pin(pin)) & (1 << bit_index(pin)) != 0
    }

    /// Release the transport.  It is released even when closing reports an error.
    pub fn close(self) -> Result<(), Error<T::Error>> {
        let Self {
            driver,
            lock,
            address,
        } = self;
        log::debug!("Closing MCP23017 0x{address:02x} on bus {}", lock.bus());
        lock.lock(|| driver.transport.close()).map_err(|cause| {
            log::warn!("Closing MCP23017 0x{address:02x} failed: {cause:?}");
            Error::Close { cause }
        })
    }
}
