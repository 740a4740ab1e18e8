//! Register map of the MCP23017.
//!
//! Addresses are for `IOCON.BANK = 0`, the power-on layout, which this driver never changes.
//! In that layout every logical register exists once per port, with port A at an even address
//! and port B directly after it.

/// Number of physical registers (`0x00..=0x15`).
pub const REGISTER_COUNT: usize = 22;

/// One of the two eight-pin ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    /// Pins 0..=7
    A = 0,
    /// Pins 8..=15
    B = 1,
}

impl Bank {
    pub const ALL: [Bank; 2] = [Bank::A, Bank::B];
}

/// Logical registers, each present once per [`Bank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    /// IODIR: input/output direction: 0=output; 1=input
    IoDir = 0x00,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    IPol = 0x02,
    /// GPINTEN: interrupt-on-change: 0=disable; 1=enable
    GpIntEn = 0x04,
    /// DEFVAL: default values for interrupt-on-change
    DefVal = 0x06,
    /// INTCON: interrupt-on-change config: 0=compare to previous pin value;
    ///   1=compare to corresponding bit in DEFVAL
    IntCon = 0x08,
    /// IOCON: configuration register
    /// - Bit 7: BANK (which driver assumes stays 0)
    /// - Bit 6: MIRROR: if enabled, INTA and INTB are logically ORed
    /// - Bit 5: SEQOP: controls the incrementing function of the address pointer
    /// - Bit 4: DISSLW: disables slew rate control on SDA
    /// - Bit 3: HAEN: no effect on MCP23017
    /// - Bit 2: ODR: interrupt pins are 0=active-driver outputs or 1=open-drain outputs
    /// - Bit 1: INTPOL: interrupt pin is 0=active-low or 1=active-high
    /// - Bit 0: unused
    IoCon = 0x0a,
    /// GPPU: GPIO pull-ups: enables weak internal pull-ups on each input pin
    GpPu = 0x0c,
    /// INTF: interrupt flags: 1=corresponding pin caused interrupt
    IntF = 0x0e,
    /// INTCAP: interrupt captured value: pin levels at the time of the interrupt
    IntCap = 0x10,
    /// GPIO: reflects logic level on pins
    Gpio = 0x12,
    /// OLAT: output latches
    OLat = 0x14,
}

impl Register {
    /// All logical registers in address order.
    pub const ALL: [Register; 11] = [
        Register::IoDir,
        Register::IPol,
        Register::GpIntEn,
        Register::DefVal,
        Register::IntCon,
        Register::IoCon,
        Register::GpPu,
        Register::IntF,
        Register::IntCap,
        Register::Gpio,
        Register::OLat,
    ];

    /// Physical address of this register in `bank`.
    pub const fn address(self, bank: Bank) -> u8 {
        self as u8 + bank as u8
    }

    /// Whether the driver keeps a shadow copy of this register that is consulted instead of
    /// the device and re-sent by a rewrite.
    pub const fn is_cacheable(self) -> bool {
        matches!(self, Register::IoDir | Register::Gpio | Register::IntCon)
    }

    /// Power-on-reset value.  Everything resets to zero except IODIR, which makes all pins
    /// inputs.
    pub const fn reset_value(self) -> u8 {
        match self {
            Register::IoDir => 0xff,
            _ => 0x00,
        }
    }
}

/// Physical address of `register` in `bank`.
pub const fn bank_address(register: Register, bank: Bank) -> u8 {
    register.address(bank)
}

/// Bit of `pin` within its port's register byte.
///
/// Only meaningful for pins `0..=15`; callers validate the range.
pub const fn bit_index(pin: u8) -> u8 {
    pin % 8
}

/// Port that `pin` belongs to.
pub const fn bank_for_pin(pin: u8) -> Bank {
    if pin < 8 {
        Bank::A
    } else {
        Bank::B
    }
}

/// Whether `register` is shadowed locally.
pub const fn is_cacheable(register: Register) -> bool {
    register.is_cacheable()
}

/// Local shadow copy of all 22 registers, indexed by physical address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegisterCache {
    bytes: [u8; REGISTER_COUNT],
}

impl RegisterCache {
    pub(crate) fn from_fn<F: Fn(Register, Bank) -> u8>(f: F) -> Self {
        let mut bytes = [0; REGISTER_COUNT];
        for reg in Register::ALL {
            for bank in Bank::ALL {
                bytes[reg.address(bank) as usize] = f(reg, bank);
            }
        }
        Self { bytes }
    }

    pub(crate) fn get(&self, register: Register, bank: Bank) -> u8 {
        self.bytes[register.address(bank) as usize]
    }

    pub(crate) fn set(&mut self, register: Register, bank: Bank, value: u8) {
        self.bytes[register.address(bank) as usize] = value;
    }
}
