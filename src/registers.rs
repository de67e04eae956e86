//! Register map and the host-side register mirror.

use crate::consts;
use crate::error::{Error, Result};
use bit_field::BitField;
use log::debug;

/// Registers of the MCP23S17 in BANK=0 (interleaved) addressing.
///
/// The discriminant is the register address sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    /// I/O direction A: 0=output, 1=input.
    IoDirA = 0x00,
    /// I/O direction B.
    IoDirB = 0x01,
    /// Input polarity A: 1 inverts the GPIO bit.
    IPolA = 0x02,
    /// Input polarity B.
    IPolB = 0x03,
    /// Interrupt-on-change enable A.
    GpIntEnA = 0x04,
    /// Interrupt-on-change enable B.
    GpIntEnB = 0x05,
    /// Default compare value A.
    DefValA = 0x06,
    /// Default compare value B.
    DefValB = 0x07,
    /// Interrupt control A: 0=compare to previous value, 1=compare to DEFVAL.
    IntConA = 0x08,
    /// Interrupt control B.
    IntConB = 0x09,
    /// Configuration (aliased with IOCONB).
    IoConA = 0x0A,
    /// Configuration (aliased with IOCONA).
    IoConB = 0x0B,
    /// Pull-up enable A.
    GppuA = 0x0C,
    /// Pull-up enable B.
    GppuB = 0x0D,
    /// Interrupt flags A (read-only).
    IntfA = 0x0E,
    /// Interrupt flags B (read-only).
    IntfB = 0x0F,
    /// Interrupt capture A (read-only, reading clears the interrupt).
    IntCapA = 0x10,
    /// Interrupt capture B (read-only, reading clears the interrupt).
    IntCapB = 0x11,
    /// Port value A.
    GpioA = 0x12,
    /// Port value B.
    GpioB = 0x13,
    /// Output latch A.
    OlatA = 0x14,
    /// Output latch B.
    OlatB = 0x15,
}

impl Register {
    /// All registers in address order.
    pub const ALL: [Register; consts::REGISTER_COUNT] = [
        Register::IoDirA,
        Register::IoDirB,
        Register::IPolA,
        Register::IPolB,
        Register::GpIntEnA,
        Register::GpIntEnB,
        Register::DefValA,
        Register::DefValB,
        Register::IntConA,
        Register::IntConB,
        Register::IoConA,
        Register::IoConB,
        Register::GppuA,
        Register::GppuB,
        Register::IntfA,
        Register::IntfB,
        Register::IntCapA,
        Register::IntCapB,
        Register::GpioA,
        Register::GpioB,
        Register::OlatA,
        Register::OlatB,
    ];

    /// Register address as sent on the wire.
    #[inline]
    pub fn addr(self) -> u8 {
        self as u8
    }
}

impl From<Register> for u8 {
    fn from(r: Register) -> u8 {
        r as u8
    }
}

impl TryFrom<u8> for Register {
    type Error = Error;

    fn try_from(addr: u8) -> Result<Self> {
        Register::ALL
            .get(addr as usize)
            .copied()
            .ok_or(Error::RegisterOutOfRange(addr))
    }
}

/// One of the two 8-pin groups of the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    /// Pins 0-7.
    A = 0,
    /// Pins 8-15.
    B = 1,
}

/// Legacy port numbering: 0 is bank A, anything else is bank B.
impl From<u8> for Bank {
    fn from(port: u8) -> Self {
        if port == 0 {
            Bank::A
        } else {
            Bank::B
        }
    }
}

/// A register that exists once per bank.
///
/// [`RegisterPair::register`] is the single place where a logical register is
/// resolved to its bank-specific address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterPair {
    /// IODIRA/IODIRB
    IoDir = 0,
    /// IPOLA/IPOLB
    IPol = 1,
    /// GPINTENA/GPINTENB
    GpIntEn = 2,
    /// DEFVALA/DEFVALB
    DefVal = 3,
    /// INTCONA/INTCONB
    IntCon = 4,
    /// IOCONA/IOCONB
    IoCon = 5,
    /// GPPUA/GPPUB
    Gppu = 6,
    /// INTFA/INTFB
    Intf = 7,
    /// INTCAPA/INTCAPB
    IntCap = 8,
    /// GPIOA/GPIOB
    Gpio = 9,
    /// OLATA/OLATB
    Olat = 10,
}

impl RegisterPair {
    /// Resolves this pair to the register of the given bank.
    #[inline]
    pub fn register(self, bank: Bank) -> Register {
        Register::ALL[(self as usize) * 2 + bank as usize]
    }
}

/// Host-side mirror of the chip's 22 registers.
///
/// Raw-index accessors silently ignore indices past the register map, the
/// same way the chip ignores undefined addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u8; consts::REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        let mut regs = [0u8; consts::REGISTER_COUNT];
        regs[Register::IoDirA as usize] = consts::IODIR_DEFAULT;
        regs[Register::IoDirB as usize] = consts::IODIR_DEFAULT;
        regs[Register::IoConA as usize] = consts::iocon::DEFAULT;
        regs[Register::IoConB as usize] = consts::iocon::DEFAULT;
        RegisterFile { regs }
    }
}

impl RegisterFile {
    /// Creates a mirror holding the chip's power-on-reset values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value at `index`, or 0 if the index is out of range.
    pub fn get(&self, index: u8) -> u8 {
        match self.regs.get(index as usize) {
            Some(&value) => value,
            None => {
                debug!("Ignoring read of undefined register 0x{:02X}", index);
                0
            }
        }
    }

    /// Stores `value` at `index`; out-of-range indices are ignored.
    pub fn set(&mut self, index: u8, value: u8) {
        match self.regs.get_mut(index as usize) {
            Some(slot) => *slot = value,
            None => debug!("Ignoring write of undefined register 0x{:02X}", index),
        }
    }

    /// Cached value of `reg`.
    #[inline]
    pub fn reg(&self, reg: Register) -> u8 {
        self.regs[reg as usize]
    }

    /// Replaces the cached value of `reg`.
    #[inline]
    pub fn set_reg(&mut self, reg: Register, value: u8) {
        self.regs[reg as usize] = value;
    }

    /// One bit (0-7) of the cached value of `reg`.
    #[inline]
    pub fn bit(&self, reg: Register, bit: u8) -> bool {
        self.regs[reg as usize].get_bit(bit as usize)
    }

    /// Sets or clears one bit (0-7) of the cached value of `reg`.
    #[inline]
    pub fn set_bit(&mut self, reg: Register, bit: u8, value: bool) {
        self.regs[reg as usize].set_bit(bit as usize, value);
    }

    /// Sets or clears `bit` in both IOCON copies.
    ///
    /// The chip aliases IOCONA and IOCONB, so only one of them is ever
    /// written; the mirror keeps both in step.
    pub(crate) fn set_iocon_bit(&mut self, bit: usize, value: bool) {
        self.regs[Register::IoConA as usize].set_bit(bit, value);
        self.regs[Register::IoConB as usize].set_bit(bit, value);
    }

    /// Combines the A and B registers of a pair into `(B << 8) | A`.
    pub fn pair_value(&self, pair: RegisterPair) -> u16 {
        u16::from_le_bytes([
            self.reg(pair.register(Bank::A)),
            self.reg(pair.register(Bank::B)),
        ])
    }

    /// All registers in address order.
    pub fn as_bytes(&self) -> &[u8; consts::REGISTER_COUNT] {
        &self.regs
    }

    pub(crate) fn load(&mut self, bytes: &[u8; consts::REGISTER_COUNT]) {
        self.regs = *bytes;
    }
}
