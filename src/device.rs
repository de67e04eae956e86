//! The MCP23S17 device handle and its SPI framing.

use crate::consts;
use crate::error::Result;
use crate::registers::{Register, RegisterFile};
use crate::transport::Transport;
use log::{debug, trace};

// Register index sent before a sequential (whole-bank) transfer.
const SEQUENTIAL_START: u8 = 0x00;

/// A handle to one MCP23S17 on an SPI link.
///
/// Owns the transport (including the chip-select line) and a mirror of the
/// chip's 22 registers. Pin, port and interrupt operations update the mirror
/// and push the affected register to the chip; reads of input state always go
/// to the chip.
///
/// **Note:** This handle is not synchronized. Share it across threads only
/// behind an external lock.
#[derive(Debug)]
pub struct Mcp23s17<T> {
    pub(crate) transport: T,
    pub(crate) address: u8,
    pub(crate) registers: RegisterFile,
}

impl<T: Transport> Mcp23s17<T> {
    // --- Constructors and Info ---
    /// Creates a driver for the chip at hardware address `address` (A2..A0).
    ///
    /// Only the low three bits of `address` are used. No bus traffic happens
    /// until [`begin`](Self::begin) is called; the register mirror starts at
    /// the chip's power-on-reset values.
    pub fn new(transport: T, address: u8) -> Self {
        let address = address & consts::opcode::ADDRESS_MASK;
        debug!("Creating MCP23S17 driver for hardware address {}", address);
        Self {
            transport,
            address,
            registers: RegisterFile::new(),
        }
    }

    /// Brings the chip into the driver's configuration.
    ///
    /// Every MCP23S17 sharing the chip-select line first gets IOCON written
    /// through hardware address 0 (which all of them answer to until HAEN is
    /// set), enabling hardware addressing. Then the whole register mirror is
    /// pushed to this chip in one sequential transaction, so direction and
    /// pull-up settings land together.
    pub fn begin(&mut self) -> Result<()> {
        debug!(
            "Initializing MCP23S17 at address {} (IOCON=0x{:02X})",
            self.address,
            consts::iocon::DEFAULT
        );
        let broadcast = consts::opcode::BASE;
        self.frame(broadcast, Register::IoConA.addr(), |t| {
            t.transfer_byte(consts::iocon::DEFAULT).map(|_| ())
        })?;
        self.write_all()
    }

    /// Hardware address (0-7) used in the control byte.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// The register mirror.
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the driver and returns the transport.
    pub fn release(self) -> T {
        self.transport
    }

    // --- Register Access ---
    /// Reads one register from the chip into the mirror and returns it.
    ///
    /// Indices past the register map are ignored (no bus traffic, returns 0).
    pub fn read_register<R: Into<u8>>(&mut self, reg: R) -> Result<u8> {
        let index = reg.into();
        if index as usize >= consts::REGISTER_COUNT {
            debug!("Ignoring read of undefined register 0x{:02X}", index);
            return Ok(0);
        }
        let value = self.frame(self.opcode(true), index, |t| {
            t.transfer_byte(consts::opcode::DUMMY)
        })?;
        trace!("Read Reg 0x{:02X} = 0x{:02X}", index, value);
        self.registers.set(index, value);
        Ok(value)
    }

    /// Writes the mirrored value of one register to the chip.
    ///
    /// Indices past the register map are ignored (no bus traffic).
    pub fn write_register<R: Into<u8>>(&mut self, reg: R) -> Result<()> {
        let index = reg.into();
        if index as usize >= consts::REGISTER_COUNT {
            debug!("Ignoring write of undefined register 0x{:02X}", index);
            return Ok(());
        }
        let value = self.registers.get(index);
        trace!("Writing Reg 0x{:02X} = 0x{:02X}", index, value);
        self.frame(self.opcode(false), index, |t| {
            t.transfer_byte(value).map(|_| ())
        })
    }

    // Writes each register from the mirror in order. When a write fails, that
    // register and every one after it get their saved value back, so the
    // mirror only holds what reached the chip.
    pub(crate) fn write_or_restore(&mut self, saved: &[(Register, u8)]) -> Result<()> {
        for (i, &(reg, _)) in saved.iter().enumerate() {
            if let Err(e) = self.write_register(reg) {
                debug!("Write of {:?} failed, restoring mirror: {}", reg, e);
                for &(reg, old) in &saved[i..] {
                    self.registers.set_reg(reg, old);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Reads all 22 registers in one sequential transaction, replacing the mirror.
    pub fn read_all(&mut self) -> Result<()> {
        let mut bytes = [0u8; consts::REGISTER_COUNT];
        self.frame(self.opcode(true), SEQUENTIAL_START, |t| {
            for byte in bytes.iter_mut() {
                *byte = t.transfer_byte(consts::opcode::DUMMY)?;
            }
            Ok(())
        })?;
        trace!("Read all registers: {:02X?}", bytes);
        self.registers.load(&bytes);
        Ok(())
    }

    /// Writes the whole mirror to the chip in one sequential transaction.
    pub fn write_all(&mut self) -> Result<()> {
        let bytes = *self.registers.as_bytes();
        trace!("Writing all registers: {:02X?}", bytes);
        self.frame(self.opcode(false), SEQUENTIAL_START, |t| {
            for &byte in bytes.iter() {
                t.transfer_byte(byte)?;
            }
            Ok(())
        })
    }

    /// Resynchronizes the mirror with the chip (e.g. after an external reset).
    pub fn refresh(&mut self) -> Result<()> {
        self.read_all()
    }

    // --- Framing ---
    /// Control byte `0100 A2 A1 A0 R/W` for this chip.
    #[inline]
    pub(crate) fn opcode(&self, read: bool) -> u8 {
        let mut cmd = consts::opcode::BASE | (self.address << consts::opcode::ADDRESS_SHIFT);
        if read {
            cmd |= consts::opcode::READ;
        }
        cmd
    }

    // One chip-select assertion: control byte, register index, then whatever
    // `body` clocks. Chip-select is released even if a transfer fails.
    fn frame<F, V>(&mut self, opcode: u8, index: u8, body: F) -> Result<V>
    where
        F: FnOnce(&mut T) -> Result<V>,
    {
        self.transport.begin_exclusive()?;
        let result = match self.transport.select() {
            Ok(()) => {
                let t = &mut self.transport;
                let result = t
                    .transfer_byte(opcode)
                    .and_then(|_| t.transfer_byte(index))
                    .and_then(|_| body(t));
                let released = self.transport.deselect();
                result.and_then(|value| released.map(|_| value))
            }
            Err(e) => Err(e),
        };
        let ended = self.transport.end_exclusive();
        result.and_then(|value| ended.map(|_| value))
    }
}
