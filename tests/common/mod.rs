//! Fake MCP23S17 used by the integration tests.
//!
//! Emulates the chip's register file behind the `Transport` trait: BANK=0
//! addressing with sequential auto-increment, HAEN address matching, IOCON
//! aliasing, OLAT echo on GPIO reads for output pins and read-to-clear of the
//! interrupt flags through INTCAP. Every chip-select frame is recorded.

#![allow(dead_code)]

use mcp23s17_spi::{Error, Register, Result, Transport};

const REGISTER_COUNT: usize = 22;
const HAEN: u8 = 1 << 3;

/// One chip-select assertion as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: u8,
    pub start: u8,
    /// Bytes written by the host, or bytes returned by the chip for reads.
    pub data: Vec<u8>,
}

impl Frame {
    pub fn is_read(&self) -> bool {
        self.opcode & 1 == 1
    }

    pub fn address(&self) -> u8 {
        (self.opcode >> 1) & 0b111
    }
}

#[derive(Debug)]
pub struct FakeChip {
    pub regs: [u8; REGISTER_COUNT],
    /// Levels driven onto the pins from outside (bank B in the high byte).
    pub external: u16,
    /// Write frames still accepted before every further write faults.
    /// `None` never faults.
    pub write_budget: Option<usize>,
    hw_address: u8,
    frames: Vec<Frame>,
    current: Option<Frame>,
    pointer: usize,
    byte_index: usize,
    exclusive: bool,
}

impl FakeChip {
    /// A chip in its power-on-reset state (IOCON=0x00, HAEN off).
    pub fn new(hw_address: u8) -> Self {
        let mut regs = [0u8; REGISTER_COUNT];
        regs[Register::IoDirA as usize] = 0xFF;
        regs[Register::IoDirB as usize] = 0xFF;
        Self {
            regs,
            external: 0,
            write_budget: None,
            hw_address,
            frames: Vec::new(),
            current: None,
            pointer: 0,
            byte_index: 0,
            exclusive: false,
        }
    }

    pub fn reg(&self, reg: Register) -> u8 {
        self.regs[reg as usize]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn reads(&self) -> Vec<&Frame> {
        self.frames.iter().filter(|f| f.is_read()).collect()
    }

    pub fn writes(&self) -> Vec<&Frame> {
        self.frames.iter().filter(|f| !f.is_read()).collect()
    }

    pub fn clear_frames(&mut self) {
        self.frames.clear();
    }

    /// Latches an interrupt: sets the flags and captures the current pin state.
    pub fn raise_interrupt(&mut self, flags: u16) {
        let [fa, fb] = flags.to_le_bytes();
        let [ga, gb] = self.pin_state().to_le_bytes();
        self.regs[Register::IntfA as usize] |= fa;
        self.regs[Register::IntfB as usize] |= fb;
        self.regs[Register::IntCapA as usize] = ga;
        self.regs[Register::IntCapB as usize] = gb;
    }

    fn pin_state(&self) -> u16 {
        let iodir = u16::from_le_bytes([self.reg(Register::IoDirA), self.reg(Register::IoDirB)]);
        let olat = u16::from_le_bytes([self.reg(Register::OlatA), self.reg(Register::OlatB)]);
        (self.external & iodir) | (olat & !iodir)
    }

    fn selected_here(&self, opcode: u8) -> bool {
        self.reg(Register::IoConA) & HAEN == 0 || (opcode >> 1) & 0b111 == self.hw_address
    }

    fn read_at(&mut self, index: usize) -> u8 {
        match index {
            i if i == Register::GpioA as usize => self.pin_state().to_le_bytes()[0],
            i if i == Register::GpioB as usize => self.pin_state().to_le_bytes()[1],
            i if i == Register::IntCapA as usize => {
                self.regs[Register::IntfA as usize] = 0;
                self.regs[i]
            }
            i if i == Register::IntCapB as usize => {
                self.regs[Register::IntfB as usize] = 0;
                self.regs[i]
            }
            i => self.regs[i],
        }
    }

    fn write_at(&mut self, index: usize, value: u8) {
        match index {
            i if i == Register::IntfA as usize
                || i == Register::IntfB as usize
                || i == Register::IntCapA as usize
                || i == Register::IntCapB as usize => {}
            i if i == Register::GpioA as usize => self.regs[Register::OlatA as usize] = value,
            i if i == Register::GpioB as usize => self.regs[Register::OlatB as usize] = value,
            i if i == Register::IoConA as usize || i == Register::IoConB as usize => {
                self.regs[Register::IoConA as usize] = value;
                self.regs[Register::IoConB as usize] = value;
            }
            i => self.regs[i] = value,
        }
    }
}

impl Transport for FakeChip {
    fn select(&mut self) -> Result<()> {
        assert!(self.exclusive, "chip-select asserted outside a bus grant");
        assert!(self.current.is_none(), "chip-select asserted twice");
        self.current = Some(Frame {
            opcode: 0,
            start: 0,
            data: Vec::new(),
        });
        self.byte_index = 0;
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        let frame = self.current.take().expect("chip-select released while idle");
        if !frame.is_read() && !frame.data.is_empty() {
            if let Some(budget) = self.write_budget.as_mut() {
                *budget = budget.saturating_sub(1);
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    fn transfer_byte(&mut self, out: u8) -> Result<u8> {
        let mut frame = self.current.take().expect("byte clocked with chip-select high");
        let index = self.byte_index;
        self.byte_index += 1;
        let response = match index {
            0 => {
                frame.opcode = out;
                0
            }
            1 => {
                frame.start = out;
                self.pointer = out as usize;
                0
            }
            _ if frame.opcode & 1 == 0 && self.write_budget == Some(0) => {
                self.current = Some(frame);
                return Err(Error::Transport("write fault".into()));
            }
            _ => {
                let responds = self.selected_here(frame.opcode) && self.pointer < REGISTER_COUNT;
                let value = if !responds {
                    0
                } else if frame.opcode & 1 == 1 {
                    self.read_at(self.pointer)
                } else {
                    self.write_at(self.pointer, out);
                    0
                };
                frame.data.push(if frame.opcode & 1 == 1 { value } else { out });
                self.pointer = (self.pointer + 1) % REGISTER_COUNT;
                value
            }
        };
        self.current = Some(frame);
        Ok(response)
    }

    fn begin_exclusive(&mut self) -> Result<()> {
        assert!(!self.exclusive, "nested bus grant");
        self.exclusive = true;
        Ok(())
    }

    fn end_exclusive(&mut self) -> Result<()> {
        assert!(self.current.is_none(), "bus released with chip-select low");
        self.exclusive = false;
        Ok(())
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
