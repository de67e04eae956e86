//! Pin and port level I/O.

use crate::consts;
use crate::device::Mcp23s17;
use crate::error::{Error, Result};
use crate::registers::{Bank, Register, RegisterPair};
use crate::transport::Transport;
use log::{debug, trace};

/// Direction and pull-up configuration of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Output,
    Input,
    /// Input with the internal ~100k pull-up enabled.
    InputPullup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

impl From<PinLevel> for bool {
    fn from(level: PinLevel) -> bool {
        level == PinLevel::High
    }
}

/// Represents a valid GPIO Pin number (0-15).
/// Use `GpioPin::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpioPin(pub(crate) u8);

impl GpioPin {
    /// Creates a new GpioPin, returning an error if the number is out of range (0-15).
    pub fn new(pin_num: u8) -> Result<Self> {
        if pin_num < consts::PIN_COUNT {
            Ok(GpioPin(pin_num))
        } else {
            Err(Error::PinArgumentOutOfRange {
                pin: pin_num,
                message: "Pin number must be 0-15".to_string(),
            })
        }
    }

    /// Returns the underlying pin number (0-15).
    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Returns the bank the pin belongs to (0-7: A, 8-15: B).
    #[inline]
    pub fn bank(&self) -> Bank {
        if self.0 < 8 {
            Bank::A
        } else {
            Bank::B
        }
    }

    /// Returns the bit index (0-7) within the bank's registers.
    #[inline]
    pub fn bit_index(&self) -> u8 {
        self.0 % 8
    }

    /// Returns the bit mask (1 << bit_index) for register operations.
    #[inline]
    pub fn mask(&self) -> u8 {
        1u8 << self.bit_index()
    }

    /// Resolves a per-bank register to the one holding this pin's bit.
    #[inline]
    pub fn register(&self, pair: RegisterPair) -> Register {
        pair.register(self.bank())
    }
}

// Raw pin numbers past the chip's 16 pins are dropped, like the chip drops
// undefined register addresses.
pub(crate) fn resolve_pin(pin_num: u8) -> Option<GpioPin> {
    match GpioPin::new(pin_num) {
        Ok(pin) => Some(pin),
        Err(e) => {
            debug!("Ignoring request: {}", e);
            None
        }
    }
}

impl<T: Transport> Mcp23s17<T> {
    // Updates one bit in the mirror and writes that register out. The bit is
    // put back if the write fails.
    pub(crate) fn write_pin_bit(
        &mut self,
        pin: GpioPin,
        pair: RegisterPair,
        value: bool,
    ) -> Result<()> {
        let reg = pin.register(pair);
        let old = self.registers.reg(reg);
        let new = if value { old | pin.mask() } else { old & !pin.mask() };
        self.registers.set_reg(reg, new);
        self.write_or_restore(&[(reg, old)])
    }

    #[inline]
    fn is_output(&self, pin: GpioPin) -> bool {
        self.registers.reg(pin.register(RegisterPair::IoDir)) & pin.mask() == 0
    }

    fn drive_output(&mut self, pin: GpioPin, level: PinLevel) -> Result<()> {
        trace!("Setting pin {} output {:?}", pin.number(), level);
        self.write_pin_bit(pin, RegisterPair::Olat, level.into())
    }

    fn drive_pullup(&mut self, pin: GpioPin, enabled: bool) -> Result<()> {
        trace!("Setting pin {} pull-up: {}", pin.number(), enabled);
        self.write_pin_bit(pin, RegisterPair::Gppu, enabled)
    }

    // --- Single Pin GPIO ---
    /// Configures a pin as output, input, or input with pull-up.
    ///
    /// Inputs get their direction written before the pull-up register.
    pub fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let Some(pin) = resolve_pin(pin) else {
            return Ok(());
        };
        debug!("Setting pin {} mode: {:?}", pin.number(), mode);
        match mode {
            PinMode::Output => self.write_pin_bit(pin, RegisterPair::IoDir, false),
            PinMode::Input | PinMode::InputPullup => {
                self.write_pin_bit(pin, RegisterPair::IoDir, true)?;
                self.write_pin_bit(pin, RegisterPair::Gppu, mode == PinMode::InputPullup)
            }
        }
    }

    /// Current mode of a pin, derived from the mirrored IODIR and GPPU bits.
    ///
    /// Returns `None` for pin numbers past 15.
    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        let pin = GpioPin::new(pin).ok()?;
        Some(if self.is_output(pin) {
            PinMode::Output
        } else if self
            .registers
            .bit(pin.register(RegisterPair::Gppu), pin.bit_index())
        {
            PinMode::InputPullup
        } else {
            PinMode::Input
        })
    }

    /// Drives an output pin by updating its OLAT bit.
    pub fn set_output(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        match resolve_pin(pin) {
            Some(pin) => self.drive_output(pin, level),
            None => Ok(()),
        }
    }

    /// Enables or disables the internal pull-up of a pin.
    pub fn set_pullup(&mut self, pin: u8, enabled: bool) -> Result<()> {
        match resolve_pin(pin) {
            Some(pin) => self.drive_pullup(pin, enabled),
            None => Ok(()),
        }
    }

    /// Arduino-style `digitalWrite`.
    ///
    /// On an output pin this sets the output level. On an input pin the level
    /// is taken as the pull-up state instead (High enables it), matching the
    /// pre-1.0 Arduino convention. Check [`mode`](Self::mode) first if the
    /// distinction matters.
    pub fn write_pin(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        let Some(pin) = resolve_pin(pin) else {
            return Ok(());
        };
        if self.is_output(pin) {
            self.drive_output(pin, level)
        } else {
            self.drive_pullup(pin, level.into())
        }
    }

    /// Arduino-style `digitalRead`.
    ///
    /// Output pins report the last level written (no bus traffic). Input pins
    /// read their bank's GPIO register from the chip.
    pub fn read_pin(&mut self, pin: u8) -> Result<PinLevel> {
        let Some(pin) = resolve_pin(pin) else {
            return Ok(PinLevel::Low);
        };
        let reg = if self.is_output(pin) {
            pin.register(RegisterPair::Olat)
        } else {
            let reg = pin.register(RegisterPair::Gpio);
            self.read_register(reg)?;
            reg
        };
        let level = PinLevel::from(self.registers.bit(reg, pin.bit_index()));
        trace!("Read pin {} ({:?}): {:?}", pin.number(), reg, level);
        Ok(level)
    }

    // --- Port GPIO ---
    /// Reads the 8-bit GPIO value of one bank from the chip.
    ///
    /// Bits of pins configured as outputs reflect the latch, not external input.
    pub fn read_port(&mut self, bank: Bank) -> Result<u8> {
        self.read_register(RegisterPair::Gpio.register(bank))
    }

    /// Writes an 8-bit value to one bank's output latch.
    ///
    /// Bits for pins configured as inputs are ignored by the chip.
    pub fn write_port(&mut self, bank: Bank, value: u8) -> Result<()> {
        let reg = RegisterPair::Olat.register(bank);
        trace!("Writing port {:?} = 0x{:02X}", bank, value);
        let old = self.registers.reg(reg);
        self.registers.set_reg(reg, value);
        self.write_or_restore(&[(reg, old)])
    }

    /// Reads both banks as `(B << 8) | A`.
    pub fn read_ports(&mut self) -> Result<u16> {
        self.read_port(Bank::A)?;
        self.read_port(Bank::B)?;
        Ok(self.registers.pair_value(RegisterPair::Gpio))
    }

    /// Writes both output latches: the low byte to bank A, the high byte to bank B.
    pub fn write_ports(&mut self, value: u16) -> Result<()> {
        let [a, b] = value.to_le_bytes();
        trace!("Writing ports = 0x{:04X}", value);
        let olat_a = RegisterPair::Olat.register(Bank::A);
        let olat_b = RegisterPair::Olat.register(Bank::B);
        let saved = [
            (olat_a, self.registers.reg(olat_a)),
            (olat_b, self.registers.reg(olat_b)),
        ];
        self.registers.set_reg(olat_a, a);
        self.registers.set_reg(olat_b, b);
        self.write_or_restore(&saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_pin_creation() {
        assert!(GpioPin::new(0).is_ok());
        assert!(GpioPin::new(15).is_ok());
        assert!(matches!(
            GpioPin::new(16),
            Err(Error::PinArgumentOutOfRange { pin: 16, .. })
        ));
        assert!(resolve_pin(255).is_none());
    }

    #[test]
    fn test_gpio_pin_helpers() {
        let cases = [
            (0, Bank::A, 0),
            (7, Bank::A, 7),
            (8, Bank::B, 0),
            (15, Bank::B, 7),
        ];
        for (num, bank, bit) in cases {
            let pin = GpioPin::new(num).unwrap();
            assert_eq!(pin.bank(), bank, "pin {num}");
            assert_eq!(pin.bit_index(), bit, "pin {num}");
            assert_eq!(pin.mask(), 1 << bit, "pin {num}");
        }
        let pin = GpioPin::new(9).unwrap();
        assert_eq!(pin.register(RegisterPair::IoDir), Register::IoDirB);
        assert_eq!(pin.register(RegisterPair::Olat), Register::OlatB);
        let pin = GpioPin::new(6).unwrap();
        assert_eq!(pin.register(RegisterPair::Gppu), Register::GppuA);
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(PinLevel::from(true), PinLevel::High);
        assert_eq!(PinLevel::from(false), PinLevel::Low);
        assert!(bool::from(PinLevel::High));
    }
}
