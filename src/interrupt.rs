//! GPIO interrupt configuration for the MCP23S17.

use crate::consts;
use crate::device::Mcp23s17;
use crate::error::Result;
use crate::gpio::resolve_pin;
use crate::registers::{Register, RegisterPair};
use crate::transport::Transport;
use log::{debug, trace};

/// What makes an enabled pin raise an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptTrigger {
    /// Any change from the previous pin value (INTCON=0).
    Change,
    /// Pin differs from DEFVAL=0, i.e. goes high.
    Rising,
    /// Pin differs from DEFVAL=1, i.e. goes low.
    Falling,
}

/// Active level of the INTA/INTB outputs when they are push-pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptPolarity {
    ActiveLow,
    ActiveHigh,
}

impl<T: Transport> Mcp23s17<T> {
    // Sets an IOCON bit in both mirrored copies; the chip aliases them, so
    // only IOCONA goes out. Both copies are put back if the write fails.
    fn write_iocon_bit(&mut self, bit: usize, value: bool) -> Result<()> {
        let old = self.registers.reg(Register::IoConA);
        self.registers.set_iocon_bit(bit, value);
        let result = self.write_or_restore(&[(Register::IoConA, old)]);
        if result.is_err() {
            self.registers.set_reg(Register::IoConB, old);
        }
        result
    }

    // --- GPIO Interrupt Handling ---
    /// Arms the interrupt of a pin with the given trigger.
    ///
    /// INTCON, DEFVAL and GPINTEN are written in that order, one transaction
    /// each, so the compare configuration is settled before the pin is armed.
    pub fn enable_interrupt(&mut self, pin: u8, trigger: InterruptTrigger) -> Result<()> {
        let Some(pin) = resolve_pin(pin) else {
            return Ok(());
        };
        debug!(
            "Enabling interrupt on pin {}: {:?}",
            pin.number(),
            trigger
        );
        let bit = pin.bit_index();
        let intcon = pin.register(RegisterPair::IntCon);
        let defval = pin.register(RegisterPair::DefVal);
        let gpinten = pin.register(RegisterPair::GpIntEn);
        let saved = [intcon, defval, gpinten].map(|reg| (reg, self.registers.reg(reg)));

        match trigger {
            InterruptTrigger::Change => {
                self.registers.set_bit(intcon, bit, false);
            }
            InterruptTrigger::Rising => {
                self.registers.set_bit(intcon, bit, true);
                self.registers.set_bit(defval, bit, false);
            }
            InterruptTrigger::Falling => {
                self.registers.set_bit(intcon, bit, true);
                self.registers.set_bit(defval, bit, true);
            }
        }
        self.registers.set_bit(gpinten, bit, true);

        self.write_or_restore(&saved)
    }

    /// Disarms the interrupt of a pin.
    ///
    /// INTCON and DEFVAL keep their values, so re-enabling with the same
    /// trigger is cheap.
    pub fn disable_interrupt(&mut self, pin: u8) -> Result<()> {
        let Some(pin) = resolve_pin(pin) else {
            return Ok(());
        };
        debug!("Disabling interrupt on pin {}", pin.number());
        self.write_pin_bit(pin, RegisterPair::GpIntEn, false)
    }

    /// Connects INTA and INTB internally so either bank drives both pins.
    pub fn set_mirror(&mut self, enabled: bool) -> Result<()> {
        debug!("Setting IOCON.MIRROR: {}", enabled);
        self.write_iocon_bit(consts::iocon::MIRROR, enabled)
    }

    /// Selects the active level of the interrupt outputs.
    ///
    /// Ignored by the chip while open-drain mode is enabled.
    pub fn set_interrupt_level(&mut self, polarity: InterruptPolarity) -> Result<()> {
        debug!("Setting IOCON.INTPOL: {:?}", polarity);
        self.write_iocon_bit(
            consts::iocon::INTPOL,
            polarity == InterruptPolarity::ActiveHigh,
        )
    }

    /// Makes the interrupt outputs open-drain, so several chips can share one
    /// host interrupt line (which then needs a pull-up).
    pub fn set_interrupt_open_drain(&mut self, open_drain: bool) -> Result<()> {
        debug!("Setting IOCON.ODR: {}", open_drain);
        self.write_iocon_bit(consts::iocon::ODR, open_drain)
    }

    /// Pins with a pending interrupt, `(INTFB << 8) | INTFA`.
    pub fn interrupt_pins(&mut self) -> Result<u16> {
        self.read_register(Register::IntfA)?;
        self.read_register(Register::IntfB)?;
        let pins = self.registers.pair_value(RegisterPair::Intf);
        trace!("Interrupt flags: 0x{:04X}", pins);
        Ok(pins)
    }

    /// Pin levels captured when the interrupt fired, `(INTCAPB << 8) | INTCAPA`.
    ///
    /// **Reading the capture registers clears the chip's pending interrupt.**
    /// Call this once per interrupt; a second call reflects nothing new.
    pub fn interrupt_value(&mut self) -> Result<u16> {
        self.read_register(Register::IntCapA)?;
        self.read_register(Register::IntCapB)?;
        let value = self.registers.pair_value(RegisterPair::IntCap);
        trace!("Interrupt capture: 0x{:04X}", value);
        Ok(value)
    }
}
