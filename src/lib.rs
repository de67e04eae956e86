//! # mcp23s17-spi
//!
//! A Rust crate for controlling the Microchip MCP23S17 16-bit I/O expander
//! over SPI.
//!
//! The driver keeps a host-side mirror of the chip's 22 registers. Pin, port
//! and interrupt calls update the mirror and write the affected register in a
//! single chip-select framed transaction; input state is always read back
//! from the chip.
//!
//! ## Features
//!
//! *   Arduino-style pin API (`set_mode`, `write_pin`, `read_pin`) with an
//!     explicit `set_output` / `set_pullup` split.
//! *   8-bit port and 16-bit whole-device reads and writes.
//! *   Per-pin interrupt-on-change with `Change`, `Rising` and `Falling`
//!     triggers.
//! *   Interrupt output configuration (mirroring, polarity, open-drain).
//! *   Reading pending-interrupt flags and the captured pin state.
//! *   Several chips on one chip-select line via hardware addressing (0-7).
//! *   Any transport implementing [`Transport`]; [`SpiTransport`] adapts an
//!     `embedded-hal` 1.0 `SpiBus` plus an `OutputPin` chip-select.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::SpiBus;
//! use mcp23s17_spi::{InterruptTrigger, Mcp23s17, PinLevel, PinMode, Result, SpiTransport};
//!
//! fn blink<SPI: SpiBus, CS: OutputPin>(spi: SPI, cs: CS) -> Result<()> {
//!     let transport = SpiTransport::new(spi, cs)?;
//!     let mut expander = Mcp23s17::new(transport, 0);
//!     expander.begin()?;
//!
//!     expander.set_mode(0, PinMode::Output)?;
//!     expander.write_pin(0, PinLevel::High)?;
//!
//!     expander.set_mode(8, PinMode::InputPullup)?;
//!     expander.enable_interrupt(8, InterruptTrigger::Falling)?;
//!     if expander.interrupt_pins()? & (1 << 8) != 0 {
//!         let captured = expander.interrupt_value()?;
//!         println!("pin 8 fell, port state 0x{:04X}", captured);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pin Mapping
//!
//! *   Pins 0-7 map to GPA0-GPA7 (bank A).
//! *   Pins 8-15 map to GPB0-GPB7 (bank B).
//! *   16-bit values carry bank B in the high byte.
//!
//! Pin numbers past 15 and register indices past 0x15 are ignored by the
//! driver operations, the same way the chip ignores undefined addresses.
//!
//! ## Hardware Setup Notes
//!
//! *   SPI mode 0, MSB first, up to 10 MHz.
//! *   Tie A2..A0 to select the hardware address passed to `Mcp23s17::new`.
//! *   With open-drain interrupts, add a pull-up on the host interrupt line.
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

mod consts;
mod device;
mod error;
pub mod gpio;
pub mod interrupt;
pub mod registers;
pub mod transport;

pub use device::Mcp23s17;
pub use error::{Error, Result};
pub use gpio::{GpioPin, PinLevel, PinMode};
pub use interrupt::{InterruptPolarity, InterruptTrigger};
pub use registers::{Bank, Register, RegisterFile, RegisterPair};
pub use transport::{SpiTransport, Transport};
