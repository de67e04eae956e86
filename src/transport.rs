//! Byte-level SPI transport used by the driver.

use crate::error::{self, Result};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use log::trace;

/// The operations the driver needs from the SPI link and its chip-select line.
///
/// Every register access is bracketed as
/// `begin_exclusive, select, transfer_byte..., deselect, end_exclusive`.
/// Implementations that share a bus with other devices can take the bus lock
/// in `begin_exclusive` and release it in `end_exclusive`.
pub trait Transport {
    /// Drives chip-select active (low).
    fn select(&mut self) -> Result<()>;

    /// Drives chip-select inactive (high).
    fn deselect(&mut self) -> Result<()>;

    /// Clocks out `out` and returns the byte clocked in at the same time.
    fn transfer_byte(&mut self, out: u8) -> Result<u8>;

    /// Called before chip-select is asserted for a frame.
    fn begin_exclusive(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after chip-select is released for a frame.
    fn end_exclusive(&mut self) -> Result<()> {
        Ok(())
    }
}

/// [`Transport`] over an `embedded-hal` SPI bus and an output pin used as
/// chip-select.
///
/// The bus must already be configured for SPI mode 0, MSB first, at no more
/// than 10 MHz.
#[derive(Debug)]
pub struct SpiTransport<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiTransport<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Wraps the bus and chip-select pin, driving chip-select inactive.
    pub fn new(spi: SPI, mut cs: CS) -> Result<Self> {
        cs.set_high().map_err(error::chip_select_error)?;
        Ok(Self { spi, cs })
    }

    /// Gives back the bus and the chip-select pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Transport for SpiTransport<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    fn select(&mut self) -> Result<()> {
        self.cs.set_low().map_err(error::chip_select_error)
    }

    fn deselect(&mut self) -> Result<()> {
        // CS must not rise while the last byte is still on the wire.
        self.spi.flush().map_err(error::spi_error)?;
        self.cs.set_high().map_err(error::chip_select_error)
    }

    fn transfer_byte(&mut self, out: u8) -> Result<u8> {
        let mut buf = [out];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(error::spi_error)?;
        trace!("SPI {:02X} -> {:02X}", out, buf[0]);
        Ok(buf[0])
    }
}
