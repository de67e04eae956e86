use thiserror::Error;

/// Errors that can occur when talking to an MCP23S17.
///
/// Requests that name a pin or register the chip does not have are not errors
/// at the driver level (they are dropped, as the chip itself does). The
/// variants below cover transport failures and the typed constructors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A byte transfer or flush on the SPI bus failed.
    #[error("SPI bus error: {0}")]
    Spi(embedded_hal::spi::ErrorKind),
    /// The chip-select line could not be driven.
    #[error("Chip-select pin error: {0}")]
    ChipSelect(embedded_hal::digital::ErrorKind),
    /// Failure reported by a custom [`Transport`](crate::Transport) implementation.
    #[error("Transport error: {0}")]
    Transport(String),
    /// GPIO pin number is outside the valid range (0-15).
    #[error("GPIO pin {pin} argument out of range (0-15): {message}")]
    PinArgumentOutOfRange {
        /// The invalid pin number that was specified.
        pin: u8,
        /// Detailed error message explaining the constraint.
        message: String,
    },
    /// Register index is outside the chip's register map (0x00-0x15).
    #[error("Register index 0x{0:02X} out of range (0x00-0x15)")]
    RegisterOutOfRange(u8),
}

/// Result type alias for MCP23S17 operations.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn spi_error<E: embedded_hal::spi::Error>(e: E) -> Error {
    Error::Spi(e.kind())
}

pub(crate) fn chip_select_error<E: embedded_hal::digital::Error>(e: E) -> Error {
    Error::ChipSelect(e.kind())
}
