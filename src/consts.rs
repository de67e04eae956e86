//! Internal constants: opcode layout, IOCON bits and power-on-reset values.

/// Number of registers in the chip (BANK=0 addressing, 0x00-0x15).
pub const REGISTER_COUNT: usize = 22;

/// Number of GPIO pins (two banks of eight).
pub const PIN_COUNT: u8 = 16;

// --- SPI Control Byte ---
// Format: 0 1 0 0 A2 A1 A0 R/W
pub mod opcode {
    /// Fixed upper bits of the control byte.
    pub const BASE: u8 = 0b0100_0000;
    /// Mask applied to the hardware address before shifting it into place.
    pub const ADDRESS_MASK: u8 = 0b111;
    /// Position of A0 within the control byte.
    pub const ADDRESS_SHIFT: u8 = 1;
    /// R/W bit set for reads.
    pub const READ: u8 = 0b0000_0001;
    /// Byte clocked out while receiving data.
    pub const DUMMY: u8 = 0xFF;
}

// --- IOCON Bits ---
pub mod iocon {
    /// Register addressing mode (driver keeps 0: interleaved A/B).
    #[allow(dead_code)]
    pub const BANK: usize = 7;
    /// INTA/INTB internally connected.
    pub const MIRROR: usize = 6;
    /// Sequential operation disabled when set (driver keeps 0).
    #[allow(dead_code)]
    pub const SEQOP: usize = 5;
    /// Slew rate control disabled on SDA.
    pub const DISSLW: usize = 4;
    /// Hardware address pins enabled.
    pub const HAEN: usize = 3;
    /// INT pins configured as open-drain outputs.
    pub const ODR: usize = 2;
    /// INT pins active-high when set.
    pub const INTPOL: usize = 1;

    /// HAEN | DISSLW, with sequential addressing left enabled.
    pub const DEFAULT: u8 = (1 << HAEN) | (1 << DISSLW);
}

/// Power-on-reset value of IODIRA/IODIRB (all pins inputs).
pub const IODIR_DEFAULT: u8 = 0xFF;
