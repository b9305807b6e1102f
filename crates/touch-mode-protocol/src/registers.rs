//! Register addresses and command identifiers.
//!
//! FocalTech controllers expose feature modes as plain byte registers on the
//! host bus. Goodix Berlin controllers take firmware commands with up to two
//! argument bytes instead.

/// FocalTech register map.
pub mod focaltech {
    /// Edge rotation (0 portrait, 1 left, 2 right).
    pub const EDGE_ROTATION: u16 = 0x8C;
    /// Edge suppression level.
    pub const EDGE_LEVEL: u16 = 0x8D;
    /// Sample (active scan) switch.
    pub const SAMPLE_SWITCH: u16 = 0x8A;
    /// Charger mode (bit 0) and pocket mode (bit 7) share this register.
    pub const CHARGER_POCKET: u16 = 0x8B;
    /// Pocket mode enable bit in [`CHARGER_POCKET`].
    pub const POCKET_BIT: u8 = 1 << 7;
    /// Charger mode enable bit in [`CHARGER_POCKET`].
    pub const CHARGER_BIT: u8 = 1 << 0;
    /// Report rate selector.
    pub const REPORT_RATE: u16 = 0x8E;
    /// Power mode register.
    pub const POWER_MODE: u16 = 0xA5;
    pub const POWER_MODE_ACTIVE: u8 = 0x00;
    pub const POWER_MODE_STANDBY: u8 = 0x01;
    /// Firmware version, reported as the config id.
    pub const FW_VERSION: u16 = 0xA6;
    /// Pitch configuration shares the LIC version register.
    pub const PITCH: u16 = 0xE4;

    pub const REPORT_RATE_120HZ: u8 = 0x0C;
    pub const REPORT_RATE_240HZ: u8 = 0x18;
    pub const REPORT_RATE_360HZ: u8 = 0x24;
}

/// Goodix Berlin firmware commands.
pub mod goodix {
    pub const EDGE_SWITCH: u8 = 0x17;
    pub const PITCH_SWITCH: u8 = 0x29;
    pub const POCKET_MODE: u8 = 0x63;
    pub const STOWED_MODE: u8 = 0x97;
    /// High report rate control; argument 0 drops back to 120 Hz.
    pub const REPORT_RATE: u8 = 0xC1;
    pub const SAMPLE_SWITCH: u8 = 0xC2;

    /// Edge byte for a rotated panel that is already at the big level.
    pub const EDGE_BIGGEST: u8 = 0xC0;
}
