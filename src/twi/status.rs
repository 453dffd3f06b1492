//! TWI status codes
//!
//! The values come from the two-wire interface status table of the AVR
//! datasheets (ATmega328P section 22.7). The low three bits of TWSR hold the
//! prescaler and a reserved bit and are masked off before lookup.

use ufmt::derive::uDebug;

/// Mask applied to TWSR before decoding
pub const STATUS_MASK: u8 = 0xF8;

/// Decoded TWI status register
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    // Master, both directions
    StartTransmitted,
    RepStartTransmitted,
    ArbitrationLost,

    // Master transmitter
    AddrWriteAck,
    AddrWriteNack,
    DataWriteAck,
    DataWriteNack,

    // Master receiver
    AddrReadAck,
    AddrReadNack,
    DataReadAck,
    DataReadNack,

    // Slave receiver
    OwnAddrWriteAck,
    ArbLostOwnAddrWriteAck,
    GeneralCallAck,
    ArbLostGeneralCallAck,
    OwnDataAck,
    OwnDataNack,
    GeneralDataAck,
    GeneralDataNack,
    StopOrRepStart,

    // Slave transmitter
    OwnAddrReadAck,
    ArbLostOwnAddrReadAck,
    SlaveDataAck,
    SlaveDataNack,
    SlaveLastDataAck,

    // Miscellaneous
    NoInfo,
    BusError,

    /// A code the status table does not define
    Unknown(u8),
}

impl Status {
    /// Decode a raw TWSR value, dropping the prescaler bits
    pub const fn from_register(twsr: u8) -> Self {
        match twsr & STATUS_MASK {
            0x08 => Self::StartTransmitted,
            0x10 => Self::RepStartTransmitted,
            0x38 => Self::ArbitrationLost,
            0x18 => Self::AddrWriteAck,
            0x20 => Self::AddrWriteNack,
            0x28 => Self::DataWriteAck,
            0x30 => Self::DataWriteNack,
            0x40 => Self::AddrReadAck,
            0x48 => Self::AddrReadNack,
            0x50 => Self::DataReadAck,
            0x58 => Self::DataReadNack,
            0x60 => Self::OwnAddrWriteAck,
            0x68 => Self::ArbLostOwnAddrWriteAck,
            0x70 => Self::GeneralCallAck,
            0x78 => Self::ArbLostGeneralCallAck,
            0x80 => Self::OwnDataAck,
            0x88 => Self::OwnDataNack,
            0x90 => Self::GeneralDataAck,
            0x98 => Self::GeneralDataNack,
            0xA0 => Self::StopOrRepStart,
            0xA8 => Self::OwnAddrReadAck,
            0xB0 => Self::ArbLostOwnAddrReadAck,
            0xB8 => Self::SlaveDataAck,
            0xC0 => Self::SlaveDataNack,
            0xC8 => Self::SlaveLastDataAck,
            0xF8 => Self::NoInfo,
            0x00 => Self::BusError,
            other => Self::Unknown(other),
        }
    }

    /// The masked status code as it appears in the datasheet
    pub const fn code(self) -> u8 {
        match self {
            Self::StartTransmitted => 0x08,
            Self::RepStartTransmitted => 0x10,
            Self::ArbitrationLost => 0x38,
            Self::AddrWriteAck => 0x18,
            Self::AddrWriteNack => 0x20,
            Self::DataWriteAck => 0x28,
            Self::DataWriteNack => 0x30,
            Self::AddrReadAck => 0x40,
            Self::AddrReadNack => 0x48,
            Self::DataReadAck => 0x50,
            Self::DataReadNack => 0x58,
            Self::OwnAddrWriteAck => 0x60,
            Self::ArbLostOwnAddrWriteAck => 0x68,
            Self::GeneralCallAck => 0x70,
            Self::ArbLostGeneralCallAck => 0x78,
            Self::OwnDataAck => 0x80,
            Self::OwnDataNack => 0x88,
            Self::GeneralDataAck => 0x90,
            Self::GeneralDataNack => 0x98,
            Self::StopOrRepStart => 0xA0,
            Self::OwnAddrReadAck => 0xA8,
            Self::ArbLostOwnAddrReadAck => 0xB0,
            Self::SlaveDataAck => 0xB8,
            Self::SlaveDataNack => 0xC0,
            Self::SlaveLastDataAck => 0xC8,
            Self::NoInfo => 0xF8,
            Self::BusError => 0x00,
            Self::Unknown(code) => code,
        }
    }

    /// Codes after which a master transaction may continue.
    ///
    /// Start codes are not in this set; they are checked on their own by the
    /// start stage.
    pub const fn is_proceed(self) -> bool {
        matches!(
            self,
            Self::AddrWriteAck
                | Self::AddrReadAck
                | Self::DataWriteAck
                | Self::DataReadAck
                | Self::DataReadNack
        )
    }

    /// The addressed device, or the receiver of a data byte, answered NACK
    pub const fn is_nack(self) -> bool {
        matches!(
            self,
            Self::AddrWriteNack | Self::DataWriteNack | Self::AddrReadNack
        )
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_prescaler_bits() {
        assert_eq!(Status::from_register(0x18 | 0x03), Status::AddrWriteAck);
        assert_eq!(Status::from_register(0xA8 | 0x01), Status::OwnAddrReadAck);
        assert_eq!(Status::from_register(0x07), Status::BusError);
    }

    #[test]
    fn every_masked_code_survives_decoding() {
        for raw in (0u8..=0xF8).step_by(8) {
            assert_eq!(Status::from_register(raw).code(), raw);
        }
    }

    #[test]
    fn undefined_codes_are_kept() {
        assert_eq!(Status::from_register(0xD0), Status::Unknown(0xD0));
        assert_eq!(Status::from_register(0xE8), Status::Unknown(0xE8));
    }

    #[test]
    fn proceed_set_is_exactly_the_acknowledged_stages() {
        let proceed: Vec<u8> = (0u8..=0xF8)
            .step_by(8)
            .filter(|raw| Status::from_register(*raw).is_proceed())
            .collect();
        assert_eq!(proceed, [0x18, 0x28, 0x40, 0x50, 0x58]);
    }
}
