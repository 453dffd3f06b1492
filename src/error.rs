//! Bus transaction errors

use core::fmt;

use ufmt::derive::uDebug;

use crate::twi::Status;

/// Why a bus transaction did not complete
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiError {
    /// Address or data byte answered with NACK: slave absent or busy
    NoAcknowledgment(Status),
    /// Status that does not belong to the stage being executed
    UnexpectedStatus(Status),
    /// Another master took the bus
    ArbitrationLost,
    /// The peripheral never signalled completion
    BusTimeout,
    /// Address does not fit in seven bits
    InvalidAddress(u8),
}

pub type Result<T> = core::result::Result<T, TwiError>;

impl TwiError {
    /// Classify a status that stopped a master transaction
    pub const fn from_status(status: Status) -> Self {
        if status.is_nack() {
            TwiError::NoAcknowledgment(status)
        } else if matches!(status, Status::ArbitrationLost) {
            TwiError::ArbitrationLost
        } else {
            TwiError::UnexpectedStatus(status)
        }
    }

    /// Raw status code carried by the error, if any
    pub const fn status(&self) -> Option<Status> {
        match self {
            TwiError::NoAcknowledgment(status) | TwiError::UnexpectedStatus(status) => {
                Some(*status)
            }
            TwiError::ArbitrationLost => Some(Status::ArbitrationLost),
            TwiError::BusTimeout | TwiError::InvalidAddress(_) => None,
        }
    }
}

impl fmt::Display for TwiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwiError::NoAcknowledgment(status) => {
                write!(f, "no acknowledgment (status 0x{:02X})", status.code())
            }
            TwiError::UnexpectedStatus(status) => {
                write!(f, "unexpected status 0x{:02X}", status.code())
            }
            TwiError::ArbitrationLost => f.write_str("arbitration lost"),
            TwiError::BusTimeout => f.write_str("bus timeout"),
            TwiError::InvalidAddress(raw) => write!(f, "invalid 7-bit address 0x{:02X}", raw),
        }
    }
}
