use ufmt::derive::uDebug;

use crate::error::TwiError;

/// Transfer direction, sent as bit 0 of the address byte
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// 7-bit bus address
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    pub const fn new(raw: u8) -> Option<Self> {
        if raw <= 0x7F {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Address byte sent after a start condition
    pub const fn with_direction(self, direction: Direction) -> u8 {
        (self.0 << 1) | direction as u8
    }
}

impl TryFrom<u8> for Address {
    type Error = TwiError;

    fn try_from(raw: u8) -> Result<Self, TwiError> {
        Address::new(raw).ok_or(TwiError::InvalidAddress(raw))
    }
}
