//! TWI peripheral driver
//!
//! Primitive bus operations on top of [`TwiRegisters`]. Nothing here knows
//! which status codes a transaction expects; that lives in the master and
//! slave modules.

use core::convert::Infallible;

use ufmt::derive::uDebug;

use super::address::Address;
use super::regs::{TwiRegisters, TWEA, TWEN, TWGCE, TWIE, TWINT, TWPS_MASK, TWSTA, TWSTO};
use super::status::Status;
use crate::config::{CPU_FREQ_HZ, SCL_HZ, TWBR_MIN_STABLE, TWI_PRESCALER};
use crate::error::{Result, TwiError};

/// Bit-rate prescaler, stored in TWSR[1:0]
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    Div1 = 0,
    Div4 = 1,
    Div16 = 2,
    Div64 = 3,
}

impl Prescaler {
    pub const fn from_factor(factor: u8) -> Option<Self> {
        match factor {
            1 => Some(Self::Div1),
            4 => Some(Self::Div4),
            16 => Some(Self::Div16),
            64 => Some(Self::Div64),
            _ => None,
        }
    }

    pub const fn factor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div4 => 4,
            Self::Div16 => 16,
            Self::Div64 => 64,
        }
    }
}

/// Master clock request
#[derive(Clone, Copy, Debug)]
pub struct MasterConfig {
    pub cpu_hz: u32,
    pub scl_hz: u32,
    /// Prescaler factor; anything but 1, 4, 16 or 64 falls back to 1
    pub prescaler: u8,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            cpu_hz: CPU_FREQ_HZ,
            scl_hz: SCL_HZ,
            prescaler: TWI_PRESCALER,
        }
    }
}

/// TWBR / prescaler pair programmed into the peripheral
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitRate {
    pub twbr: u8,
    pub prescaler: Prescaler,
    cpu_hz: u32,
}

impl BitRate {
    /// `TWBR = (F_CPU / SCL - 16) / (2 * prescaler)`
    ///
    /// Results under [`TWBR_MIN_STABLE`] retry with prescaler 1 and are then
    /// clamped to the threshold.
    pub fn compute(config: &MasterConfig) -> Self {
        let prescaler = Prescaler::from_factor(config.prescaler).unwrap_or(Prescaler::Div1);
        let twbr = Self::divisor(config, prescaler);
        if twbr >= TWBR_MIN_STABLE {
            return Self {
                twbr,
                prescaler,
                cpu_hz: config.cpu_hz,
            };
        }

        Self {
            twbr: Self::divisor(config, Prescaler::Div1).max(TWBR_MIN_STABLE),
            prescaler: Prescaler::Div1,
            cpu_hz: config.cpu_hz,
        }
    }

    /// Resulting SCL frequency
    pub fn scl_hz(&self) -> u32 {
        self.cpu_hz / (16 + 2 * self.twbr as u32 * self.prescaler.factor())
    }

    fn divisor(config: &MasterConfig, prescaler: Prescaler) -> u8 {
        let ticks = config
            .cpu_hz
            .checked_div(config.scl_hz)
            .unwrap_or(u32::MAX)
            .saturating_sub(16);
        u8::try_from(ticks / (2 * prescaler.factor())).unwrap_or(u8::MAX)
    }
}

/// Own-address setup for slave mode
#[derive(Clone, Copy, Debug)]
pub struct SlaveConfig {
    pub address: Address,
    /// Also answer the general call address (0x00)
    pub general_call: bool,
}

/// How long a blocking call waits for TWINT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Spin until the hardware answers, however long that takes
    Forever,
    /// Give up with [`TwiError::BusTimeout`] after this many polls
    Spins(u32),
}

/// TWI peripheral driver
pub struct Twi<R> {
    regs: R,
    wait: WaitPolicy,
}

impl<R: TwiRegisters> Twi<R> {
    pub fn new(regs: R, wait: WaitPolicy) -> Self {
        Self { regs, wait }
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    pub fn free(self) -> R {
        self.regs
    }

    /// Program the bit rate and enable the interface
    pub fn configure_master(&mut self, config: &MasterConfig) -> BitRate {
        let rate = BitRate::compute(config);
        self.regs.set_prescaler(rate.prescaler as u8 & TWPS_MASK);
        self.regs.set_bit_rate(rate.twbr);
        let control = self.regs.control();
        self.regs.set_control(control | TWEN);
        rate
    }

    /// Program the own address and arm automatic ACK plus the TWI interrupt
    pub fn configure_slave(&mut self, config: &SlaveConfig) {
        let gce = if config.general_call { TWGCE } else { 0 };
        self.regs.set_own_address((config.address.get() << 1) | gce);
        self.regs.set_control(TWEA | TWEN | TWIE);
    }

    /// Current status, prescaler bits dropped
    pub fn status(&self) -> Status {
        Status::from_register(self.regs.status())
    }

    /// Check whether the current operation finished
    pub fn poll_complete(&self) -> nb::Result<Status, Infallible> {
        if self.regs.control() & TWINT != 0 {
            Ok(self.status())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Send a start (or repeated start) condition
    pub fn start(&mut self) -> Result<Status> {
        self.regs.set_control(TWINT | TWSTA | TWEN);
        self.wait()
    }

    /// Send a stop condition. Does not wait: TWINT is not set after a stop.
    pub fn stop(&mut self) {
        self.regs.set_control(TWINT | TWSTO | TWEN);
    }

    /// Transmit one byte and return the resulting status
    pub fn write_byte(&mut self, byte: u8) -> Result<Status> {
        self.regs.set_data(byte);
        self.regs.set_control(TWINT | TWEN);
        self.wait()
    }

    /// Receive one byte, answering ACK or NACK
    pub fn read_byte(&mut self, ack: bool) -> Result<(u8, Status)> {
        let ea = if ack { TWEA } else { 0 };
        self.regs.set_control(TWINT | TWEN | ea);
        let status = self.wait()?;
        Ok((self.regs.data(), status))
    }

    /// Put a byte in TWDR without starting anything
    pub fn load(&mut self, byte: u8) {
        self.regs.set_data(byte);
    }

    /// Last byte received
    pub fn data(&self) -> u8 {
        self.regs.data()
    }

    /// Transmit the loaded byte as a slave and stay addressable
    pub fn arm_for_reply(&mut self) {
        self.regs.set_control(TWINT | TWEA | TWEN | TWIE);
    }

    /// Clear the event flag and keep listening
    pub fn release(&mut self) {
        let control = self.regs.control();
        self.regs.set_control(control | TWINT);
    }

    /// Clear the event flag and drop back to the unaddressed state,
    /// releasing SDA/SCL after a bus error
    pub fn recover(&mut self) {
        let control = self.regs.control();
        self.regs.set_control(control | TWINT | TWSTO);
    }

    fn wait(&self) -> Result<Status> {
        match self.wait {
            WaitPolicy::Forever => match nb::block!(self.poll_complete()) {
                Ok(status) => Ok(status),
                Err(never) => match never {},
            },
            WaitPolicy::Spins(budget) => {
                for _ in 0..budget {
                    if let Ok(status) = self.poll_complete() {
                        return Ok(status);
                    }
                }
                Err(TwiError::BusTimeout)
            }
        }
    }
}
