//! Master transaction engine
//!
//! Every public operation is a complete bus transaction: start, address
//! byte, data phase, stop. Each step blocks until TWINT and its status is
//! checked against the stage that was just executed. Any failure sends a
//! stop before returning. After a lost arbitration the unit is no longer
//! master, so that stop only clears TWINT and drops it back to
//! not-addressed slave mode.

use embedded_hal::blocking::i2c::{Read, Write, WriteRead};

use crate::error::{Result, TwiError};
use crate::twi::{Address, BitRate, Direction, MasterConfig, Status, Twi, TwiRegisters};

/// Protocol step whose completion status is being checked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Start,
    Address(Direction),
    DataWrite,
    DataRead,
}

impl Stage {
    /// Whether `status` is the expected completion of this stage
    ///
    /// Past the start condition only proceed codes qualify, and each stage
    /// takes the ones that follow from what it just sent.
    pub const fn accepts(self, status: Status) -> bool {
        if let Stage::Start = self {
            return matches!(
                status,
                Status::StartTransmitted | Status::RepStartTransmitted
            );
        }
        if !status.is_proceed() {
            return false;
        }
        match self {
            Stage::Start => false,
            Stage::Address(Direction::Write) => matches!(status, Status::AddrWriteAck),
            Stage::Address(Direction::Read) => matches!(status, Status::AddrReadAck),
            Stage::DataWrite => matches!(status, Status::DataWriteAck),
            Stage::DataRead => matches!(status, Status::DataReadAck | Status::DataReadNack),
        }
    }

    /// Turn a completion status into a step result
    pub const fn check(self, status: Status) -> Result<()> {
        if self.accepts(status) {
            Ok(())
        } else {
            Err(TwiError::from_status(status))
        }
    }
}

/// TWI bus master
pub struct Master<R> {
    twi: Twi<R>,
    rate: BitRate,
}

impl<R: TwiRegisters> Master<R> {
    /// Configure the peripheral for master operation
    pub fn new(mut twi: Twi<R>, config: &MasterConfig) -> Self {
        let rate = twi.configure_master(config);
        Self { twi, rate }
    }

    pub fn bit_rate(&self) -> BitRate {
        self.rate
    }

    pub fn twi(&self) -> &Twi<R> {
        &self.twi
    }

    pub fn twi_mut(&mut self) -> &mut Twi<R> {
        &mut self.twi
    }

    pub fn free(self) -> Twi<R> {
        self.twi
    }

    /// Send a single command byte to a slave
    pub fn write_command(&mut self, slave: Address, command: u8) -> Result<()> {
        self.write_bytes(slave, &[command])
    }

    /// Fetch the single response byte a slave has ready
    pub fn read_response(&mut self, slave: Address) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_bytes(slave, &mut byte)?;
        Ok(byte[0])
    }

    /// Address a slave and release the bus; succeeds if it answered ACK
    pub fn probe(&mut self, slave: Address) -> Result<()> {
        self.write_bytes(slave, &[])
    }

    fn write_bytes(&mut self, slave: Address, bytes: &[u8]) -> Result<()> {
        self.transaction(|twi| {
            begin(twi, slave, Direction::Write)?;
            send(twi, bytes)
        })
    }

    fn read_bytes(&mut self, slave: Address, buffer: &mut [u8]) -> Result<()> {
        self.transaction(|twi| {
            begin(twi, slave, Direction::Read)?;
            receive(twi, buffer)
        })
    }

    fn write_then_read(&mut self, slave: Address, bytes: &[u8], buffer: &mut [u8]) -> Result<()> {
        self.transaction(|twi| {
            begin(twi, slave, Direction::Write)?;
            send(twi, bytes)?;
            begin(twi, slave, Direction::Read)?;
            receive(twi, buffer)
        })
    }

    /// Run the steps of one transaction and always close it
    fn transaction<T>(&mut self, steps: impl FnOnce(&mut Twi<R>) -> Result<T>) -> Result<T> {
        let result = steps(&mut self.twi);
        self.twi.stop();
        result
    }
}

/// Start (or repeated start) followed by the address byte
fn begin<R: TwiRegisters>(twi: &mut Twi<R>, slave: Address, direction: Direction) -> Result<()> {
    Stage::Start.check(twi.start()?)?;
    let status = twi.write_byte(slave.with_direction(direction))?;
    Stage::Address(direction).check(status)
}

fn send<R: TwiRegisters>(twi: &mut Twi<R>, bytes: &[u8]) -> Result<()> {
    for &byte in bytes {
        Stage::DataWrite.check(twi.write_byte(byte)?)?;
    }
    Ok(())
}

/// ACK every byte but the last so the slave stops transmitting
fn receive<R: TwiRegisters>(twi: &mut Twi<R>, buffer: &mut [u8]) -> Result<()> {
    let last = buffer.len().saturating_sub(1);
    for (i, slot) in buffer.iter_mut().enumerate() {
        let (byte, status) = twi.read_byte(i < last)?;
        Stage::DataRead.check(status)?;
        *slot = byte;
    }
    Ok(())
}

impl<R: TwiRegisters> Write for Master<R> {
    type Error = TwiError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        self.write_bytes(Address::try_from(address)?, bytes)
    }
}

impl<R: TwiRegisters> Read for Master<R> {
    type Error = TwiError;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<()> {
        let slave = Address::try_from(address)?;
        // The TWI cannot end a read before the first data byte
        if buffer.is_empty() {
            return Ok(());
        }
        self.read_bytes(slave, buffer)
    }
}

impl<R: TwiRegisters> WriteRead for Master<R> {
    type Error = TwiError;

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<()> {
        let slave = Address::try_from(address)?;
        if buffer.is_empty() {
            return self.write_bytes(slave, bytes);
        }
        self.write_then_read(slave, bytes, buffer)
    }
}
