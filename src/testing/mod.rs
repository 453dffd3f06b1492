//! Register-level model of the TWI unit
//!
//! [`SimTwi`] stands in for the hardware in host tests. Master-side
//! operations complete from a script of canned replies; slave-side bus
//! events are injected with [`SimTwi::raise`]. Every register write is
//! recorded so tests can check exactly what the driver did.

use heapless::{Deque, Vec};

use crate::twi::regs::{TwiRegisters, TWINT, TWPS_MASK, TWSTA, TWSTO};
use crate::twi::status::{Status, STATUS_MASK};

const SCRIPT_DEPTH: usize = 16;
const LOG_DEPTH: usize = 64;

/// One recorded register write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Control(u8),
    Data(u8),
    OwnAddress(u8),
    BitRate(u8),
    Prescaler(u8),
}

/// Outcome of the next operation the driver triggers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: Status,
    /// Byte the remote side puts on the bus, if any
    pub data: Option<u8>,
}

pub struct SimTwi {
    control: u8,
    status: u8,
    data: u8,
    own_address: u8,
    bit_rate: u8,
    script: Deque<Reply, SCRIPT_DEPTH>,
    log: Vec<Access, LOG_DEPTH>,
    starts: u32,
    stops: u32,
    flag_clears: u32,
}

impl SimTwi {
    pub const fn new() -> Self {
        Self {
            control: 0,
            status: Status::NoInfo.code(),
            data: 0,
            own_address: 0,
            bit_rate: 0,
            script: Deque::new(),
            log: Vec::new(),
            starts: 0,
            stops: 0,
            flag_clears: 0,
        }
    }

    /// Queue the status the next triggered operation completes with
    pub fn reply(&mut self, status: Status) -> &mut Self {
        self.reply_with(status, None)
    }

    /// Queue a completion that also delivers a received byte
    pub fn reply_with(&mut self, status: Status, data: Option<u8>) -> &mut Self {
        if self.script.push_back(Reply { status, data }).is_err() {
            panic!("SimTwi script is limited to {} replies", SCRIPT_DEPTH);
        }
        self
    }

    /// Signal a bus event: set the status and raise TWINT
    pub fn raise(&mut self, status: Status) {
        self.set_status_code(status);
        self.control |= TWINT;
    }

    /// Signal a bus event that came with a received byte
    pub fn raise_with(&mut self, status: Status, byte: u8) {
        self.data = byte;
        self.raise(status);
    }

    /// Replies still queued
    pub fn pending(&self) -> usize {
        self.script.len()
    }

    pub fn is_flag_set(&self) -> bool {
        self.control & TWINT != 0
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }

    pub fn stops(&self) -> u32 {
        self.stops
    }

    /// Number of writes that cleared TWINT
    pub fn flag_clears(&self) -> u32 {
        self.flag_clears
    }

    pub fn own_address(&self) -> u8 {
        self.own_address
    }

    pub fn bit_rate(&self) -> u8 {
        self.bit_rate
    }

    pub fn accesses(&self) -> &[Access] {
        &self.log
    }

    /// Bytes written to TWDR, in order
    pub fn transmitted(&self) -> impl Iterator<Item = u8> + '_ {
        self.log.iter().filter_map(|access| match access {
            Access::Data(byte) => Some(*byte),
            _ => None,
        })
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.starts = 0;
        self.stops = 0;
        self.flag_clears = 0;
    }

    fn record(&mut self, access: Access) {
        // Long scenarios only lose their tail
        let _ = self.log.push(access);
    }

    fn set_status_code(&mut self, status: Status) {
        self.status = (status.code() & STATUS_MASK) | (self.status & TWPS_MASK);
    }
}

impl Default for SimTwi {
    fn default() -> Self {
        Self::new()
    }
}

impl TwiRegisters for SimTwi {
    fn control(&self) -> u8 {
        self.control
    }

    fn set_control(&mut self, bits: u8) {
        self.record(Access::Control(bits));

        if bits & TWINT == 0 {
            // Writing 0 to TWINT leaves the flag alone
            self.control = bits | (self.control & TWINT);
            return;
        }
        self.flag_clears += 1;

        if bits & TWSTO != 0 {
            // Hardware clears TWSTO once the stop is out; TWINT stays low
            self.stops += 1;
            self.control = bits & !(TWINT | TWSTO);
            return;
        }
        if bits & TWSTA != 0 {
            self.starts += 1;
        }

        match self.script.pop_front() {
            Some(reply) => {
                self.set_status_code(reply.status);
                if let Some(byte) = reply.data {
                    self.data = byte;
                }
                self.control = bits | TWINT;
            }
            None => self.control = bits & !TWINT,
        }
    }

    fn status(&self) -> u8 {
        self.status
    }

    fn set_prescaler(&mut self, bits: u8) {
        self.record(Access::Prescaler(bits));
        self.status = (self.status & !TWPS_MASK) | (bits & TWPS_MASK);
    }

    fn data(&self) -> u8 {
        self.data
    }

    fn set_data(&mut self, byte: u8) {
        self.record(Access::Data(byte));
        self.data = byte;
    }

    fn set_own_address(&mut self, bits: u8) {
        self.record(Access::OwnAddress(bits));
        self.own_address = bits;
    }

    fn set_bit_rate(&mut self, twbr: u8) {
        self.record(Access::BitRate(twbr));
        self.bit_rate = twbr;
    }
}
