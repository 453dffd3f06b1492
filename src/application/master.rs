//! Master polling cycle
//!
//! Each round renders the last known values, waits for the display to
//! settle, then asks every remote for a fresh byte: command write, short
//! gap, single-byte read, short gap. A failed transaction leaves the
//! remote's value untouched.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};

use crate::config::{
    ADC_COMMAND, ADC_SLAVE_ADDR, COUNTER_COMMAND, COUNTER_SLAVE_ADDR, CYCLE_PAUSE_MS,
    REFRESH_MS, SPLASH_MS, TRANSACTION_GAP_MS,
};
use ufmt::derive::uDebug;

use crate::drivers::CharDisplay;
use crate::twi::Address;

/// Which of the two polled remotes
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    Counter,
    Adc,
}

impl Slot {
    /// Polling order
    pub const ALL: [Slot; 2] = [Slot::Counter, Slot::Adc];

    const fn index(self) -> usize {
        match self {
            Slot::Counter => 0,
            Slot::Adc => 1,
        }
    }
}

/// A slave polled by the master and where its value goes on screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Remote {
    pub label: &'static str,
    pub address: Address,
    pub command: u8,
    /// (col, row) of the label
    pub label_at: (u8, u8),
    /// (col, row) of the value
    pub value_at: (u8, u8),
    pub value: u8,
}

impl Remote {
    pub const fn counter() -> Self {
        Self {
            label: "Count:",
            address: fixed_address(COUNTER_SLAVE_ADDR),
            command: COUNTER_COMMAND,
            label_at: (0, 0),
            value_at: (4, 1),
            value: 0,
        }
    }

    pub const fn adc() -> Self {
        Self {
            label: "ADC:",
            address: fixed_address(ADC_SLAVE_ADDR),
            command: ADC_COMMAND,
            label_at: (11, 0),
            value_at: (12, 1),
            value: 0,
        }
    }
}

const fn fixed_address(raw: u8) -> Address {
    match Address::new(raw) {
        Some(address) => address,
        None => panic!("slave address out of range"),
    }
}

/// Outcome of one command/read pair
#[derive(Debug, PartialEq, Eq)]
pub struct Exchange<E> {
    pub address: Address,
    pub command: Result<(), E>,
    pub response: Result<u8, E>,
}

impl<E> Exchange<E> {
    pub fn is_ok(&self) -> bool {
        self.command.is_ok() && self.response.is_ok()
    }
}

pub struct Poller<I2C, DISP, D> {
    bus: I2C,
    display: DISP,
    delay: D,
    remotes: [Remote; 2],
}

impl<I2C, DISP, D, E> Poller<I2C, DISP, D>
where
    I2C: Write<Error = E> + Read<Error = E>,
    DISP: CharDisplay,
    D: DelayMs<u16>,
{
    /// Poll the counter and ADC slaves
    pub fn new(bus: I2C, display: DISP, delay: D) -> Self {
        Self::with_remotes(bus, display, delay, [Remote::counter(), Remote::adc()])
    }

    pub fn with_remotes(bus: I2C, display: DISP, delay: D, remotes: [Remote; 2]) -> Self {
        Self {
            bus,
            display,
            delay,
            remotes,
        }
    }

    pub fn splash(&mut self) -> Result<(), DISP::Error> {
        self.display.clear()?;
        self.display.set_cursor(0, 0)?;
        self.display.write_str("TWI link")?;
        self.display.set_cursor(0, 1)?;
        self.display.write_str("Starting...")?;
        self.delay.delay_ms(SPLASH_MS);
        Ok(())
    }

    /// Draw every label with its last known value
    pub fn render(&mut self) -> Result<(), DISP::Error> {
        self.display.clear()?;
        for remote in &self.remotes {
            let (col, row) = remote.label_at;
            self.display.set_cursor(col, row)?;
            self.display.write_str(remote.label)?;
            let (col, row) = remote.value_at;
            self.display.set_cursor(col, row)?;
            self.display.write_number(remote.value)?;
        }
        Ok(())
    }

    /// Send the command of the remote in `slot` and read back its value
    pub fn exchange(&mut self, slot: Slot) -> Exchange<E> {
        let remote = self.remotes[slot.index()];
        let address = remote.address.get();

        let command = self.bus.write(address, &[remote.command]);
        self.delay.delay_ms(TRANSACTION_GAP_MS);

        let mut buf = [0u8; 1];
        let response = self.bus.read(address, &mut buf).map(|()| buf[0]);
        self.delay.delay_ms(TRANSACTION_GAP_MS);

        if let Ok(value) = response {
            self.remotes[slot.index()].value = value;
        }
        Exchange {
            address: remote.address,
            command,
            response,
        }
    }

    /// One full round; display errors abort it, bus errors are reported
    pub fn cycle(&mut self) -> Result<[Exchange<E>; 2], DISP::Error> {
        self.render()?;
        self.delay.delay_ms(REFRESH_MS);
        let report = Slot::ALL.map(|slot| self.exchange(slot));
        self.delay.delay_ms(CYCLE_PAUSE_MS);
        Ok(report)
    }

    pub fn value(&self, slot: Slot) -> u8 {
        self.remote(slot).value
    }

    pub fn remote(&self, slot: Slot) -> &Remote {
        &self.remotes[slot.index()]
    }

    pub fn remotes(&self) -> &[Remote; 2] {
        &self.remotes
    }

    pub fn free(self) -> (I2C, DISP, D) {
        (self.bus, self.display, self.delay)
    }
}
