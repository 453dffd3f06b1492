//! Slave foreground loops
//!
//! The interrupt side only ever stores command bytes and reads the response
//! cell. These loops own the response value and keep it fresh.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::InputPin;

use crate::config::{ADC_CHANNEL, ADC_COMMAND, BUTTON_DEBOUNCE_MS, COUNTER_COMMAND};
use crate::drivers::{AnalogInput, Button, ButtonHandler, Indicator, Nibble};
use crate::mailbox::{CommandCell, ResponseCell};

/// What one pass of a foreground loop did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tick {
    /// The published value changed
    pub changed: bool,
    /// The device's command byte was seen and consumed
    pub command_seen: bool,
}

/// Up/down counter shown on four LEDs and served on request
pub struct CounterSlave<UP, DOWN, L> {
    buttons: ButtonHandler<UP, DOWN>,
    leds: L,
    count: Nibble,
}

impl<UP, DOWN, L, E> CounterSlave<UP, DOWN, L>
where
    UP: InputPin<Error = E>,
    DOWN: InputPin<Error = E>,
    L: Indicator,
{
    pub fn new(up: UP, down: DOWN, leds: L) -> Self {
        Self {
            buttons: ButtonHandler::new(up, down, BUTTON_DEBOUNCE_MS),
            leds,
            count: Nibble::default(),
        }
    }

    /// Show and publish the starting count
    pub fn start(&mut self, response: &ResponseCell) {
        self.leds.show(self.count);
        response.set(self.count.value());
    }

    pub fn step<D: DelayMs<u16>>(
        &mut self,
        delay: &mut D,
        command: &CommandCell,
        response: &ResponseCell,
    ) -> Result<Tick, E> {
        let mut tick = Tick::default();

        if let Some(button) = self.buttons.poll(delay)? {
            match button {
                Button::Up => self.count.increment(),
                Button::Down => self.count.decrement(),
            };
            self.leds.show(self.count);
            response.set(self.count.value());
            tick.changed = true;
        }

        if command.take_if(COUNTER_COMMAND) {
            response.set(self.count.value());
            tick.command_seen = true;
        }
        Ok(tick)
    }

    pub fn count(&self) -> Nibble {
        self.count
    }
}

/// Serves the high byte of the latest conversion
pub struct AdcSlave<A> {
    adc: A,
    channel: u8,
    last: u8,
}

impl<A: AnalogInput> AdcSlave<A> {
    pub fn new(adc: A) -> Self {
        Self::with_channel(adc, ADC_CHANNEL)
    }

    pub fn with_channel(adc: A, channel: u8) -> Self {
        Self {
            adc,
            channel,
            last: 0,
        }
    }

    /// Sample, publish, and consume a pending command
    pub fn step(&mut self, command: &CommandCell, response: &ResponseCell) -> Tick {
        let sample = self.adc.read(self.channel);
        response.publish_sample(sample);

        let value = response.get();
        let tick = Tick {
            changed: value != self.last,
            command_seen: command.take_if(ADC_COMMAND),
        };
        self.last = value;
        tick
    }

    pub fn last(&self) -> u8 {
        self.last
    }

    pub fn free(self) -> A {
        self.adc
    }
}
