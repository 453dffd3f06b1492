use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::InputPin;
use ufmt::derive::uDebug;

/// Counter that wraps within 0..=15
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Nibble(u8);

impl Nibble {
    pub const fn new(value: u8) -> Self {
        Self(value & 0x0F)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn increment(&mut self) -> u8 {
        self.0 = (self.0 + 1) & 0x0F;
        self.0
    }

    pub fn decrement(&mut self) -> u8 {
        self.0 = self.0.wrapping_sub(1) & 0x0F;
        self.0
    }
}

/// Four outputs showing a [`Nibble`]
pub trait Indicator {
    fn show(&mut self, value: Nibble);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
}

/// Two active-low push buttons.
///
/// A press is reported on the high-to-low edge, after which the handler
/// waits out the contact bounce before sampling again.
pub struct ButtonHandler<UP, DOWN> {
    up: UP,
    down: DOWN,
    held: [bool; 2],
    settle_ms: u16,
}

impl<UP, DOWN, E> ButtonHandler<UP, DOWN>
where
    UP: InputPin<Error = E>,
    DOWN: InputPin<Error = E>,
{
    pub fn new(up: UP, down: DOWN, settle_ms: u16) -> Self {
        Self {
            up,
            down,
            held: [false; 2],
            settle_ms,
        }
    }

    pub fn poll<D: DelayMs<u16>>(&mut self, delay: &mut D) -> Result<Option<Button>, E> {
        let pressed = [self.up.is_low()?, self.down.is_low()?];

        // Up wins when both go down together
        let event = if pressed[0] && !self.held[0] {
            Some(Button::Up)
        } else if pressed[1] && !self.held[1] {
            Some(Button::Down)
        } else {
            None
        };
        self.held = pressed;

        if event.is_some() {
            delay.delay_ms(self.settle_ms);
        }
        Ok(event)
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Up => self.held[0],
            Button::Down => self.held[1],
        }
    }

    pub fn free(self) -> (UP, DOWN) {
        (self.up, self.down)
    }
}
