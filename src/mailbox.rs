//! Single-byte cells shared between the TWI interrupt and the main loop
//!
//! Both cells are only ever touched inside a critical section, so a value is
//! never observed half-written regardless of where the interrupt lands.

use core::cell::Cell;

use critical_section::Mutex;

/// Value of an empty [`CommandCell`]
pub const NO_COMMAND: u8 = 0;

/// Last command byte received from the master
pub struct CommandCell {
    byte: Mutex<Cell<u8>>,
}

impl CommandCell {
    pub const fn new() -> Self {
        Self {
            byte: Mutex::new(Cell::new(NO_COMMAND)),
        }
    }

    /// Store a received byte, replacing whatever was there
    pub fn post(&self, byte: u8) {
        critical_section::with(|cs| self.byte.borrow(cs).set(byte));
    }

    /// Current byte, `None` when empty
    pub fn peek(&self) -> Option<u8> {
        let byte = critical_section::with(|cs| self.byte.borrow(cs).get());
        (byte != NO_COMMAND).then_some(byte)
    }

    /// Consume the cell if it holds `command`
    pub fn take_if(&self, command: u8) -> bool {
        critical_section::with(|cs| {
            let cell = self.byte.borrow(cs);
            if cell.get() == command && command != NO_COMMAND {
                cell.set(NO_COMMAND);
                true
            } else {
                false
            }
        })
    }

    /// Consume whatever the cell holds
    pub fn take(&self) -> Option<u8> {
        let byte = critical_section::with(|cs| self.byte.borrow(cs).replace(NO_COMMAND));
        (byte != NO_COMMAND).then_some(byte)
    }

    pub fn clear(&self) {
        self.post(NO_COMMAND);
    }
}

impl Default for CommandCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte handed to the master on its next read
pub struct ResponseCell {
    value: Mutex<Cell<u8>>,
}

impl ResponseCell {
    pub const fn new(initial: u8) -> Self {
        Self {
            value: Mutex::new(Cell::new(initial)),
        }
    }

    pub fn get(&self) -> u8 {
        critical_section::with(|cs| self.value.borrow(cs).get())
    }

    pub fn set(&self, value: u8) {
        critical_section::with(|cs| self.value.borrow(cs).set(value));
    }

    /// Publish the high 8 bits of a 10-bit sample. The reduction happens
    /// before the value becomes visible to the interrupt.
    pub fn publish_sample(&self, sample: u16) {
        self.set(crate::drivers::analog::high_byte(sample));
    }
}

impl Default for ResponseCell {
    fn default() -> Self {
        Self::new(0)
    }
}
