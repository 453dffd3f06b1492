//! Polled USART0 transmitter for the console

use avr_device::atmega328p::USART0;
use core::convert::Infallible;
use core::marker::PhantomData;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

const UDRE0: u8 = 1 << 5;
const TXEN0: u8 = 1 << 3;
// 8 data bits, no parity, 1 stop bit
const UCSZ_8N1: u8 = 0x06;

const fn ubrr(cpu_hz: u32, baud: u32) -> u16 {
    (cpu_hz / (16 * baud) - 1) as u16
}

pub struct Usart0 {
    _usart: PhantomData<USART0>,
}

impl Usart0 {
    pub fn new(_usart: USART0) -> Self {
        unsafe {
            let p = USART0::ptr();
            (*p).ubrr0.write(|w| w.bits(ubrr(CPU_FREQ_HZ, UART_BAUD)));
            (*p).ucsr0c.write(|w| w.bits(UCSZ_8N1));
            (*p).ucsr0b.write(|w| w.bits(TXEN0));
        }
        Self {
            _usart: PhantomData,
        }
    }

    pub fn write_byte(&self, byte: u8) {
        unsafe {
            let p = USART0::ptr();
            while (*p).ucsr0a.read().bits() & UDRE0 == 0 {}
            (*p).udr0.write(|w| w.bits(byte));
        }
    }
}

/// Shared by the logger and the terminal display
impl ufmt::uWrite for &Usart0 {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}
