//! Millisecond delays on Timer0

use avr_device::atmega328p::TC0;
use core::marker::PhantomData;
use embedded_hal::blocking::delay::DelayMs;

use crate::config::CPU_FREQ_HZ;

// clk/64
const CS_DIV64: u8 = 0x03;
const TICKS_PER_MS: u8 = (CPU_FREQ_HZ / 64 / 1000) as u8;
const _: () = assert!(CPU_FREQ_HZ / 64 / 1000 <= u8::MAX as u32);

/// Busy-wait delay; Timer0 runs only while a delay is in progress
pub struct Delay {
    _timer: PhantomData<TC0>,
}

impl Delay {
    pub fn new(_timer: TC0) -> Self {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr0a.write(|w| w.bits(0));
            (*p).tccr0b.write(|w| w.bits(0));
        }
        Self {
            _timer: PhantomData,
        }
    }

    fn wait_one_ms(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).tcnt0.write(|w| w.bits(0));
            while (*p).tcnt0.read().bits() < TICKS_PER_MS {}
        }
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        unsafe { (*TC0::ptr()).tccr0b.write(|w| w.bits(CS_DIV64)) };
        for _ in 0..ms {
            self.wait_one_ms();
        }
        unsafe { (*TC0::ptr()).tccr0b.write(|w| w.bits(0)) };
    }
}

impl DelayMs<u8> for Delay {
    fn delay_ms(&mut self, ms: u8) {
        DelayMs::<u16>::delay_ms(self, u16::from(ms));
    }
}
