//! TWI registers of the ATmega328P

use avr_device::atmega328p::TWI;
use core::marker::PhantomData;

use crate::twi::regs::TWPS_MASK;
use crate::twi::TwiRegisters;

/// Owner of the TWI register block
pub struct Twi0 {
    _twi: PhantomData<TWI>,
}

impl Twi0 {
    pub fn new(_twi: TWI) -> Self {
        Self { _twi: PhantomData }
    }

    /// Second handle for the TWI interrupt.
    ///
    /// # Safety
    /// The caller must make sure the foreground code no longer drives the
    /// TWI once interrupts are enabled.
    pub unsafe fn steal() -> Self {
        Self { _twi: PhantomData }
    }
}

impl TwiRegisters for Twi0 {
    fn control(&self) -> u8 {
        unsafe { (*TWI::ptr()).twcr.read().bits() }
    }

    fn set_control(&mut self, bits: u8) {
        unsafe { (*TWI::ptr()).twcr.write(|w| w.bits(bits)) }
    }

    fn status(&self) -> u8 {
        unsafe { (*TWI::ptr()).twsr.read().bits() }
    }

    fn set_prescaler(&mut self, bits: u8) {
        unsafe { (*TWI::ptr()).twsr.write(|w| w.bits(bits & TWPS_MASK)) }
    }

    fn data(&self) -> u8 {
        unsafe { (*TWI::ptr()).twdr.read().bits() }
    }

    fn set_data(&mut self, byte: u8) {
        unsafe { (*TWI::ptr()).twdr.write(|w| w.bits(byte)) }
    }

    fn set_own_address(&mut self, bits: u8) {
        unsafe { (*TWI::ptr()).twar.write(|w| w.bits(bits)) }
    }

    fn set_bit_rate(&mut self, twbr: u8) {
        unsafe { (*TWI::ptr()).twbr.write(|w| w.bits(twbr)) }
    }
}
