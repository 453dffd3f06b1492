//! TWI register access

/// TWCR: interrupt flag, written 1 to clear it and start the next operation
pub const TWINT: u8 = 0x80;
/// TWCR: acknowledge enable
pub const TWEA: u8 = 0x40;
/// TWCR: start condition
pub const TWSTA: u8 = 0x20;
/// TWCR: stop condition
pub const TWSTO: u8 = 0x10;
/// TWCR: interface enable
pub const TWEN: u8 = 0x04;
/// TWCR: interrupt enable
pub const TWIE: u8 = 0x01;

/// TWSR: prescaler bits
pub const TWPS_MASK: u8 = 0x03;

/// TWAR: general call recognition enable
pub const TWGCE: u8 = 0x01;

/// Raw access to the registers of one TWI unit.
///
/// Implementations do no protocol work; they only move bytes in and out of
/// the hardware (or a model of it).
pub trait TwiRegisters {
    /// TWCR
    fn control(&self) -> u8;
    fn set_control(&mut self, bits: u8);

    /// TWSR, unmasked
    fn status(&self) -> u8;
    /// Write the prescaler bits of TWSR
    fn set_prescaler(&mut self, bits: u8);

    /// TWDR
    fn data(&self) -> u8;
    fn set_data(&mut self, byte: u8);

    /// TWAR
    fn set_own_address(&mut self, bits: u8);

    /// TWBR
    fn set_bit_rate(&mut self, twbr: u8);
}

impl<T: TwiRegisters + ?Sized> TwiRegisters for &mut T {
    fn control(&self) -> u8 {
        (**self).control()
    }

    fn set_control(&mut self, bits: u8) {
        (**self).set_control(bits)
    }

    fn status(&self) -> u8 {
        (**self).status()
    }

    fn set_prescaler(&mut self, bits: u8) {
        (**self).set_prescaler(bits)
    }

    fn data(&self) -> u8 {
        (**self).data()
    }

    fn set_data(&mut self, byte: u8) {
        (**self).set_data(byte)
    }

    fn set_own_address(&mut self, bits: u8) {
        (**self).set_own_address(bits)
    }

    fn set_bit_rate(&mut self, twbr: u8) {
        (**self).set_bit_rate(twbr)
    }
}
