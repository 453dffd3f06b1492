//! Analog input boundary

/// A 10-bit single-ended ADC
pub trait AnalogInput {
    /// Run one conversion on `channel` and return the 10-bit result
    fn read(&mut self, channel: u8) -> u16;
}

/// Keep the 8 most significant bits of a 10-bit sample
pub const fn high_byte(sample: u16) -> u8 {
    ((sample & 0x03FF) >> 2) as u8
}
