//! Configuration constants for the TWI link firmware

use crate::logger::Level;

/// CPU frequency in Hz, injected by `build.rs` (override with `TWI_LINK_CPU_HZ`)
pub const CPU_FREQ_HZ: u32 = parse_hz(env!("MCU_FREQ_HZ"));

/// Bus clock requested by the master
pub const SCL_HZ: u32 = 100_000;

/// Bit-rate prescaler requested by the master (1, 4, 16 or 64)
pub const TWI_PRESCALER: u8 = 1;

/// TWBR values below this are not stable on the ATmega TWI
pub const TWBR_MIN_STABLE: u8 = 10;

/// Poll budget for every blocking bus wait before reporting a timeout.
/// A byte at 100 kHz takes roughly 1500 CPU cycles.
pub const WAIT_SPINS: u32 = 20_000;

/// Bus address of the push-button counter slave
pub const COUNTER_SLAVE_ADDR: u8 = 0x30;

/// Bus address of the analog sampler slave
pub const ADC_SLAVE_ADDR: u8 = 0x40;

/// Request byte understood by the counter slave
pub const COUNTER_COMMAND: u8 = b'R';

/// Request byte understood by the analog sampler slave
pub const ADC_COMMAND: u8 = b'L';

/// Analog channel sampled by the analog slave
pub const ADC_CHANNEL: u8 = 6;

/// Splash screen duration at master boot
pub const SPLASH_MS: u16 = 2000;

/// Display settle time before each polling round
pub const REFRESH_MS: u16 = 600;

/// Pause between the command and read transactions of one slave
pub const TRANSACTION_GAP_MS: u16 = 10;

/// Pause at the end of every polling round
pub const CYCLE_PAUSE_MS: u16 = 100;

/// Button settle time after an accepted edge
pub const BUTTON_DEBOUNCE_MS: u16 = 250;

/// UART baud rate of the diagnostic console
pub const UART_BAUD: u32 = 9600;

/// Console messages below this level are dropped
pub const LOG_LEVEL: Level = Level::Info;

const fn parse_hz(digits: &str) -> u32 {
    let bytes = digits.as_bytes();
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "MCU_FREQ_HZ must be decimal");
        value = value * 10 + (digit - b'0') as u32;
        i += 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_clock() {
        assert_eq!(parse_hz("16000000"), 16_000_000);
        assert_eq!(parse_hz("8000000"), 8_000_000);
    }

    #[test]
    fn slave_addresses_fit_seven_bits() {
        assert!(COUNTER_SLAVE_ADDR <= 0x7F);
        assert!(ADC_SLAVE_ADDR <= 0x7F);
        assert_ne!(COUNTER_SLAVE_ADDR, ADC_SLAVE_ADDR);
    }
}
