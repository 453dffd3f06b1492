//! ATmega328P register implementations

pub mod adc;
pub mod gpio;
pub mod timer;
pub mod twi;
pub mod uart;

pub use adc::Adc;
pub use gpio::{twi_pullups, DownButton, NibbleLeds, PdInput, UpButton};
pub use timer::Delay;
pub use twi::Twi0;
pub use uart::Usart0;
