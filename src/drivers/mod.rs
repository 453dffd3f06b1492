pub mod analog;
pub mod button_handler;
pub mod display;

pub use analog::AnalogInput;
pub use button_handler::{Button, ButtonHandler, Indicator, Nibble};
pub use display::{CharDisplay, ConsoleDisplay};
