//! Two-wire interface building blocks shared by both roles

mod address;
pub mod peripheral;
pub mod regs;
pub mod status;

pub use address::{Address, Direction};
pub use peripheral::{BitRate, MasterConfig, Prescaler, SlaveConfig, Twi, WaitPolicy};
pub use regs::TwiRegisters;
pub use status::Status;
