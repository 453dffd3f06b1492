//! Foreground logic of the three devices
//!
//! Everything here is written against `embedded-hal` and the `drivers`
//! traits, so the same code runs in the firmware and in host tests.

pub mod master;
pub mod slave;

pub use master::{Exchange, Poller, Remote, Slot};
pub use slave::{AdcSlave, CounterSlave, Tick};
