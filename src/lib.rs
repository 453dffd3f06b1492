//! Two-role TWI link for ATmega devices
//!
//! A master polls two slaves with single-byte command/response exchanges.
//! Each slave answers from its TWI interrupt using a value its foreground
//! loop keeps up to date.

#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod drivers;
pub mod error;
#[cfg(target_arch = "avr")]
pub mod hal;
pub mod logger;
pub mod mailbox;
pub mod master;
pub mod slave;
pub mod testing;
pub mod twi;

pub use error::{Result, TwiError};
