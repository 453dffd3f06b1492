//! Leveled console logging over any `ufmt` writer
//!
//! Lines look like `[WARN] poll: slave 48 failed: BusTimeout` and end in
//! CRLF for serial terminals. Write errors are dropped; logging never
//! changes the outcome of the code doing the logging.

use ufmt::derive::uDebug;
use ufmt::uWrite;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, uDebug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    pub const fn tag(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

pub struct Console<W> {
    out: W,
    max: Level,
}

impl<W: uWrite> Console<W> {
    /// Messages more verbose than `max` are discarded
    pub fn new(out: W, max: Level) -> Self {
        Self { out, max }
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max
    }

    pub fn set_level(&mut self, max: Level) {
        self.max = max;
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    /// Line prefix; used by the logging macros
    pub fn begin(&mut self, level: Level, tag: &str) {
        let _ = ufmt::uwrite!(self.out, "[{}] {}: ", level.tag(), tag);
    }

    /// Line terminator; used by the logging macros
    pub fn end(&mut self) {
        let _ = self.out.write_str("\r\n");
    }

    /// Log a fixed message
    pub fn line(&mut self, level: Level, tag: &str, msg: &str) {
        if self.enabled(level) {
            self.begin(level, tag);
            let _ = self.out.write_str(msg);
            self.end();
        }
    }

    pub fn free(self) -> W {
        self.out
    }
}

/// Log a formatted line: `log_at!(console, Level::Info, "tag", "x = {}", x)`
#[macro_export]
macro_rules! log_at {
    ($console:expr, $level:expr, $tag:expr, $($arg:tt)+) => {{
        let console = &mut $console;
        let level = $level;
        if console.enabled(level) {
            console.begin(level, $tag);
            let _ = ufmt::uwrite!(console.writer(), $($arg)+);
            console.end();
        }
    }};
}

#[macro_export]
macro_rules! log_error {
    ($console:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($console, $crate::logger::Level::Error, $tag, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($console:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($console, $crate::logger::Level::Warn, $tag, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($console:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($console, $crate::logger::Level::Info, $tag, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($console:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($console, $crate::logger::Level::Debug, $tag, $($arg)+)
    };
}
