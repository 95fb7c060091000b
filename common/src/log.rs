//! Crate-internal logging macros.
//!
//! With the `defmt` feature every statement forwards to the matching `defmt`
//! macro (RTT on hardware). Otherwise the message is formatted into a
//! fixed-size line and handed to [`emit`], which prints it when the `std`
//! feature is on (the simulator enables it) and drops it otherwise.
//!
//! Format strings must stay within the subset both backends accept: plain
//! `{}` placeholders with arguments that implement both `Display` and
//! `defmt::Format`.

#![allow(unused_macros)]
#![cfg_attr(feature = "defmt", allow(dead_code))]

use core::fmt::{self, Write};

use heapless::String;

/// Longest formatted message; the rest is cut.
pub const LOG_MSG_LEN: usize = 72;

/// Severity of a log line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

impl Level {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
        }
    }
}

/// Format one line and send it to the host backend.
pub fn emit(
    level: Level,
    args: fmt::Arguments<'_>,
) {
    let mut line: String<LOG_MSG_LEN> = String::new();
    // A piece that overflows the line is dropped
    let _ = line.write_fmt(args);

    #[cfg(feature = "std")]
    ::std::println!("[watchface] {:<5} {}", level.label(), line);

    #[cfg(test)]
    capture::record(level, &line);

    #[cfg(not(any(feature = "std", test)))]
    let _ = (level, line);
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Debug, format_args!($($arg)*))
    };
}

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Info, format_args!($($arg)*))
    };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Warn, format_args!($($arg)*))
    };
}


// =============================================================================
// Tests
// =============================================================================

#[cfg(all(test, not(feature = "defmt")))]
mod tests {
    use super::*;

    #[test]
    fn test_macros_format_arguments() {
        capture::take();
        warn!("value {} out of {}", 7, 4);
        info!("plain");
        let lines = capture::take();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (Level::Warn, "value 7 out of 4".into()));
        assert_eq!(lines[1].0, Level::Info);
    }

    #[test]
    fn test_long_message_is_cut() {
        capture::take();
        let long = "x".repeat(200);
        debug!("{}", long);
        let lines = capture::take();
        assert!(lines[0].1.len() <= LOG_MSG_LEN);
    }
}
