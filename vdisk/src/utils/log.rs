// SPDX-License-Identifier: MIT

use colored::{ColoredString, Colorize};
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

impl LogLevel {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Quiet,
            2 => LogLevel::Verbose,
            _ => LogLevel::Normal,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            LogLevel::Quiet => 0,
            LogLevel::Normal => 1,
            LogLevel::Verbose => 2,
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(1);

pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level.as_u8(), Ordering::Relaxed);
}

pub fn log_level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// `[vdisk]` line prefix.
pub fn prefix() -> ColoredString {
    "[vdisk]".cyan().bold()
}

pub fn success(msg: &str) -> ColoredString {
    msg.green()
}

pub fn failure(msg: &str) -> ColoredString {
    msg.red()
}

pub fn header(msg: &str) -> ColoredString {
    msg.cyan()
}

#[macro_export]
macro_rules! log_normal {
    ($($arg:tt)*) => {
        println!("{} {}", $crate::utils::prefix(), format_args!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if $crate::utils::log_level() != $crate::utils::LogLevel::Quiet {
            println!("{} {}", $crate::utils::prefix(), format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($($arg:tt)*) => {
        if $crate::utils::log_level() == $crate::utils::LogLevel::Verbose {
            println!("{} {}", $crate::utils::prefix(), format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        eprintln!(
            "{} {}",
            $crate::utils::prefix(),
            $crate::utils::failure(&format!($($arg)*))
        );
    };
}
