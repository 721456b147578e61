// SPDX-License-Identifier: MIT

//! Command layer over `vdpart` and `vdfs`.
//!
//! Parses command lines, keeps the mount table and the login session in a
//! [`Context`], and runs scripts as batches where every command is attempted
//! independently.

#[macro_use]
pub mod utils;

pub mod batch;
pub mod commands;
pub mod config;
pub mod context;
pub mod errors;
pub mod parser;

pub use batch::{BatchReport, run_batch, run_line};
pub use commands::execute;
pub use config::Config;
pub use context::{Context, MountRecord, MountTable, Session};
pub use errors::{CmdError, CmdResult};
pub use parser::{Command, Verb, parse_line};
