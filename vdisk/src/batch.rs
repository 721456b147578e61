// SPDX-License-Identifier: MIT

use crate::commands::execute;
use crate::context::Context;
use crate::errors::CmdResult;
use crate::parser::parse_line;

/// Per-command outcome of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// One entry per executed command; failures start with `[ERROR]`.
    pub lines: Vec<String>,
    pub failures: usize,
    pub executed: usize,
}

impl BatchReport {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.failures == 0
    }
}

/// Parses and runs one line. Blank and comment lines yield `None`.
pub fn run_line(ctx: &mut Context, line: &str) -> CmdResult<Option<String>> {
    match parse_line(line)? {
        Some(cmd) => execute(ctx, &cmd).map(Some),
        None => Ok(None),
    }
}

/// Runs every line of `script`. A failing command never stops the ones
/// after it.
pub fn run_batch(ctx: &mut Context, script: &str) -> BatchReport {
    let mut report = BatchReport::default();
    for (number, line) in script.lines().enumerate() {
        let outcome = run_line(ctx, line);
        if matches!(outcome, Ok(None)) {
            continue;
        }
        report.executed += 1;
        log_verbose!("line {}: {}", number + 1, line.trim());
        match outcome {
            Ok(Some(message)) => report.lines.push(message),
            Ok(None) => {}
            Err(e) => {
                report.failures += 1;
                report.lines.push(format!("[ERROR] line {}: {}", number + 1, e));
            }
        }
    }
    report
}
