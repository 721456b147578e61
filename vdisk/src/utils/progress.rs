// SPDX-License-Identifier: MIT

use indicatif::{ProgressBar, ProgressStyle};

use crate::utils::{LogLevel, log_level};

/// Byte progress bar for long zero fills. Hidden in quiet mode.
pub fn zero_fill_bar(total_size: u64, message: &str) -> ProgressBar {
    if log_level() == LogLevel::Quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total_size);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.white}] {bytes}/{total_bytes} (ETA {eta_precise}) {msg}")
        .map(|style| style.progress_chars("█░░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
