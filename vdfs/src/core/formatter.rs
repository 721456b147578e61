// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsFormatterError, FsFormatterResult};

use crate::core::meta::FsMeta;
use vdio::{VdIO, VdIOExt};

/// A Formatter for a filesystem type.
///
/// Implementations encapsulate all required state (I/O backend, metadata).
/// Used to prepare the low-level structure of a filesystem on the target I/O backend.
///
/// The formatter must perform a *full format* if `full_format` is `true`,
/// or a quick format otherwise.
pub trait FsFormatter {
    /// Format the filesystem.
    ///
    /// - `full_format`: if `true`, zero the whole partition first, else only the bitmaps
    #[must_use = "format result must be checked for errors"]
    fn format(&mut self, full_format: bool) -> FsFormatterResult;

    /// Flush any buffered writes to disk.
    #[must_use = "flush result must be checked for errors"]
    fn flush(&mut self) -> FsFormatterResult<()> {
        Ok(())
    }
}

/// Zeroes the whole region described by `meta`, reporting progress in bytes.
pub fn zero_volume<M: FsMeta, IO: VdIO + ?Sized, F: FnMut(u64)>(
    io: &mut IO,
    meta: &M,
    progress: F,
) -> FsFormatterResult {
    io.zero_fill_with(meta.start_offset(), meta.size_bytes(), progress)?;
    Ok(())
}
