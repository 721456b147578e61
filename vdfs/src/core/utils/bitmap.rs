// SPDX-License-Identifier: MIT

//! Allocation map operations on byte slices.
//!
//! Each unit (inode or block) owns one whole byte: `0` is free, `1` is used.
//! Any non-zero byte is treated as used when reading.

/// Byte value of a free unit.
pub const UNIT_FREE: u8 = 0;
/// Byte value of a used unit.
pub const UNIT_USED: u8 = 1;

/// Extension trait for byte-per-unit allocation maps.
pub trait ByteMapOps {
    /// Finds the first free unit at or after `start`.
    fn find_first_free(&self, start: usize) -> Option<usize>;

    /// Counts free units.
    fn count_free(&self) -> usize;
}

impl ByteMapOps for [u8] {
    fn find_first_free(&self, start: usize) -> Option<usize> {
        self.iter()
            .enumerate()
            .skip(start)
            .find(|(_, b)| **b == UNIT_FREE)
            .map(|(i, _)| i)
    }

    fn count_free(&self) -> usize {
        self.iter().filter(|&&b| b == UNIT_FREE).count()
    }
}
