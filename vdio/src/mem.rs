// SPDX-License-Identifier: MIT

use crate::{VdIO, VdIOError, VdIOResult};

/// In-memory implementation of `VdIO`.
///
/// Owns its buffer so a whole disk image can live in RAM (tests, dry runs).
#[derive(Debug, Clone, Default)]
pub struct MemVdIO {
    buffer: Vec<u8>,
}

impl MemVdIO {
    /// Creates a zero-filled store of `len` bytes.
    #[inline]
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0u8; len],
        }
    }

    #[inline]
    pub fn from_vec(buffer: Vec<u8>) -> Self {
        Self { buffer }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    #[inline]
    fn range(&self, offset: u64, len: usize) -> VdIOResult<core::ops::Range<usize>> {
        let start = usize::try_from(offset).map_err(|_| VdIOError::OutOfBounds)?;
        let end = start.checked_add(len).ok_or(VdIOError::OutOfBounds)?;
        if end > self.buffer.len() {
            return Err(VdIOError::OutOfBounds);
        }
        Ok(start..end)
    }
}

impl VdIO for MemVdIO {
    #[inline(always)]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VdIOResult {
        let range = self.range(offset, data.len())?;
        self.buffer[range].copy_from_slice(data);
        Ok(())
    }

    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VdIOResult {
        let range = self.range(offset, buf.len())?;
        buf.copy_from_slice(&self.buffer[range]);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> VdIOResult {
        Ok(())
    }

    #[inline]
    fn len(&mut self) -> VdIOResult<u64> {
        Ok(self.buffer.len() as u64)
    }
}
