// SPDX-License-Identifier: MIT

//! Positioned byte IO over the flat file that backs a virtual disk.
//!
//! Every layer above (partition table, filesystem) talks to storage through
//! [`VdIO`] with absolute offsets, so the same code runs against a real image
//! file ([`prelude::StdVdIO`]) or an in-memory buffer ([`prelude::MemVdIO`]).

// Core modules
pub mod errors;
#[macro_use]
mod macros;

// Backend modules
#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod std;

pub use errors::*;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::VdIO;
    pub use super::VdIOExt;
    pub use super::VdIOStructExt;
    pub use super::errors::*;

    #[cfg(feature = "mem")]
    pub use super::mem::MemVdIO;

    #[cfg(feature = "std")]
    pub use super::std::StdVdIO;
}

/// Size of the scratch buffer used by chunked helpers.
pub const CHUNK_BUF_SIZE: usize = 4096;

// Traits

/// Byte IO abstraction trait.
///
/// Allows read/write/flush at absolute offsets of the backing store.
pub trait VdIO {
    /// Writes `data` at `offset`.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VdIOResult;

    /// Reads `buf.len()` bytes into `buf` from `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VdIOResult;

    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> VdIOResult;

    /// Current length of the backing store in bytes.
    fn len(&mut self) -> VdIOResult<u64>;

    fn is_empty(&mut self) -> VdIOResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Extension helpers for VdIO.
pub trait VdIOExt: VdIO {
    /// Reads `len` bytes starting at `offset` into a fresh vector.
    fn read_vec(&mut self, offset: u64, len: usize) -> VdIOResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_at(offset, &mut buf)?;
        Ok(buf)
    }

    /// Fills a region with `byte`.
    fn fill(&mut self, offset: u64, len: u64, byte: u8) -> VdIOResult {
        let pattern = [byte; CHUNK_BUF_SIZE];
        let mut remaining = len;
        let mut off = offset;
        while remaining > 0 {
            let chunk = remaining.min(CHUNK_BUF_SIZE as u64) as usize;
            self.write_at(off, &pattern[..chunk])?;
            off += chunk as u64;
            remaining -= chunk as u64;
        }
        Ok(())
    }

    /// Fills a region with zeroes.
    ///
    /// `progress` is called with the number of bytes written after each chunk.
    fn zero_fill_with<F: FnMut(u64)>(&mut self, offset: u64, len: u64, mut progress: F) -> VdIOResult {
        const ZERO_BUF: [u8; CHUNK_BUF_SIZE] = [0u8; CHUNK_BUF_SIZE];
        let mut remaining = len;
        let mut off = offset;
        while remaining > 0 {
            let chunk = remaining.min(CHUNK_BUF_SIZE as u64) as usize;
            self.write_at(off, &ZERO_BUF[..chunk])?;
            off += chunk as u64;
            remaining -= chunk as u64;
            progress(chunk as u64);
        }
        Ok(())
    }

    #[inline]
    fn zero_fill(&mut self, offset: u64, len: u64) -> VdIOResult {
        self.zero_fill_with(offset, len, |_| {})
    }

    // Implements read/write helpers for the on-disk primitive types
    vdio_impl_primitive_rw!(u8, i8, i32, u32);
}

impl<T: VdIO + ?Sized> VdIOExt for T {}

/// Extension trait for reading and writing fixed-layout structs using zerocopy.
pub trait VdIOStructExt: VdIO {
    /// Reads a struct of type `T` from the given offset.
    fn read_struct<T: zerocopy::FromBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
    ) -> VdIOResult<T> {
        let size = core::mem::size_of::<T>();
        assert!(size <= CHUNK_BUF_SIZE, "read_struct: type too large");
        let mut buf = [0u8; CHUNK_BUF_SIZE];
        self.read_at(offset, &mut buf[..size])?;
        T::read_from_bytes(&buf[..size]).map_err(|_| VdIOError::Other("read_struct failed"))
    }

    /// Writes a struct of type `T` at the given offset.
    fn write_struct<T: zerocopy::IntoBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
        val: &T,
    ) -> VdIOResult {
        self.write_at(offset, val.as_bytes())
    }
}

impl<T: VdIO + ?Sized> VdIOStructExt for T {}
