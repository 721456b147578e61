// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsAllocatorError, FsAllocatorResult};

/// Trait for managing allocation of inodes and blocks in a filesystem.
///
/// Allocation is first-fit: the lowest free index always wins, so placement
/// is deterministic for a given sequence of calls.
pub trait FsAllocator {
    /// Allocates the lowest free inode and returns its index.
    fn allocate_inode(&mut self) -> FsAllocatorResult<u32>;

    /// Allocates the lowest free block and returns its index.
    fn allocate_block(&mut self) -> FsAllocatorResult<u32>;

    /// Returns an inode to the free pool.
    fn release_inode(&mut self, inode: u32) -> FsAllocatorResult;

    /// Returns a block to the free pool.
    fn release_block(&mut self, block: u32) -> FsAllocatorResult;

    /// Number of free inodes.
    fn free_inodes(&self) -> u32;

    /// Number of free blocks.
    fn free_blocks(&self) -> u32;
}
