// SPDX-License-Identifier: MIT

use crate::core::{FsFormatterError, FsFormatterResult, traits::FsMeta};
use crate::fs::ext2::{constant::*, types::SuperBlock};

/// Region layout of one EXT2 volume. All offsets are absolute disk offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ext2Meta {
    pub part_start: u64,
    pub part_size: u64,
    pub inode_count: u32,
    pub block_count: u32,
    pub bm_inode_start: u64,
    pub bm_block_start: u64,
    pub inode_start: u64,
    pub block_start: u64,
}

impl Ext2Meta {
    /// Number of inodes a partition of `part_size` bytes can hold.
    ///
    /// `n = (size - superblock) / (inode + 3 * block)`. The bitmaps are not
    /// part of the divisor, so the tail of the block table may run past the
    /// partition end by up to `4n` bytes. See [`Ext2Meta::usable_blocks`].
    pub fn structure_count(part_size: u64) -> u64 {
        let per_inode = (EXT2_INODE_SIZE + EXT2_BLOCKS_PER_INODE as usize * EXT2_BLOCK_SIZE) as u64;
        part_size.saturating_sub(EXT2_SUPERBLOCK_SIZE as u64) / per_inode
    }

    /// Computes the layout for a partition at `part_start` of `part_size` bytes.
    pub fn new(part_start: u64, part_size: u64) -> FsFormatterResult<Self> {
        let n = Self::structure_count(part_size);
        if n < EXT2_FIRST_FREE_INODE as u64 {
            return Err(FsFormatterError::PartitionTooSmall);
        }
        if part_start.saturating_add(part_size) > i32::MAX as u64 {
            return Err(FsFormatterError::Invalid("Partition exceeds the addressable range"));
        }

        let inode_count = n as u32;
        let block_count = inode_count * EXT2_BLOCKS_PER_INODE;
        let bm_inode_start = part_start + EXT2_SUPERBLOCK_SIZE as u64;
        let bm_block_start = bm_inode_start + inode_count as u64;
        let inode_start = bm_block_start + block_count as u64;
        let block_start = inode_start + inode_count as u64 * EXT2_INODE_SIZE as u64;

        Ok(Self {
            part_start,
            part_size,
            inode_count,
            block_count,
            bm_inode_start,
            bm_block_start,
            inode_start,
            block_start,
        })
    }

    /// Rebuilds the layout recorded in an on-disk superblock.
    pub fn from_superblock(part_start: u64, part_size: u64, sb: &SuperBlock) -> Self {
        Self {
            part_start,
            part_size,
            inode_count: sb.s_inodes_count.max(0) as u32,
            block_count: sb.s_blocks_count.max(0) as u32,
            bm_inode_start: sb.s_bm_inode_start.max(0) as u64,
            bm_block_start: sb.s_bm_block_start.max(0) as u64,
            inode_start: sb.s_inode_start.max(0) as u64,
            block_start: sb.s_block_start.max(0) as u64,
        }
    }

    /// Number of leading blocks that lie entirely inside the partition.
    ///
    /// Blocks at or past this index are counted in the bitmap but never
    /// handed out by the allocator.
    pub fn usable_blocks(&self) -> u32 {
        let end = self.part_start + self.part_size;
        let room = end.saturating_sub(self.block_start) / EXT2_BLOCK_SIZE as u64;
        room.min(self.block_count as u64) as u32
    }

    /// `true` if the regions follow each other in ascending order without overlap.
    pub fn is_consistent(&self) -> bool {
        self.part_start + (EXT2_SUPERBLOCK_SIZE as u64) <= self.bm_inode_start
            && self.bm_inode_start + self.inode_count as u64 <= self.bm_block_start
            && self.bm_block_start + self.block_count as u64 <= self.inode_start
            && self.inode_start + self.inode_count as u64 * EXT2_INODE_SIZE as u64
                <= self.block_start
    }
}

impl FsMeta for Ext2Meta {
    fn start_offset(&self) -> u64 {
        self.part_start
    }

    fn inode_offset(&self, inode: u32) -> u64 {
        self.inode_start + inode as u64 * EXT2_INODE_SIZE as u64
    }

    fn unit_offset(&self, block: u32) -> u64 {
        self.block_start + block as u64 * EXT2_BLOCK_SIZE as u64
    }

    fn total_inodes(&self) -> u32 {
        self.inode_count
    }

    fn total_units(&self) -> u32 {
        self.block_count
    }

    fn size_bytes(&self) -> u64 {
        self.part_size
    }
}
