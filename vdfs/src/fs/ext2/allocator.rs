// SPDX-License-Identifier: MIT

use vdio::prelude::*;

use crate::core::allocator::{FsAllocator, FsAllocatorError, FsAllocatorResult};
use crate::core::utils::bitmap::{ByteMapOps, UNIT_FREE, UNIT_USED};
use crate::fs::ext2::filesystem::Ext2;

/// Which of the two allocation maps a call works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Map {
    Inode,
    Block,
}

impl<IO: VdIO + ?Sized> Ext2<'_, IO> {
    fn map_start(&self, map: Map) -> u64 {
        match map {
            Map::Inode => self.meta.bm_inode_start,
            Map::Block => self.meta.bm_block_start,
        }
    }

    fn map_len(&self, map: Map) -> u32 {
        match map {
            Map::Inode => self.meta.inode_count,
            Map::Block => self.meta.block_count,
        }
    }

    fn read_map(&mut self, map: Map) -> VdIOResult<Vec<u8>> {
        match map {
            Map::Inode => self.inode_bitmap(),
            Map::Block => self.block_bitmap(),
        }
    }

    /// Lowest free inode, scanning from index 0.
    pub fn find_free_inode(&mut self) -> VdIOResult<Option<u32>> {
        Ok(self.inode_bitmap()?.find_first_free(0).map(|i| i as u32))
    }

    /// Lowest free block, scanning from index 0. Blocks that would end past
    /// the partition are never returned.
    pub fn find_free_block(&mut self) -> VdIOResult<Option<u32>> {
        let usable = self.meta.usable_blocks();
        Ok(self
            .block_bitmap()?
            .find_first_free(0)
            .map(|i| i as u32)
            .filter(|&block| block < usable))
    }

    /// Sets or clears the bitmap byte of `inode` and updates the superblock.
    pub fn mark_inode(&mut self, inode: u32, used: bool) -> FsAllocatorResult {
        self.mark(Map::Inode, inode, used)
    }

    /// Sets or clears the bitmap byte of `block` and updates the superblock.
    pub fn mark_block(&mut self, block: u32, used: bool) -> FsAllocatorResult {
        self.mark(Map::Block, block, used)
    }

    fn mark(&mut self, map: Map, index: u32, used: bool) -> FsAllocatorResult {
        if index >= self.map_len(map) {
            return Err(FsAllocatorError::Other("Index outside the bitmap"));
        }
        let offset = self.map_start(map) + index as u64;
        let current = self.io.read_u8_at(offset)? != UNIT_FREE;
        if current == used {
            return Ok(());
        }
        self.io
            .write_u8_at(offset, if used { UNIT_USED } else { UNIT_FREE })?;

        let hint = self
            .read_map(map)?
            .find_first_free(0)
            .map_or(-1, |i| i as i32);
        match map {
            Map::Inode => {
                self.sb.s_free_inodes_count += if used { -1 } else { 1 };
                self.sb.s_first_ino = hint;
            }
            Map::Block => {
                self.sb.s_free_blocks_count += if used { -1 } else { 1 };
                self.sb.s_first_blo = hint;
            }
        }
        self.sync_superblock()?;
        Ok(())
    }
}

impl<IO: VdIO + ?Sized> FsAllocator for Ext2<'_, IO> {
    fn allocate_inode(&mut self) -> FsAllocatorResult<u32> {
        let inode = self
            .find_free_inode()?
            .ok_or(FsAllocatorError::OutOfInodes)?;
        self.mark_inode(inode, true)?;
        Ok(inode)
    }

    fn allocate_block(&mut self) -> FsAllocatorResult<u32> {
        let block = self
            .find_free_block()?
            .ok_or(FsAllocatorError::OutOfBlocks)?;
        self.mark_block(block, true)?;
        Ok(block)
    }

    fn release_inode(&mut self, inode: u32) -> FsAllocatorResult {
        self.mark_inode(inode, false)
    }

    fn release_block(&mut self, block: u32) -> FsAllocatorResult {
        self.mark_block(block, false)
    }

    fn free_inodes(&self) -> u32 {
        self.sb.s_free_inodes_count.max(0) as u32
    }

    fn free_blocks(&self) -> u32 {
        self.sb.s_free_blocks_count.max(0) as u32
    }
}
