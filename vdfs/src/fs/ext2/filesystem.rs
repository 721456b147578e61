// SPDX-License-Identifier: MIT

use vdio::prelude::*;

use crate::core::{FsError, FsResult, now_unix, traits::FsMeta};
use crate::fs::ext2::{
    constant::*,
    meta::Ext2Meta,
    types::{FileBlock, FolderBlock, Inode, SuperBlock},
};

/// Handle on a formatted EXT2 volume.
///
/// Keeps a cached copy of the superblock; every allocator mutation writes it
/// back before returning.
pub struct Ext2<'a, IO: VdIO + ?Sized> {
    pub(crate) io: &'a mut IO,
    pub(crate) meta: Ext2Meta,
    pub(crate) sb: SuperBlock,
}

impl<'a, IO: VdIO + ?Sized> Ext2<'a, IO> {
    /// Opens the volume of the partition at `part_start`.
    ///
    /// Fails with [`FsError::NotFormatted`] when no valid superblock is found.
    pub fn open(io: &'a mut IO, part_start: u64, part_size: u64) -> FsResult<Self> {
        let sb: SuperBlock = io.read_struct(part_start)?;
        if !sb.is_valid() {
            return Err(FsError::NotFormatted);
        }
        let meta = Ext2Meta::from_superblock(part_start, part_size, &sb);
        if !meta.is_consistent() || meta.bm_inode_start != part_start + EXT2_SUPERBLOCK_SIZE as u64
        {
            return Err(FsError::Corrupted("Superblock offsets are inconsistent"));
        }
        Ok(Self { io, meta, sb })
    }

    #[inline]
    pub fn meta(&self) -> &Ext2Meta {
        &self.meta
    }

    #[inline]
    pub fn superblock(&self) -> &SuperBlock {
        &self.sb
    }

    pub fn read_inode(&mut self, inode: u32) -> VdIOResult<Inode> {
        if !self.meta.is_valid_inode(inode) {
            return Err(VdIOError::OutOfBounds);
        }
        self.io.read_struct(self.meta.inode_offset(inode))
    }

    pub fn write_inode(&mut self, inode: u32, value: &Inode) -> VdIOResult {
        if !self.meta.is_valid_inode(inode) {
            return Err(VdIOError::OutOfBounds);
        }
        self.io.write_struct(self.meta.inode_offset(inode), value)
    }

    pub fn read_folder_block(&mut self, block: u32) -> VdIOResult<FolderBlock> {
        if !self.meta.is_valid_unit(block) {
            return Err(VdIOError::OutOfBounds);
        }
        self.io.read_struct(self.meta.unit_offset(block))
    }

    pub fn write_folder_block(&mut self, block: u32, value: &FolderBlock) -> VdIOResult {
        if !self.meta.is_valid_unit(block) {
            return Err(VdIOError::OutOfBounds);
        }
        self.io.write_struct(self.meta.unit_offset(block), value)
    }

    pub fn read_file_block(&mut self, block: u32) -> VdIOResult<FileBlock> {
        if !self.meta.is_valid_unit(block) {
            return Err(VdIOError::OutOfBounds);
        }
        self.io.read_struct(self.meta.unit_offset(block))
    }

    pub fn write_file_block(&mut self, block: u32, value: &FileBlock) -> VdIOResult {
        if !self.meta.is_valid_unit(block) {
            return Err(VdIOError::OutOfBounds);
        }
        self.io.write_struct(self.meta.unit_offset(block), value)
    }

    /// Writes the cached superblock back to the partition start.
    pub fn sync_superblock(&mut self) -> VdIOResult {
        self.io.write_struct(self.meta.part_start, &self.sb)
    }

    /// Records a write in the superblock mount time.
    pub fn touch(&mut self) -> VdIOResult {
        self.sb.s_mtime = now_unix();
        self.sync_superblock()
    }

    /// Reads the whole inode bitmap.
    pub fn inode_bitmap(&mut self) -> VdIOResult<Vec<u8>> {
        self.io
            .read_vec(self.meta.bm_inode_start, self.meta.inode_count as usize)
    }

    /// Reads the whole block bitmap.
    pub fn block_bitmap(&mut self) -> VdIOResult<Vec<u8>> {
        self.io
            .read_vec(self.meta.bm_block_start, self.meta.block_count as usize)
    }

    pub fn flush(&mut self) -> VdIOResult {
        self.io.flush()
    }
}
