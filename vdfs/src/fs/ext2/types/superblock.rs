// SPDX-License-Identifier: MIT
//! EXT2 Superblock structure

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::fs::ext2::constant::*;
use crate::fs::ext2::meta::Ext2Meta;

/// EXT2 Superblock structure (68 bytes)
///
/// Stored at the first byte of the partition. Region offsets are absolute
/// disk offsets, computed once by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct SuperBlock {
    /// Filesystem type tag (2)
    pub s_filesystem_type: i32,
    /// Total inode count
    pub s_inodes_count: i32,
    /// Total block count
    pub s_blocks_count: i32,
    /// Free block count
    pub s_free_blocks_count: i32,
    /// Free inode count
    pub s_free_inodes_count: i32,
    /// Last mount / write time
    pub s_mtime: i32,
    /// Last unmount time
    pub s_umtime: i32,
    /// Mount count
    pub s_mnt_count: i32,
    /// Magic signature (0xEF53)
    pub s_magic: i32,
    /// Inode record size
    pub s_inode_size: i32,
    /// Block size
    pub s_block_size: i32,
    /// First free inode hint
    pub s_first_ino: i32,
    /// First free block hint
    pub s_first_blo: i32,
    /// Inode bitmap offset
    pub s_bm_inode_start: i32,
    /// Block bitmap offset
    pub s_bm_block_start: i32,
    /// Inode table offset
    pub s_inode_start: i32,
    /// Block table offset
    pub s_block_start: i32,
}

const _: () = assert!(core::mem::size_of::<SuperBlock>() == EXT2_SUPERBLOCK_SIZE);

impl SuperBlock {
    /// Superblock of a freshly formatted volume: root dir and users file in use.
    pub fn from_meta(meta: &Ext2Meta, now: i32) -> Self {
        Self {
            s_filesystem_type: EXT2_FILESYSTEM_TYPE,
            s_inodes_count: meta.inode_count as i32,
            s_blocks_count: meta.block_count as i32,
            s_free_blocks_count: (meta.usable_blocks() - EXT2_FIRST_FREE_BLOCK) as i32,
            s_free_inodes_count: (meta.inode_count - EXT2_FIRST_FREE_INODE) as i32,
            s_mtime: now,
            s_umtime: 0,
            s_mnt_count: EXT2_INITIAL_MOUNT_COUNT,
            s_magic: EXT2_SUPERBLOCK_MAGIC,
            s_inode_size: EXT2_INODE_SIZE as i32,
            s_block_size: EXT2_BLOCK_SIZE as i32,
            s_first_ino: EXT2_FIRST_FREE_INODE as i32,
            s_first_blo: EXT2_FIRST_FREE_BLOCK as i32,
            s_bm_inode_start: meta.bm_inode_start as i32,
            s_bm_block_start: meta.bm_block_start as i32,
            s_inode_start: meta.inode_start as i32,
            s_block_start: meta.block_start as i32,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.s_magic == EXT2_SUPERBLOCK_MAGIC
            && self.s_inode_size == EXT2_INODE_SIZE as i32
            && self.s_block_size == EXT2_BLOCK_SIZE as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_offsets_are_monotonic() {
        let meta = Ext2Meta::new(153, 2 * 1024 * 1024).unwrap();
        let sb = SuperBlock::from_meta(&meta, 1_700_000_000);

        assert!(sb.is_valid());
        assert_eq!(sb.s_bm_inode_start, 153 + 68);
        assert!(sb.s_bm_inode_start < sb.s_bm_block_start);
        assert!(sb.s_bm_block_start < sb.s_inode_start);
        assert!(sb.s_inode_start < sb.s_block_start);
        assert_eq!(sb.s_free_inodes_count, sb.s_inodes_count - 2);
        assert!(meta.usable_blocks() < meta.block_count);
        assert_eq!(sb.s_free_blocks_count, meta.usable_blocks() as i32 - 2);
        assert_eq!(sb.s_blocks_count, 3 * sb.s_inodes_count);
    }
}
