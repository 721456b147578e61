// SPDX-License-Identifier: MIT
//! EXT2 Inode structure

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::fs::ext2::constant::*;

/// Owner written into new inodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub uid: i32,
    pub gid: i32,
}

impl Owner {
    pub const ROOT: Owner = Owner {
        uid: EXT2_ROOT_UID,
        gid: EXT2_ROOT_GID,
    };

    pub const fn new(uid: i32, gid: i32) -> Self {
        Self { uid, gid }
    }
}

impl Default for Owner {
    fn default() -> Self {
        Self::ROOT
    }
}

/// EXT2 Inode structure (88 bytes)
///
/// Addresses at most 15 direct blocks; unused pointers hold `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct Inode {
    /// Owner UID
    pub i_uid: i32,
    /// Owner GID
    pub i_gid: i32,
    /// Content size in bytes
    pub i_size: i32,
    /// Last access time
    pub i_atime: i32,
    /// Creation time
    pub i_ctime: i32,
    /// Last modification time
    pub i_mtime: i32,
    /// Direct block pointers
    pub i_block: [i32; EXT2_DIRECT_BLOCKS],
    /// 0 = directory, 1 = file
    pub i_type: u8,
    /// Permission digits (owner, group, other)
    pub i_perm: [u8; 3],
}

const _: () = assert!(core::mem::size_of::<Inode>() == EXT2_INODE_SIZE);

impl Inode {
    fn new(kind: u8, perm: [u8; 3], owner: Owner, now: i32) -> Self {
        Self {
            i_uid: owner.uid,
            i_gid: owner.gid,
            i_size: 0,
            i_atime: now,
            i_ctime: now,
            i_mtime: now,
            i_block: [EXT2_UNUSED; EXT2_DIRECT_BLOCKS],
            i_type: kind,
            i_perm: perm,
        }
    }

    pub fn new_dir(perm: [u8; 3], owner: Owner, now: i32) -> Self {
        Self::new(EXT2_INODE_KIND_DIR, perm, owner, now)
    }

    pub fn new_file(perm: [u8; 3], owner: Owner, now: i32) -> Self {
        Self::new(EXT2_INODE_KIND_FILE, perm, owner, now)
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.i_type == EXT2_INODE_KIND_DIR
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.i_type == EXT2_INODE_KIND_FILE
    }

    /// Block number stored in direct slot `slot`, if any.
    #[inline]
    pub fn block_at(&self, slot: usize) -> Option<u32> {
        self.i_block
            .get(slot)
            .filter(|&&b| b >= 0)
            .map(|&b| b as u32)
    }

    /// Allocated blocks in slot order, stopping at the first empty slot.
    pub fn blocks(&self) -> impl Iterator<Item = u32> + '_ {
        self.i_block
            .iter()
            .take_while(|&&b| b != EXT2_UNUSED)
            .filter(|&&b| b >= 0)
            .map(|&b| b as u32)
    }

    /// Index of the first empty direct slot.
    #[inline]
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.i_block.iter().position(|&b| b == EXT2_UNUSED)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.i_size.max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::IntoBytes;

    #[test]
    fn test_inode_byte_layout() {
        let mut inode = Inode::new_file([6, 6, 4], Owner::new(3, 4), 10);
        inode.i_block[0] = 7;
        let bytes = inode.as_bytes();

        assert_eq!(bytes.len(), 88);
        assert_eq!(&bytes[0..4], &3i32.to_le_bytes());
        assert_eq!(&bytes[24..28], &7i32.to_le_bytes());
        assert_eq!(&bytes[28..32], &(-1i32).to_le_bytes());
        assert_eq!(bytes[84], EXT2_INODE_KIND_FILE);
        assert_eq!(&bytes[85..88], &[6, 6, 4]);
    }

    #[test]
    fn test_block_slots() {
        let mut inode = Inode::new_dir([7, 7, 7], Owner::ROOT, 0);
        assert_eq!(inode.first_empty_slot(), Some(0));
        inode.i_block[0] = 4;
        inode.i_block[1] = 9;

        assert_eq!(inode.blocks().collect::<Vec<_>>(), [4, 9]);
        assert_eq!(inode.block_at(1), Some(9));
        assert_eq!(inode.block_at(2), None);
        assert_eq!(inode.first_empty_slot(), Some(2));
        assert!(inode.is_dir());
    }
}
