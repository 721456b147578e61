// SPDX-License-Identifier: MIT
//! EXT2 directory and file blocks

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::fs::ext2::constant::*;

/// Directory entry (16 bytes): a NUL-padded name and the child inode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct DirEntry {
    pub b_name: [u8; EXT2_NAME_LEN],
    pub b_inodo: i32,
}

const _: () = assert!(core::mem::size_of::<DirEntry>() == EXT2_DIR_ENTRY_SIZE);

impl DirEntry {
    pub const EMPTY: DirEntry = DirEntry {
        b_name: [0; EXT2_NAME_LEN],
        b_inodo: EXT2_UNUSED,
    };

    /// Builds an entry. `name` must already be validated to fit.
    pub fn new(name: &str, inode: u32) -> Self {
        let mut b_name = [0u8; EXT2_NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(EXT2_NAME_LEN);
        b_name[..len].copy_from_slice(&bytes[..len]);
        Self {
            b_name,
            b_inodo: inode as i32,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.b_inodo == EXT2_UNUSED
    }

    pub fn inode(&self) -> Option<u32> {
        (self.b_inodo >= 0).then_some(self.b_inodo as u32)
    }

    pub fn name(&self) -> String {
        let end = self
            .b_name
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(EXT2_NAME_LEN);
        String::from_utf8_lossy(&self.b_name[..end]).into_owned()
    }

    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        !self.is_empty() && self.name() == name
    }
}

/// Directory block: four entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct FolderBlock {
    pub b_content: [DirEntry; EXT2_ENTRIES_PER_BLOCK],
}

const _: () = assert!(core::mem::size_of::<FolderBlock>() == EXT2_BLOCK_SIZE);

impl FolderBlock {
    pub fn empty() -> Self {
        Self {
            b_content: [DirEntry::EMPTY; EXT2_ENTRIES_PER_BLOCK],
        }
    }

    /// First block of a new directory: `.` and `..`.
    pub fn new_dir(own: u32, parent: u32) -> Self {
        let mut block = Self::empty();
        block.b_content[0] = DirEntry::new(".", own);
        block.b_content[1] = DirEntry::new("..", parent);
        block
    }

    #[inline]
    pub fn first_free_slot(&self) -> Option<usize> {
        self.b_content.iter().position(DirEntry::is_empty)
    }

    pub fn find(&self, name: &str) -> Option<u32> {
        self.b_content
            .iter()
            .find(|e| e.matches(name))
            .and_then(DirEntry::inode)
    }
}

/// File content block: 64 raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct FileBlock {
    pub b_content: [u8; EXT2_BLOCK_SIZE],
}

impl FileBlock {
    /// Copies at most 64 bytes of `data`; the rest stays zero.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut b_content = [0u8; EXT2_BLOCK_SIZE];
        let len = data.len().min(EXT2_BLOCK_SIZE);
        b_content[..len].copy_from_slice(&data[..len]);
        Self { b_content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_entry_names() {
        let e = DirEntry::new("users.txt", 1);
        assert_eq!(e.name(), "users.txt");
        assert!(e.matches("users.txt"));
        assert!(!e.matches("users"));

        let full = DirEntry::new("abcdefghijkl", 5);
        assert_eq!(full.name(), "abcdefghijkl");
        assert!(!DirEntry::EMPTY.matches(""));
    }

    #[test]
    fn test_folder_block_slots() {
        let mut block = FolderBlock::new_dir(3, 0);
        assert_eq!(block.find("."), Some(3));
        assert_eq!(block.find(".."), Some(0));
        assert_eq!(block.first_free_slot(), Some(2));

        block.b_content[2] = DirEntry::new("a", 4);
        block.b_content[3] = DirEntry::new("b", 5);
        assert_eq!(block.first_free_slot(), None);
        assert_eq!(block.find("b"), Some(5));
    }
}
