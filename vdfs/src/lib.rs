// SPDX-License-Identifier: MIT

//! EXT2-style filesystem stored inside one partition of a VDIC disk image.
//!
//! The layout is a superblock followed by an inode bitmap, a block bitmap,
//! the inode table and the block table. Blocks are 64 bytes, inodes address
//! at most 15 direct blocks, and inode 1 holds the `users.txt` credential file.

// Core Modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use self::core::traits::*;

// Utilities
pub use self::core::utils::{path_utils::*, time_utils::*};

/// EXT2 filesystem implementation.
///
/// See [`ext2::Ext2`], [`ext2::Ext2Formatter`] and [`ext2::Ext2Meta`].
pub mod ext2 {
    pub use super::fs::ext2::prelude::*;
}
