// SPDX-License-Identifier: MIT

pub mod blocks;
pub mod inode;
pub mod perm;
pub mod superblock;

pub use blocks::*;
pub use inode::*;
pub use perm::*;
pub use superblock::*;
