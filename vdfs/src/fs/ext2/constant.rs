// SPDX-License-Identifier: MIT

// === Superblock ===

// Magic number (in s_magic)
pub const EXT2_SUPERBLOCK_MAGIC: i32 = 0xEF53;

// Filesystem type tag (in s_filesystem_type)
pub const EXT2_FILESYSTEM_TYPE: i32 = 2;

pub const EXT2_SUPERBLOCK_SIZE: usize = 68;

// Mount count written by the formatter
pub const EXT2_INITIAL_MOUNT_COUNT: i32 = 1;

// === Inode ===

pub const EXT2_INODE_SIZE: usize = 88;

pub const EXT2_ROOT_INODE: u32 = 0;
pub const EXT2_USERS_INODE: u32 = 1;

// First index handed out after format
pub const EXT2_FIRST_FREE_INODE: u32 = 2;

pub const EXT2_DIRECT_BLOCKS: usize = 15;

pub const EXT2_INODE_KIND_DIR: u8 = 0;
pub const EXT2_INODE_KIND_FILE: u8 = 1;

// === Blocks ===

pub const EXT2_BLOCK_SIZE: usize = 64;

pub const EXT2_ROOT_BLOCK: u32 = 0;
pub const EXT2_USERS_BLOCK: u32 = 1;

pub const EXT2_FIRST_FREE_BLOCK: u32 = 2;

// Blocks per inode in the layout formula
pub const EXT2_BLOCKS_PER_INODE: u32 = 3;

pub const EXT2_MAX_FILE_SIZE: usize = EXT2_DIRECT_BLOCKS * EXT2_BLOCK_SIZE;

// === Directories ===

pub const EXT2_DIR_ENTRY_SIZE: usize = 16;
pub const EXT2_ENTRIES_PER_BLOCK: usize = EXT2_BLOCK_SIZE / EXT2_DIR_ENTRY_SIZE;
pub const EXT2_NAME_LEN: usize = 12;
pub const EXT2_MAX_DIR_ENTRIES: usize = EXT2_DIRECT_BLOCKS * EXT2_ENTRIES_PER_BLOCK;

// Empty block pointer / directory slot
pub const EXT2_UNUSED: i32 = -1;

// === Credential file ===

pub const EXT2_USERS_FILE_NAME: &str = "users.txt";
pub const EXT2_USERS_FILE_SEED: &str = "1,G,root\n1,U,root,root,123\n";

// === Permissions (owner, group, other digits) ===

pub const EXT2_PERM_ROOT_DIR: [u8; 3] = [7, 7, 7];
pub const EXT2_PERM_USERS_FILE: [u8; 3] = [6, 6, 4];
pub const EXT2_PERM_DIR: [u8; 3] = [6, 6, 4];
pub const EXT2_PERM_PARENT_DIR: [u8; 3] = [7, 7, 5];
pub const EXT2_PERM_FILE: [u8; 3] = [6, 6, 4];

// === Default UID / GID ===

pub const EXT2_ROOT_UID: i32 = 1;
pub const EXT2_ROOT_GID: i32 = 1;
