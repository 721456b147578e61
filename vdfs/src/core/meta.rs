// SPDX-License-Identifier: MIT

/// Trait implemented by each FS-specific Meta structure.
/// Provides the static layout needed during formatting, allocation and lookup.
pub trait FsMeta {
    /// Absolute offset of the first byte of the filesystem.
    fn start_offset(&self) -> u64;

    /// Absolute offset of inode `inode` in the inode table.
    fn inode_offset(&self, inode: u32) -> u64;

    /// Absolute offset of block `block` in the block table.
    fn unit_offset(&self, block: u32) -> u64;

    /// Total number of inodes.
    fn total_inodes(&self) -> u32;

    /// Total number of blocks.
    fn total_units(&self) -> u32;

    /// Total size in bytes of the FS.
    fn size_bytes(&self) -> u64;

    fn is_valid_inode(&self, inode: u32) -> bool {
        inode < self.total_inodes()
    }

    fn is_valid_unit(&self, block: u32) -> bool {
        block < self.total_units()
    }
}
