// SPDX-License-Identifier: MIT

use vdio::prelude::*;

use crate::core::allocator::FsAllocator;
use crate::core::utils::path_utils::*;
use crate::core::{FsResolverError, FsResult, FsStoreError, FsStoreResult, now_unix};
use crate::fs::ext2::constant::*;
use crate::fs::ext2::filesystem::Ext2;
use crate::fs::ext2::resolver::NodeAttrs;
use crate::fs::ext2::types::{FileBlock, Inode, Owner};

/// Synthetic file content: byte `i` is the digit `i % 10`.
pub fn digit_pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'0' + (i % 10) as u8).collect()
}

impl<IO: VdIO + ?Sized> Ext2<'_, IO> {
    fn read_file_inode(&mut self, inode: u32) -> FsStoreResult<Inode> {
        let file = self.read_inode(inode)?;
        if !file.is_file() {
            return Err(FsStoreError::NotAFile);
        }
        Ok(file)
    }

    /// Stores `data` in the direct blocks of `inode`.
    ///
    /// Existing blocks are reused in slot order, missing ones are allocated
    /// and blocks past the new length are released. If allocation fails the
    /// blocks taken by this call are released and the inode is left as it was.
    fn store_blocks(&mut self, inode: u32, data: &[u8]) -> FsStoreResult {
        let mut file = self.read_file_inode(inode)?;
        let needed = data.len().div_ceil(EXT2_BLOCK_SIZE);

        let mut fresh = Vec::new();
        for slot in 0..needed.min(EXT2_DIRECT_BLOCKS) {
            if file.block_at(slot).is_some() {
                continue;
            }
            match self.allocate_block() {
                Ok(block) => {
                    file.i_block[slot] = block as i32;
                    fresh.push(block);
                }
                Err(e) => {
                    for block in fresh {
                        self.release_block(block)?;
                    }
                    return Err(e.into());
                }
            }
        }

        for slot in 0..EXT2_DIRECT_BLOCKS {
            if slot < needed {
                let Some(block) = file.block_at(slot) else {
                    continue;
                };
                let start = slot * EXT2_BLOCK_SIZE;
                let end = (start + EXT2_BLOCK_SIZE).min(data.len());
                self.write_file_block(block, &FileBlock::from_slice(&data[start..end]))?;
            } else if let Some(block) = file.block_at(slot) {
                self.release_block(block)?;
                file.i_block[slot] = EXT2_UNUSED;
            }
        }

        file.i_size = data.len() as i32;
        file.i_mtime = now_unix();
        self.write_inode(inode, &file)?;
        Ok(())
    }

    /// Fills `inode` with `size` bytes of the digit pattern.
    ///
    /// Sizes above 960 bytes are truncated. Returns the stored size.
    pub fn write_file_content(&mut self, inode: u32, size: usize) -> FsStoreResult<usize> {
        let size = size.min(EXT2_MAX_FILE_SIZE);
        self.store_blocks(inode, &digit_pattern(size))?;
        Ok(size)
    }

    /// Replaces the content of `inode` with `data`.
    pub fn write_bytes(&mut self, inode: u32, data: &[u8]) -> FsStoreResult {
        if data.len() > EXT2_MAX_FILE_SIZE {
            return Err(FsStoreError::TooLarge {
                len: data.len(),
                max: EXT2_MAX_FILE_SIZE,
            });
        }
        self.store_blocks(inode, data)
    }

    /// Concatenates the blocks of `inode` up to its recorded size.
    pub fn read_file_content(&mut self, inode: u32) -> FsStoreResult<Vec<u8>> {
        let file = self.read_file_inode(inode)?;
        let size = file.size();
        let mut out = Vec::with_capacity(size);
        for block in file.blocks() {
            if out.len() >= size {
                break;
            }
            let chunk = self.read_file_block(block)?;
            let take = (size - out.len()).min(EXT2_BLOCK_SIZE);
            out.extend_from_slice(&chunk.b_content[..take]);
        }
        Ok(out)
    }

    /// Releases every block of `inode` and sets its size to zero.
    pub fn release_blocks(&mut self, inode: u32) -> FsStoreResult {
        let mut file = self.read_file_inode(inode)?;
        for slot in 0..EXT2_DIRECT_BLOCKS {
            if let Some(block) = file.block_at(slot) {
                self.release_block(block)?;
            }
            file.i_block[slot] = EXT2_UNUSED;
        }
        file.i_size = 0;
        self.write_inode(inode, &file)?;
        Ok(())
    }

    /// Releases the old content, then writes `new_size` bytes of the pattern.
    pub fn overwrite(&mut self, inode: u32, new_size: usize) -> FsStoreResult<usize> {
        self.release_blocks(inode)?;
        self.write_file_content(inode, new_size)
    }

    /// Creates or overwrites the file at `path` with `size` pattern bytes.
    ///
    /// With `recursive`, missing parents are created with perm 775; without
    /// it a missing parent is `NotFound`.
    pub fn create_file(
        &mut self,
        path: &str,
        size: usize,
        recursive: bool,
        owner: Owner,
    ) -> FsResult<u32> {
        let components = normalize_components(path)?;
        let (parent_path, name) = split_parent(&components)
            .ok_or(FsResolverError::InvalidPath("Path does not name a file"))?;
        for component in &components {
            validate_name(component)?;
        }

        let parents = NodeAttrs::new(EXT2_PERM_PARENT_DIR, owner);
        let parent = self.resolve_components(parent_path, recursive.then_some(parents))?;

        if let Some(existing) = self.lookup(parent, name)? {
            if self.read_inode(existing)?.is_dir() {
                return Err(FsResolverError::IsADirectory.into());
            }
            self.overwrite(existing, size)?;
            return Ok(existing);
        }

        let inode = self.allocate_inode()?;
        self.write_inode(inode, &Inode::new_file(EXT2_PERM_FILE, owner, now_unix()))?;
        if let Err(e) = self.add_directory_entry(parent, name, inode) {
            self.release_inode(inode)?;
            return Err(e.into());
        }
        self.write_file_content(inode, size)?;
        Ok(inode)
    }

    /// Reads the file at `path` as text.
    pub fn cat(&mut self, path: &str) -> FsResult<String> {
        let inode = self.resolve(path, None)?;
        let content = self.read_file_content(inode)?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }
}
