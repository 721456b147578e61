// SPDX-License-Identifier: MIT

use vdio::prelude::*;

use crate::core::allocator::FsAllocator;
use crate::core::utils::path_utils::*;
use crate::core::{FsResolverError, FsResolverResult, now_unix};
use crate::fs::ext2::constant::*;
use crate::fs::ext2::filesystem::Ext2;
use crate::fs::ext2::types::{DirEntry, FolderBlock, Inode, Owner};

/// Permission and owner given to directories created on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAttrs {
    pub perm: [u8; 3],
    pub owner: Owner,
}

impl NodeAttrs {
    pub const fn new(perm: [u8; 3], owner: Owner) -> Self {
        Self { perm, owner }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub name: String,
    pub inode: u32,
}

impl<IO: VdIO + ?Sized> Ext2<'_, IO> {
    /// Reads `inode` and checks that it is a directory.
    fn read_dir_inode(&mut self, inode: u32) -> FsResolverResult<Inode> {
        let dir = self.read_inode(inode)?;
        if !dir.is_dir() {
            return Err(FsResolverError::NotADirectory);
        }
        Ok(dir)
    }

    /// Looks `name` up among the entries of directory `dir`.
    pub fn lookup(&mut self, dir: u32, name: &str) -> FsResolverResult<Option<u32>> {
        let inode = self.read_dir_inode(dir)?;
        for block in inode.blocks() {
            if let Some(child) = self.read_folder_block(block)?.find(name) {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// Walks `components` from the root directory.
    ///
    /// Missing components are created as directories with `create_missing`
    /// attributes when given, otherwise the walk fails with `NotFound`.
    pub fn resolve_components<S: AsRef<str>>(
        &mut self,
        components: &[S],
        create_missing: Option<NodeAttrs>,
    ) -> FsResolverResult<u32> {
        let mut current = EXT2_ROOT_INODE;
        for component in components {
            let name = component.as_ref();
            current = match self.lookup(current, name)? {
                Some(child) => child,
                None => match create_missing {
                    Some(attrs) => {
                        validate_name(name)?;
                        self.create_directory(current, name, attrs)?
                    }
                    None => return Err(FsResolverError::NotFound),
                },
            };
        }
        Ok(current)
    }

    /// Resolves a `/`-separated path to its inode.
    pub fn resolve(&mut self, path: &str, create_missing: Option<NodeAttrs>) -> FsResolverResult<u32> {
        let components = normalize_components(path)?;
        self.resolve_components(&components, create_missing)
    }

    /// Allocates and links a new directory named `name` inside `parent`.
    ///
    /// Allocations are released again if linking into `parent` fails.
    pub fn create_directory(
        &mut self,
        parent: u32,
        name: &str,
        attrs: NodeAttrs,
    ) -> FsResolverResult<u32> {
        let inode = self.allocate_inode()?;
        let block = match self.allocate_block() {
            Ok(block) => block,
            Err(e) => {
                self.release_inode(inode)?;
                return Err(e.into());
            }
        };

        let linked = self
            .init_directory(inode, block, parent, attrs)
            .and_then(|_| self.add_directory_entry(parent, name, inode));
        if let Err(e) = linked {
            self.release_block(block)?;
            self.release_inode(inode)?;
            return Err(e);
        }
        Ok(inode)
    }

    fn init_directory(
        &mut self,
        inode: u32,
        block: u32,
        parent: u32,
        attrs: NodeAttrs,
    ) -> FsResolverResult {
        let mut dir = Inode::new_dir(attrs.perm, attrs.owner, now_unix());
        dir.i_block[0] = block as i32;
        dir.i_size = EXT2_BLOCK_SIZE as i32;
        self.write_inode(inode, &dir)?;
        self.write_folder_block(block, &FolderBlock::new_dir(inode, parent))?;
        Ok(())
    }

    /// Links `child` under `name` in directory `parent`.
    ///
    /// Uses the first empty slot of the allocated blocks, then chains a new
    /// block. Fails with `DirectoryFull` once all 15 blocks are full.
    pub fn add_directory_entry(&mut self, parent: u32, name: &str, child: u32) -> FsResolverResult {
        validate_name(name)?;
        let mut dir = self.read_dir_inode(parent)?;
        let now = now_unix();

        let blocks: Vec<u32> = dir.blocks().collect();
        for block in blocks {
            let mut folder = self.read_folder_block(block)?;
            if let Some(slot) = folder.first_free_slot() {
                folder.b_content[slot] = DirEntry::new(name, child);
                self.write_folder_block(block, &folder)?;
                dir.i_mtime = now;
                self.write_inode(parent, &dir)?;
                return Ok(());
            }
        }

        let slot = dir
            .first_empty_slot()
            .ok_or(FsResolverError::DirectoryFull)?;
        let block = self.allocate_block()?;
        let mut folder = FolderBlock::empty();
        folder.b_content[0] = DirEntry::new(name, child);
        self.write_folder_block(block, &folder)?;

        dir.i_block[slot] = block as i32;
        dir.i_size += EXT2_BLOCK_SIZE as i32;
        dir.i_mtime = now;
        self.write_inode(parent, &dir)?;
        Ok(())
    }

    /// All used entries of directory `dir`, `.` and `..` included.
    pub fn list_directory(&mut self, dir: u32) -> FsResolverResult<Vec<DirListing>> {
        let inode = self.read_dir_inode(dir)?;
        let mut out = Vec::new();
        for block in inode.blocks() {
            let folder = self.read_folder_block(block)?;
            out.extend(folder.b_content.iter().filter_map(|entry| {
                entry.inode().map(|inode| DirListing {
                    name: entry.name(),
                    inode,
                })
            }));
        }
        Ok(out)
    }

    /// Creates the directory at `path`.
    ///
    /// With `parents`, missing intermediate directories are created too. An
    /// existing directory at `path` is returned unchanged.
    pub fn mkdir(&mut self, path: &str, parents: bool, attrs: NodeAttrs) -> FsResolverResult<u32> {
        let components = normalize_components(path)?;
        let (parent_path, name) = split_parent(&components)
            .ok_or(FsResolverError::InvalidPath("Cannot create the root directory"))?;
        for component in &components {
            validate_name(component)?;
        }

        let parent = self.resolve_components(parent_path, parents.then_some(attrs))?;
        match self.lookup(parent, name)? {
            Some(existing) if self.read_inode(existing)?.is_dir() => Ok(existing),
            Some(_) => Err(FsResolverError::AlreadyExists),
            None => self.create_directory(parent, name, attrs),
        }
    }
}
