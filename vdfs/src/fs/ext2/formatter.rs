// SPDX-License-Identifier: MIT

use vdio::prelude::*;

use crate::core::formatter::{FsFormatter, zero_volume};
use crate::core::utils::bitmap::UNIT_USED;
use crate::core::{FsFormatterResult, now_unix, traits::FsMeta};
use crate::fs::ext2::types::{DirEntry, FileBlock, FolderBlock, Inode, Owner, SuperBlock};
use crate::fs::ext2::{constant::*, meta::Ext2Meta};

/// Writes a fresh EXT2 volume into one partition.
///
/// A full format zeroes the whole partition first (reporting progress in
/// bytes), a fast one only zeroes the two bitmaps.
pub struct Ext2Formatter<'a, IO: VdIO + ?Sized> {
    io: &'a mut IO,
    meta: Ext2Meta,
    progress: Option<&'a mut dyn FnMut(u64)>,
}

impl<'a, IO: VdIO + ?Sized> FsFormatter for Ext2Formatter<'a, IO> {
    fn format(&mut self, full_format: bool) -> FsFormatterResult {
        if full_format {
            let mut noop = |_: u64| {};
            let progress: &mut dyn FnMut(u64) = match self.progress.as_mut() {
                Some(progress) => &mut **progress,
                None => &mut noop,
            };
            zero_volume(self.io, &self.meta, progress)?;
        } else {
            let bitmaps = self.meta.inode_count as u64 + self.meta.block_count as u64;
            self.io.zero_fill(self.meta.bm_inode_start, bitmaps)?;
        }

        let now = now_unix();
        self.write_superblock(now)?;
        self.write_bitmaps()?;
        self.write_root_dir(now)?;
        self.write_users_file(now)?;

        self.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> FsFormatterResult<()> {
        self.io.flush()?;
        Ok(())
    }
}

impl<'a, IO: VdIO + ?Sized> Ext2Formatter<'a, IO> {
    pub fn new(io: &'a mut IO, meta: Ext2Meta) -> Self {
        Self {
            io,
            meta,
            progress: None,
        }
    }

    /// Callback receiving the number of bytes zeroed by a full format.
    pub fn with_progress(mut self, progress: &'a mut dyn FnMut(u64)) -> Self {
        self.progress = Some(progress);
        self
    }

    fn write_superblock(&mut self, now: i32) -> FsFormatterResult {
        let sb = SuperBlock::from_meta(&self.meta, now);
        self.io.write_struct(self.meta.part_start, &sb)?;
        Ok(())
    }

    fn write_bitmaps(&mut self) -> FsFormatterResult {
        for inode in [EXT2_ROOT_INODE, EXT2_USERS_INODE] {
            self.io
                .write_u8_at(self.meta.bm_inode_start + inode as u64, UNIT_USED)?;
        }
        for block in [EXT2_ROOT_BLOCK, EXT2_USERS_BLOCK] {
            self.io
                .write_u8_at(self.meta.bm_block_start + block as u64, UNIT_USED)?;
        }
        // Blocks ending past the partition are reserved
        let usable = self.meta.usable_blocks();
        self.io.fill(
            self.meta.bm_block_start + usable as u64,
            (self.meta.block_count - usable) as u64,
            UNIT_USED,
        )?;
        Ok(())
    }

    fn write_root_dir(&mut self, now: i32) -> FsFormatterResult {
        let mut inode = Inode::new_dir(EXT2_PERM_ROOT_DIR, Owner::ROOT, now);
        inode.i_block[0] = EXT2_ROOT_BLOCK as i32;
        inode.i_size = EXT2_BLOCK_SIZE as i32;
        self.io
            .write_struct(self.meta.inode_offset(EXT2_ROOT_INODE), &inode)?;

        let mut block = FolderBlock::new_dir(EXT2_ROOT_INODE, EXT2_ROOT_INODE);
        block.b_content[2] = DirEntry::new(EXT2_USERS_FILE_NAME, EXT2_USERS_INODE);
        self.io
            .write_struct(self.meta.unit_offset(EXT2_ROOT_BLOCK), &block)?;
        Ok(())
    }

    fn write_users_file(&mut self, now: i32) -> FsFormatterResult {
        let mut inode = Inode::new_file(EXT2_PERM_USERS_FILE, Owner::ROOT, now);
        inode.i_block[0] = EXT2_USERS_BLOCK as i32;
        inode.i_size = EXT2_USERS_FILE_SEED.len() as i32;
        self.io
            .write_struct(self.meta.inode_offset(EXT2_USERS_INODE), &inode)?;

        let block = FileBlock::from_slice(EXT2_USERS_FILE_SEED.as_bytes());
        self.io
            .write_struct(self.meta.unit_offset(EXT2_USERS_BLOCK), &block)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FsFormatterError;
    use crate::fs::ext2::filesystem::Ext2;

    #[test]
    fn test_fast_format_seeds_root_and_users() {
        let mut io = MemVdIO::new(200 * 1024);
        let meta = Ext2Meta::new(153, 64 * 1024).unwrap();
        Ext2Formatter::new(&mut io, meta).format(false).unwrap();

        let mut fs = Ext2::open(&mut io, 153, 64 * 1024).unwrap();
        let sb = *fs.superblock();
        assert_eq!(sb.s_magic, 0xEF53);
        assert_eq!(sb.s_mnt_count, 1);
        assert_eq!(sb.s_umtime, 0);
        assert_eq!(sb.s_free_inodes_count, meta.inode_count as i32 - 2);
        assert_eq!(sb.s_free_blocks_count, meta.usable_blocks() as i32 - 2);
        let bitmap = fs.block_bitmap().unwrap();
        assert!(bitmap[meta.usable_blocks() as usize..].iter().all(|&b| b == 1));

        let root = fs.read_inode(0).unwrap();
        assert!(root.is_dir());
        assert_eq!(root.i_perm, [7, 7, 7]);
        let block = fs.read_folder_block(0).unwrap();
        let names: Vec<_> = block.b_content[..3].iter().map(|e| e.name()).collect();
        assert_eq!(names, [".", "..", "users.txt"]);

        let users = fs.read_inode(1).unwrap();
        assert!(users.is_file());
        assert_eq!(users.i_perm, [6, 6, 4]);
        assert_eq!(users.size(), EXT2_USERS_FILE_SEED.len());
    }

    #[test]
    fn test_full_format_reports_progress_and_clears_data() {
        let start = 153u64;
        let size = 16 * 1024u64;
        let mut io = MemVdIO::from_vec(vec![0xAB; (start + size) as usize * 2]);
        let meta = Ext2Meta::new(start, size).unwrap();

        let mut zeroed = 0u64;
        let mut progress = |n: u64| zeroed += n;
        Ext2Formatter::new(&mut io, meta)
            .with_progress(&mut progress)
            .format(true)
            .unwrap();
        assert_eq!(zeroed, size);

        // Free block past the seeded ones has been cleared
        let offset = meta.unit_offset(5) as usize;
        assert!(io.as_slice()[offset..offset + 64].iter().all(|&b| b == 0));
        // Bytes before the partition are untouched
        assert_eq!(io.as_slice()[start as usize - 1], 0xAB);
    }

    #[test]
    fn test_open_unformatted_partition() {
        let mut io = MemVdIO::new(4096);
        assert!(matches!(
            Ext2::open(&mut io, 0, 4096),
            Err(crate::core::FsError::NotFormatted)
        ));
        assert_eq!(
            Ext2Meta::new(0, 300).unwrap_err(),
            FsFormatterError::PartitionTooSmall
        );
    }
}
