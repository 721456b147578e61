use std::fs::OpenOptions;

use vdfs::ext2::*;

const START: u64 = 153;
const SIZE: u64 = 2048 * 1024;

fn formatted_mem() -> MemVdIO {
    let mut io = MemVdIO::new(5 * 1024 * 1024);
    let meta = Ext2Meta::new(START, SIZE).unwrap();
    Ext2Formatter::new(&mut io, meta).format(false).unwrap();
    io
}

fn assert_bitmaps_match(fs: &mut Ext2<'_, MemVdIO>) {
    let inodes = fs.inode_bitmap().unwrap();
    let blocks = fs.block_bitmap().unwrap();
    let free_inodes = inodes.iter().filter(|&&b| b == 0).count() as i32;
    let free_blocks = blocks.iter().filter(|&&b| b == 0).count() as i32;
    assert_eq!(free_inodes, fs.superblock().s_free_inodes_count);
    assert_eq!(free_blocks, fs.superblock().s_free_blocks_count);
}

#[test]
fn format_on_file_image_seeds_root_and_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("VDIC-A.mia");
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&path)
        .unwrap();
    file.set_len(5 * 1024 * 1024).unwrap();

    let mut io = StdVdIO::new(&mut file);
    let meta = Ext2Meta::new(START, SIZE).unwrap();
    Ext2Formatter::new(&mut io, meta).format(true).unwrap();

    let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();
    assert_eq!(fs.superblock().s_magic, EXT2_SUPERBLOCK_MAGIC);
    assert_eq!(fs.superblock().s_filesystem_type, 2);

    let root = fs.list_directory(EXT2_ROOT_INODE).unwrap();
    let names: Vec<_> = root.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, [".", "..", "users.txt"]);
    assert_eq!(fs.cat("/users.txt").unwrap(), "1,G,root\n1,U,root,root,123\n");
}

#[test]
fn mkdir_mkfile_cat_scenario() {
    let mut io = formatted_mem();
    let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();
    let owner = Owner::new(1, 1);

    fs.mkdir("/a/b", true, NodeAttrs::new(EXT2_PERM_DIR, owner))
        .unwrap();
    fs.create_file("/a/b/f.txt", 10, false, owner).unwrap();
    assert_eq!(fs.cat("/a/b/f.txt").unwrap(), "0123456789");
    assert_bitmaps_match(&mut fs);
}

#[test]
fn bitmap_counts_follow_every_mutation() {
    let mut io = formatted_mem();
    let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();
    let attrs = NodeAttrs::new(EXT2_PERM_DIR, Owner::ROOT);

    // Small LCG so the sequence is reproducible
    let mut seed: u32 = 0x2545_F491;
    let mut next = move || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seed >> 16
    };

    for i in 0..40 {
        let dir = format!("/d{}", next() % 5);
        match next() % 3 {
            0 => {
                fs.mkdir(&dir, false, attrs).unwrap();
            }
            1 => {
                let path = format!("{dir}/f{i}");
                fs.create_file(&path, (next() % 700) as usize, true, Owner::ROOT)
                    .unwrap();
            }
            _ => {
                let path = format!("{dir}/g");
                let inode = fs.create_file(&path, 64, true, Owner::ROOT).unwrap();
                fs.overwrite(inode, (next() % 300) as usize).unwrap();
            }
        }
        assert_bitmaps_match(&mut fs);
    }
}

#[test]
fn root_directory_capacity() {
    let mut io = formatted_mem();
    let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();
    let attrs = NodeAttrs::new(EXT2_PERM_DIR, Owner::ROOT);

    // ".", ".." and "users.txt" already use three of the 60 slots
    for i in 0..EXT2_MAX_DIR_ENTRIES - 3 {
        fs.mkdir(&format!("/dir{i}"), false, attrs).unwrap();
    }
    assert_eq!(
        fs.list_directory(EXT2_ROOT_INODE).unwrap().len(),
        EXT2_MAX_DIR_ENTRIES
    );

    let err = fs.mkdir("/one-more", false, attrs).unwrap_err();
    assert_eq!(err, FsResolverError::DirectoryFull);
    assert_eq!(FsError::from(err).kind(), ErrorKind::Capacity);
    assert_bitmaps_match(&mut fs);
}

#[test]
fn reopen_sees_previous_writes() {
    let mut io = formatted_mem();
    {
        let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();
        fs.create_group("ops").unwrap();
        fs.create_file("/notes", 70, false, Owner::ROOT).unwrap();
    }

    let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();
    assert!(fs.read_credentials().unwrap().find_group("ops").is_some());
    assert_eq!(fs.cat("/notes").unwrap(), String::from_utf8(digit_pattern(70)).unwrap());
    assert_eq!(fs.authenticate("root", "123").unwrap().group, "root");
}
