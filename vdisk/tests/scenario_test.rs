use std::fs::{self, OpenOptions};
use std::path::Path;

use tempfile::TempDir;
use vdfs::ext2::*;
use vdisk::{CmdError, Config, Context, run_batch, run_line};
use vdpart::disk::read_table;
use vdpart::mbr::MBR_SIZE;

fn setup() -> (TempDir, Context) {
    let dir = tempfile::tempdir().unwrap();
    let ctx = Context::new(Config::default().with_disk_dir(dir.path()));
    (dir, ctx)
}

fn run(ctx: &mut Context, line: &str) -> String {
    match run_line(ctx, line) {
        Ok(Some(message)) => message,
        Ok(None) => panic!("'{line}' was not a command"),
        Err(e) => panic!("'{line}' failed: {e}"),
    }
}

fn fail(ctx: &mut Context, line: &str) -> CmdError {
    run_line(ctx, line).expect_err(line)
}

/// Disk with one 2 MiB partition, mounted as 211A and formatted.
fn formatted_disk(ctx: &mut Context) {
    run(ctx, "mkdisk -size=5 -unit=M");
    run(ctx, "fdisk -size=2048 -unit=K -diskname=VDIC-A.mia -name=Part1");
    run(ctx, "mount -diskname=VDIC-A.mia -name=Part1");
    run(ctx, "mkfs -id=211A -type=fast");
}

fn with_volume<T>(disk: &Path, f: impl FnOnce(&mut Ext2<'_, StdVdIO<'_, fs::File>>) -> T) -> T {
    let mut file = OpenOptions::new().read(true).write(true).open(disk).unwrap();
    let mut io = StdVdIO::new(&mut file);
    let mut fs = Ext2::open(&mut io, MBR_SIZE as u64, 2048 * 1024).unwrap();
    f(&mut fs)
}

#[test]
fn mount_letter_follows_prefix_without_dash() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        disk_prefix: "DISK".to_string(),
        ..Config::default()
    };
    let mut ctx = Context::new(config.with_disk_dir(dir.path()));
    run(&mut ctx, "mkdisk -size=1 -unit=M");
    run(&mut ctx, "mkdisk -size=1 -unit=M");
    assert!(dir.path().join("DISKB.mia").is_file());

    run(&mut ctx, "fdisk -size=100 -diskname=DISKB.mia -name=Part1");
    let message = run(&mut ctx, "mount -diskname=DISKB.mia -name=Part1");
    assert!(message.ends_with("211B"));
    assert!(ctx.mounts.get("211B").is_some());
}

#[test]
fn mkdisk_creates_zeroed_image_with_empty_table() {
    let (dir, mut ctx) = setup();
    run(&mut ctx, "mkdisk -size=5 -unit=M");

    let path = dir.path().join("VDIC-A.mia");
    assert_eq!(fs::metadata(&path).unwrap().len(), 5 * 1024 * 1024);
    let table = read_table(&path).unwrap();
    assert_eq!({ table.size }, 5 * 1024 * 1024);
    assert!(table.partitions.iter().all(|p| p.is_empty()));
    assert!((1..=1_000_000).contains(&{ table.signature }));

    run(&mut ctx, "mkdisk -size=64 -unit=K");
    assert!(dir.path().join("VDIC-B.mia").is_file());
}

#[test]
fn fdisk_places_partitions_back_to_back() {
    let (dir, mut ctx) = setup();
    run(&mut ctx, "mkdisk -size=5 -unit=M");
    run(&mut ctx, "fdisk -size=2048 -unit=K -diskname=VDIC-A.mia -name=Part1");
    run(&mut ctx, "fdisk -size=1 -unit=M -diskname=VDIC-A.mia -name=Part2 -fit=BF");

    let table = read_table(&dir.path().join("VDIC-A.mia")).unwrap();
    let first = table.partitions[0];
    let second = table.partitions[1];
    assert_eq!({ first.start }, MBR_SIZE as i32);
    assert_eq!({ first.size }, 2048 * 1024);
    assert_eq!({ second.start }, first.start + first.size);

    let e = fail(&mut ctx, "fdisk -size=100 -diskname=VDIC-A.mia -name=part1");
    assert_eq!(e.kind, ErrorKind::Validation);
    let e = fail(&mut ctx, "fdisk -size=4 -unit=M -diskname=VDIC-A.mia -name=Big");
    assert_eq!(e.kind, ErrorKind::Capacity);
    let e = fail(&mut ctx, "fdisk -size=10 -diskname=VDIC-A.mia -name=Ext -type=E");
    assert_eq!(e.kind, ErrorKind::Validation);
    let e = fail(&mut ctx, "fdisk -size=10 -diskname=VDIC-Z.mia -name=P");
    assert_eq!(e.kind, ErrorKind::NotFound);
}

#[test]
fn mount_assigns_ids_and_persists_status() {
    let (dir, mut ctx) = setup();
    run(&mut ctx, "mkdisk -size=5 -unit=M");
    run(&mut ctx, "fdisk -size=1024 -diskname=VDIC-A.mia -name=Part1");
    run(&mut ctx, "fdisk -size=1024 -diskname=VDIC-A.mia -name=Part2");

    let message = run(&mut ctx, "mount -diskname=VDIC-A.mia -name=part1");
    assert!(message.ends_with("211A"));
    run(&mut ctx, "mount -diskname=VDIC-A.mia -name=Part2");
    assert!(ctx.mounts.get("212a").is_some());
    assert_eq!(run(&mut ctx, "mounted"), "Mounted: 211A, 212A");

    let slot = read_table(&dir.path().join("VDIC-A.mia")).unwrap().partitions[0];
    assert!(slot.is_mounted());
    assert_eq!(slot.id(), "211A");

    let e = fail(&mut ctx, "mount -diskname=VDIC-A.mia -name=Part1");
    assert_eq!(e.kind, ErrorKind::State);
    let e = fail(&mut ctx, "mount -diskname=VDIC-A.mia -name=Nope");
    assert_eq!(e.kind, ErrorKind::NotFound);
    let e = fail(&mut ctx, "mount -diskname=VDIC-A -name=Part1");
    assert_eq!(e.kind, ErrorKind::Validation);
}

#[test]
fn mkfs_writes_superblock_root_and_credentials() {
    let (dir, mut ctx) = setup();
    run(&mut ctx, "mkdisk -size=5 -unit=M");
    run(&mut ctx, "fdisk -size=2048 -unit=K -diskname=VDIC-A.mia -name=Part1");
    run(&mut ctx, "mount -diskname=VDIC-A.mia -name=Part1");
    run(&mut ctx, "mkfs -id=211a");

    with_volume(&dir.path().join("VDIC-A.mia"), |fs| {
        assert_eq!(fs.superblock().s_magic, EXT2_SUPERBLOCK_MAGIC);
        let names: Vec<String> = fs
            .list_directory(EXT2_ROOT_INODE)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, [".", "..", "users.txt"]);
        assert_eq!(
            fs.read_file_content(EXT2_USERS_INODE).unwrap(),
            b"1,G,root\n1,U,root,root,123\n"
        );
    });

    assert_eq!(fail(&mut ctx, "mkfs -id=999Z").kind, ErrorKind::NotFound);
    assert_eq!(fail(&mut ctx, "mkfs -id=211A -type=slow").kind, ErrorKind::Validation);
}

#[test]
fn session_is_exclusive() {
    let (_dir, mut ctx) = setup();
    formatted_disk(&mut ctx);

    assert_eq!(fail(&mut ctx, "logout").kind, ErrorKind::State);
    assert_eq!(fail(&mut ctx, "mkdir -path=/a").kind, ErrorKind::State);

    run(&mut ctx, "login -user=root -pass=123 -id=211A");
    assert_eq!(ctx.session().map(|s| s.group.as_str()), Some("root"));
    let e = fail(&mut ctx, "login -user=root -pass=123 -id=211A");
    assert_eq!(e.kind, ErrorKind::State);

    run(&mut ctx, "logout");
    assert_eq!(fail(&mut ctx, "logout").kind, ErrorKind::State);
    assert!(fail(&mut ctx, "login -user=root -pass=bad -id=211A").message.contains("Wrong password"));
    assert_eq!(fail(&mut ctx, "login -user=ghost -pass=1 -id=211A").kind, ErrorKind::NotFound);
    assert_eq!(fail(&mut ctx, "login -user=root -pass=123 -id=219Q").kind, ErrorKind::NotFound);
    assert_eq!(
        fail(&mut ctx, "login -user=averylongname -pass=1 -id=211A").kind,
        ErrorKind::Validation
    );
    assert!(ctx.session().is_none());
}

#[test]
fn mkdir_mkfile_cat() {
    let (_dir, mut ctx) = setup();
    formatted_disk(&mut ctx);
    run(&mut ctx, "login -user=root -pass=123 -id=211A");

    run(&mut ctx, "mkdir -path=/a/b -p");
    run(&mut ctx, "mkfile -path=/a/b/f.txt -size=10");
    assert_eq!(run(&mut ctx, "cat -file1=/a/b/f.txt"), "0123456789");

    run(&mut ctx, "mkfile -path=/x/y/g.txt -size=3 -r");
    assert_eq!(
        run(&mut ctx, "cat -file2=/x/y/g.txt -file1=/a/b/f.txt"),
        "0123456789\n012"
    );

    assert_eq!(fail(&mut ctx, "mkdir -path=/m/n").kind, ErrorKind::NotFound);
    assert_eq!(fail(&mut ctx, "mkfile -path=/m/f -size=1").kind, ErrorKind::NotFound);
    assert_eq!(fail(&mut ctx, "mkfile -path=/a -size=1").kind, ErrorKind::Validation);
    assert_eq!(fail(&mut ctx, "mkfile -path=/neg -size=-4").kind, ErrorKind::Validation);
    assert_eq!(fail(&mut ctx, "cat -file1=/nope").kind, ErrorKind::NotFound);

    let listing = run(&mut ctx, "ls -path=/a/b");
    assert!(listing.lines().any(|l| l.starts_with("-rw-rw-r--") && l.ends_with("f.txt")));
    let root = run(&mut ctx, "ls");
    assert!(root.lines().any(|l| l.starts_with("drw-rw-r--") && l.ends_with(" a")));
    assert!(root.lines().any(|l| l.starts_with("drwxrwxr-x") && l.ends_with(" x")));
}

#[test]
fn mkfile_reports_overwrite() {
    let (_dir, mut ctx) = setup();
    formatted_disk(&mut ctx);
    run(&mut ctx, "login -user=root -pass=123 -id=211A");

    assert_eq!(run(&mut ctx, "mkfile -path=/f -size=20"), "File /f created (20 bytes)");
    assert_eq!(run(&mut ctx, "mkfile -path=/f -size=4"), "File /f overwritten (4 bytes)");
    assert_eq!(run(&mut ctx, "cat -file1=/f"), "0123");
    assert_eq!(run(&mut ctx, "mkfile -path=/f -size=5000"), "File /f overwritten (960 bytes)");
}

#[test]
fn large_files_are_truncated() {
    let (_dir, mut ctx) = setup();
    formatted_disk(&mut ctx);
    run(&mut ctx, "login -user=root -pass=123 -id=211A");

    let message = run(&mut ctx, "mkfile -path=/big -size=2000");
    assert!(message.contains("960 bytes"));
    assert_eq!(run(&mut ctx, "cat -file1=/big").len(), EXT2_MAX_FILE_SIZE);
}

#[test]
fn groups_and_users_need_root() {
    let (_dir, mut ctx) = setup();
    formatted_disk(&mut ctx);

    assert_eq!(fail(&mut ctx, "mkgrp -name=devs").kind, ErrorKind::State);
    run(&mut ctx, "login -user=root -pass=123 -id=211A");
    run(&mut ctx, "mkgrp -name=devs");
    run(&mut ctx, "mkusr -user=ann -pass=pw -grp=devs");
    assert_eq!(fail(&mut ctx, "mkgrp -name=devs").kind, ErrorKind::Validation);
    assert_eq!(fail(&mut ctx, "mkusr -user=bob -pass=pw -grp=ops").kind, ErrorKind::NotFound);
    assert_eq!(
        run(&mut ctx, "cat -file1=/users.txt"),
        "1,G,root\n1,U,root,root,123\n2,G,devs\n3,U,devs,ann,pw\n"
    );
    run(&mut ctx, "logout");

    run(&mut ctx, "login -user=ann -pass=pw -id=211A");
    assert_eq!(ctx.session().map(|s| s.group.as_str()), Some("devs"));
    assert_eq!(fail(&mut ctx, "mkusr -user=eve -pass=x -grp=devs").kind, ErrorKind::State);
    run(&mut ctx, "mkdir -path=/home");
}

#[test]
fn rmdisk_needs_no_session_and_drops_mounts() {
    let (dir, mut ctx) = setup();
    formatted_disk(&mut ctx);
    run(&mut ctx, "login -user=root -pass=123 -id=211A");

    assert_eq!(fail(&mut ctx, "rmdisk -diskname=VDIC-A.mia").kind, ErrorKind::State);
    run(&mut ctx, "logout");
    run(&mut ctx, "rmdisk -diskname=VDIC-A");
    assert!(!dir.path().join("VDIC-A.mia").exists());
    assert!(ctx.mounts.is_empty());
    assert_eq!(fail(&mut ctx, "rmdisk -diskname=VDIC-A.mia").kind, ErrorKind::NotFound);
}

#[test]
fn batch_runs_the_whole_scenario() {
    let (_dir, mut ctx) = setup();
    let script = r#"
        # disk and partition
        mkdisk -size=5 -unit=M
        fdisk -size=2048 -unit=K -diskname=VDIC-A.mia -name=Part1
        mount -diskname=VDIC-A.mia -name=Part1
        mkfs -id=211A
        login -user=root -pass=123 -id=211A
        login -user=root -pass=123 -id=211A
        mkdir -path="/a/b" -p
        mkfile -path=/a/b/f.txt -size=10
        cat -file1=/a/b/f.txt
        logout
    "#;
    let report = run_batch(&mut ctx, script);
    assert_eq!(report.executed, 10);
    assert_eq!(report.failures, 1);
    assert!(report.lines[5].starts_with("[ERROR] line 8: login:"));
    assert_eq!(report.lines[8], "0123456789");
}
