// SPDX-License-Identifier: MIT

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use vdio::prelude::*;

use crate::DISK_EXTENSION;
use crate::errors::*;
use crate::mbr::{self, Mbr, Partition};
use crate::types::FitPolicy;

/// Parameters of a new disk image.
#[derive(Debug, Clone, Copy)]
pub struct DiskSpec {
    pub size: i32,
    pub fit: FitPolicy,
    pub created: i32,
    pub signature: i32,
}

/// File name for drive `letter`, e.g. `VDIC-A.mia`.
pub fn disk_file_name(prefix: &str, letter: char) -> String {
    format!("{prefix}{letter}.{DISK_EXTENSION}")
}

/// First `<prefix><A..Z>.mia` path in `dir` that does not exist yet.
pub fn next_disk_path(dir: &Path, prefix: &str) -> PartResult<PathBuf> {
    ('A'..='Z')
        .map(|letter| dir.join(disk_file_name(prefix, letter)))
        .find(|path| !path.exists())
        .ok_or(PartError::DiskLimit)
}

/// Drive letter encoded in a disk file name: the last character before the
/// extension, uppercased. Defaults to `A` when that character is not a letter.
pub fn drive_letter(disk_name: &str) -> char {
    Path::new(disk_name.trim())
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.chars().next_back())
        .filter(|c| c.is_ascii_alphabetic())
        .map_or('A', |c| c.to_ascii_uppercase())
}

/// Checks that `disk_name` carries the `.mia` extension and resolves it in `dir`.
pub fn resolve_disk(dir: &Path, disk_name: &str) -> PartResult<PathBuf> {
    let disk_name = disk_name.trim();
    let has_ext = Path::new(disk_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DISK_EXTENSION));
    if !has_ext {
        return Err(PartError::Invalid("Disk name must end with .mia"));
    }
    let path = dir.join(disk_name);
    if !path.is_file() {
        return Err(PartError::NotFound("Disk does not exist"));
    }
    Ok(path)
}

/// Opens an existing image for reading and writing.
pub fn open_disk(path: &Path) -> PartResult<File> {
    if !path.is_file() {
        return Err(PartError::NotFound("Disk does not exist"));
    }
    Ok(OpenOptions::new().read(true).write(true).open(path)?)
}

/// Creates a zero-filled image at `path` and writes an empty partition table.
///
/// `progress` receives the number of bytes zeroed after each chunk.
pub fn create_disk<F: FnMut(u64)>(path: &Path, spec: DiskSpec, progress: F) -> PartResult<Mbr> {
    if spec.size as i64 <= mbr::MBR_SIZE as i64 {
        return Err(PartError::Invalid("Disk is too small to hold a partition table"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)?;
    let mut io = StdVdIO::new(&mut file);
    io.zero_fill_with(0, spec.size as u64, progress)?;

    let table = Mbr::new(spec.size, spec.created, spec.signature, spec.fit);
    mbr::write_mbr(&mut io, &table)?;
    Ok(table)
}

/// Deletes the image named `disk_name` in `dir`, appending `.mia` if missing.
pub fn remove_disk(dir: &Path, disk_name: &str) -> PartResult<PathBuf> {
    let mut name = disk_name.trim().to_string();
    if name.is_empty() {
        return Err(PartError::Invalid("Disk name must not be empty"));
    }
    if !name.to_ascii_lowercase().ends_with(&format!(".{DISK_EXTENSION}")) {
        name.push('.');
        name.push_str(DISK_EXTENSION);
    }
    let path = dir.join(name);
    if !path.is_file() {
        return Err(PartError::NotFound("Disk does not exist"));
    }
    fs::remove_file(&path)?;
    Ok(path)
}

/// Reads the partition table of the image at `path`.
pub fn read_table(path: &Path) -> PartResult<Mbr> {
    let mut file = open_disk(path)?;
    let mut io = StdVdIO::new(&mut file);
    mbr::read_mbr(&mut io)
}

/// Adds a primary partition to the image at `path` and persists the table.
pub fn create_partition(
    path: &Path,
    name: &str,
    size: i32,
    fit: FitPolicy,
) -> PartResult<Partition> {
    let mut file = open_disk(path)?;
    let mut io = StdVdIO::new(&mut file);
    let mut table = mbr::read_mbr(&mut io)?;
    let slot = table.add_primary_partition(name, size, fit)?;
    mbr::write_mbr(&mut io, &table)?;
    Ok(table.partitions[slot])
}

/// Applies `update` to the slot named `name` and persists the table.
pub fn update_partition<F>(path: &Path, name: &str, update: F) -> PartResult<Partition>
where
    F: FnOnce(&mut Partition) -> PartResult<()>,
{
    let mut file = open_disk(path)?;
    let mut io = StdVdIO::new(&mut file);
    let mut table = mbr::read_mbr(&mut io)?;
    let slot = table
        .find_partition(name)
        .ok_or(PartError::NotFound("Partition does not exist"))?;
    update(&mut table.partitions[slot])?;
    mbr::write_mbr(&mut io, &table)?;
    Ok(table.partitions[slot])
}
