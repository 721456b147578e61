// SPDX-License-Identifier: MIT

//! One function per verb. Each takes the shared [`Context`] and returns the
//! line reported for a successful run.

mod disk;
mod files;
mod mkfs;
mod mount;
mod session;
mod users;

use std::fs::File;

use vdfs::ext2::Ext2;
use vdio::prelude::StdVdIO;
use vdpart::disk::open_disk;

use crate::context::{Context, MountRecord};
use crate::errors::CmdResult;
use crate::parser::{Command, Verb};

pub use disk::{fdisk, mkdisk, rmdisk};
pub use files::{cat, ls, mkdir, mkfile};
pub use mkfs::mkfs;
pub use mount::{mount, mounted};
pub use session::{login, logout};
pub use users::{mkgrp, mkusr};

/// Runs a parsed command.
pub fn execute(ctx: &mut Context, cmd: &Command) -> CmdResult {
    let result = match cmd.verb {
        Verb::Mkdisk => mkdisk(ctx, cmd),
        Verb::Rmdisk => rmdisk(ctx, cmd),
        Verb::Fdisk => fdisk(ctx, cmd),
        Verb::Mount => mount(ctx, cmd),
        Verb::Mounted => mounted(ctx, cmd),
        Verb::Mkfs => mkfs(ctx, cmd),
        Verb::Login => login(ctx, cmd),
        Verb::Logout => logout(ctx, cmd),
        Verb::Mkgrp => mkgrp(ctx, cmd),
        Verb::Mkusr => mkusr(ctx, cmd),
        Verb::Mkdir => mkdir(ctx, cmd),
        Verb::Mkfile => mkfile(ctx, cmd),
        Verb::Cat => cat(ctx, cmd),
        Verb::Ls => ls(ctx, cmd),
    };
    result.map_err(|e| e.context(cmd.verb))
}

/// Opens the filesystem of a mounted partition for the duration of `f`.
pub(crate) fn with_fs<T, F>(record: &MountRecord, f: F) -> CmdResult<T>
where
    F: FnOnce(&mut Ext2<'_, StdVdIO<'_, File>>) -> CmdResult<T>,
{
    let mut file = open_disk(&record.disk_path)?;
    let mut io = StdVdIO::new(&mut file);
    let mut fs = Ext2::open(&mut io, record.start as u64, record.size as u64)?;
    let out = f(&mut fs)?;
    fs.flush()?;
    Ok(out)
}

/// Filesystem of the partition the active session logged into.
pub(crate) fn with_session_fs<T, F>(ctx: &Context, f: F) -> CmdResult<T>
where
    F: FnOnce(&mut Ext2<'_, StdVdIO<'_, File>>) -> CmdResult<T>,
{
    let session = ctx.require_session()?;
    let record = ctx.mount(&session.mount_id)?;
    with_fs(record, f)
}
