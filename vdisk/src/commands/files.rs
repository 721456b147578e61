// SPDX-License-Identifier: MIT

use vdfs::ext2::{EXT2_MAX_FILE_SIZE, EXT2_PERM_DIR, NodeAttrs, Perm};
use vdfs::format_unix;

use crate::commands::with_session_fs;
use crate::context::Context;
use crate::errors::{CmdError, CmdResult};
use crate::parser::Command;

pub fn mkdir(ctx: &mut Context, cmd: &Command) -> CmdResult {
    let path = cmd.value("path")?;
    let attrs = NodeAttrs::new(EXT2_PERM_DIR, ctx.require_session()?.owner());
    let parents = cmd.flag("p");
    with_session_fs(ctx, |fs| Ok(fs.mkdir(path, parents, attrs)?))?;
    Ok(format!("Directory {path} created"))
}

pub fn mkfile(ctx: &mut Context, cmd: &Command) -> CmdResult {
    let path = cmd.value("path")?;
    let size = cmd.int("size")?;
    if size < 0 {
        return Err(CmdError::validation("File size must not be negative"));
    }
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    let owner = ctx.require_session()?.owner();
    let recursive = cmd.flag("r");

    let existed = with_session_fs(ctx, |fs| {
        let existed = fs.resolve(path, None).is_ok();
        fs.create_file(path, size, recursive, owner)?;
        Ok(existed)
    })?;
    if size > EXT2_MAX_FILE_SIZE {
        log_info!("{path}: content truncated to {EXT2_MAX_FILE_SIZE} bytes");
    }
    let action = if existed { "overwritten" } else { "created" };
    let stored = size.min(EXT2_MAX_FILE_SIZE);
    Ok(format!("File {path} {action} ({stored} bytes)"))
}

pub fn cat(ctx: &mut Context, cmd: &Command) -> CmdResult {
    let files = cmd.indexed("file");
    with_session_fs(ctx, |fs| {
        let mut parts = Vec::with_capacity(files.len());
        for path in &files {
            parts.push(fs.cat(path)?);
        }
        Ok(parts.join("\n"))
    })
}

/// One line per entry: permissions, owner, size, mtime and name.
pub fn ls(ctx: &mut Context, cmd: &Command) -> CmdResult {
    let path = cmd.value("path")?;
    with_session_fs(ctx, |fs| {
        let dir = fs.resolve(path, None)?;
        let mut lines = Vec::new();
        for entry in fs.list_directory(dir)? {
            let inode = fs.read_inode(entry.inode)?;
            let kind = if inode.is_dir() { 'd' } else { '-' };
            lines.push(format!(
                "{kind}{} {} {} {:>4} {} {}",
                Perm::from_digits(inode.i_perm),
                inode.i_uid,
                inode.i_gid,
                inode.i_size,
                format_unix(inode.i_mtime),
                entry.name
            ));
        }
        Ok(lines.join("\n"))
    })
}
