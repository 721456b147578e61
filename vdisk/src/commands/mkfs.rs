// SPDX-License-Identifier: MIT

use vdfs::ext2::{Ext2Formatter, Ext2Meta, FsFormatter};
use vdio::prelude::StdVdIO;
use vdpart::disk::open_disk;

use crate::context::Context;
use crate::errors::{CmdError, CmdResult};
use crate::parser::Command;
use crate::utils::{sep_u64, zero_fill_bar};

pub fn mkfs(ctx: &mut Context, cmd: &Command) -> CmdResult {
    let id = cmd.value("id")?;
    let full = match cmd.value("type")?.to_ascii_lowercase().as_str() {
        "full" => true,
        "fast" => false,
        other => {
            return Err(CmdError::validation(format!(
                "Invalid format type '{other}', expected full or fast"
            )));
        }
    };
    let record = ctx.mount(id)?;
    let meta = Ext2Meta::new(record.start as u64, record.size as u64)?;

    let mut file = open_disk(&record.disk_path)?;
    let mut io = StdVdIO::new(&mut file);
    if full {
        let pb = zero_fill_bar(record.size as u64, "mkfs");
        let mut advance = |n: u64| pb.inc(n);
        let formatted = Ext2Formatter::new(&mut io, meta)
            .with_progress(&mut advance)
            .format(true);
        pb.finish_and_clear();
        formatted?;
    } else {
        Ext2Formatter::new(&mut io, meta).format(false)?;
    }

    log_verbose!(
        "Superblock at {}, inode table at {}, block table at {}",
        meta.part_start,
        meta.inode_start,
        meta.block_start
    );
    Ok(format!(
        "Partition {} formatted as EXT2 ({} inodes, {} blocks)",
        record.id,
        sep_u64(meta.inode_count as u64),
        sep_u64(meta.block_count as u64)
    ))
}
