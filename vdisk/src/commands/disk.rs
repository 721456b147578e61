// SPDX-License-Identifier: MIT

use uuid::Uuid;
use vdfs::now_unix;
use vdpart::disk::{self, DiskSpec};
use vdpart::{FitPolicy, PartitionKind, SizeUnit};

use crate::context::Context;
use crate::errors::{CmdError, CmdResult};
use crate::parser::Command;
use crate::utils::{pretty_bytes, zero_fill_bar};

/// Disk signature in `1..=1_000_000`.
fn random_signature() -> i32 {
    (Uuid::new_v4().as_u128() % 1_000_000) as i32 + 1
}

pub fn mkdisk(ctx: &mut Context, cmd: &Command) -> CmdResult {
    let fit = FitPolicy::parse(cmd.value("fit")?)?;
    let unit = SizeUnit::parse_disk_unit(cmd.value("unit")?)?;
    let size = unit.to_bytes(cmd.int("size")?)?;

    let path = disk::next_disk_path(ctx.disk_dir(), &ctx.config.disk_prefix)?;
    let spec = DiskSpec {
        size,
        fit,
        created: now_unix(),
        signature: random_signature(),
    };
    log_verbose!(
        "Creating {} ({} bytes, fit {}, signature {})",
        path.display(),
        size,
        fit.code(),
        spec.signature
    );

    let pb = zero_fill_bar(size as u64, "mkdisk");
    let created = disk::create_disk(&path, spec, |n| pb.inc(n));
    pb.finish_and_clear();
    created?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(format!("Disk {name} created ({})", pretty_bytes(size as u64)))
}

pub fn rmdisk(ctx: &mut Context, cmd: &Command) -> CmdResult {
    if ctx.session().is_some() {
        return Err(CmdError::state("Cannot remove a disk while a session is active"));
    }
    let path = disk::remove_disk(ctx.disk_dir(), cmd.value("diskname")?)?;
    let unmounted = ctx.mounts.remove_disk(&path);
    if unmounted > 0 {
        log_verbose!("Dropped {unmounted} mount(s) of {}", path.display());
    }
    Ok(format!("Disk {} removed", path.display()))
}

pub fn fdisk(ctx: &mut Context, cmd: &Command) -> CmdResult {
    PartitionKind::parse(cmd.value("type")?)?;
    let fit = FitPolicy::parse(cmd.value("fit")?)?;
    let unit = SizeUnit::parse_partition_unit(cmd.value("unit")?)?;
    let size = unit.to_bytes(cmd.int("size")?)?;
    let disk_name = cmd.value("diskname")?;
    let name = cmd.value("name")?;

    let path = disk::resolve_disk(ctx.disk_dir(), disk_name)?;
    let partition = disk::create_partition(&path, name, size, fit)?;
    let start = partition.start;
    log_verbose!("Partition {name} placed at byte {start} of {disk_name}");

    Ok(format!(
        "Partition {name} created on {disk_name} ({})",
        pretty_bytes(size as u64)
    ))
}
