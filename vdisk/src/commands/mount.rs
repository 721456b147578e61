// SPDX-License-Identifier: MIT

use vdpart::PartitionKind;
use vdpart::disk;

use crate::context::{Context, MountRecord};
use crate::errors::{CmdError, CmdResult};
use crate::parser::Command;

pub fn mount(ctx: &mut Context, cmd: &Command) -> CmdResult {
    let disk_name = cmd.value("diskname")?;
    let name = cmd.value("name")?;
    let path = disk::resolve_disk(ctx.disk_dir(), disk_name)?;

    let table = disk::read_table(&path)?;
    let slot = table
        .find_partition(name)
        .ok_or_else(|| CmdError::not_found(format!("Partition {name} does not exist on {disk_name}")))?;
    let partition = table.partitions[slot];
    if partition.kind() != Some(PartitionKind::Primary) {
        return Err(CmdError::validation("Only primary partitions can be mounted"));
    }
    if ctx.mounts.is_mounted(&path, name) {
        return Err(CmdError::state(format!("Partition {name} is already mounted")));
    }

    let correlative = ctx.mounts.next_correlative();
    let id = ctx.mount_id(correlative, disk::drive_letter(disk_name));
    disk::update_partition(&path, name, |p| {
        p.set_mounted(correlative as i32, &id);
        Ok(())
    })?;

    ctx.mounts.insert(MountRecord {
        id: id.clone(),
        disk_path: path,
        partition: partition.name(),
        start: partition.start,
        size: partition.size,
        correlative,
    });
    Ok(format!("Partition {name} mounted with id {id}"))
}

pub fn mounted(ctx: &mut Context, _cmd: &Command) -> CmdResult {
    if ctx.mounts.is_empty() {
        return Ok("No partitions mounted".to_string());
    }
    let ids: Vec<&str> = ctx.mounts.iter().map(|r| r.id.as_str()).collect();
    Ok(format!("Mounted: {}", ids.join(", ")))
}
