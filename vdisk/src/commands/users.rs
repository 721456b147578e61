// SPDX-License-Identifier: MIT

use crate::commands::with_session_fs;
use crate::context::Context;
use crate::errors::CmdResult;
use crate::parser::Command;

pub fn mkgrp(ctx: &mut Context, cmd: &Command) -> CmdResult {
    ctx.require_root()?;
    let name = cmd.value("name")?;
    let id = with_session_fs(ctx, |fs| Ok(fs.create_group(name)?))?;
    Ok(format!("Group {name} created with id {id}"))
}

pub fn mkusr(ctx: &mut Context, cmd: &Command) -> CmdResult {
    ctx.require_root()?;
    let user = cmd.value("user")?;
    let pass = cmd.value("pass")?;
    let group = cmd.value("grp")?;
    let id = with_session_fs(ctx, |fs| Ok(fs.create_user(user, pass, group)?))?;
    Ok(format!("User {user} created in group {group} with id {id}"))
}
