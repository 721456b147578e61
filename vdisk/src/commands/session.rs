// SPDX-License-Identifier: MIT

use vdfs::fs::ext2::users::validate_field;

use crate::commands::with_fs;
use crate::context::{Context, Session};
use crate::errors::{CmdError, CmdResult};
use crate::parser::Command;

pub fn login(ctx: &mut Context, cmd: &Command) -> CmdResult {
    if ctx.session().is_some() {
        return Err(CmdError::state("A session is already active, logout first"));
    }
    let user = cmd.value("user")?;
    let pass = cmd.value("pass")?;
    validate_field(user)?;
    validate_field(pass)?;

    let record = ctx.mount(cmd.value("id")?)?;
    let found = with_fs(record, |fs| Ok(fs.authenticate(user, pass)?))?;
    let session = Session::new(&found.name, &found.group, &record.id);
    ctx.begin_session(session)?;
    Ok(format!("Logged in as {user}"))
}

pub fn logout(ctx: &mut Context, _cmd: &Command) -> CmdResult {
    let session = ctx.end_session()?;
    Ok(format!("Session of {} closed", session.user))
}
