// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use vdfs::ext2::{EXT2_ROOT_GID, EXT2_ROOT_UID, Owner};

use crate::config::Config;
use crate::errors::{CmdError, CmdResult};

/// A partition made reachable through a mount id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRecord {
    pub id: String,
    pub disk_path: PathBuf,
    pub partition: String,
    pub start: i32,
    pub size: i32,
    pub correlative: u32,
}

/// In-memory mount table. Lost when the context is dropped.
#[derive(Debug, Default)]
pub struct MountTable {
    records: Vec<MountRecord>,
    last_correlative: u32,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next mount correlative. Never reused, even after the
    /// partition is dropped from the table.
    pub fn next_correlative(&mut self) -> u32 {
        self.last_correlative += 1;
        self.last_correlative
    }

    pub fn insert(&mut self, record: MountRecord) {
        self.records.push(record);
    }

    /// Case-insensitive lookup by mount id.
    pub fn get(&self, id: &str) -> Option<&MountRecord> {
        self.records.iter().find(|r| r.id.eq_ignore_ascii_case(id))
    }

    pub fn is_mounted(&self, disk_path: &Path, partition: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.disk_path == disk_path && r.partition.eq_ignore_ascii_case(partition))
    }

    /// Drops every record on `disk_path`, returning how many were removed.
    pub fn remove_disk(&mut self, disk_path: &Path) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.disk_path != disk_path);
        before - self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MountRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
    pub group: String,
    pub uid: i32,
    pub gid: i32,
    pub mount_id: String,
}

impl Session {
    pub fn new(user: &str, group: &str, mount_id: &str) -> Self {
        Self {
            user: user.to_string(),
            group: group.to_string(),
            uid: EXT2_ROOT_UID,
            gid: EXT2_ROOT_GID,
            mount_id: mount_id.to_string(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.user == "root"
    }

    #[inline]
    pub fn owner(&self) -> Owner {
        Owner::new(self.uid, self.gid)
    }
}

/// State shared by every command of one interpreter run.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub mounts: MountTable,
    session: Option<Session>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mounts: MountTable::new(),
            session: None,
        }
    }

    pub fn disk_dir(&self) -> &Path {
        &self.config.disk_dir
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn require_session(&self) -> CmdResult<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| CmdError::state("No active session, login first"))
    }

    pub fn require_root(&self) -> CmdResult<&Session> {
        let session = self.require_session()?;
        if !session.is_root() {
            return Err(CmdError::state("Only root can run this command"));
        }
        Ok(session)
    }

    pub fn begin_session(&mut self, session: Session) -> CmdResult<&Session> {
        if self.session.is_some() {
            return Err(CmdError::state("A session is already active, logout first"));
        }
        Ok(self.session.insert(session))
    }

    pub fn end_session(&mut self) -> CmdResult<Session> {
        self.session
            .take()
            .ok_or_else(|| CmdError::state("No active session"))
    }

    /// Mount record for `id`, or `NotFound`.
    pub fn mount(&self, id: &str) -> CmdResult<&MountRecord> {
        self.mounts
            .get(id)
            .ok_or_else(|| CmdError::not_found(format!("No partition mounted with id {id}")))
    }

    /// Mount id for the `correlative`-th mount of a partition on `letter`.
    pub fn mount_id(&self, correlative: u32, letter: char) -> String {
        format!("{}{correlative}{letter}", self.config.mount_prefix)
    }
}
