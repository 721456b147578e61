// SPDX-License-Identifier: MIT

//! Group and user records kept in `users.txt` (inode 1).
//!
//! One record per line:
//!
//! ```text
//! <id>,G,<group>
//! <id>,U,<group>,<user>,<password>
//! ```

use core::fmt;

use vdio::prelude::*;

use crate::core::{FsCredentialError, FsCredentialResult, FsResult};
use crate::fs::ext2::constant::*;
use crate::fs::ext2::filesystem::Ext2;

/// Maximum length in bytes of a group name, user name or password.
pub const MAX_FIELD_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: u32,
    pub group: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Group(GroupRecord),
    User(UserRecord),
}

impl Record {
    /// Parses one line; returns `None` for malformed lines.
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let id = fields.first()?.parse::<u32>().ok()?;
        match fields.as_slice() {
            [_, kind, name] if kind.eq_ignore_ascii_case("G") => Some(Record::Group(GroupRecord {
                id,
                name: name.to_string(),
            })),
            [_, kind, group, name, password] if kind.eq_ignore_ascii_case("U") => {
                Some(Record::User(UserRecord {
                    id,
                    group: group.to_string(),
                    name: name.to_string(),
                    password: password.to_string(),
                }))
            }
            _ => None,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Record::Group(g) => g.id,
            Record::User(u) => u.id,
        }
    }

    /// Records with id 0 are treated as removed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.id() != 0
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Group(g) => write!(f, "{},G,{}", g.id, g.name),
            Record::User(u) => write!(f, "{},U,{},{},{}", u.id, u.group, u.name, u.password),
        }
    }
}

/// Parsed content of `users.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub records: Vec<Record>,
}

impl Credentials {
    /// Parses file content, dropping NUL padding, blank lines, malformed
    /// lines and repeated lines.
    pub fn parse(text: &str) -> Self {
        let mut seen: Vec<&str> = Vec::new();
        let mut records = Vec::new();
        for line in text.split('\n') {
            let line = line.trim_matches(|c: char| c == '\0' || c.is_whitespace());
            if line.is_empty() || seen.contains(&line) {
                continue;
            }
            seen.push(line);
            if let Some(record) = Record::parse(line) {
                records.push(record);
            }
        }
        Self { records }
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.records.iter().filter(|r| r.is_active()).filter_map(|r| match r {
            Record::Group(g) => Some(g),
            _ => None,
        })
    }

    pub fn users(&self) -> impl Iterator<Item = &UserRecord> {
        self.records.iter().filter(|r| r.is_active()).filter_map(|r| match r {
            Record::User(u) => Some(u),
            _ => None,
        })
    }

    pub fn find_group(&self, name: &str) -> Option<&GroupRecord> {
        self.groups().find(|g| g.name == name)
    }

    pub fn find_user(&self, name: &str) -> Option<&UserRecord> {
        self.users().find(|u| u.name == name)
    }

    /// Highest id over every record, plus one.
    pub fn next_id(&self) -> u32 {
        self.records.iter().map(Record::id).max().unwrap_or(0) + 1
    }

    /// Looks up `user` and checks `password`.
    pub fn authenticate(&self, user: &str, password: &str) -> FsCredentialResult<&UserRecord> {
        let record = self
            .find_user(user)
            .ok_or(FsCredentialError::UserNotFound)?;
        if record.password != password {
            return Err(FsCredentialError::WrongPassword);
        }
        Ok(record)
    }
}

/// Checks one credential field: non-empty, at most 10 bytes, no separators.
pub fn validate_field(value: &str) -> FsCredentialResult {
    if value.is_empty() {
        return Err(FsCredentialError::InvalidField("Field must not be empty"));
    }
    if value.len() > MAX_FIELD_LEN {
        return Err(FsCredentialError::InvalidField("Field longer than 10 bytes"));
    }
    if value.contains([',', '\n', '\0']) {
        return Err(FsCredentialError::InvalidField("Field contains a forbidden character"));
    }
    Ok(())
}

impl<IO: VdIO + ?Sized> Ext2<'_, IO> {
    fn read_users_text(&mut self) -> FsResult<String> {
        let content = self.read_file_content(EXT2_USERS_INODE)?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    /// Reads and parses `users.txt`.
    pub fn read_credentials(&mut self) -> FsResult<Credentials> {
        Ok(Credentials::parse(&self.read_users_text()?))
    }

    fn append_record(&mut self, record: &Record) -> FsResult {
        let mut text = self.read_users_text()?;
        let trimmed = text.trim_end_matches('\0').len();
        text.truncate(trimmed);
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&record.to_string());
        text.push('\n');

        self.write_bytes(EXT2_USERS_INODE, text.as_bytes())?;
        self.touch()?;
        Ok(())
    }

    /// Adds group `name` and returns its id.
    pub fn create_group(&mut self, name: &str) -> FsResult<u32> {
        validate_field(name)?;
        let creds = self.read_credentials()?;
        if creds.find_group(name).is_some() {
            return Err(FsCredentialError::GroupExists.into());
        }
        let id = creds.next_id();
        self.append_record(&Record::Group(GroupRecord {
            id,
            name: name.to_string(),
        }))?;
        Ok(id)
    }

    /// Adds user `name` in existing group `group` and returns its id.
    pub fn create_user(&mut self, name: &str, password: &str, group: &str) -> FsResult<u32> {
        validate_field(name)?;
        validate_field(password)?;
        validate_field(group)?;
        let creds = self.read_credentials()?;
        if creds.find_user(name).is_some() {
            return Err(FsCredentialError::UserExists.into());
        }
        if creds.find_group(group).is_none() {
            return Err(FsCredentialError::GroupNotFound.into());
        }
        let id = creds.next_id();
        self.append_record(&Record::User(UserRecord {
            id,
            group: group.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        }))?;
        Ok(id)
    }

    /// Checks `name`/`password` against the stored user records.
    pub fn authenticate(&mut self, name: &str, password: &str) -> FsResult<UserRecord> {
        let creds = self.read_credentials()?;
        let user = creds.authenticate(name, password)?;
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::FsFormatter;
    use crate::core::{ErrorKind, FsError};
    use crate::fs::ext2::{formatter::Ext2Formatter, meta::Ext2Meta};

    const START: u64 = 153;
    const SIZE: u64 = 64 * 1024;

    fn formatted() -> MemVdIO {
        let mut io = MemVdIO::new((START + SIZE) as usize * 2);
        let meta = Ext2Meta::new(START, SIZE).unwrap();
        Ext2Formatter::new(&mut io, meta).format(false).unwrap();
        io
    }

    #[test]
    fn test_parse_seed() {
        let creds = Credentials::parse(EXT2_USERS_FILE_SEED);
        assert_eq!(creds.records.len(), 2);
        assert_eq!(creds.find_group("root").map(|g| g.id), Some(1));
        let root = creds.find_user("root").unwrap();
        assert_eq!(root.group, "root");
        assert_eq!(root.password, "123");
        assert_eq!(creds.next_id(), 2);
    }

    #[test]
    fn test_parse_skips_noise() {
        let text = "1,G,root\n\n1,G,root\ngarbage\n2,U,root,bob\n3,G,dev\0\0\0";
        let creds = Credentials::parse(text);
        assert_eq!(creds.records.len(), 2);
        assert!(creds.find_group("dev").is_some());
        assert_eq!(Record::parse("4,U,dev,ann,pw").unwrap().to_string(), "4,U,dev,ann,pw");
    }

    #[test]
    fn test_removed_records_are_hidden() {
        let creds = Credentials::parse("1,G,root\n0,G,old\n1,U,root,root,123\n0,U,old,gone,pw\n");
        assert!(!Record::parse("0,G,old").unwrap().is_active());
        assert!(creds.find_group("old").is_none());
        assert!(creds.find_user("gone").is_none());
        assert_eq!(creds.groups().count(), 1);
        assert_eq!(creds.users().count(), 1);
    }

    #[test]
    fn test_group_and_user_lifecycle() {
        let mut io = formatted();
        let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();

        assert_eq!(fs.create_group("devs").unwrap(), 2);
        assert_eq!(fs.create_user("ann", "pw1", "devs").unwrap(), 3);
        assert_eq!(
            fs.cat("/users.txt").unwrap(),
            "1,G,root\n1,U,root,root,123\n2,G,devs\n3,U,devs,ann,pw1\n"
        );

        let ann = fs.authenticate("ann", "pw1").unwrap();
        assert_eq!(ann.group, "devs");
        assert_eq!(
            fs.authenticate("ann", "nope"),
            Err(FsError::Credential(FsCredentialError::WrongPassword))
        );
    }

    #[test]
    fn test_rejections() {
        let mut io = formatted();
        let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();

        assert_eq!(
            fs.create_group("root").unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            fs.create_user("root", "x", "root").unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            fs.create_user("bob", "x", "ghosts").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            fs.create_group("abcdefghijk").unwrap_err().kind(),
            ErrorKind::Validation
        );
        // Names are case-sensitive
        assert!(fs.create_group("Root").is_ok());
    }

    #[test]
    fn test_records_grow_past_one_block() {
        let mut io = formatted();
        let mut fs = Ext2::open(&mut io, START, SIZE).unwrap();

        for i in 0..10 {
            fs.create_group(&format!("group{i}")).unwrap();
        }
        let creds = fs.read_credentials().unwrap();
        assert_eq!(creds.groups().count(), 11);
        assert!(fs.read_inode(EXT2_USERS_INODE).unwrap().blocks().count() > 1);
    }
}
