// SPDX-License-Identifier: MIT

//! Command line grammar.
//!
//! A line is a verb followed by `-key=value`, `-key="quoted value"` or bare
//! flags such as `-p`. Keys and verbs are case-insensitive and `#` starts a
//! comment.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::{CmdError, CmdResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Mkdisk,
    Rmdisk,
    Fdisk,
    Mount,
    Mounted,
    Mkfs,
    Login,
    Logout,
    Mkgrp,
    Mkusr,
    Mkdir,
    Mkfile,
    Cat,
    Ls,
}

/// Parameters one verb accepts.
struct Schema {
    allowed: &'static [&'static str],
    required: &'static [&'static str],
    defaults: &'static [(&'static str, &'static str)],
    flags: &'static [&'static str],
    /// Prefix of numbered parameters (`file1`, `file2`, ...).
    indexed: Option<&'static str>,
}

impl Schema {
    const fn new(allowed: &'static [&'static str]) -> Self {
        Self {
            allowed,
            required: &[],
            defaults: &[],
            flags: &[],
            indexed: None,
        }
    }

    const fn required(mut self, required: &'static [&'static str]) -> Self {
        self.required = required;
        self
    }

    const fn defaults(mut self, defaults: &'static [(&'static str, &'static str)]) -> Self {
        self.defaults = defaults;
        self
    }

    const fn flags(mut self, flags: &'static [&'static str]) -> Self {
        self.flags = flags;
        self
    }

    const fn indexed(mut self, prefix: &'static str) -> Self {
        self.indexed = Some(prefix);
        self
    }

    fn accepts(&self, key: &str) -> bool {
        self.allowed.contains(&key) || self.indexed.is_some_and(|prefix| index_of(prefix, key).is_some())
    }
}

const MKDISK: Schema = Schema::new(&["size", "fit", "unit"])
    .required(&["size"])
    .defaults(&[("fit", "FF"), ("unit", "M")]);
const RMDISK: Schema = Schema::new(&["diskname"]).required(&["diskname"]);
const FDISK: Schema = Schema::new(&["size", "unit", "diskname", "type", "fit", "name"])
    .required(&["size", "diskname", "name"])
    .defaults(&[("unit", "K"), ("type", "P"), ("fit", "FF")]);
const MOUNT: Schema = Schema::new(&["diskname", "name"]).required(&["diskname", "name"]);
const NO_PARAMS: Schema = Schema::new(&[]);
const MKFS: Schema = Schema::new(&["id", "type"])
    .required(&["id"])
    .defaults(&[("type", "full")]);
const LOGIN: Schema = Schema::new(&["user", "pass", "id"]).required(&["user", "pass", "id"]);
const MKGRP: Schema = Schema::new(&["name"]).required(&["name"]);
const MKUSR: Schema = Schema::new(&["user", "pass", "grp"]).required(&["user", "pass", "grp"]);
const MKDIR: Schema = Schema::new(&["path"]).required(&["path"]).flags(&["p"]);
const MKFILE: Schema = Schema::new(&["path", "size"])
    .required(&["path"])
    .defaults(&[("size", "0")])
    .flags(&["r"]);
const CAT: Schema = Schema::new(&[]).indexed("file");
const LS: Schema = Schema::new(&["path"]).defaults(&[("path", "/")]);

impl Verb {
    pub const ALL: &'static [Verb] = &[
        Verb::Mkdisk,
        Verb::Rmdisk,
        Verb::Fdisk,
        Verb::Mount,
        Verb::Mounted,
        Verb::Mkfs,
        Verb::Login,
        Verb::Logout,
        Verb::Mkgrp,
        Verb::Mkusr,
        Verb::Mkdir,
        Verb::Mkfile,
        Verb::Cat,
        Verb::Ls,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Verb::Mkdisk => "mkdisk",
            Verb::Rmdisk => "rmdisk",
            Verb::Fdisk => "fdisk",
            Verb::Mount => "mount",
            Verb::Mounted => "mounted",
            Verb::Mkfs => "mkfs",
            Verb::Login => "login",
            Verb::Logout => "logout",
            Verb::Mkgrp => "mkgrp",
            Verb::Mkusr => "mkusr",
            Verb::Mkdir => "mkdir",
            Verb::Mkfile => "mkfile",
            Verb::Cat => "cat",
            Verb::Ls => "ls",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|verb| verb.name().eq_ignore_ascii_case(name))
    }

    fn schema(&self) -> &'static Schema {
        match self {
            Verb::Mkdisk => &MKDISK,
            Verb::Rmdisk => &RMDISK,
            Verb::Fdisk => &FDISK,
            Verb::Mount => &MOUNT,
            Verb::Mounted | Verb::Logout => &NO_PARAMS,
            Verb::Mkfs => &MKFS,
            Verb::Login => &LOGIN,
            Verb::Mkgrp => &MKGRP,
            Verb::Mkusr => &MKUSR,
            Verb::Mkdir => &MKDIR,
            Verb::Mkfile => &MKFILE,
            Verb::Cat => &CAT,
            Verb::Ls => &LS,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated command with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    params: BTreeMap<String, String>,
    flags: BTreeSet<String>,
}

impl Command {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Value of a required or defaulted parameter.
    pub fn value(&self, key: &str) -> CmdResult<&str> {
        self.get(key)
            .ok_or_else(|| CmdError::validation(format!("Missing parameter -{key}")))
    }

    /// Parses parameter `key` as an integer.
    pub fn int(&self, key: &str) -> CmdResult<i64> {
        let raw = self.value(key)?;
        raw.parse::<i64>()
            .map_err(|_| CmdError::validation(format!("Parameter -{key} must be an integer, got '{raw}'")))
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    /// Values of numbered parameters `<prefix>N`, in ascending N order.
    pub fn indexed(&self, prefix: &str) -> Vec<&str> {
        let mut values: Vec<(u32, &str)> = self
            .params
            .iter()
            .filter_map(|(key, value)| index_of(prefix, key).map(|n| (n, value.as_str())))
            .collect();
        values.sort_by_key(|(n, _)| *n);
        values.into_iter().map(|(_, value)| value).collect()
    }
}

fn index_of(prefix: &str, key: &str) -> Option<u32> {
    let digits = key.strip_prefix(prefix)?;
    if digits.is_empty()
        || digits.starts_with('0')
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Splits a line into tokens. Double quotes group whitespace and are removed;
/// an unquoted `#` at the start of a token ends the line.
pub fn tokenize(line: &str) -> CmdResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '#' if !quoted && !in_token => break,
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        return Err(CmdError::validation("Unterminated quote"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parses one line. Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> CmdResult<Option<Command>> {
    let tokens = tokenize(line)?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let verb = Verb::from_name(head)
        .ok_or_else(|| CmdError::validation(format!("Unknown command '{head}'")))?;
    let schema = verb.schema();

    let mut params = BTreeMap::new();
    let mut flags = BTreeSet::new();
    for token in rest {
        let body = token
            .strip_prefix('-')
            .ok_or_else(|| CmdError::validation(format!("Expected -key=value, got '{token}'")))?;
        let (key, value) = match body.split_once('=') {
            Some((key, value)) => (key.to_ascii_lowercase(), Some(value)),
            None => (body.to_ascii_lowercase(), None),
        };
        if key.is_empty() {
            return Err(CmdError::validation(format!("Empty parameter name in '{token}'")));
        }

        if schema.flags.contains(&key.as_str()) {
            if value.is_some() {
                return Err(CmdError::validation(format!("Flag -{key} does not take a value")));
            }
            if !flags.insert(key.clone()) {
                return Err(CmdError::validation(format!("Duplicate flag -{key}")));
            }
            continue;
        }
        if !schema.accepts(&key) {
            return Err(CmdError::validation(format!("Unknown parameter -{key} for {verb}")));
        }
        let value = match value {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => return Err(CmdError::validation(format!("Parameter -{key} needs a value"))),
        };
        if params.insert(key.clone(), value).is_some() {
            return Err(CmdError::validation(format!("Duplicate parameter -{key}")));
        }
    }

    for key in schema.required {
        if !params.contains_key(*key) {
            return Err(CmdError::validation(format!("Missing parameter -{key} for {verb}")));
        }
    }
    if let Some(prefix) = schema.indexed {
        if !params.keys().any(|key| index_of(prefix, key).is_some()) {
            return Err(CmdError::validation(format!(
                "{verb} needs at least one -{prefix}N parameter"
            )));
        }
    }
    for (key, default) in schema.defaults {
        params
            .entry((*key).to_string())
            .or_insert_with(|| (*default).to_string());
    }

    Ok(Some(Command {
        verb,
        params,
        flags,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdfs::ext2::ErrorKind;

    fn parse(line: &str) -> Command {
        parse_line(line).unwrap().unwrap()
    }

    fn reject(line: &str) -> String {
        let err = parse_line(line).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        err.message
    }

    #[test]
    fn defaults_and_case_insensitive_keys() {
        let cmd = parse("MKDISK -Size=5");
        assert_eq!(cmd.verb, Verb::Mkdisk);
        assert_eq!(cmd.int("size").unwrap(), 5);
        assert_eq!(cmd.get("unit"), Some("M"));
        assert_eq!(cmd.get("fit"), Some("FF"));

        let cmd = parse("fdisk -size=2048 -diskname=VDIC-A.mia -name=Part1");
        assert_eq!(cmd.get("unit"), Some("K"));
        assert_eq!(cmd.get("type"), Some("P"));
    }

    #[test]
    fn quotes_flags_and_comments() {
        let cmd = parse("mkdir -p -path=\"/mis docs/a\" # trailing");
        assert!(cmd.flag("p"));
        assert_eq!(cmd.get("path"), Some("/mis docs/a"));

        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# only a comment").unwrap(), None);
        assert_eq!(parse("ls").get("path"), Some("/"));
    }

    #[test]
    fn cat_orders_files_by_index() {
        let cmd = parse("cat -file10=/c -file2=/b -file1=/a");
        assert_eq!(cmd.indexed("file"), ["/a", "/b", "/c"]);
        assert!(reject("cat").contains("-fileN"));
        assert!(reject("cat -file0=/a").contains("Unknown parameter"));
        assert!(reject("cat -file1=/a -file01=/b").contains("Unknown parameter"));
        assert!(reject("cat -file007=/a").contains("Unknown parameter"));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(reject("format -id=1").contains("Unknown command"));
        assert!(reject("mkdisk -size=5 -size=6").contains("Duplicate"));
        assert!(reject("mkdisk -unit=K").contains("Missing parameter -size"));
        assert!(reject("mkdisk -size=5 -color=red").contains("Unknown parameter"));
        assert!(reject("mkdir -path=/a -p=yes").contains("does not take a value"));
        assert!(reject("mkdir -path=").contains("needs a value"));
        assert!(reject("mkdir path=/a").contains("Expected -key=value"));
        assert!(reject("login -user=\"root -pass=123").contains("Unterminated"));
        assert!(reject("mounted -r").contains("Unknown parameter"));
    }

    #[test]
    fn int_parameters() {
        let cmd = parse("mkfile -path=/f -size=abc");
        assert!(cmd.int("size").is_err());
        assert_eq!(parse("mkfile -path=/f").int("size").unwrap(), 0);
    }
}
