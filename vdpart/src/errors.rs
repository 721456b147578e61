// SPDX-License-Identifier: MIT

use core::fmt;

use vdio::errors::*;

/// Unified error type for disk and partition table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartError {
    IO(VdIOError),
    Invalid(&'static str),
    Unsupported(&'static str),
    NameTooLong { len: usize, max: usize },
    DuplicateName,
    NotFound(&'static str),
    NoFreeSlot,
    NoSpace { requested: u64, available: u64 },
    DiskLimit,
    Other(&'static str),
}

impl PartError {
    pub fn msg(&self) -> &'static str {
        match self {
            PartError::IO(e) => e.msg(),
            PartError::Invalid(msg) => msg,
            PartError::Unsupported(msg) => msg,
            PartError::NameTooLong { .. } => "Partition name too long",
            PartError::DuplicateName => "A partition with this name already exists",
            PartError::NotFound(msg) => msg,
            PartError::NoFreeSlot => "No free partition slot left",
            PartError::NoSpace { .. } => "Not enough free space on disk",
            PartError::DiskLimit => "Every disk letter A-Z is already in use",
            PartError::Other(msg) => msg,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PartError::IO(_) | PartError::Other(_) => ErrorKind::IO,
            PartError::Invalid(_)
            | PartError::Unsupported(_)
            | PartError::NameTooLong { .. }
            | PartError::DuplicateName => ErrorKind::Validation,
            PartError::NotFound(_) => ErrorKind::NotFound,
            PartError::NoFreeSlot | PartError::NoSpace { .. } | PartError::DiskLimit => {
                ErrorKind::Capacity
            }
        }
    }

    pub fn source(&self) -> Option<VdIOError> {
        match self {
            PartError::IO(e) => Some(*e),
            _ => None,
        }
    }
}

impl From<&'static str> for PartError {
    fn from(s: &'static str) -> Self {
        PartError::Other(s)
    }
}

impl From<VdIOError> for PartError {
    fn from(e: VdIOError) -> Self {
        PartError::IO(e)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for PartError {
    fn from(e: std::io::Error) -> Self {
        PartError::IO(e.into())
    }
}

impl fmt::Display for PartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        match self {
            PartError::NameTooLong { len, max } => write!(f, " ({len} > {max} bytes)")?,
            PartError::NoSpace {
                requested,
                available,
            } => write!(f, " (requested {requested} B, available {available} B)")?,
            _ => {}
        }
        if let Some(src) = self.source() {
            write!(f, "\n  caused by: {}", src.msg())?;
        }
        Ok(())
    }
}

impl std::error::Error for PartError {}

pub type PartResult<T = ()> = Result<T, PartError>;
