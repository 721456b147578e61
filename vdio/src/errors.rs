// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for VdIO operations.
pub type VdIOResult<T = ()> = core::result::Result<T, VdIOError>;

/// Coarse classification shared by every error type of the workspace.
///
/// Front-ends use it to report failures without matching on each enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed, missing or oversized input.
    Validation,
    /// Missing disk, partition, mount id, path component, user or group.
    NotFound,
    /// Operation not allowed in the current session or mount state.
    State,
    /// No free inode, block, slot, directory entry or disk space.
    Capacity,
    /// Failure of the backing store.
    IO,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not found",
            ErrorKind::State => "state",
            ErrorKind::Capacity => "capacity",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error type for VdIO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VdIOError {
    Other(&'static str),
    OutOfBounds,
    Unsupported,
}

impl VdIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            VdIOError::Other(msg) => msg,
            VdIOError::OutOfBounds => "Out of bounds",
            VdIOError::Unsupported => "Unsupported operation",
        }
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::IO
    }
}

impl From<&'static str> for VdIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        VdIOError::Other(msg)
    }
}

impl fmt::Display for VdIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        Ok(())
    }
}

impl std::error::Error for VdIOError {}
