// SPDX-License-Identifier: MIT

use core::fmt;

use vdfs::ext2::{
    ErrorKind, FsAllocatorError, FsCredentialError, FsError, FsFormatterError, FsResolverError,
    FsStoreError, VdIOError,
};
use vdpart::PartError;

/// Outcome of a failed command: the taxonomy kind plus a printable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdError {
    pub kind: ErrorKind,
    pub message: String,
}

pub type CmdResult<T = String> = Result<T, CmdError>;

impl CmdError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::State, message)
    }

    /// Prefixes the message with what was being attempted.
    pub fn context(mut self, what: impl fmt::Display) -> Self {
        self.message = format!("{what}: {}", self.message);
        self
    }
}

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} error)", self.message, self.kind)
    }
}

impl std::error::Error for CmdError {}

impl From<PartError> for CmdError {
    fn from(e: PartError) -> Self {
        CmdError::new(e.kind(), e.to_string())
    }
}

impl From<FsError> for CmdError {
    fn from(e: FsError) -> Self {
        CmdError::new(e.kind(), e.to_string())
    }
}

impl From<VdIOError> for CmdError {
    fn from(e: VdIOError) -> Self {
        CmdError::new(e.kind(), e.to_string())
    }
}

impl From<std::io::Error> for CmdError {
    fn from(e: std::io::Error) -> Self {
        CmdError::new(ErrorKind::IO, e.to_string())
    }
}

macro_rules! cmd_error_via_fs {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for CmdError {
                fn from(e: $err) -> Self {
                    FsError::from(e).into()
                }
            }
        )+
    };
}

cmd_error_via_fs!(
    FsAllocatorError,
    FsFormatterError,
    FsResolverError,
    FsStoreError,
    FsCredentialError,
);
