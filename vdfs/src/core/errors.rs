// SPDX-License-Identifier: MIT

use core::fmt;

pub use vdio::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAllocatorError {
    IO(VdIOError),
    OutOfInodes,
    OutOfBlocks,
    Other(&'static str),
}

impl FsAllocatorError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsAllocatorError::IO(_) => "IO error",
            FsAllocatorError::OutOfInodes => "No free inode left",
            FsAllocatorError::OutOfBlocks => "No free block left",
            FsAllocatorError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsAllocatorError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FsAllocatorError::IO(_) | FsAllocatorError::Other(_) => ErrorKind::IO,
            FsAllocatorError::OutOfInodes | FsAllocatorError::OutOfBlocks => ErrorKind::Capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFormatterError {
    IO(VdIOError),
    PartitionTooSmall,
    Invalid(&'static str),
    Other(&'static str),
}

impl FsFormatterError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsFormatterError::IO(_) => "IO error",
            FsFormatterError::PartitionTooSmall => "Partition too small to hold a filesystem",
            FsFormatterError::Invalid(msg) => msg,
            FsFormatterError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsFormatterError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FsFormatterError::IO(_) | FsFormatterError::Other(_) => ErrorKind::IO,
            FsFormatterError::PartitionTooSmall => ErrorKind::Capacity,
            FsFormatterError::Invalid(_) => ErrorKind::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsResolverError {
    IO(VdIOError),
    Allocator(FsAllocatorError),
    NotFound,
    NotADirectory,
    IsADirectory,
    AlreadyExists,
    DirectoryFull,
    InvalidName(&'static str),
    InvalidPath(&'static str),
    Other(&'static str),
}

impl FsResolverError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsResolverError::IO(_) => "IO error",
            FsResolverError::Allocator(_) => "Allocator error",
            FsResolverError::NotFound => "Path does not exist",
            FsResolverError::NotADirectory => "Not a directory",
            FsResolverError::IsADirectory => "Is a directory",
            FsResolverError::AlreadyExists => "A file with that name already exists",
            FsResolverError::DirectoryFull => "Directory full",
            FsResolverError::InvalidName(msg) => msg,
            FsResolverError::InvalidPath(msg) => msg,
            FsResolverError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsResolverError::IO(e) => Some(FsError::IO(*e)),
            FsResolverError::Allocator(e) => Some(FsError::Allocator(*e)),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FsResolverError::IO(_) | FsResolverError::Other(_) => ErrorKind::IO,
            FsResolverError::Allocator(e) => e.kind(),
            FsResolverError::NotFound | FsResolverError::NotADirectory => ErrorKind::NotFound,
            FsResolverError::IsADirectory
            | FsResolverError::AlreadyExists
            | FsResolverError::InvalidName(_)
            | FsResolverError::InvalidPath(_) => ErrorKind::Validation,
            FsResolverError::DirectoryFull => ErrorKind::Capacity,
        }
    }
}

impl fmt::Display for FsResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsStoreError {
    IO(VdIOError),
    Allocator(FsAllocatorError),
    NotAFile,
    TooLarge { len: usize, max: usize },
    Other(&'static str),
}

impl FsStoreError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsStoreError::IO(_) => "IO error",
            FsStoreError::Allocator(_) => "Allocator error",
            FsStoreError::NotAFile => "Not a file",
            FsStoreError::TooLarge { .. } => "Content exceeds the direct block limit",
            FsStoreError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsStoreError::IO(e) => Some(FsError::IO(*e)),
            FsStoreError::Allocator(e) => Some(FsError::Allocator(*e)),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FsStoreError::IO(_) | FsStoreError::Other(_) => ErrorKind::IO,
            FsStoreError::Allocator(e) => e.kind(),
            FsStoreError::NotAFile => ErrorKind::Validation,
            FsStoreError::TooLarge { .. } => ErrorKind::Capacity,
        }
    }
}

impl fmt::Display for FsStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        if let FsStoreError::TooLarge { len, max } = self {
            write!(f, " ({len} > {max} bytes)")?;
        }
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsCredentialError {
    IO(VdIOError),
    InvalidField(&'static str),
    GroupExists,
    UserExists,
    GroupNotFound,
    UserNotFound,
    WrongPassword,
    Other(&'static str),
}

impl FsCredentialError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsCredentialError::IO(_) => "IO error",
            FsCredentialError::InvalidField(msg) => msg,
            FsCredentialError::GroupExists => "Group already exists",
            FsCredentialError::UserExists => "User already exists",
            FsCredentialError::GroupNotFound => "Group does not exist",
            FsCredentialError::UserNotFound => "User does not exist",
            FsCredentialError::WrongPassword => "Wrong password",
            FsCredentialError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsCredentialError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FsCredentialError::IO(_) | FsCredentialError::Other(_) => ErrorKind::IO,
            FsCredentialError::InvalidField(_)
            | FsCredentialError::GroupExists
            | FsCredentialError::UserExists
            | FsCredentialError::WrongPassword => ErrorKind::Validation,
            FsCredentialError::GroupNotFound | FsCredentialError::UserNotFound => {
                ErrorKind::NotFound
            }
        }
    }
}

impl fmt::Display for FsCredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

/// Top-level error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    IO(VdIOError),
    Allocator(FsAllocatorError),
    Formatter(FsFormatterError),
    Resolver(FsResolverError),
    Store(FsStoreError),
    Credential(FsCredentialError),
    NotFormatted,
    Corrupted(&'static str),
    Other(&'static str),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        if let FsError::Store(FsStoreError::TooLarge { len, max }) = self {
            write!(f, " ({len} > {max} bytes)")?;
        }
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

impl std::error::Error for FsError {}

impl FsError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsError::IO(e) => e.msg(),
            FsError::Allocator(e) => e.msg(),
            FsError::Formatter(e) => e.msg(),
            FsError::Resolver(e) => e.msg(),
            FsError::Store(e) => e.msg(),
            FsError::Credential(e) => e.msg(),
            FsError::NotFormatted => "Partition is not formatted",
            FsError::Corrupted(msg) => msg,
            FsError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsError::Allocator(e) => e.source(),
            FsError::Formatter(e) => e.source(),
            FsError::Resolver(e) => e.source(),
            FsError::Store(e) => e.source(),
            FsError::Credential(e) => e.source(),
            FsError::IO(_) => None,
            FsError::NotFormatted => None,
            FsError::Corrupted(_) => None,
            FsError::Other(_) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::IO(e) => e.kind(),
            FsError::Allocator(e) => e.kind(),
            FsError::Formatter(e) => e.kind(),
            FsError::Resolver(e) => e.kind(),
            FsError::Store(e) => e.kind(),
            FsError::Credential(e) => e.kind(),
            FsError::NotFormatted => ErrorKind::State,
            FsError::Corrupted(_) | FsError::Other(_) => ErrorKind::IO,
        }
    }
}

// === type Fs*Result ===

pub type FsResult<T = ()> = Result<T, FsError>;
pub type FsAllocatorResult<T = ()> = Result<T, FsAllocatorError>;
pub type FsFormatterResult<T = ()> = Result<T, FsFormatterError>;
pub type FsResolverResult<T = ()> = Result<T, FsResolverError>;
pub type FsStoreResult<T = ()> = Result<T, FsStoreError>;
pub type FsCredentialResult<T = ()> = Result<T, FsCredentialError>;

crate::fs_error_wiring! {
    top => FsError {
        VdIOError         : IO,
        FsAllocatorError  : Allocator,
        FsFormatterError  : Formatter,
        FsResolverError   : Resolver,
        FsStoreError      : Store,
        FsCredentialError : Credential,
    },
    str_into => [
        FsAllocatorError,
        FsFormatterError,
        FsResolverError,
        FsStoreError,
        FsCredentialError,
    ],
    sub => {
        VdIOError        => [ FsAllocatorError::IO, FsFormatterError::IO, FsResolverError::IO, FsStoreError::IO, FsCredentialError::IO ],
        FsAllocatorError => [ FsResolverError::Allocator, FsStoreError::Allocator ],
    },
}
