// SPDX-License-Identifier: MIT
//! Permission digits as stored in the inode.

use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// Access bits of one permission digit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Access: u8 {
        const READ  = 0b100;
        const WRITE = 0b010;
        const EXEC  = 0b001;
    }
}

impl Access {
    fn write_rwx(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = if self.contains(Access::READ) { 'r' } else { '-' };
        let w = if self.contains(Access::WRITE) { 'w' } else { '-' };
        let x = if self.contains(Access::EXEC) { 'x' } else { '-' };
        write!(f, "{r}{w}{x}")
    }
}

/// Owner, group and other access, e.g. `664`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perm {
    pub owner: Access,
    pub group: Access,
    pub other: Access,
}

impl Perm {
    pub fn from_digits(digits: [u8; 3]) -> Self {
        Self {
            owner: Access::from_bits_truncate(digits[0]),
            group: Access::from_bits_truncate(digits[1]),
            other: Access::from_bits_truncate(digits[2]),
        }
    }

    pub fn digits(&self) -> [u8; 3] {
        [self.owner.bits(), self.group.bits(), self.other.bits()]
    }
}

impl fmt::Display for Perm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.owner.write_rwx(f)?;
        self.group.write_rwx(f)?;
        self.other.write_rwx(f)
    }
}
