// SPDX-License-Identifier: MIT

//! Disk images and their partition table.
//!
//! A disk is a flat `.mia` file holding an [`mbr::Mbr`] at offset 0 followed
//! by up to four primary partitions placed back to back.

#[macro_use]
mod macros;

pub mod errors;
/// Partition table layout and placement rules.
pub mod mbr;
/// Fit policies, partition kinds and size units.
pub mod types;

#[cfg(feature = "std")]
/// Disk image files on the host filesystem.
pub mod disk;

pub use errors::*;
pub use types::*;

/// Extension carried by every disk image file.
pub const DISK_EXTENSION: &str = "mia";
