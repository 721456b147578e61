// SPDX-License-Identifier: MIT

use crate::errors::*;
use crate::types::{FitPolicy, PartitionKind};
use vdio::prelude::*;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

pub const MAX_PARTITIONS: usize = 4;
pub const PARTITION_NAME_LEN: usize = 16;
pub const PARTITION_ID_LEN: usize = 4;

pub const STATUS_UNMOUNTED: i8 = -1;
pub const STATUS_MOUNTED: i8 = 1;

/// Sentinel used by empty slots for start, size and correlative.
pub const UNUSED: i32 = -1;

/// One partition slot (35 bytes).
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct Partition {
    pub status: i8,
    pub kind: u8,
    pub fit: u8,
    pub start: i32,
    pub size: i32,
    pub name: [u8; PARTITION_NAME_LEN],
    pub correlative: i32,
    pub id: [u8; PARTITION_ID_LEN],
}

const _: () = assert!(core::mem::size_of::<Partition>() == 35);

impl Default for Partition {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl Partition {
    #[inline]
    pub fn new_empty() -> Self {
        Self {
            status: STATUS_UNMOUNTED,
            kind: PartitionKind::Primary.as_byte(),
            fit: FitPolicy::Worst.as_byte(),
            start: UNUSED,
            size: UNUSED,
            name: [0u8; PARTITION_NAME_LEN],
            correlative: UNUSED,
            id: [0u8; PARTITION_ID_LEN],
        }
    }

    /// Builds an unmounted primary partition. `name` must already be validated.
    pub fn new_primary(name: &str, start: i32, size: i32, fit: FitPolicy, correlative: i32) -> Self {
        let mut name_buf = [0u8; PARTITION_NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(PARTITION_NAME_LEN);
        name_buf[..len].copy_from_slice(&bytes[..len]);

        Self {
            status: STATUS_UNMOUNTED,
            kind: PartitionKind::Primary.as_byte(),
            fit: fit.as_byte(),
            start,
            size,
            name: name_buf,
            correlative,
            id: [0u8; PARTITION_ID_LEN],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == UNUSED
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.status == STATUS_MOUNTED
    }

    #[inline]
    pub fn kind(&self) -> Option<PartitionKind> {
        PartitionKind::from_byte(self.kind)
    }

    #[inline]
    pub fn fit(&self) -> Option<FitPolicy> {
        FitPolicy::from_byte(self.fit)
    }

    /// First byte past the partition.
    #[inline]
    pub fn end(&self) -> i64 {
        self.start as i64 + self.size as i64
    }

    pub fn name(&self) -> String {
        trim_nul(&self.name)
    }

    pub fn id(&self) -> String {
        trim_nul(&self.id)
    }

    #[inline]
    pub fn matches_name(&self, name: &str) -> bool {
        !self.is_empty() && self.name().eq_ignore_ascii_case(name)
    }

    /// Records the mount state. Ids longer than the slot are cut to its width;
    /// the in-memory mount table keeps the full id.
    pub fn set_mounted(&mut self, correlative: i32, id: &str) {
        let mut id_buf = [0u8; PARTITION_ID_LEN];
        let bytes = id.as_bytes();
        let len = bytes.len().min(PARTITION_ID_LEN);
        id_buf[..len].copy_from_slice(&bytes[..len]);

        self.status = STATUS_MOUNTED;
        self.correlative = correlative;
        self.id = id_buf;
    }
}

fn trim_nul(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Partition table stored at offset 0 of every disk image (153 bytes).
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct Mbr {
    pub size: i32,
    pub created: i32,
    pub signature: i32,
    pub fit: u8,
    pub partitions: [Partition; MAX_PARTITIONS],
}

pub const MBR_SIZE: usize = core::mem::size_of::<Mbr>();
const _: () = assert!(MBR_SIZE == 153);

/// Where the next partition would go and how much room it would have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub slot: usize,
    pub start: i64,
    pub available: i64,
}

impl Mbr {
    #[inline]
    pub fn new(size: i32, created: i32, signature: i32, fit: FitPolicy) -> Self {
        Self {
            size,
            created,
            signature,
            fit: fit.as_byte(),
            partitions: [Partition::new_empty(); MAX_PARTITIONS],
        }
    }

    #[inline]
    pub fn fit(&self) -> Option<FitPolicy> {
        FitPolicy::from_byte(self.fit)
    }

    /// Index of the partition named `name` (case-insensitive).
    pub fn find_partition(&self, name: &str) -> Option<usize> {
        self.partitions.iter().position(|p| p.matches_name(name))
    }

    #[inline]
    pub fn first_free_slot(&self) -> Option<usize> {
        self.partitions.iter().position(|p| p.is_empty())
    }

    /// Placement of the next partition.
    ///
    /// Partitions are laid out in slot order: the first one starts right after
    /// the table and every other one right after its predecessor. Space freed
    /// between partitions is never reused.
    pub fn next_placement(&self) -> Option<Placement> {
        let slot = self.first_free_slot()?;
        let start = match slot {
            0 => MBR_SIZE as i64,
            _ => self.partitions[slot - 1].end(),
        };
        Some(Placement {
            slot,
            start,
            available: self.size as i64 - start,
        })
    }

    /// Validates and records a new primary partition, returning its slot.
    ///
    /// The table is only modified in memory; callers persist it with [`write_mbr`].
    pub fn add_primary_partition(
        &mut self,
        name: &str,
        size: i32,
        fit: FitPolicy,
    ) -> PartResult<usize> {
        validate_partition_name(name)?;
        if size <= 0 {
            return Err(PartError::Invalid("Size must be a positive integer"));
        }
        if self.find_partition(name).is_some() {
            return Err(PartError::DuplicateName);
        }
        let placement = self.next_placement().ok_or(PartError::NoFreeSlot)?;
        if size as i64 > placement.available {
            return Err(PartError::NoSpace {
                requested: size as u64,
                available: placement.available.max(0) as u64,
            });
        }

        let slot = placement.slot;
        self.partitions[slot] = Partition::new_primary(
            name,
            placement.start as i32,
            size,
            fit,
            slot as i32 + 1,
        );
        Ok(slot)
    }

    /// Non-empty partitions in slot order.
    pub fn used_partitions(&self) -> impl Iterator<Item = (usize, &Partition)> {
        self.partitions.iter().enumerate().filter(|(_, p)| !p.is_empty())
    }

    /// Checks that the table is something this crate could have written.
    pub fn validate(&self) -> PartResult<()> {
        let size = self.size as i64;
        if size <= MBR_SIZE as i64 {
            return Err(PartError::Invalid("Partition table: invalid disk size"));
        }
        let mut expected_start = MBR_SIZE as i64;
        let mut seen_empty = false;
        for p in self.partitions.iter() {
            if p.is_empty() {
                seen_empty = true;
                continue;
            }
            if seen_empty {
                return Err(PartError::Invalid("Partition table: gap between slots"));
            }
            if p.start as i64 != expected_start || p.size <= 0 || p.end() > size {
                return Err(PartError::Invalid("Partition table: overlapping or out of range entry"));
            }
            expected_start = p.end();
        }
        Ok(())
    }
}

/// Partition names are non-empty and at most 16 bytes.
pub fn validate_partition_name(name: &str) -> PartResult<()> {
    if name.trim().is_empty() {
        return Err(PartError::Invalid("Partition name must not be empty"));
    }
    if name.len() > PARTITION_NAME_LEN {
        return Err(PartError::NameTooLong {
            len: name.len(),
            max: PARTITION_NAME_LEN,
        });
    }
    Ok(())
}

pub fn write_mbr<IO: VdIO + ?Sized>(io: &mut IO, mbr: &Mbr) -> PartResult<()> {
    io.write_struct(0, mbr)?;
    io.flush()?;
    Ok(())
}

pub fn read_mbr<IO: VdIO + ?Sized>(io: &mut IO) -> PartResult<Mbr> {
    let mbr: Mbr = io.read_struct(0)?;
    mbr.validate()?;
    Ok(mbr)
}
