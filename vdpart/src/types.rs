// SPDX-License-Identifier: MIT

use crate::errors::*;

define_byte_codes! {
    /// Placement policy recorded on the disk and on every partition.
    pub enum FitPolicy {
        Best => b'B', "BF", "best fit",
        First => b'F', "FF", "first fit",
        Worst => b'W', "WF", "worst fit",
    }
}

impl Default for FitPolicy {
    fn default() -> Self {
        FitPolicy::First
    }
}

impl FitPolicy {
    pub fn parse(code: &str) -> PartResult<Self> {
        Self::from_code(code).ok_or(PartError::Invalid("Invalid fit, expected BF, FF or WF"))
    }
}

define_byte_codes! {
    pub enum PartitionKind {
        Primary => b'P', "P", "primary",
        Extended => b'E', "E", "extended",
        Logical => b'L', "L", "logical",
    }
}

impl PartitionKind {
    /// Parses a type code. Only primary partitions can be created.
    pub fn parse(code: &str) -> PartResult<Self> {
        match Self::from_code(code) {
            Some(PartitionKind::Primary) => Ok(PartitionKind::Primary),
            Some(_) => Err(PartError::Unsupported(
                "Only primary partitions are supported",
            )),
            None => Err(PartError::Invalid("Invalid partition type, expected P, E or L")),
        }
    }
}

define_byte_codes! {
    /// Unit applied to a requested size.
    pub enum SizeUnit {
        Bytes => b'B', "B", "bytes",
        Kilo => b'K', "K", "kibibytes",
        Mega => b'M', "M", "mebibytes",
    }
}

impl SizeUnit {
    pub fn multiplier(&self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilo => 1024,
            SizeUnit::Mega => 1024 * 1024,
        }
    }

    /// Units accepted when creating a disk.
    pub fn parse_disk_unit(code: &str) -> PartResult<Self> {
        match Self::from_code(code) {
            Some(unit @ (SizeUnit::Kilo | SizeUnit::Mega)) => Ok(unit),
            _ => Err(PartError::Invalid("Invalid disk unit, expected K or M")),
        }
    }

    /// Units accepted when creating a partition.
    pub fn parse_partition_unit(code: &str) -> PartResult<Self> {
        Self::from_code(code).ok_or(PartError::Invalid("Invalid unit, expected B, K or M"))
    }

    /// Scales `size` to bytes.
    ///
    /// Fails on non-positive sizes and on results that do not fit the
    /// 32-bit size fields of the partition table.
    pub fn to_bytes(&self, size: i64) -> PartResult<i32> {
        if size <= 0 {
            return Err(PartError::Invalid("Size must be a positive integer"));
        }
        let bytes = (size as u64)
            .checked_mul(self.multiplier())
            .ok_or(PartError::Invalid("Size overflow"))?;
        i32::try_from(bytes).map_err(|_| PartError::Invalid("Size exceeds the 2 GiB image limit"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_codes() {
        assert_eq!(FitPolicy::parse("bf").unwrap(), FitPolicy::Best);
        assert_eq!(FitPolicy::parse("FF").unwrap().as_byte(), b'F');
        assert_eq!(FitPolicy::from_byte(b'W'), Some(FitPolicy::Worst));
        assert!(FitPolicy::parse("XF").is_err());
        assert!(FitPolicy::default().is_first());
    }

    #[test]
    fn partition_kind_only_primary() {
        assert_eq!(PartitionKind::parse("p").unwrap(), PartitionKind::Primary);
        assert!(matches!(
            PartitionKind::parse("E"),
            Err(PartError::Unsupported(_))
        ));
        assert!(matches!(
            PartitionKind::parse("Z"),
            Err(PartError::Invalid(_))
        ));
    }

    #[test]
    fn units() {
        assert_eq!(SizeUnit::Mega.to_bytes(5).unwrap(), 5 * 1024 * 1024);
        assert_eq!(SizeUnit::Kilo.to_bytes(2048).unwrap(), 2048 * 1024);
        assert!(SizeUnit::Bytes.to_bytes(0).is_err());
        assert!(SizeUnit::Mega.to_bytes(4096).is_err());

        assert!(SizeUnit::parse_disk_unit("B").is_err());
        assert_eq!(SizeUnit::parse_disk_unit("k").unwrap(), SizeUnit::Kilo);
        assert_eq!(SizeUnit::parse_partition_unit("b").unwrap(), SizeUnit::Bytes);
    }
}
