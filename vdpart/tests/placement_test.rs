// SPDX-License-Identifier: MIT

use vdio::prelude::*;
use vdpart::mbr::{MBR_SIZE, Mbr, read_mbr, write_mbr};
use vdpart::{FitPolicy, PartError};

/// Small deterministic generator so the sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

#[test]
fn successful_creations_are_packed_and_disjoint() {
    let disk_size: i32 = 256 * 1024;

    for seed in 0..64u64 {
        let mut rng = Lcg(seed);
        let mut io = MemVdIO::new(disk_size as usize);
        write_mbr(&mut io, &Mbr::new(disk_size, 0, 1, FitPolicy::First)).unwrap();

        for attempt in 0..8 {
            let mut table = read_mbr(&mut io).unwrap();
            let size = 1 + rng.next(disk_size as u64 / 2) as i32;
            match table.add_primary_partition(&format!("p{attempt}"), size, FitPolicy::Best) {
                Ok(_) => write_mbr(&mut io, &table).unwrap(),
                Err(PartError::NoSpace { .. }) | Err(PartError::NoFreeSlot) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        let table = read_mbr(&mut io).unwrap();
        let used: Vec<_> = table.used_partitions().map(|(_, p)| *p).collect();
        let mut expected_start = MBR_SIZE as i64;
        for p in &used {
            assert_eq!(p.start as i64, expected_start, "seed {seed}");
            assert!(p.end() <= disk_size as i64, "seed {seed}");
            expected_start = p.end();
        }
    }
}

#[test]
fn failed_creation_leaves_table_untouched() {
    let disk_size: i32 = 8 * 1024;
    let mut io = MemVdIO::new(disk_size as usize);
    write_mbr(&mut io, &Mbr::new(disk_size, 0, 1, FitPolicy::First)).unwrap();
    let before = io.as_slice().to_vec();

    let mut table = read_mbr(&mut io).unwrap();
    assert!(table
        .add_primary_partition("huge", disk_size, FitPolicy::First)
        .is_err());
    assert_eq!(io.as_slice(), before.as_slice());
}
