// SPDX-License-Identifier: MIT

pub mod ext2;
