// SPDX-License-Identifier: MIT
pub mod allocator;
pub mod constant;
pub mod filesystem;
pub mod formatter;
pub mod meta;
pub mod resolver;
pub mod store;
pub mod types;
pub mod users;

// Public Interface
pub mod traits {
    pub use super::filesystem::Ext2;
    pub use super::formatter::Ext2Formatter;
    pub use super::meta::Ext2Meta;
    pub use super::resolver::{DirListing, NodeAttrs};
    pub use super::users::{Credentials, GroupRecord, Record, UserRecord};
}

pub mod prelude {
    pub use super::constant::*;
    pub use super::store::digit_pattern;
    pub use super::traits::*;
    pub use super::types::*;
    pub use crate::core::errors::*;
    pub use crate::core::traits::*;
    pub use vdio::prelude::*;
}
