// SPDX-License-Identifier: MIT

//! Path utilities for the `/`-separated paths used inside a partition.
//!
//! Paths are always absolute from the root directory. Backslashes are
//! unified to `/`, empty components and `.` are dropped, and `..` pops the
//! previous component (never above the root).

use crate::core::errors::{FsResolverError, FsResolverResult};

/// Maximum length in bytes of one path component.
pub const MAX_NAME_LEN: usize = 12;

/// Convert a path into a unified path with `/` separators
pub fn path_to_unified_str(path_str: &str) -> String {
    path_str.replace('\\', "/")
}

/// Splits a path into its components, using `/` as separator.
///
/// Returns a Vec of non-empty components.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

/// Splits `path` into normalized components, resolving `.` and `..`.
pub fn normalize_components(path: &str) -> FsResolverResult<Vec<String>> {
    let unified = path_to_unified_str(path.trim());
    if unified.is_empty() {
        return Err(FsResolverError::InvalidPath("Path must not be empty"));
    }

    let mut out: Vec<String> = Vec::new();
    for part in split_path(&unified) {
        match part {
            "." => {}
            ".." => {
                out.pop();
            }
            name => out.push(name.to_string()),
        }
    }
    Ok(out)
}

/// Splits normalized components into the parent components and the final name.
///
/// Returns `None` for the root path.
pub fn split_parent(components: &[String]) -> Option<(&[String], &str)> {
    components
        .split_last()
        .map(|(name, parent)| (parent, name.as_str()))
}

/// Checks that `name` can be stored in a directory entry.
pub fn validate_name(name: &str) -> FsResolverResult {
    if name.is_empty() {
        return Err(FsResolverError::InvalidName("Name must not be empty"));
    }
    if name.contains('/') || name.contains('\0') {
        return Err(FsResolverError::InvalidName("Name contains a forbidden character"));
    }
    if name == "." || name == ".." {
        return Err(FsResolverError::InvalidName("Name is reserved"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(FsResolverError::InvalidName("Name longer than 12 bytes"));
    }
    Ok(())
}
