// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_DISK_DIR: &str = "VDIC-MIA/Disks";
pub const DEFAULT_DISK_PREFIX: &str = "VDIC-";
pub const DEFAULT_MOUNT_PREFIX: &str = "21";

/// Settings read from an optional `vdisk.toml`.
///
/// ```toml
/// disk_dir = "VDIC-MIA/Disks"
/// disk_prefix = "VDIC-"
/// mount_prefix = "21"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the `.mia` images.
    pub disk_dir: PathBuf,
    /// File name prefix of new images, followed by the drive letter.
    pub disk_prefix: String,
    /// Leading digits of every mount id.
    pub mount_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disk_dir: PathBuf::from(DEFAULT_DISK_DIR),
            disk_prefix: DEFAULT_DISK_PREFIX.to_string(),
            mount_prefix: DEFAULT_MOUNT_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Same settings with images stored under `dir`.
    pub fn with_disk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.disk_dir = dir.into();
        self
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.disk_prefix.is_empty() || self.disk_prefix.contains(['/', '\\']) {
            anyhow::bail!("disk_prefix must be a plain, non-empty file name prefix");
        }
        if !self.mount_prefix.chars().all(|c| c.is_ascii_digit()) {
            anyhow::bail!("mount_prefix must only contain digits");
        }
        Ok(())
    }
}
