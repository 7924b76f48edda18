//! Store configuration types.

use compact_str::CompactString;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Default storage limit: 15 GiB, the demo plan size.
pub const DEFAULT_STORAGE_LIMIT: u64 = 15 * 1024 * 1024 * 1024;

/// Configuration for a file-tree store.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct StoreConfig {
    /// Storage limit in bytes (informational, never enforced).
    #[builder(default = "DEFAULT_STORAGE_LIMIT")]
    #[serde(default = "default_storage_limit")]
    pub storage_limit: u64,

    /// Maximum entry name length in characters.
    #[builder(default = "255")]
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
}

fn default_storage_limit() -> u64 {
    DEFAULT_STORAGE_LIMIT
}

fn default_max_name_len() -> usize {
    255
}

impl StoreConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.max_name_len {
            return Err("Maximum name length cannot be zero".to_string());
        }
        Ok(())
    }
}

impl StoreConfig {
    /// Create a new store config builder.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Validate an entry name and return its trimmed form.
    ///
    /// Rules shared by create and rename: names must be non-empty
    /// after trimming whitespace, fit the length cap, avoid path
    /// separators and NUL, and not be the reserved `.` / `..`.
    pub fn validate_name(&self, name: &str) -> Result<CompactString, StoreError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(StoreError::invalid_name(name, "name is empty"));
        }

        if trimmed.chars().count() > self.max_name_len {
            return Err(StoreError::invalid_name(
                name,
                format!("name is longer than {} characters", self.max_name_len),
            ));
        }

        for c in ['/', '\0'] {
            if trimmed.contains(c) {
                return Err(StoreError::invalid_name(
                    name,
                    format!("name cannot contain {c:?}"),
                ));
            }
        }

        if trimmed == "." || trimmed == ".." {
            return Err(StoreError::invalid_name(name, "reserved name"));
        }

        Ok(CompactString::from(trimmed))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_limit: DEFAULT_STORAGE_LIMIT,
            max_name_len: 255,
        }
    }
}
