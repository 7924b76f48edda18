//! Storage usage counters.

use serde::{Deserialize, Serialize};

/// Informational storage counters for a drive.
///
/// Tracked live as files are created and removed, but never enforced
/// against mutations; quota display is a presentation concern.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StorageStats {
    /// Bytes currently used.
    pub used: u64,
    /// Plan limit in bytes.
    pub limit: u64,
}

impl StorageStats {
    /// Create empty stats with a limit.
    pub fn new(limit: u64) -> Self {
        Self { used: 0, limit }
    }

    /// Create stats with a known usage figure.
    pub fn with_usage(used: u64, limit: u64) -> Self {
        Self { used, limit }
    }

    /// Record bytes added to the drive.
    pub fn record(&mut self, bytes: u64) {
        self.used = self.used.saturating_add(bytes);
    }

    /// Release bytes removed from the drive.
    pub fn release(&mut self, bytes: u64) {
        self.used = self.used.saturating_sub(bytes);
    }

    /// Usage as a percentage of the limit (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.limit > 0 {
            (self.used as f64 / self.limit as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Bytes remaining before the limit.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }

    /// Check if usage exceeds the limit.
    pub fn is_over_limit(&self) -> bool {
        self.used > self.limit
    }
}
