//! Progress reporting types for simulated uploads.

use serde::{Deserialize, Serialize};

use nimbus_core::EntryId;

/// Progress information for one in-flight upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadProgress {
    /// Id the finished entry will carry.
    pub id: EntryId,
    /// Bytes "transferred" so far.
    pub bytes_transferred: u64,
    /// Total bytes in the upload.
    pub bytes_total: u64,
}

impl UploadProgress {
    /// Create a progress report at zero bytes.
    pub fn new(id: EntryId, bytes_total: u64) -> Self {
        Self {
            id,
            bytes_transferred: 0,
            bytes_total,
        }
    }

    /// Get the progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.bytes_total > 0 {
            (self.bytes_transferred as f64 / self.bytes_total as f64) * 100.0
        } else {
            100.0
        }
    }

    /// Check whether the transfer has reached its total.
    pub fn is_done(&self) -> bool {
        self.bytes_transferred >= self.bytes_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let mut progress = UploadProgress::new(EntryId::new("u1"), 200);
        assert_eq!(progress.percentage(), 0.0);
        assert!(!progress.is_done());

        progress.bytes_transferred = 50;
        assert!((progress.percentage() - 25.0).abs() < f64::EPSILON);

        progress.bytes_transferred = 200;
        assert!(progress.is_done());
    }

    #[test]
    fn test_empty_upload_is_complete() {
        let progress = UploadProgress::new(EntryId::new("u1"), 0);
        assert_eq!(progress.percentage(), 100.0);
        assert!(progress.is_done());
    }
}
