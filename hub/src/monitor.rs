//! Local-versus-remote progress comparison for long-running uploads.

use std::collections::{HashMap, HashSet};

use hangar_common::artifacts::ArtifactFile;

use crate::client::RemoteFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSnapshot {
    pub local_bytes: u64,
    pub remote_bytes: u64,
    pub files_matched: usize,
    pub files_total: usize,
}

impl MonitorSnapshot {
    /// Percent of local bytes accounted for on the remote; 0 when there is
    /// nothing local to upload.
    pub fn percent(&self) -> f64 {
        if self.local_bytes == 0 {
            return 0.0;
        }
        self.remote_bytes as f64 / self.local_bytes as f64 * 100.0
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.local_bytes.saturating_sub(self.remote_bytes)
    }
}

/// Matches local artifacts against remote files by basename and sums sizes.
///
/// A remote file whose size the hub did not report counts as 0 bytes until
/// the listing catches up, mirroring how partially-committed uploads show.
pub fn compare(local: &[ArtifactFile], remote: &[RemoteFile]) -> MonitorSnapshot {
    let remote_sizes: HashMap<&str, u64> =
        remote.iter().map(|f| (f.basename(), f.size)).collect();

    let mut remote_bytes = 0u64;
    let mut files_matched = 0usize;
    let mut local_bytes = 0u64;
    let mut counted: HashSet<&str> = HashSet::new();

    for file in local {
        local_bytes += file.size;
        if let Some(size) = remote_sizes.get(file.basename()) {
            files_matched += 1;
            // Local files sharing a basename map to one remote entry;
            // count its bytes once.
            if counted.insert(file.basename()) {
                remote_bytes += size;
            }
        }
    }

    MonitorSnapshot {
        local_bytes,
        remote_bytes,
        files_matched,
        files_total: local.len(),
    }
}
