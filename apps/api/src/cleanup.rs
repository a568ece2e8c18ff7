//! Temp-file lifecycle for the shared upload directory.
//!
//! Uploads land in `temp_uploads/` under the sanitized original filename and
//! are deleted right after processing; this module is the backstop for
//! anything left behind. A background task sweeps the directory once at
//! startup and then hourly, deleting files whose modification time is older
//! than the retention window. Individual deletion errors are logged and
//! skipped — one stubborn file never aborts the sweep.

use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

pub const TEMP_UPLOAD_DIR: &str = "temp_uploads";
const FILE_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Spawns the recurring sweep. The first tick fires immediately, which gives
/// the eager startup pass.
pub fn spawn_cleanup_task() {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        info!(
            "Temp-file sweep scheduled every {}s (retention {}s)",
            SWEEP_INTERVAL.as_secs(),
            FILE_RETENTION.as_secs()
        );
        loop {
            ticker.tick().await;
            let cutoff = SystemTime::now() - FILE_RETENTION;
            sweep_older_than(Path::new(TEMP_UPLOAD_DIR), cutoff);
        }
    });
}

/// Removes entries in `dir` whose modification time precedes `cutoff`.
/// Takes the cutoff rather than computing it so the policy stays testable.
pub fn sweep_older_than(dir: &Path, cutoff: SystemTime) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read temp dir {}: {e}", dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        match entry.metadata().and_then(|m| m.modified()) {
            Ok(mtime) if mtime < cutoff => {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!("Error removing file {}: {e}", path.display());
                } else {
                    debug!("Removed stale temp file {}", path.display());
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to stat {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_removes_files_older_than_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("stale.pdf");
        std::fs::write(&stale, b"old upload").unwrap();

        // A cutoff in the future makes every existing file stale.
        let cutoff = SystemTime::now() + Duration::from_secs(60);
        sweep_older_than(dir.path(), cutoff);

        assert!(!stale.exists());
    }

    #[test]
    fn test_sweep_retains_files_newer_than_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("fresh.docx");
        std::fs::write(&fresh, b"recent upload").unwrap();

        let cutoff = SystemTime::now() - Duration::from_secs(3600);
        sweep_older_than(dir.path(), cutoff);

        assert!(fresh.exists());
    }

    #[test]
    fn test_sweep_mixed_ages_only_removes_stale() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("kept.pdf");
        std::fs::write(&kept, b"x").unwrap();

        // Cutoff before the file was written: nothing qualifies.
        let cutoff = SystemTime::now() - Duration::from_secs(10);
        sweep_older_than(dir.path(), cutoff);
        assert!(kept.exists());

        // Cutoff after: everything qualifies.
        let cutoff = SystemTime::now() + Duration::from_secs(10);
        sweep_older_than(dir.path(), cutoff);
        assert!(!kept.exists());
    }

    #[test]
    fn test_sweep_missing_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        // Must not panic.
        sweep_older_than(&missing, SystemTime::now());
    }
}
