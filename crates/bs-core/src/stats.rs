//! Run statistics with atomic counters.
//!
//! [`ScanStats`] is created once per run and shared (via `Arc`) between the
//! scanner thread and both dispatcher threads. All counters use [`AtomicU64`]
//! with [`Relaxed`](Ordering::Relaxed) ordering: no invariant spans two
//! fields, and the struct is only read after every thread has joined.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for one entity class (directories or files).
///
/// At quiescence `processed <= total` holds: an entry is only processed
/// after it has been counted as found.
#[derive(Debug, Default)]
pub struct EntryStats {
    /// Entries discovered during enumeration.
    total: AtomicU64,
    /// Entries actually visited/read.
    processed: AtomicU64,
    /// Entries that could not be read due to missing permissions.
    access_denied: AtomicU64,
}

impl EntryStats {
    /// Adds `count` newly discovered entries.
    #[inline]
    pub fn add_total(&self, count: u64) {
        self.total.fetch_add(count, Ordering::Relaxed);
    }

    /// Records one processed entry.
    #[inline]
    pub fn increment_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one permission failure.
    #[inline]
    pub fn increment_access_denied(&self) {
        self.access_denied.fetch_add(1, Ordering::Relaxed);
    }

    /// Current total count.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Current processed count.
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Current access-denied count.
    #[must_use]
    pub fn access_denied(&self) -> u64 {
        self.access_denied.load(Ordering::Relaxed)
    }

    fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            total: self.total(),
            processed: self.processed(),
            access_denied: self.access_denied(),
        }
    }
}

/// Atomic counters for a whole run.
///
/// # Examples
///
/// ```
/// use bs_core::ScanStats;
///
/// let stats = ScanStats::new();
/// stats.files().add_total(3);
/// stats.files().increment_processed();
/// stats.increment_ignored();
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.files.total, 3);
/// assert_eq!(snapshot.ignored_files, 1);
/// ```
#[derive(Debug, Default)]
pub struct ScanStats {
    directories: EntryStats,
    files: EntryStats,
    ignored_files: AtomicU64,
    tracked_files: AtomicU64,
    already_supported: AtomicU64,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for directories.
    #[must_use]
    pub fn directories(&self) -> &EntryStats {
        &self.directories
    }

    /// Counters for files.
    #[must_use]
    pub fn files(&self) -> &EntryStats {
        &self.files
    }

    /// Records one file skipped due to an ignore pattern.
    #[inline]
    pub fn increment_ignored(&self) {
        self.ignored_files.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `count` newly tracked patterns reported by the external tool.
    #[inline]
    pub fn add_tracked(&self, count: u64) {
        self.tracked_files.fetch_add(count, Ordering::Relaxed);
    }

    /// Adds `count` patterns the external tool reported as already supported.
    #[inline]
    pub fn add_already_supported(&self, count: u64) {
        self.already_supported.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            directories: self.directories.snapshot(),
            files: self.files.snapshot(),
            ignored_files: self.ignored_files.load(Ordering::Relaxed),
            tracked_files: self.tracked_files.load(Ordering::Relaxed),
            already_supported: self.already_supported.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of one [`EntryStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot {
    /// Entries discovered during enumeration.
    pub total: u64,
    /// Entries actually visited/read.
    pub processed: u64,
    /// Entries that could not be read due to missing permissions.
    pub access_denied: u64,
}

/// Point-in-time view of a run's [`ScanStats`].
///
/// Taken once, after the scanner and both dispatchers have joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Directory counters.
    pub directories: EntrySnapshot,
    /// File counters.
    pub files: EntrySnapshot,
    /// Files skipped because an ignore pattern matched.
    pub ignored_files: u64,
    /// Patterns newly tracked by the external tool.
    pub tracked_files: u64,
    /// Patterns the external tool already supported.
    pub already_supported: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_entry_stats_counters() {
        let stats = EntryStats::default();
        stats.add_total(5);
        stats.increment_processed();
        stats.increment_processed();
        stats.increment_access_denied();

        assert_eq!(stats.total(), 5);
        assert_eq!(stats.processed(), 2);
        assert_eq!(stats.access_denied(), 1);
    }

    #[test]
    fn test_snapshot_copies_all_fields() {
        let stats = ScanStats::new();
        stats.directories().add_total(2);
        stats.directories().increment_processed();
        stats.files().add_total(10);
        stats.increment_ignored();
        stats.add_tracked(3);
        stats.add_already_supported(4);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.directories.total, 2);
        assert_eq!(snapshot.directories.processed, 1);
        assert_eq!(snapshot.files.total, 10);
        assert_eq!(snapshot.ignored_files, 1);
        assert_eq!(snapshot.tracked_files, 3);
        assert_eq!(snapshot.already_supported, 4);
    }

    #[test]
    fn test_concurrent_increments() {
        let stats = Arc::new(ScanStats::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let stats = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    stats.files().add_total(1);
                    stats.files().increment_processed();
                }
            }));
        }
        for handle in handles {
            let _ = handle.join();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.files.total, 400);
        assert_eq!(snapshot.files.processed, 400);
        assert!(snapshot.files.processed <= snapshot.files.total);
    }
}
