//! The directory scanner: producer half of the pipeline.
//!
//! Walks the tree depth-first, one directory at a time, with local error
//! recovery: an unreadable directory abandons that subtree only, an
//! unreadable file is counted as access-denied and treated as text. Nothing
//! the walk encounters can abort a run.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use bs_core::{FxHashSet, RunOptions, ScanStats, WorkSender};

use crate::binary::{self, FileKind};
use crate::filters::FilterSet;

/// Version-control metadata directory excluded from every walk.
const GIT_DIR_NAME: &str = ".git";

/// Sorted result lists kept for end-of-run printing.
///
/// These duplicate what crossed the queues (the dedup sets guarantee the
/// same membership); they exist so the CLI can print a stable, sorted
/// summary after the pipeline has finished.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Unique extensions of detected binary files, sorted.
    pub extensions: Vec<String>,
    /// Unique relative paths of extensionless binary files, sorted.
    pub paths: Vec<String>,
}

/// The tree producer. Owns the filters, the per-run dedup sets, and the
/// sending half of both work queues.
///
/// [`run`](Self::run) consumes the scanner; the queue senders drop when it
/// returns, which is how the dispatchers learn the producer is finished.
#[derive(Debug)]
pub struct Scanner {
    options: RunOptions,
    filters: FilterSet,
    stats: Arc<ScanStats>,
    extension_tx: WorkSender,
    path_tx: WorkSender,
    seen_extensions: FxHashSet<String>,
    seen_paths: FxHashSet<String>,
}

impl Scanner {
    /// Creates a scanner for one run.
    #[must_use]
    pub fn new(
        options: RunOptions,
        filters: FilterSet,
        stats: Arc<ScanStats>,
        extension_tx: WorkSender,
        path_tx: WorkSender,
    ) -> Self {
        Self {
            options,
            filters,
            stats,
            extension_tx,
            path_tx,
            seen_extensions: FxHashSet::default(),
            seen_paths: FxHashSet::default(),
        }
    }

    /// Walks the tree, classifying and enqueueing as it goes.
    ///
    /// Returns the sorted extension and path lists for reporting. All
    /// counter updates happen through the shared [`ScanStats`].
    #[must_use]
    pub fn run(mut self) -> ScanOutcome {
        let started = Instant::now();
        info!(root = %self.options.directory, "starting scan");

        let root = self.options.directory.clone();
        // The root itself counts as a found directory, so processed can
        // never outrun total.
        self.stats.directories().add_total(1);
        self.process_directory(&root);

        let mut extensions: Vec<String> = self.seen_extensions.drain().collect();
        extensions.sort_unstable();
        let mut paths: Vec<String> = self.seen_paths.drain().collect();
        paths.sort_unstable();

        info!(
            extensions = extensions.len(),
            paths = paths.len(),
            "scan finished"
        );
        if self.options.measure {
            info!(
                seconds = started.elapsed().as_secs_f64(),
                "time spent scanning"
            );
        }

        ScanOutcome { extensions, paths }
    }

    /// Depth-first step: subdirectories before this directory's files.
    fn process_directory(&mut self, directory: &Utf8Path) {
        self.stats.directories().increment_processed();
        self.process_subdirectories(directory);
        self.process_files(directory);
    }

    fn process_subdirectories(&mut self, directory: &Utf8Path) {
        let Some(subdirs) = self.enumerate(directory, EntryKind::Directories) else {
            return;
        };

        // Subdirectories are counted even when recursion is off; only the
        // root's files are scanned then.
        self.stats.directories().add_total(subdirs.len() as u64);
        if !self.options.recursive {
            debug!(path = %directory, "recursion disabled, staying at the scan root");
            return;
        }

        for subdir in subdirs {
            if subdir.file_name() == Some(GIT_DIR_NAME) {
                debug!(path = %subdir, "skipping version-control metadata directory");
                continue;
            }
            self.process_directory(&subdir);
        }
    }

    fn process_files(&mut self, directory: &Utf8Path) {
        let Some(files) = self.enumerate(directory, EntryKind::Files) else {
            return;
        };

        self.stats.files().add_total(files.len() as u64);
        for file in files {
            self.process_file(&file);
        }
    }

    /// One enumeration pass over `directory`, keeping only the requested
    /// entry kind. `None` means the subtree is abandoned (logged; permission
    /// failures on the directory pass are also counted).
    fn enumerate(&self, directory: &Utf8Path, kind: EntryKind) -> Option<Vec<Utf8PathBuf>> {
        let entries = match directory.read_dir_utf8() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %directory, error = %e, "could not enumerate directory");
                if kind == EntryKind::Directories && e.kind() == io::ErrorKind::PermissionDenied {
                    self.stats.directories().increment_access_denied();
                }
                return None;
            }
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = %directory, error = %e, "could not read directory entry");
                    continue;
                }
            };
            match entry.file_type() {
                Ok(file_type) if kind.accepts(file_type) => found.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => warn!(path = %entry.path(), error = %e, "could not stat entry"),
            }
        }
        Some(found)
    }

    fn process_file(&mut self, path: &Utf8Path) {
        let relative = self.relative_path(path);

        if self.filters.is_ignored(&relative) {
            self.stats.increment_ignored();
            debug!(%path, "ignore pattern matched");
            return;
        }
        if self.filters.is_already_tracked(&relative) {
            debug!(%path, "already-tracked pattern matched");
            return;
        }

        match file_extension(path) {
            None => {
                if self.classify(path).is_binary() && self.seen_paths.insert(relative.clone()) {
                    debug!(%path, "found extensionless binary file");
                    let _ = self.path_tx.send(relative);
                }
            }
            Some(extension) => {
                if !self.seen_extensions.contains(&extension)
                    && self.classify(path).is_binary()
                {
                    debug!(%path, extension = %extension, "found binary file type");
                    self.seen_extensions.insert(extension.clone());
                    let _ = self.extension_tx.send(extension);
                }
            }
        }
    }

    /// Classifies one file, folding read failures into the statistics.
    /// An unreadable file is treated as text: it must not be enqueued.
    fn classify(&self, path: &Utf8Path) -> FileKind {
        match binary::classify_file(path) {
            Ok(kind) => {
                self.stats.files().increment_processed();
                kind
            }
            Err(e) => {
                warn!(%path, error = %e, "could not read file");
                if e.kind() == io::ErrorKind::PermissionDenied {
                    self.stats.files().increment_access_denied();
                }
                FileKind::Text
            }
        }
    }

    /// Path relative to the scan root, forward-slash separated.
    fn relative_path(&self, path: &Utf8Path) -> String {
        let relative = path.strip_prefix(&self.options.directory).unwrap_or(path);
        let mut result = String::with_capacity(relative.as_str().len());
        for component in relative.components() {
            if !result.is_empty() {
                result.push('/');
            }
            result.push_str(component.as_str());
        }
        result
    }
}

/// Case-folded extension without the separator; `None` covers both missing
/// and empty (trailing-dot) extensions.
fn file_extension(path: &Utf8Path) -> Option<String> {
    path.extension()
        .filter(|extension| !extension.is_empty())
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directories,
    Files,
}

impl EntryKind {
    fn accepts(self, file_type: std::fs::FileType) -> bool {
        match self {
            Self::Directories => file_type.is_dir(),
            Self::Files => file_type.is_file(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bs_core::work_queue;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: Utf8PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        Fixture { _dir: dir, root }
    }

    fn write_binary(path: &Utf8Path) {
        let mut bytes = b"binary".to_vec();
        bytes.push(0);
        bytes.extend_from_slice(b"payload");
        fs::write(path, bytes).unwrap();
    }

    struct RunResult {
        outcome: ScanOutcome,
        stats: Arc<ScanStats>,
        queued_extensions: Vec<String>,
        queued_paths: Vec<String>,
    }

    fn run_scanner(options: RunOptions, filters: FilterSet) -> RunResult {
        let stats = Arc::new(ScanStats::new());
        let (ext_tx, ext_rx) = work_queue();
        let (path_tx, path_rx) = work_queue();
        let scanner = Scanner::new(options, filters, Arc::clone(&stats), ext_tx, path_tx);
        let outcome = scanner.run();
        RunResult {
            outcome,
            stats,
            queued_extensions: ext_rx.iter().collect(),
            queued_paths: path_rx.iter().collect(),
        }
    }

    #[test]
    fn test_end_to_end_fixture() {
        let f = fixture();
        fs::write(f.root.join("a.txt"), "plain ascii\n").unwrap();
        write_binary(&f.root.join("b.bin"));
        write_binary(&f.root.join("data"));

        let mut options = RunOptions::new(&f.root);
        options.ignore_files = true;
        options.recursive = true;
        let filters = FilterSet::from_lines(Some(&["*.txt"]), None);

        let result = run_scanner(options, filters);
        assert_eq!(result.queued_extensions, vec!["bin"]);
        assert_eq!(result.queued_paths, vec!["data"]);
        assert_eq!(result.outcome.extensions, vec!["bin"]);
        assert_eq!(result.outcome.paths, vec!["data"]);

        let snapshot = result.stats.snapshot();
        assert_eq!(snapshot.files.total, 3);
        assert_eq!(snapshot.ignored_files, 1);
        assert!(snapshot.files.processed <= snapshot.files.total);
    }

    #[test]
    fn test_extension_enqueued_once_per_run() {
        let f = fixture();
        fs::create_dir(f.root.join("sub")).unwrap();
        write_binary(&f.root.join("one.dat"));
        write_binary(&f.root.join("two.dat"));
        write_binary(&f.root.join("sub/three.dat"));

        let mut options = RunOptions::new(&f.root);
        options.recursive = true;

        let result = run_scanner(options, FilterSet::default());
        assert_eq!(result.queued_extensions, vec!["dat"]);
    }

    #[test]
    fn test_extension_case_folded() {
        let f = fixture();
        write_binary(&f.root.join("LOUD.BIN"));

        let mut options = RunOptions::new(&f.root);
        options.recursive = true;

        let result = run_scanner(options, FilterSet::default());
        assert_eq!(result.queued_extensions, vec!["bin"]);
    }

    #[test]
    fn test_text_files_not_enqueued() {
        let f = fixture();
        fs::write(f.root.join("a.rs"), "fn main() {}\n").unwrap();
        fs::write(f.root.join("readme"), "no extension, no nul\n").unwrap();

        let mut options = RunOptions::new(&f.root);
        options.recursive = true;

        let result = run_scanner(options, FilterSet::default());
        assert!(result.queued_extensions.is_empty());
        assert!(result.queued_paths.is_empty());
    }

    #[test]
    fn test_git_directory_skipped_at_any_depth() {
        let f = fixture();
        fs::create_dir_all(f.root.join(".git")).unwrap();
        fs::create_dir_all(f.root.join("sub/.git")).unwrap();
        write_binary(&f.root.join(".git/index.pack"));
        write_binary(&f.root.join("sub/.git/index.pack"));
        write_binary(&f.root.join("sub/real.blob"));

        let mut options = RunOptions::new(&f.root);
        options.recursive = true;

        let result = run_scanner(options, FilterSet::default());
        assert_eq!(result.queued_extensions, vec!["blob"]);
    }

    #[test]
    fn test_non_recursive_scans_root_only() {
        let f = fixture();
        fs::create_dir_all(f.root.join("sub/deep")).unwrap();
        write_binary(&f.root.join("top.one"));
        write_binary(&f.root.join("sub/mid.two"));
        write_binary(&f.root.join("sub/deep/low.three"));

        let options = RunOptions::new(&f.root);

        let result = run_scanner(options, FilterSet::default());
        assert_eq!(result.queued_extensions, vec!["one"]);

        let snapshot = result.stats.snapshot();
        // Root plus one counted-but-unvisited subdirectory.
        assert_eq!(snapshot.directories.total, 2);
        assert_eq!(snapshot.directories.processed, 1);
    }

    #[test]
    fn test_already_tracked_files_skipped() {
        let f = fixture();
        write_binary(&f.root.join("disc.iso"));
        write_binary(&f.root.join("fresh.blob"));

        let mut options = RunOptions::new(&f.root);
        options.recursive = true;
        options.track = true;
        let filters = FilterSet::from_lines(
            None,
            Some(&["*.iso filter=lfs diff=lfs merge=lfs -text"]),
        );

        let result = run_scanner(options, filters);
        assert_eq!(result.queued_extensions, vec!["blob"]);
    }

    #[test]
    fn test_relative_paths_use_forward_slashes() {
        let f = fixture();
        fs::create_dir(f.root.join("nested")).unwrap();
        write_binary(&f.root.join("nested/payload"));

        let mut options = RunOptions::new(&f.root);
        options.recursive = true;

        let result = run_scanner(options, FilterSet::default());
        assert_eq!(result.queued_paths, vec!["nested/payload"]);
    }

    #[test]
    fn test_directory_counters() {
        let f = fixture();
        fs::create_dir_all(f.root.join("a/b")).unwrap();
        fs::create_dir(f.root.join("c")).unwrap();

        let mut options = RunOptions::new(&f.root);
        options.recursive = true;

        let result = run_scanner(options, FilterSet::default());
        let snapshot = result.stats.snapshot();
        // Root and three subdirectories, all found and all processed.
        assert_eq!(snapshot.directories.total, 4);
        assert_eq!(snapshot.directories.processed, 4);
        assert!(snapshot.directories.processed <= snapshot.directories.total);
    }
}
