//! Sidecar pattern filters.
//!
//! Two optional files at the scan root steer file selection: `.gitignore`
//! (files the scan must not touch) and `.gitattributes` (patterns the
//! large-file tracker already handles). Each is compiled into a
//! [`PatternSet`]; the pair is held by a [`FilterSet`] which answers the two
//! membership queries the scanner asks per file.
//!
//! # Line normalization
//!
//! Both files are line-oriented. After trimming leading whitespace, blank
//! lines and `#` comments are dropped. Two shorthands are rewritten so they
//! match anywhere in the tree instead of only at the root:
//!
//! - `logs/` (directory style) becomes `**/logs/**`
//! - `*.png` (extension style) becomes `**/*.png`
//!
//! Attribute lines additionally carry a fixed four-token suffix
//! (`filter=lfs diff=lfs merge=lfs -text`); the pattern is what remains once
//! that suffix is stripped. Lines with fewer than five tokens are malformed
//! and skipped.

use std::fs;
use std::io;

use camino::Utf8Path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use bs_core::RunOptions;

/// Number of trailing attribute tokens on a `.gitattributes` line.
const ATTRIBUTE_TOKENS: usize = 4;

/// How the lines of a sidecar file encode their pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// The whole line is the pattern (`.gitignore`).
    Plain,
    /// The pattern is followed by a fixed attribute suffix (`.gitattributes`).
    Attributes,
}

/// A compiled, order-independent set of glob matchers from one sidecar file.
#[derive(Debug)]
pub struct PatternSet {
    set: GlobSet,
    len: usize,
}

impl PatternSet {
    /// Compiles the patterns found in `lines`.
    ///
    /// Unparseable globs are logged and skipped; a sidecar file can never
    /// abort a run.
    #[must_use]
    pub fn parse<'a, I>(lines: I, format: LineFormat) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut len = 0_usize;

        for line in lines {
            let Some(pattern) = extract_pattern(line, format) else {
                continue;
            };
            let normalized = normalize_pattern(&pattern);
            match Glob::new(&normalized) {
                Ok(glob) => {
                    builder.add(glob);
                    len += 1;
                }
                Err(e) => warn!(pattern = %normalized, error = %e, "skipping unparseable pattern"),
            }
        }

        let set = match builder.build() {
            Ok(set) => set,
            Err(e) => {
                // Individual globs already compiled, so this is unreachable in
                // practice; fall back to matching nothing.
                warn!(error = %e, "failed to build pattern set");
                len = 0;
                GlobSet::empty()
            }
        };

        Self { set, len }
    }

    /// Whether any compiled pattern accepts `relative_path`.
    #[must_use]
    pub fn is_match(&self, relative_path: &str) -> bool {
        self.set.is_match(relative_path)
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Pulls the pattern portion out of one sidecar line, or `None` for blank
/// lines, comments, and malformed attribute lines.
fn extract_pattern(line: &str, format: LineFormat) -> Option<String> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    match format {
        LineFormat::Plain => Some(trimmed.to_owned()),
        LineFormat::Attributes => {
            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if tokens.len() <= ATTRIBUTE_TOKENS {
                debug!(line = %trimmed, "skipping malformed attributes line");
                return None;
            }
            Some(tokens[..tokens.len() - ATTRIBUTE_TOKENS].join(" "))
        }
    }
}

/// Rewrites directory-style and extension-style shorthands to unanchored
/// recursive globs; everything else passes through untouched.
fn normalize_pattern(pattern: &str) -> String {
    if pattern.ends_with('/') {
        return format!("**/{pattern}**");
    }
    if pattern.starts_with("*.") {
        return format!("**/{pattern}");
    }
    pattern.to_owned()
}

/// The pair of filters consulted for every scanned file.
///
/// Either side is `None` when its governing option is off or its sidecar
/// file is absent; the corresponding query then answers `false`.
#[derive(Debug, Default)]
pub struct FilterSet {
    ignore: Option<PatternSet>,
    attributes: Option<PatternSet>,
}

impl FilterSet {
    /// Reads and compiles both sidecar files from the scan root, honoring
    /// the run options (`--ignore-files` gates the ignore side, `--track`
    /// gates the already-tracked side).
    #[must_use]
    pub fn load(options: &RunOptions) -> Self {
        let root = &options.directory;

        let ignore = options
            .ignore_files
            .then(|| read_sidecar(root, ".gitignore"))
            .flatten()
            .map(|lines| {
                let set = PatternSet::parse(lines.iter().map(String::as_str), LineFormat::Plain);
                log_pattern_count(&set, ".gitignore");
                set
            });

        let attributes = options
            .track
            .then(|| read_sidecar(root, ".gitattributes"))
            .flatten()
            .map(|lines| {
                let set =
                    PatternSet::parse(lines.iter().map(String::as_str), LineFormat::Attributes);
                log_pattern_count(&set, ".gitattributes");
                set
            });

        Self { ignore, attributes }
    }

    /// Builds a filter set directly from in-memory lines (tests, callers
    /// that already hold the sidecar content).
    #[must_use]
    pub fn from_lines(ignore: Option<&[&str]>, attributes: Option<&[&str]>) -> Self {
        Self {
            ignore: ignore.map(|lines| PatternSet::parse(lines.iter().copied(), LineFormat::Plain)),
            attributes: attributes
                .map(|lines| PatternSet::parse(lines.iter().copied(), LineFormat::Attributes)),
        }
    }

    /// Whether an ignore pattern accepts `relative_path`.
    #[must_use]
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.ignore
            .as_ref()
            .is_some_and(|set| set.is_match(relative_path))
    }

    /// Whether an already-tracked pattern accepts `relative_path`.
    #[must_use]
    pub fn is_already_tracked(&self, relative_path: &str) -> bool {
        self.attributes
            .as_ref()
            .is_some_and(|set| set.is_match(relative_path))
    }
}

fn log_pattern_count(set: &PatternSet, filename: &str) {
    if !set.is_empty() {
        debug!(count = set.len(), filename, "compiled sidecar patterns");
    }
}

/// Reads one sidecar file as lines. Absent files are expected; read failures
/// are logged and treated the same.
fn read_sidecar(root: &Utf8Path, filename: &str) -> Option<Vec<String>> {
    let path = root.join(filename);
    match fs::read_to_string(&path) {
        Ok(content) => Some(content.lines().map(str::to_owned).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(%path, "sidecar file not present");
            None
        }
        Err(e) => {
            warn!(%path, error = %e, "could not read sidecar file");
            None
        }
    }
}
