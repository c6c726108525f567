//! Per-run configuration for the binscout pipeline.
//!
//! [`RunOptions`] is built from CLI flags by the binary crate and passed by
//! value into the scanner and the dispatchers. It is validated once, before
//! any thread starts.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options controlling a single scan/track run.
///
/// # Examples
///
/// ```
/// use bs_core::RunOptions;
/// use camino::Utf8Path;
///
/// let options = RunOptions::new(Utf8Path::new("."));
/// assert!(!options.track);
/// assert!(!options.recursive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Root directory of the repository checkout to scan.
    pub directory: Utf8PathBuf,

    /// Honor `.gitignore` patterns when selecting files.
    pub ignore_files: bool,

    /// Log the time spent scanning and tracking.
    pub measure: bool,

    /// Descend into subdirectories instead of scanning the root only.
    pub recursive: bool,

    /// Print run statistics at info level.
    pub stats: bool,

    /// Drive `git lfs track` for detected binary types and paths.
    pub track: bool,

    /// Enable debug-level output.
    pub verbose: bool,
}

impl RunOptions {
    /// Creates options for the given scan root with all flags off.
    #[must_use]
    pub fn new(directory: &Utf8Path) -> Self {
        Self {
            directory: directory.to_owned(),
            ignore_files: false,
            measure: false,
            recursive: false,
            stats: false,
            track: false,
            verbose: false,
        }
    }

    /// Checks that the configured scan root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectory`] if the root does not exist,
    /// or [`ConfigError::NotADirectory`] if it is a file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.directory.exists() {
            return Err(ConfigError::MissingDirectory(self.directory.clone()));
        }
        if !self.directory.is_dir() {
            return Err(ConfigError::NotADirectory(self.directory.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let options = RunOptions::new(Utf8Path::new("/tmp"));
        assert_eq!(options.directory.as_str(), "/tmp");
        assert!(!options.ignore_files);
        assert!(!options.measure);
        assert!(!options.recursive);
        assert!(!options.stats);
        assert!(!options.track);
        assert!(!options.verbose);
    }

    #[test]
    fn test_validate_missing_directory() {
        let options = RunOptions::new(Utf8Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(matches!(
            options.validate(),
            Err(ConfigError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_validate_existing_directory() {
        let options = RunOptions::new(Utf8Path::new("."));
        assert!(options.validate().is_ok());
    }
}
