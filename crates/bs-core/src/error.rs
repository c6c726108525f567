//! Error types for the bs-core crate.

use camino::Utf8PathBuf;

/// Errors that can occur while building or validating the run configuration.
///
/// # Examples
///
/// ```
/// use bs_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/some/path"));
/// assert!(error.to_string().contains("/some/path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The scan root does not exist.
    #[error("missing scan directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// The scan root exists but is not a directory.
    #[error("scan root is not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_display() {
        let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/missing/dir"));
        assert!(error.to_string().contains("/missing/dir"));
    }

    #[test]
    fn test_not_a_directory_display() {
        let error = ConfigError::NotADirectory(Utf8PathBuf::from("/some/file.txt"));
        let msg = error.to_string();
        assert!(msg.contains("not a directory"));
        assert!(msg.contains("/some/file.txt"));
    }
}
