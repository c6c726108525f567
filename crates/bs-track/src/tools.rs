//! git / git-lfs integration.
//!
//! [`GitTools`] owns everything the dispatchers need from the outside world:
//! platform-specific executable names, the one-time availability and
//! initialization handshake, and the per-batch `track` invocation. Both
//! dispatcher threads share one instance; the availability check runs at
//! most once per run, whichever thread gets there first.

use std::sync::{Arc, OnceLock};

use tracing::{debug, error, warn};

use bs_core::RunOptions;

use crate::process::CommandRunner;

/// Expected prefix of `git version` output.
const GIT_VERSION_PREFIX: &str = "git version";

/// Expected prefix of `git lfs version` output.
const LFS_VERSION_PREFIX: &str = "git-lfs/";

/// Expected tail of a successful `git lfs install`.
const LFS_INITIALIZED_SUFFIX: &str = "Git LFS initialized.";

/// Exit code git-lfs uses for permission problems.
const ACCESS_DENIED_EXIT_CODE: i32 = 2;

/// Shared handle on the external large-file tracker.
pub struct GitTools {
    options: RunOptions,
    runner: Arc<dyn CommandRunner>,
    availability: OnceLock<bool>,
}

impl std::fmt::Debug for GitTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitTools")
            .field("options", &self.options)
            .field("availability", &self.availability)
            .finish_non_exhaustive()
    }
}

impl GitTools {
    /// Creates the tool handle for one run.
    #[must_use]
    pub fn new(options: RunOptions, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            options,
            runner,
            availability: OnceLock::new(),
        }
    }

    /// Name of the git executable on this platform.
    #[must_use]
    pub fn git_program() -> &'static str {
        if cfg!(windows) { "git.exe" } else { "git" }
    }

    /// Name of the LFS entry point on this platform. Windows routes through
    /// `git.exe lfs`, everything else has a standalone `git-lfs`.
    #[must_use]
    pub fn lfs_program() -> &'static str {
        if cfg!(windows) { "git.exe" } else { "git-lfs" }
    }

    /// Whether git and git-lfs are installed and LFS is initialized in the
    /// repository.
    ///
    /// Checked at most once per run; on failure one error is logged and
    /// every later call returns `false` without touching the system again.
    pub fn is_available(&self) -> bool {
        *self.availability.get_or_init(|| {
            let available =
                self.is_git_installed() && self.is_lfs_installed() && self.initialize_lfs();
            if !available {
                error!("could not track files - git lfs is unavailable or failed to initialize");
            }
            available
        })
    }

    /// Runs `git lfs track` with the given patterns in the repository.
    ///
    /// Returns the captured output, or `None` when the process could not be
    /// started or signalled a permission problem.
    #[must_use]
    pub fn track(&self, patterns: Vec<String>) -> Option<String> {
        let mut tail = Vec::with_capacity(patterns.len() + 1);
        tail.push("track".to_owned());
        tail.extend(patterns);
        self.capture_output(Self::lfs_program(), &self.lfs_arguments(tail, true))
    }

    /// Serialized length of the fixed command prefix (program, `lfs track`,
    /// `-C`, quoted root). Batches start their length accounting here.
    #[must_use]
    pub fn command_prefix_len(&self) -> usize {
        format!(
            "{} lfs track -C \"{}\"",
            Self::lfs_program(),
            self.options.directory
        )
        .len()
    }

    /// Assembles LFS argument vectors the way the platform expects them:
    /// `-C <root>` first when running in the repository, then the `lfs`
    /// subcommand token on Windows, then the tail.
    fn lfs_arguments(&self, tail: Vec<String>, in_repository: bool) -> Vec<String> {
        let mut args = Vec::with_capacity(tail.len() + 3);
        if in_repository {
            args.push("-C".to_owned());
            args.push(self.options.directory.to_string());
        }
        if cfg!(windows) {
            args.push("lfs".to_owned());
        }
        args.extend(tail);
        args
    }

    fn is_git_installed(&self) -> bool {
        self.banner_check(
            Self::git_program(),
            &["version".to_owned()],
            GIT_VERSION_PREFIX,
        )
    }

    fn is_lfs_installed(&self) -> bool {
        self.banner_check(
            Self::lfs_program(),
            &self.lfs_arguments(vec!["version".to_owned()], false),
            LFS_VERSION_PREFIX,
        )
    }

    fn banner_check(&self, program: &str, args: &[String], expected_prefix: &str) -> bool {
        if self
            .capture_output(program, args)
            .is_some_and(|output| output.starts_with(expected_prefix))
        {
            return true;
        }
        warn!(program, "could not detect an installed version");
        false
    }

    fn initialize_lfs(&self) -> bool {
        self.capture_output(
            Self::lfs_program(),
            &self.lfs_arguments(vec!["install".to_owned()], true),
        )
        .is_some_and(|output| output.ends_with(LFS_INITIALIZED_SUFFIX))
    }

    /// Spawns one process and captures stdout. Spawn failures and the
    /// access-denied exit code both yield `None`; neither aborts the run.
    fn capture_output(&self, program: &str, args: &[String]) -> Option<String> {
        debug!(program, ?args, "invoking external tool");
        match self.runner.run(program, args) {
            Ok(output) => {
                if output.exit_code == ACCESS_DENIED_EXIT_CODE {
                    error!(
                        program,
                        exit_code = output.exit_code,
                        "access denied (try again with elevated privileges)"
                    );
                    return None;
                }
                Some(output.stdout)
            }
            Err(e) => {
                error!(program, error = %e, "could not start process");
                None
            }
        }
    }
}
