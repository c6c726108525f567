//! Core types, errors, and shared state for the binscout tool.
//!
//! This crate provides the foundational pieces used across the workspace:
//!
//! - [`RunOptions`]: the validated per-run configuration
//! - [`ScanStats`]: atomic counters shared by the scanner and the dispatchers
//! - [`work_queue`]/[`QueueKind`]: the FIFO channels connecting the two halves
//!   of the pipeline
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

mod config;
mod error;
mod hash;
mod queue;
mod stats;

pub use config::RunOptions;
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet};
pub use queue::{QueueKind, WorkReceiver, WorkSender, work_queue};
pub use stats::{EntrySnapshot, EntryStats, ScanStats, StatsSnapshot};
