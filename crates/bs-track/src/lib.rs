//! Batched git-lfs tracking dispatch for binscout.
//!
//! This crate is the consumer half of the pipeline. One [`TrackDispatcher`]
//! per work queue runs concurrently with the scanner, folding dequeued items
//! into length-bounded [`Batch`]es and handing each finished batch to
//! `git lfs track` through [`GitTools`]:
//!
//! ```text
//! TrackDispatcher (one thread per queue)
//!     │
//!     ├── Batch (serialized-length accounting, 32767-char hard limit)
//!     ├── GitTools (tool availability, lfs install, track invocations)
//!     │       └── CommandRunner (trait seam over process spawning)
//!     └── parse_track_output (marker counting -> statistics)
//! ```
//!
//! Nothing here is fatal to a run: an unavailable tool disables tracking and
//! the dispatchers keep draining their queues so statistics stay accurate.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod batch;
mod dispatch;
mod parse;
mod process;
mod tools;

pub use batch::{Batch, MAX_COMMAND_CHARS};
pub use dispatch::TrackDispatcher;
pub use parse::{TrackOutcome, parse_track_output};
pub use process::{CommandRunner, ProcessOutput, SystemRunner};
pub use tools::GitTools;
