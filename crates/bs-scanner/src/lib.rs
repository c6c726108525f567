//! Binary detection and directory scanning for binscout.
//!
//! This crate is the producer half of the pipeline. [`Scanner`] walks a
//! repository checkout depth-first, filters each file through the sidecar
//! [`FilterSet`], classifies survivors with [`classify_file`], and feeds the
//! two work queues that the tracking dispatchers drain concurrently:
//!
//! ```text
//! Scanner (one thread)
//!     │
//!     ├── FilterSet (.gitignore / .gitattributes globs)
//!     ├── classify_file (BOM table + NUL scan, 1024-byte blocks)
//!     ├── extension queue ── unique lower-cased extensions of binary files
//!     └── path queue ─────── unique relative paths of extensionless binaries
//! ```
//!
//! Dedup is per run and lives entirely inside the scanner (single writer):
//! an extension or path crosses its queue at most once. Dropping the queue
//! senders when [`Scanner::run`] returns is the producer's completion
//! signal.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod binary;
mod bom;
mod filters;
mod walker;

pub use binary::{FileKind, classify_file, classify_reader};
pub use filters::{FilterSet, LineFormat, PatternSet};
pub use walker::{ScanOutcome, Scanner};
