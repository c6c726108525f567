//! Work queues connecting the scanner to the dispatchers.
//!
//! One run owns two unbounded FIFO channels: one carrying file extensions,
//! one carrying extensionless file paths. Both are constructed here and moved
//! into the pipeline threads, so nothing about a run survives it.
//!
//! # Completion signal
//!
//! The scanner signals completion by dropping its senders. A dispatcher's
//! blocking `recv()` keeps returning queued items until the channel is both
//! disconnected and empty, then yields `Err(RecvError)` exactly once. That is
//! the full termination predicate: producer finished and queue drained.

use crossbeam_channel::{Receiver, Sender, unbounded};

/// A queued work item: a lower-cased extension (no dot) or a forward-slash
/// relative path, depending on the queue it travels on.
pub type WorkItem = String;

/// Sending half of a work queue, owned by the scanner.
pub type WorkSender = Sender<WorkItem>;

/// Receiving half of a work queue, owned by one dispatcher.
pub type WorkReceiver = Receiver<WorkItem>;

/// Creates one unbounded work queue.
#[must_use]
pub fn work_queue() -> (WorkSender, WorkReceiver) {
    unbounded()
}

/// Which of the two work queues a dispatcher drains.
///
/// The queue determines how an item is rendered into a tracking argument:
/// extensions become `*.<ext>` wildcard patterns, paths are passed verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    /// Unique lower-cased file extensions.
    Extensions,
    /// Unique relative paths of extensionless files.
    Paths,
}

impl QueueKind {
    /// Prefix applied to each item when building tracking arguments.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Extensions => "*.",
            Self::Paths => "",
        }
    }

    /// Label used in log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Extensions => "extensions",
            Self::Paths => "paths",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order_preserved() {
        let (tx, rx) = work_queue();
        for item in ["png", "jpg", "bin"] {
            let _ = tx.send(item.to_owned());
        }
        drop(tx);

        let drained: Vec<WorkItem> = rx.iter().collect();
        assert_eq!(drained, vec!["png", "jpg", "bin"]);
    }

    #[test]
    fn test_recv_fails_once_drained_and_disconnected() {
        let (tx, rx) = work_queue();
        let _ = tx.send("iso".to_owned());
        drop(tx);

        assert_eq!(rx.recv().ok(), Some("iso".to_owned()));
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_queue_kind_prefix() {
        assert_eq!(QueueKind::Extensions.prefix(), "*.");
        assert_eq!(QueueKind::Paths.prefix(), "");
    }
}
