//! The batch dispatcher: consumer half of the pipeline.
//!
//! One dispatcher drains one work queue, concurrently with the scanner and
//! with the sibling dispatcher. Items accumulate in a [`Batch`] until the
//! next one would push the serialized command line over the hard limit;
//! the batch is then dispatched and the accounting starts over. When the
//! channel disconnects (scanner finished, queue drained) the pending batch
//! is flushed unconditionally and the dispatcher exits.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use bs_core::{QueueKind, RunOptions, ScanStats, WorkReceiver};

use crate::batch::Batch;
use crate::parse::parse_track_output;
use crate::tools::GitTools;

/// Drains one work queue into batched `git lfs track` invocations.
#[derive(Debug)]
pub struct TrackDispatcher {
    kind: QueueKind,
    options: RunOptions,
    tools: Arc<GitTools>,
    stats: Arc<ScanStats>,
}

impl TrackDispatcher {
    /// Creates a dispatcher for one queue.
    #[must_use]
    pub fn new(
        kind: QueueKind,
        options: RunOptions,
        tools: Arc<GitTools>,
        stats: Arc<ScanStats>,
    ) -> Self {
        Self {
            kind,
            options,
            tools,
            stats,
        }
    }

    /// Consumes the queue until the producer is finished and everything,
    /// pending buffer included, has been dispatched.
    ///
    /// The termination predicate is the channel disconnect: `recv()` keeps
    /// returning items until the scanner has dropped its sender and the
    /// queue is empty, after which one final flush drains the buffer.
    pub fn run(&self, receiver: WorkReceiver) {
        let started = Instant::now();
        debug!(queue = self.kind.label(), "dispatcher started");

        let mut batch = Batch::new(self.tools.command_prefix_len());
        while let Ok(item) = receiver.recv() {
            let cost = Batch::item_cost(&item, self.kind.prefix());
            if !batch.is_empty() && !batch.fits(cost) {
                self.flush(&mut batch);
            }
            // A batch always accepts at least one item.
            batch.push(item, cost);
        }
        self.flush(&mut batch);

        debug!(queue = self.kind.label(), "dispatcher finished");
        if self.options.measure {
            info!(
                queue = self.kind.label(),
                seconds = started.elapsed().as_secs_f64(),
                "time spent tracking"
            );
        }
    }

    /// Dispatches the pending batch as one external invocation and folds
    /// the reported counts into the statistics.
    ///
    /// The batch is emptied in every case - when tracking is off or the
    /// tool is unavailable the queue still has to drain so the scan
    /// statistics stay accurate.
    fn flush(&self, batch: &mut Batch) {
        if batch.is_empty() {
            return;
        }
        let serialized_len = batch.serialized_len();
        let items = batch.take();

        if !self.options.track || !self.tools.is_available() {
            return;
        }

        debug!(
            queue = self.kind.label(),
            count = items.len(),
            serialized_len,
            "dispatching batch"
        );
        let patterns: Vec<String> = items
            .into_iter()
            .map(|item| format!("{}{item}", self.kind.prefix()))
            .collect();

        let Some(output) = self.tools.track(patterns) else {
            return;
        };

        let outcome = parse_track_output(&output);
        if outcome.is_empty() {
            error!(output = %output, "could not track files");
            return;
        }
        self.stats.add_tracked(outcome.tracked);
        self.stats.add_already_supported(outcome.already_supported);
    }
}
