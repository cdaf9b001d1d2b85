//! Worker pool: bounded fan-out/fan-in over two queues with a single-consumer
//! aggregator.
//!
//! The dispatcher sends each path exactly once and then drops its sender,
//! which closes the path queue. Each worker forwards successful descriptors
//! into the output queue; once the last worker exits and its sender clone is
//! dropped, the output queue disconnects and the aggregator observes a
//! definitive end-of-stream. No counters or flags are involved in completion
//! detection.

use std::num::NonZero;
use std::thread;

use crossbeam_channel::bounded;
use tagdex_types::{PackageDescriptor, TagIndex};

use crate::{PackageImporter, ProgressSink};

/// The outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survey {
    /// Frozen tag index: every bucket sorted and duplicate-free.
    pub index: TagIndex,
    /// Number of packages that imported successfully.
    pub imported: usize,
}

/// Default worker width: one worker per available processing unit.
pub fn default_width() -> usize {
    thread::available_parallelism()
        .map(NonZero::get)
        .unwrap_or(1)
}

/// Import every path across `width` workers and aggregate the discovered
/// tags. Import failures are reported through the sink and excluded from the
/// index; they never terminate the run.
pub fn run(
    importer: &dyn PackageImporter,
    paths: &[String],
    width: usize,
    sink: &dyn ProgressSink,
) -> Survey {
    let width = width.max(1);
    let total = paths.len();

    // Both queues are bounded at the worker width; the path queue provides
    // backpressure against the dispatcher, the descriptor queue against the
    // aggregator falling behind.
    let (path_tx, path_rx) = bounded::<&str>(width);
    let (desc_tx, desc_rx) = bounded::<PackageDescriptor>(width);

    let mut index = TagIndex::default();
    let mut imported = 0usize;

    thread::scope(|scope| {
        scope.spawn(move || {
            for (i, path) in paths.iter().enumerate() {
                if path_tx.send(path.as_str()).is_err() {
                    break;
                }
                sink.on_dispatch(i + 1, total, path);
            }
            // path_tx drops here, closing the queue.
        });

        for _ in 0..width {
            let path_rx = path_rx.clone();
            let desc_tx = desc_tx.clone();
            scope.spawn(move || {
                for path in path_rx.iter() {
                    match importer.import(path) {
                        Ok(descriptor) => {
                            if desc_tx.send(descriptor).is_err() {
                                break;
                            }
                        }
                        Err(err) => sink.on_import_error(path, &err),
                    }
                }
            });
        }

        // Only the workers may keep the output queue open.
        drop(desc_tx);
        drop(path_rx);

        for descriptor in desc_rx.iter() {
            index.add(&descriptor);
            imported += 1;
        }
    });

    index.finish();
    Survey { index, imported }
}
