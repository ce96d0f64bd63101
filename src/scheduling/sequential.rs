//! Sequential back-end of the classification

use crate::{resacc::ResultsAccumulator, scheduling::batches};
use std::ops::Range;

/// Classify events in sequential mode
///
/// We use batched logic even in sequential mode, in order to achieve
/// reproducibility with respect to multi-threaded runs.
///
pub fn run_selection_impl<'cfg>(
    num_events: usize,
    classify_events: impl Fn(Range<usize>) -> ResultsAccumulator<'cfg>,
) -> ResultsAccumulator<'cfg> {
    let mut batches = batches(num_events);

    // Initialize the accumulator with the first batch of events
    let first_batch = batches.next().unwrap_or(0..0);
    let mut accumulator = classify_events(first_batch);

    // Classify and integrate the remaining batches
    for batch in batches {
        accumulator.merge(classify_events(batch));
    }
    accumulator
}
