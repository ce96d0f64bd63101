//! Multi-threaded back-end of the classification

use crate::{resacc::ResultsAccumulator, scheduling::batches};

use rayon::prelude::*;
use std::ops::Range;

/// Classify events in multi-threaded mode
///
/// Batches are classified in parallel, but their results are merged in batch
/// order so that the output does not depend on thread scheduling. Does not
/// finalize the output results, so should be readily amenable to extra layers
/// of parallelization (such as distribution across multiple compute nodes).
///
pub fn run_selection_impl<'cfg>(
    num_events: usize,
    classify_events: impl Send + Sync + Fn(Range<usize>) -> ResultsAccumulator<'cfg>,
) -> ResultsAccumulator<'cfg> {
    // Indexed parallel iterators collect in input order
    let batch_results = batches(num_events)
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|batch| classify_events(batch))
        .collect::<Vec<_>>();

    let mut batch_results = batch_results.into_iter();
    let first_result = batch_results
        .next()
        .unwrap_or_else(|| classify_events(0..0));
    batch_results.fold(first_result, |mut accumulator, result| {
        accumulator.merge(result);
        accumulator
    })
}
