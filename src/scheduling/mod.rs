//! This module takes care of scheduling the classification work, encapsulating
//! use of multiple threads and anything else that will come in the future

#[cfg(feature = "multi-threading")]
mod multi_threading;
#[cfg(not(feature = "multi-threading"))]
mod sequential;

use crate::resacc::ResultsAccumulator;
use std::ops::Range;

/// Size of the event batches
///
/// Events are grouped in batches of a certain size, whose results are merged
/// in event order. This keeps accumulation errors in check, and makes
/// sequential and parallel runs produce identical results.
///
const EVENT_BATCH_SIZE: usize = 10_000;

/// Classify events in the manner that was configured at build time.
///
/// Takes as parameters the total number of events, and a kernel that
/// classifies a range of event indices into a fresh accumulator.
///
/// Returns the accumulated results of every event, in event order
///
pub fn run_selection<'cfg>(
    num_events: usize,
    classify_events: impl Send + Sync + Fn(Range<usize>) -> ResultsAccumulator<'cfg>,
) -> ResultsAccumulator<'cfg> {
    // An empty store still produces (empty) results
    if num_events == 0 {
        tracing::warn!("The event store contains no event");
        return classify_events(0..0);
    }

    #[cfg(not(feature = "multi-threading"))]
    {
        sequential::run_selection_impl(num_events, classify_events)
    }

    #[cfg(feature = "multi-threading")]
    {
        multi_threading::run_selection_impl(num_events, classify_events)
    }
}

/// Event ranges of the batches, in event order
fn batches(num_events: usize) -> impl Iterator<Item = Range<usize>> {
    (0..num_events)
        .step_by(EVENT_BATCH_SIZE)
        .map(move |start| start..(start + EVENT_BATCH_SIZE).min(num_events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Configuration,
        event::testing::signal_event,
        pipeline::{Label, Selector},
        variant::VariantName,
    };

    #[test]
    fn batches_cover_every_event_once() {
        let ranges = batches(25_001).collect::<Vec<_>>();
        assert_eq!(ranges, vec![0..10_000, 10_000..20_000, 20_000..25_001]);
        assert_eq!(batches(10_000).count(), 1);
        assert_eq!(batches(0).count(), 0);
    }

    #[test]
    fn every_event_is_classified() {
        let cfg = Configuration::for_tests(VariantName::NeutrinoEnergy);
        let selector = Selector::new(&cfg);
        let event = signal_event();
        let num_events = 2 * EVENT_BATCH_SIZE + 17;
        let acc = run_selection(num_events, |range| {
            let mut acc = ResultsAccumulator::new(&cfg);
            for _ in range {
                acc.integrate(&event, selector.classify(&event).unwrap());
            }
            acc
        });
        assert_eq!(acc.processed_events(), num_events);
        assert_eq!(acc.bucket(Label::Selected, None).events, num_events);

        let empty = run_selection(0, |range| {
            assert!(range.is_empty());
            ResultsAccumulator::new(&cfg)
        });
        assert_eq!(empty.processed_events(), 0);
    }
}
