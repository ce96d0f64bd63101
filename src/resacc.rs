//! This module allows integrating classification results across events
use crate::{
    config::Configuration,
    event::Event,
    histogram::Histogram,
    numeric::Float,
    pipeline::{Classification, Label},
    resfin::{CutFlowRow, FinalResults, FlaggedEvent},
    store::EventError,
    variant::VariantSpec,
};
use num_traits::Zero;
use std::collections::BTreeMap;

/// Number of events and sum of weights that ended up in a bucket
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BucketCount {
    pub events: usize,
    pub weight: Float,
}

/// This struct will accumulate intermediary results during classification,
/// and ultimately compute the final results (see FinalResults).
pub struct ResultsAccumulator<'cfg> {
    // ### RESULT ACCUMULATORS ###
    /// Number of events which went through the pipeline
    processed_events: usize,

    /// Histograms of the variant, in declaration order
    histograms: Vec<Histogram>,

    /// Terminal bucket counts, by label and group
    cut_flow: BTreeMap<(Label, Option<u8>), BucketCount>,

    /// Skipped events, by kind of error
    skipped: BTreeMap<&'static str, usize>,

    /// Events destined to the diagnostic side file, in event order
    flagged: Vec<FlaggedEvent>,

    // ### CONFIGURATION (CACHED FOR FINALIZATION) ###
    cfg: &'cfg Configuration,
    spec: &'static VariantSpec,
}
//
impl<'cfg> ResultsAccumulator<'cfg> {
    /// Prepare for results integration
    pub fn new(cfg: &'cfg Configuration) -> Self {
        let spec = cfg.variant.spec();
        Self {
            processed_events: 0,
            histograms: spec
                .histograms
                .iter()
                .map(|def| Histogram::new(def, &spec.binning))
                .collect(),
            cut_flow: BTreeMap::new(),
            skipped: BTreeMap::new(),
            flagged: Vec::new(),
            cfg,
            spec,
        }
    }

    /// Integrate the classification of one event
    #[allow(clippy::needless_pass_by_value)]
    pub fn integrate(&mut self, event: &Event, result: Classification) {
        self.processed_events += 1;

        let bucket = self.cut_flow.entry((result.label, result.group)).or_default();
        bucket.events += 1;
        bucket.weight += result.weight;

        for fill in &result.fills {
            if let Some(idx) = self.spec.histogram(fill.label, fill.group) {
                self.histograms[idx].fill(fill.value, result.weight);
            }
        }

        if result.flagged {
            self.flagged.push(FlaggedEvent::new(event.id, &event.true_vertex));
        }
    }

    /// Record that an event could not be classified
    pub fn skip(&mut self, index: usize, error: &EventError) {
        tracing::debug!(index, %error, "skipping event");
        *self.skipped.entry(error.kind()).or_default() += 1;
    }

    /// Integrate classification results from another ResultsAccumulator, which
    /// went through the events that come after those of this one
    #[allow(clippy::needless_pass_by_value)]
    pub fn merge(&mut self, other: Self) {
        self.processed_events += other.processed_events;
        for (dest, src) in self.histograms.iter_mut().zip(&other.histograms) {
            dest.merge(src);
        }
        for (key, count) in other.cut_flow {
            let bucket = self.cut_flow.entry(key).or_default();
            bucket.events += count.events;
            bucket.weight += count.weight;
        }
        for (kind, count) in other.skipped {
            *self.skipped.entry(kind).or_default() += count;
        }
        self.flagged.extend(other.flagged);
    }

    /// Turn integrated classification data into finalized results, given the
    /// exposure of the event store (POT)
    pub fn finalize(self, pot_sum: Float) -> FinalResults<'cfg> {
        let cfg = self.cfg;
        let scale = cfg.target_pot / pot_sum;

        // Ratios do not depend on the normalization, and are computed before
        // it is applied
        let ratios = self
            .spec
            .ratios
            .iter()
            .filter_map(|ratio| {
                let numerator = &self.histograms[self.spec.histogram_named(ratio.numerator)?];
                let denominator = &self.histograms[self.spec.histogram_named(ratio.denominator)?];
                Some(Histogram::ratio(ratio.name, ratio.title, numerator, denominator))
            })
            .collect();

        let mut histograms = self.histograms;
        for hist in &mut histograms {
            hist.scale(scale);
        }

        let selected_events = self
            .cut_flow
            .iter()
            .filter(|((label, _), _)| *label == Label::Selected)
            .map(|(_, count)| count.events)
            .sum();
        let cut_flow = self
            .cut_flow
            .into_iter()
            .map(|((label, group), count)| CutFlowRow {
                label: label.to_string(),
                group,
                events: count.events,
                weight: count.weight,
                scaled: count.weight * scale,
            })
            .collect();

        FinalResults {
            variant: self.spec.name,
            processed_events: self.processed_events,
            selected_events,
            skipped_events: self.skipped.values().sum(),
            skipped: self.skipped,
            pot_sum,
            target_pot: cfg.target_pot,
            scale,
            histograms,
            ratios,
            cut_flow,
            flagged: self.flagged,
            cfg,
        }
    }

    /// Number of events which were classified so far
    pub fn processed_events(&self) -> usize {
        self.processed_events
    }

    /// Bucket count of a label and group
    #[cfg(test)]
    pub fn bucket(&self, label: Label, group: Option<u8>) -> BucketCount {
        self.cut_flow
            .get(&(label, group))
            .copied()
            .unwrap_or_default()
    }
}

impl Default for BucketCount {
    fn default() -> Self {
        Self {
            events: 0,
            weight: Float::zero(),
        }
    }
}
