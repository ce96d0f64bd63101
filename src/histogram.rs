//! Weighted 1D histograms with uniform binning

use crate::{
    numeric::Float,
    variant::{Binning, HistogramDef},
};
use num_traits::Zero;
use serde::Serialize;

/// Weighted histogram, with under/overflow and sum of squared weights
///
/// Bins are closed on the left and open on the right, so a value equal to the
/// upper edge of the range lands in the overflow.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Histogram {
    pub name: &'static str,
    pub title: &'static str,
    pub axis: &'static str,
    pub low: Float,
    pub high: Float,

    /// Bin edges, from the lower edge of the first bin to the upper edge of
    /// the last one
    pub edges: Vec<Float>,

    /// Sum of weights per bin
    pub contents: Vec<Float>,

    /// Sum of squared weights per bin
    pub sumw2: Vec<Float>,

    pub underflow: Float,
    pub overflow: Float,
    pub underflow_sumw2: Float,
    pub overflow_sumw2: Float,

    /// Number of fills, including those which went to under/overflow
    pub entries: u64,
}
//
impl Histogram {
    /// Build an empty histogram
    pub fn new(def: &HistogramDef, binning: &Binning) -> Self {
        Self::empty(def.name, def.title, binning)
    }

    fn empty(name: &'static str, title: &'static str, binning: &Binning) -> Self {
        let width = (binning.high - binning.low) / binning.bins as Float;
        Self {
            name,
            title,
            axis: binning.axis,
            low: binning.low,
            high: binning.high,
            edges: (0..=binning.bins)
                .map(|idx| binning.low + idx as Float * width)
                .collect(),
            contents: vec![Float::zero(); binning.bins],
            sumw2: vec![Float::zero(); binning.bins],
            underflow: Float::zero(),
            overflow: Float::zero(),
            underflow_sumw2: Float::zero(),
            overflow_sumw2: Float::zero(),
            entries: 0,
        }
    }

    /// Number of bins
    pub fn bins(&self) -> usize {
        self.contents.len()
    }

    /// Sum of in-range weights
    pub fn integral(&self) -> Float {
        self.contents.iter().sum()
    }

    /// Record a weighted value
    pub fn fill(&mut self, value: Float, weight: Float) {
        let weight2 = weight * weight;
        self.entries += 1;
        if value < self.low {
            self.underflow += weight;
            self.underflow_sumw2 += weight2;
        } else if value >= self.high || !value.is_finite() {
            self.overflow += weight;
            self.overflow_sumw2 += weight2;
        } else {
            let scaled = (value - self.low) * self.bins() as Float / (self.high - self.low);
            let bin = (scaled as usize).min(self.bins() - 1);
            self.contents[bin] += weight;
            self.sumw2[bin] += weight2;
        }
    }

    /// Add the contents of another histogram with the same binning
    pub fn merge(&mut self, other: &Histogram) {
        assert_eq!(self.bins(), other.bins(), "Merged histograms must have the same binning");
        for (dest, src) in self.contents.iter_mut().zip(&other.contents) {
            *dest += src;
        }
        for (dest, src) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *dest += src;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.underflow_sumw2 += other.underflow_sumw2;
        self.overflow_sumw2 += other.overflow_sumw2;
        self.entries += other.entries;
    }

    /// Multiply every weight by a constant factor
    pub fn scale(&mut self, factor: Float) {
        let factor2 = factor * factor;
        for content in &mut self.contents {
            *content *= factor;
        }
        for sumw2 in &mut self.sumw2 {
            *sumw2 *= factor2;
        }
        self.underflow *= factor;
        self.overflow *= factor;
        self.underflow_sumw2 *= factor2;
        self.overflow_sumw2 *= factor2;
    }

    /// Bin-by-bin ratio of two histograms with the same binning
    ///
    /// Bins with an empty denominator are zero. The errors are binomial, as
    /// befits an efficiency where the numerator is a subset of the
    /// denominator.
    ///
    pub fn ratio(
        name: &'static str,
        title: &'static str,
        numerator: &Histogram,
        denominator: &Histogram,
    ) -> Self {
        assert_eq!(numerator.bins(), denominator.bins());
        let binning = Binning {
            axis: numerator.axis,
            bins: numerator.bins(),
            low: numerator.low,
            high: numerator.high,
        };
        let mut result = Self::empty(name, title, &binning);
        for (bin, (&num, &den)) in numerator.contents.iter().zip(&denominator.contents).enumerate() {
            if den > Float::zero() {
                let ratio = num / den;
                result.contents[bin] = ratio;
                result.sumw2[bin] = (ratio * (1. - ratio) / den).max(Float::zero());
            }
        }
        result.entries = numerator.entries;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Label;
    use approx::assert_relative_eq;

    const DEF: HistogramDef = HistogramDef {
        name: "test",
        title: "Test histogram",
        label: Label::Selected,
        group: None,
    };

    const BINNING: Binning = Binning {
        axis: "energy (GeV)",
        bins: 30,
        low: 0.,
        high: 6.,
    };

    #[test]
    fn fill_bins_and_flows() {
        let mut hist = Histogram::new(&DEF, &BINNING);
        hist.fill(1.25, 0.8);
        hist.fill(1.25, 0.5);
        hist.fill(0., 1.);
        hist.fill(5.99, 1.);
        hist.fill(-0.1, 2.);
        hist.fill(6., 3.);
        hist.fill(Float::NAN, 1.);

        // 1.25 GeV is in the bin [1.2, 1.4)
        assert_relative_eq!(hist.contents[6], 1.3);
        assert_relative_eq!(hist.sumw2[6], 0.89);
        assert_eq!(hist.contents[0], 1.);
        assert_eq!(hist.contents[29], 1.);
        assert_eq!(hist.underflow, 2.);
        assert_eq!(hist.underflow_sumw2, 4.);
        assert_eq!(hist.overflow, 4.);
        assert_eq!(hist.entries, 7);
        assert_relative_eq!(hist.integral(), 3.3);
    }

    #[test]
    fn edges_span_the_range() {
        let hist = Histogram::new(&DEF, &BINNING);
        let edges = &hist.edges;
        assert_eq!(edges.len(), 31);
        assert_eq!(edges[0], 0.);
        assert_relative_eq!(edges[6], 1.2);
        assert_relative_eq!(edges[30], 6.);
    }

    #[test]
    fn merge_adds_everything() {
        let mut a = Histogram::new(&DEF, &BINNING);
        let mut b = Histogram::new(&DEF, &BINNING);
        let mut both = Histogram::new(&DEF, &BINNING);
        for (value, weight) in [(0.5, 1.), (3., 0.2), (7., 1.5)] {
            a.fill(value, weight);
            both.fill(value, weight);
        }
        for (value, weight) in [(0.5, 0.3), (-1., 1.)] {
            b.fill(value, weight);
            both.fill(value, weight);
        }
        a.merge(&b);
        assert_eq!(a, both);
    }

    #[test]
    fn scaling_squares_the_errors() {
        let mut hist = Histogram::new(&DEF, &BINNING);
        hist.fill(1., 2.);
        hist.fill(10., 1.);
        hist.scale(0.5);
        assert_eq!(hist.contents[5], 1.);
        assert_eq!(hist.sumw2[5], 1.);
        assert_eq!(hist.overflow, 0.5);
        assert_eq!(hist.overflow_sumw2, 0.25);
        assert_eq!(hist.entries, 2);
    }

    #[test]
    fn ratio_of_subset() {
        let mut all = Histogram::new(&DEF, &BINNING);
        let mut passed = Histogram::new(&DEF, &BINNING);
        for _ in 0..4 {
            all.fill(1., 1.);
        }
        passed.fill(1., 1.);
        let ratio = Histogram::ratio("eff", "Efficiency", &passed, &all);
        assert_eq!(ratio.name, "eff");
        assert_eq!(ratio.contents[5], 0.25);
        assert_relative_eq!(ratio.sumw2[5], 0.25 * 0.75 / 4.);
        assert_eq!(ratio.contents[0], 0.);
        assert_eq!(ratio.sumw2[0], 0.);
    }
}
