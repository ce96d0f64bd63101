//! This module contains everything that is needed to store and display the
//! final results: normalized histograms, efficiencies, and the cut flow

use crate::{
    config::Configuration, event::EventId, histogram::Histogram, kinematics::Position,
    numeric::Float,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Terminal bucket of the cut flow
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CutFlowRow {
    pub label: String,
    pub group: Option<u8>,

    /// Number of events
    pub events: usize,

    /// Sum of event weights
    pub weight: Float,

    /// Sum of event weights, normalized to the target exposure
    pub scaled: Float,
}

/// Event destined to the diagnostic side file
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlaggedEvent {
    pub id: EventId,
    pub true_vertex: [Float; 3],
}
//
impl FlaggedEvent {
    /// Record an event's identification and true vertex
    pub fn new(id: EventId, true_vertex: &Position) -> Self {
        Self {
            id,
            true_vertex: [true_vertex.x, true_vertex.y, true_vertex.z],
        }
    }
}

/// Final results of the classification
#[derive(Serialize)]
pub struct FinalResults<'cfg> {
    /// Name of the variant that was run
    pub variant: &'static str,

    /// Number of classified events
    pub processed_events: usize,

    /// Number of events that went through every stage
    pub selected_events: usize,

    /// Number of events that could not be classified
    pub skipped_events: usize,

    /// Skipped events by kind of error
    pub skipped: BTreeMap<&'static str, usize>,

    /// Exposure of the event store (POT)
    pub pot_sum: Float,

    /// Exposure which histograms are normalized to (POT)
    pub target_pot: Float,

    /// Normalization factor of the histograms
    pub scale: Float,

    /// Normalized histograms
    pub histograms: Vec<Histogram>,

    /// Bin-by-bin ratios, computed before normalization
    pub ratios: Vec<Histogram>,

    pub cut_flow: Vec<CutFlowRow>,

    /// Events that go to the diagnostic side file, in event order
    #[serde(skip)]
    pub flagged: Vec<FlaggedEvent>,

    /// Configuration of the run (for further derivation)
    #[serde(skip)]
    pub cfg: &'cfg Configuration,
}
//
impl FinalResults<'_> {
    /// Display the cut flow
    pub fn print_cut_flow(&self) {
        println!();
        println!("Variant          : {}", self.variant);
        println!("Events           : {}", self.processed_events);
        println!("... skipped      : {}", self.skipped_events);
        for (kind, count) in &self.skipped {
            println!("    {kind:<13}: {count}");
        }
        println!("POT (ntuple)     : {:e}", self.pot_sum);
        println!("POT (target)     : {:e}", self.target_pot);
        println!("Scale factor     : {:.6}", self.scale);
        println!();
        println!(
            "{:<34} {:>5} {:>9} {:>12} {:>12}",
            "bucket", "group", "events", "weighted", "scaled"
        );
        for row in &self.cut_flow {
            let group = row.group.map_or_else(|| "-".to_string(), |g| g.to_string());
            println!(
                "{:<34} {:>5} {:>9} {:>12.3} {:>12.3}",
                row.label, group, row.events, row.weight, row.scaled
            );
        }
        println!();
        for hist in self.histograms.iter().chain(&self.ratios) {
            println!("{:<40} : {:.4}", hist.name, hist.integral());
        }
    }

    /// Line of the diagnostic side file for a flagged event
    pub fn diagnostic_line(event: &FlaggedEvent) -> String {
        let [x, y, z] = event.true_vertex;
        format!("{}, Vertex Location (x,y,z): ({x},{y},{z})", event.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_line_layout() {
        let event = FlaggedEvent::new(
            EventId {
                file_id: 7,
                run: 5000,
                subrun: 12,
                event: 604,
            },
            &Position::new(128., -3.5, 518.25),
        );
        assert_eq!(
            FinalResults::diagnostic_line(&event),
            "File ID:7, Run:5000, Subrun:12, Event: 604, Vertex Location (x,y,z): (128,-3.5,518.25)"
        );
    }
}
