//! Access to the ntuple event store
//!
//! The store holds two tables, named after the ntuple trees: `EventTree`, with
//! one row per event, and `potTree`, with the beam exposure of each file that
//! went into the ntuple. Rows are kept in their raw form until the pipeline
//! asks for them, at which point they are decoded into a typed [`Event`].
//! Decoding failures only concern one event and are reported as
//! [`EventError`]s, whereas failing to open or parse the store as a whole is
//! fatal.

use crate::{
    event::{Event, EventId, Interaction, Particle, Shower, SimParticle, Track},
    kinematics::{Momentum, Position},
    numeric::{Float, MEV_PER_GEV},
    Result,
};
use eyre::{ensure, WrapErr};
use serde::Deserialize;
use serde_json::Value;
use std::{fs::File, io::BufReader, path::Path};
use thiserror::Error;

/// Reasons why a single event cannot be classified
#[derive(Debug, Error)]
pub enum EventError {
    /// The row could not be decoded (missing field, wrong type...)
    #[error("malformed row: {0}")]
    MalformedRow(#[from] serde_json::Error),

    /// The interaction type code is neither CC (0) nor NC (1)
    #[error("unknown interaction type code {0}")]
    UnknownInteraction(i32),

    /// A set of parallel arrays disagrees about the number of entries
    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Something that the selection requires is absent from the event
    #[error("missing {0}")]
    MissingEntity(&'static str),
}
//
impl EventError {
    /// Short name of the error kind, used to tally skipped events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRow(_) => "malformed row",
            Self::UnknownInteraction(_) => "unknown interaction",
            Self::LengthMismatch { .. } => "length mismatch",
            Self::MissingEntity(_) => "missing entity",
        }
    }
}

/// Exposure record of the POT tree
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PotRecord {
    /// Protons on target after data quality cuts
    #[serde(rename = "totGoodPOT")]
    pub good_pot: Float,
}

/// Event store, as loaded from disk
#[derive(Debug, Deserialize)]
pub struct EventStore {
    #[serde(rename = "EventTree")]
    rows: Vec<Value>,

    #[serde(rename = "potTree")]
    pot: Vec<PotRecord>,
}
//
impl EventStore {
    /// Open an event store, failing if it is unreadable or lacks a table
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .wrap_err_with(|| format!("Failed to open input file {}", path.display()))?;
        let store: Self = serde_json::from_reader(BufReader::new(file))
            .wrap_err_with(|| format!("Failed to read the event and POT trees of {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            events = store.len(),
            pot_records = store.pot.len(),
            "event store loaded"
        );
        Ok(store)
    }

    /// Build an event store from an in-memory JSON document
    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of event rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Decode the event at a given row index
    pub fn event(&self, index: usize) -> std::result::Result<Event, EventError> {
        let raw = RawEvent::deserialize(&self.rows[index])?;
        raw.into_event()
    }

    /// Total exposure represented by the store, which must be positive since
    /// it is used to normalize every histogram
    pub fn pot_sum(&self) -> Result<Float> {
        let sum = self.pot.iter().map(|record| record.good_pot).sum::<Float>();
        ensure!(
            sum > 0.,
            "The POT tree reports no exposure ({} records, total {sum})",
            self.pot.len()
        );
        Ok(sum)
    }
}

/// One row of the event tree, with the ntuple's branch names and units
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(default, rename = "fileid")]
    file_id: i32,
    #[serde(default)]
    run: i32,
    #[serde(default)]
    subrun: i32,
    #[serde(default)]
    event: i32,

    #[serde(rename = "trueNuCCNC")]
    true_nu_ccnc: i32,
    #[serde(rename = "trueNuE")]
    true_nu_e_gev: Float,
    true_vtx_x: Float,
    true_vtx_y: Float,
    true_vtx_z: Float,
    vtx_frac_hits_on_cosmic: Float,
    xsec_weight: Float,

    #[serde(default, rename = "truePrimPartPDG")]
    true_prim_part_pdg: Vec<i32>,
    #[serde(default, rename = "truePrimPartE")]
    true_prim_part_e: Vec<Float>,
    #[serde(default)]
    true_prim_part_px: Vec<Float>,
    #[serde(default)]
    true_prim_part_py: Vec<Float>,
    #[serde(default)]
    true_prim_part_pz: Vec<Float>,

    #[serde(default, rename = "trueSimPartPDG")]
    true_sim_part_pdg: Vec<i32>,
    #[serde(default, rename = "trueSimPartTID")]
    true_sim_part_tid: Vec<i32>,
    #[serde(default, rename = "trueSimPartMID")]
    true_sim_part_mid: Vec<i32>,
    #[serde(default, rename = "trueSimPartE")]
    true_sim_part_e: Vec<Float>,
    #[serde(default)]
    true_sim_part_px: Vec<Float>,
    #[serde(default)]
    true_sim_part_py: Vec<Float>,
    #[serde(default)]
    true_sim_part_pz: Vec<Float>,
    #[serde(default, rename = "trueSimPartX")]
    true_sim_part_x: Vec<Float>,
    #[serde(default, rename = "trueSimPartY")]
    true_sim_part_y: Vec<Float>,
    #[serde(default, rename = "trueSimPartZ")]
    true_sim_part_z: Vec<Float>,
    #[serde(default, rename = "trueSimPartEDepX")]
    true_sim_part_edep_x: Vec<Float>,
    #[serde(default, rename = "trueSimPartEDepY")]
    true_sim_part_edep_y: Vec<Float>,
    #[serde(default, rename = "trueSimPartEDepZ")]
    true_sim_part_edep_z: Vec<Float>,

    found_vertex: i32,
    #[serde(default)]
    vtx_x: Float,
    #[serde(default)]
    vtx_y: Float,
    #[serde(default)]
    vtx_z: Float,

    #[serde(default)]
    n_tracks: usize,
    #[serde(default)]
    track_is_secondary: Vec<i32>,
    #[serde(default, rename = "trackPID")]
    track_pid: Vec<i32>,
    #[serde(default)]
    track_reco_e: Vec<Float>,
    #[serde(default, rename = "trackTrueTID")]
    track_true_tid: Vec<i32>,
    #[serde(default)]
    track_length: Vec<Float>,
    #[serde(default)]
    track_completeness: Vec<Float>,
    #[serde(default)]
    track_primary_score: Vec<Float>,
    #[serde(default)]
    track_start_pos_x: Vec<Float>,
    #[serde(default)]
    track_start_pos_y: Vec<Float>,
    #[serde(default)]
    track_start_pos_z: Vec<Float>,

    #[serde(default)]
    n_showers: usize,
    #[serde(default)]
    shower_is_secondary: Vec<i32>,
    #[serde(default, rename = "showerPID")]
    shower_pid: Vec<i32>,
    #[serde(default)]
    shower_reco_e: Vec<Float>,
    #[serde(default, rename = "showerTrueTID")]
    shower_true_tid: Vec<i32>,
    #[serde(default)]
    shower_primary_score: Vec<Float>,
    #[serde(default)]
    shower_from_charged_score: Vec<Float>,
    #[serde(default)]
    shower_completeness: Vec<Float>,
    #[serde(default)]
    shower_start_pos_x: Vec<Float>,
    #[serde(default)]
    shower_start_pos_y: Vec<Float>,
    #[serde(default)]
    shower_start_pos_z: Vec<Float>,
}
//
impl RawEvent {
    /// Validate the row and turn it into a typed event in canonical units
    fn into_event(self) -> std::result::Result<Event, EventError> {
        let interaction = match self.true_nu_ccnc {
            0 => Interaction::ChargedCurrent,
            1 => Interaction::NeutralCurrent,
            other => return Err(EventError::UnknownInteraction(other)),
        };

        // Primary particles are stored in GeV
        let n_prim = self.true_prim_part_pdg.len();
        check_len("truePrimPartE", n_prim, &self.true_prim_part_e)?;
        check_len("truePrimPartPx", n_prim, &self.true_prim_part_px)?;
        check_len("truePrimPartPy", n_prim, &self.true_prim_part_py)?;
        check_len("truePrimPartPz", n_prim, &self.true_prim_part_pz)?;
        let primaries = (0..n_prim)
            .map(|i| Particle {
                pdg: self.true_prim_part_pdg[i],
                energy: self.true_prim_part_e[i] * MEV_PER_GEV,
                momentum: Momentum::new(
                    self.true_prim_part_px[i],
                    self.true_prim_part_py[i],
                    self.true_prim_part_pz[i],
                ) * MEV_PER_GEV,
            })
            .collect();

        let n_sim = self.true_sim_part_pdg.len();
        check_len("trueSimPartTID", n_sim, &self.true_sim_part_tid)?;
        check_len("trueSimPartMID", n_sim, &self.true_sim_part_mid)?;
        check_len("trueSimPartE", n_sim, &self.true_sim_part_e)?;
        check_len("trueSimPartPx", n_sim, &self.true_sim_part_px)?;
        check_len("trueSimPartPy", n_sim, &self.true_sim_part_py)?;
        check_len("trueSimPartPz", n_sim, &self.true_sim_part_pz)?;
        check_len("trueSimPartX", n_sim, &self.true_sim_part_x)?;
        check_len("trueSimPartY", n_sim, &self.true_sim_part_y)?;
        check_len("trueSimPartZ", n_sim, &self.true_sim_part_z)?;
        check_len("trueSimPartEDepX", n_sim, &self.true_sim_part_edep_x)?;
        check_len("trueSimPartEDepY", n_sim, &self.true_sim_part_edep_y)?;
        check_len("trueSimPartEDepZ", n_sim, &self.true_sim_part_edep_z)?;
        let sim_particles = (0..n_sim)
            .map(|i| SimParticle {
                pdg: self.true_sim_part_pdg[i],
                track_id: self.true_sim_part_tid[i],
                mother_id: self.true_sim_part_mid[i],
                energy: self.true_sim_part_e[i],
                momentum: Momentum::new(
                    self.true_sim_part_px[i],
                    self.true_sim_part_py[i],
                    self.true_sim_part_pz[i],
                ),
                start: Position::new(
                    self.true_sim_part_x[i],
                    self.true_sim_part_y[i],
                    self.true_sim_part_z[i],
                ),
                deposit: Position::new(
                    self.true_sim_part_edep_x[i],
                    self.true_sim_part_edep_y[i],
                    self.true_sim_part_edep_z[i],
                ),
            })
            .collect();

        let n_tracks = self.n_tracks;
        check_len("trackIsSecondary", n_tracks, &self.track_is_secondary)?;
        check_len("trackPID", n_tracks, &self.track_pid)?;
        check_len("trackRecoE", n_tracks, &self.track_reco_e)?;
        check_len("trackTrueTID", n_tracks, &self.track_true_tid)?;
        check_len("trackLength", n_tracks, &self.track_length)?;
        check_len("trackCompleteness", n_tracks, &self.track_completeness)?;
        check_len("trackPrimaryScore", n_tracks, &self.track_primary_score)?;
        check_len("trackStartPosX", n_tracks, &self.track_start_pos_x)?;
        check_len("trackStartPosY", n_tracks, &self.track_start_pos_y)?;
        check_len("trackStartPosZ", n_tracks, &self.track_start_pos_z)?;
        let tracks = (0..n_tracks)
            .map(|i| Track {
                pid: self.track_pid[i],
                is_secondary: self.track_is_secondary[i] != 0,
                energy: self.track_reco_e[i],
                true_track_id: self.track_true_tid[i],
                length: self.track_length[i],
                completeness: self.track_completeness[i],
                primary_score: self.track_primary_score[i],
                start: Position::new(
                    self.track_start_pos_x[i],
                    self.track_start_pos_y[i],
                    self.track_start_pos_z[i],
                ),
            })
            .collect();

        let n_showers = self.n_showers;
        check_len("showerIsSecondary", n_showers, &self.shower_is_secondary)?;
        check_len("showerPID", n_showers, &self.shower_pid)?;
        check_len("showerRecoE", n_showers, &self.shower_reco_e)?;
        check_len("showerTrueTID", n_showers, &self.shower_true_tid)?;
        check_len("showerPrimaryScore", n_showers, &self.shower_primary_score)?;
        check_len("showerFromChargedScore", n_showers, &self.shower_from_charged_score)?;
        check_len("showerCompleteness", n_showers, &self.shower_completeness)?;
        check_len("showerStartPosX", n_showers, &self.shower_start_pos_x)?;
        check_len("showerStartPosY", n_showers, &self.shower_start_pos_y)?;
        check_len("showerStartPosZ", n_showers, &self.shower_start_pos_z)?;
        let showers = (0..n_showers)
            .map(|i| Shower {
                pid: self.shower_pid[i],
                is_secondary: self.shower_is_secondary[i] != 0,
                energy: self.shower_reco_e[i],
                true_track_id: self.shower_true_tid[i],
                primary_score: self.shower_primary_score[i],
                from_charge_score: self.shower_from_charged_score[i],
                completeness: self.shower_completeness[i],
                start: Position::new(
                    self.shower_start_pos_x[i],
                    self.shower_start_pos_y[i],
                    self.shower_start_pos_z[i],
                ),
            })
            .collect();

        Ok(Event {
            id: EventId {
                file_id: self.file_id,
                run: self.run,
                subrun: self.subrun,
                event: self.event,
            },
            interaction,
            true_vertex: Position::new(self.true_vtx_x, self.true_vtx_y, self.true_vtx_z),
            cosmic_fraction: self.vtx_frac_hits_on_cosmic,
            nu_energy: self.true_nu_e_gev * MEV_PER_GEV,
            weight: self.xsec_weight,
            primaries,
            sim_particles,
            vertex: (self.found_vertex == 1)
                .then(|| Position::new(self.vtx_x, self.vtx_y, self.vtx_z)),
            tracks,
            showers,
        })
    }
}

/// Check that a parallel array has the expected number of entries
fn check_len<T>(
    field: &'static str,
    expected: usize,
    values: &[T],
) -> std::result::Result<(), EventError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(EventError::LengthMismatch {
            field,
            expected,
            actual: values.len(),
        })
    }
}
