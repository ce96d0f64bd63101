//! Cuts on the reconstructed content of an event
//!
//! These mirror the truth cuts of truthcut.rs, but only look at what the
//! reconstruction produced. Truth is only consulted to match reconstructed
//! objects to simulated particles, through their true track IDs.

use crate::{
    config::{CutThresholds, Detector},
    event::{Event, PDG_ELECTRON, PDG_MUON, PDG_PHOTON, PDG_PI_PLUS, PDG_PROTON},
    kinematics::Position,
    numeric::Float,
    truthcut::TruePhoton,
};
use std::collections::HashSet;

/// Reconstructed object that a photon candidate was built from
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecoObject {
    /// Index into the event's showers
    Shower(usize),

    /// Index into the event's tracks
    Track(usize),
}

/// Reconstructed photon candidate
#[derive(Clone, Debug, PartialEq)]
pub struct RecoPhoton {
    pub object: RecoObject,

    /// Track ID of the simulated particle that the object was matched to
    pub true_track_id: i32,

    /// Reconstructed energy (MeV)
    pub energy: Float,

    pub start: Position,
}

/// Which reconstructed objects may be photon candidates
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RecoPhotonRule {
    /// Also consider tracks which were identified as photons
    pub include_tracks: bool,

    /// Only consider objects starting inside the fiducial volume
    pub require_fiducial: bool,
}

/// Outcome of the reconstructed proton search
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProtonMatch {
    /// No proton was reconstructed
    None,

    /// More than one proton was reconstructed
    Multiple,

    /// One proton was reconstructed, but it is not a true proton
    Wrong,

    /// One proton was reconstructed, and matched to a true proton
    Matched,
}

/// Truth that the reconstruction found a vertex
pub fn vertex_found(event: &Event) -> bool {
    event.vertex.is_some()
}

/// Truth that the reconstructed vertex exists and is in the fiducial volume
pub fn vertex_in_fiducial(event: &Event, detector: &Detector, width: Float) -> bool {
    event
        .vertex
        .map_or(false, |vertex| detector.in_fiducial(&vertex, width))
}

/// Truth that the reconstruction saw the charged lepton of a CC interaction:
/// a primary track identified as a muon or an electron, or a primary shower
/// identified as an electron
pub fn has_charged_lepton(event: &Event) -> bool {
    let track_lepton = event.tracks.iter().any(|track| {
        !track.is_secondary && matches!(track.pid.abs(), PDG_MUON | PDG_ELECTRON)
    });
    let shower_electron = event
        .showers
        .iter()
        .any(|shower| !shower.is_secondary && shower.pid.abs() == PDG_ELECTRON);
    track_lepton || shower_electron
}

/// Truth that a primary track was identified as a muon, with an energy above
/// the classification threshold
pub fn has_primary_muon(event: &Event, thresholds: &CutThresholds) -> bool {
    event.tracks.iter().any(|track| {
        !track.is_secondary
            && track.pid.abs() == PDG_MUON
            && track.energy >= thresholds.classification_threshold
    })
}

/// Truth that a primary track or shower was identified as an electron, with an
/// energy above the classification threshold
pub fn has_primary_electron(event: &Event, thresholds: &CutThresholds) -> bool {
    let is_electron = |secondary: bool, pid: i32, energy: Float| {
        !secondary && pid.abs() == PDG_ELECTRON && energy >= thresholds.classification_threshold
    };
    event
        .tracks
        .iter()
        .any(|track| is_electron(track.is_secondary, track.pid, track.energy))
        || event
            .showers
            .iter()
            .any(|shower| is_electron(shower.is_secondary, shower.pid, shower.energy))
}

/// Truth that a track of at least `energy_min` was identified as a charged
/// pion
pub fn has_charged_pion(event: &Event, energy_min: Float) -> bool {
    event
        .tracks
        .iter()
        .any(|track| track.pid.abs() == PDG_PI_PLUS && track.energy >= energy_min)
}

/// True track IDs of the tracks of at least `energy_min` identified as protons
pub fn reco_protons(event: &Event, energy_min: Float) -> Vec<i32> {
    event
        .tracks
        .iter()
        .filter(|track| track.pid.abs() == PDG_PROTON && track.energy >= energy_min)
        .map(|track| track.true_track_id)
        .collect()
}

/// Look for a single reconstructed proton and match it to the true protons
pub fn match_proton(
    event: &Event,
    thresholds: &CutThresholds,
    true_proton_ids: &[i32],
) -> ProtonMatch {
    match reco_protons(event, thresholds.reco_proton_energy_min).as_slice() {
        [] => ProtonMatch::None,
        [id] if true_proton_ids.contains(id) => ProtonMatch::Matched,
        [_] => ProtonMatch::Wrong,
        _ => ProtonMatch::Multiple,
    }
}

/// List the reconstructed photon candidates
pub fn reco_photons(
    event: &Event,
    rule: RecoPhotonRule,
    detector: &Detector,
    width: Float,
) -> Vec<RecoPhoton> {
    let showers = event
        .showers
        .iter()
        .enumerate()
        .filter(|(_, shower)| shower.pid == PDG_PHOTON)
        .map(|(index, shower)| RecoPhoton {
            object: RecoObject::Shower(index),
            true_track_id: shower.true_track_id,
            energy: shower.energy,
            start: shower.start,
        });
    let tracks = event
        .tracks
        .iter()
        .enumerate()
        .filter(|(_, track)| rule.include_tracks && track.pid == PDG_PHOTON)
        .map(|(index, track)| RecoPhoton {
            object: RecoObject::Track(index),
            true_track_id: track.true_track_id,
            energy: track.energy,
            start: track.start,
        });
    showers
        .chain(tracks)
        .filter(|photon| !rule.require_fiducial || detector.in_fiducial(&photon.start, width))
        .collect()
}

/// Number of true photons which were reconstructed as a photon candidate
pub fn count_matched_photons(true_photons: &[TruePhoton], reco_photons: &[RecoPhoton]) -> usize {
    let reco_ids = reco_photons
        .iter()
        .map(|photon| photon.true_track_id)
        .collect::<HashSet<_>>();
    true_photons
        .iter()
        .filter(|photon| reco_ids.contains(&photon.track_id))
        .count()
}

/// Truth that a photon candidate was reconstructed
pub fn is_matched(photon: &TruePhoton, reco_photons: &[RecoPhoton]) -> bool {
    reco_photons
        .iter()
        .any(|reco| reco.true_track_id == photon.track_id)
}

/// Truth that no photon shower looks like it came from a charged particle
pub fn showers_neutral(event: &Event, photons: &[RecoPhoton], thresholds: &CutThresholds) -> bool {
    photons.iter().all(|photon| match photon.object {
        RecoObject::Shower(index) => {
            event.showers[index].from_charge_score <= thresholds.shower_charge_max
        }
        RecoObject::Track(_) => true,
    })
}

/// Truth that every photon candidate looks like it came from the interaction
pub fn photons_primary(event: &Event, photons: &[RecoPhoton], thresholds: &CutThresholds) -> bool {
    photons.iter().all(|photon| {
        let score = match photon.object {
            RecoObject::Shower(index) => event.showers[index].primary_score,
            RecoObject::Track(index) => event.tracks[index].primary_score,
        };
        score >= thresholds.primary_score_min
    })
}

/// Truth that a track other than a photon candidate is long
pub fn has_long_track(event: &Event, photons: &[RecoPhoton], thresholds: &CutThresholds) -> bool {
    event.tracks.iter().enumerate().any(|(index, track)| {
        track.length > thresholds.long_track_length
            && !photons
                .iter()
                .any(|photon| photon.object == RecoObject::Track(index))
    })
}

/// Truth that every photon shower is complete enough
pub fn showers_complete(event: &Event, photons: &[RecoPhoton], thresholds: &CutThresholds) -> bool {
    photons.iter().all(|photon| match photon.object {
        RecoObject::Shower(index) => {
            event.showers[index].completeness >= thresholds.shower_completeness_min
        }
        RecoObject::Track(_) => true,
    })
}

/// Truth that every track identified as a muon is complete enough
pub fn muons_complete(event: &Event, thresholds: &CutThresholds) -> bool {
    event
        .tracks
        .iter()
        .filter(|track| track.pid.abs() == PDG_MUON)
        .all(|track| track.completeness >= thresholds.muon_completeness_min)
}
