//! Cuts on the simulated truth of an event
//!
//! Every cut is a pure function of the event and of the cut values, so that
//! all analysis variants share the same definitions.

use crate::{
    config::{CutThresholds, Detector},
    event::{Event, Interaction, PDG_K0, PDG_PHOTON, PDG_PI0, PDG_PI_PLUS, PDG_PROTON},
    kinematics::{displacement, within_box, Position},
    numeric::Float,
};
use std::collections::HashSet;

/// Photon from the neutrino interaction, as found in the simulation
#[derive(Clone, Debug, PartialEq)]
pub struct TruePhoton {
    /// Simulation track ID, used to match reconstructed objects
    pub track_id: i32,

    /// Energy (MeV)
    pub energy: Float,

    /// Creation point
    pub start: Position,

    /// First energy deposition point
    pub deposit: Position,
}
//
impl TruePhoton {
    /// Distance travelled before the photon first deposited energy (cm)
    pub fn deposit_distance(&self) -> Float {
        displacement(&self.deposit, &self.start)
    }
}

/// Outcome of the scan of the primary hadrons
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HadronCount {
    /// Number of protons above the kinetic energy threshold
    pub protons: usize,

    /// Truth that a charged pion is above the kinetic energy threshold
    pub charged_pion: bool,
}

/// Truth that the interaction is neutral current
pub fn is_neutral_current(event: &Event) -> bool {
    event.interaction == Interaction::NeutralCurrent
}

/// Truth that the true vertex lies within the fiducial volume
pub fn vertex_in_fiducial(event: &Event, detector: &Detector, width: Float) -> bool {
    detector.in_fiducial(&event.true_vertex, width)
}

/// Truth that the event is tagged as a cosmic ray overlay
pub fn is_cosmic(event: &Event, thresholds: &CutThresholds) -> bool {
    event.cosmic_fraction >= thresholds.cosmic_fraction_max
}

/// Count energetic primary protons and look for energetic charged pions
pub fn count_hadrons(event: &Event, thresholds: &CutThresholds) -> HadronCount {
    let mut count = HadronCount::default();
    for particle in &event.primaries {
        match particle.pdg.abs() {
            PDG_PROTON if particle.kinetic_energy() >= thresholds.proton_ke_min => {
                count.protons += 1
            }
            PDG_PI_PLUS if particle.kinetic_energy() >= thresholds.pion_ke_min => {
                count.charged_pion = true
            }
            _ => {}
        }
    }
    count
}

/// Truth that a neutral pion or kaon came out of the interaction, which
/// implies photons without having to look for them
pub fn has_neutral_meson(event: &Event) -> bool {
    event
        .primaries
        .iter()
        .any(|particle| particle.pdg == PDG_PI0 || particle.pdg == PDG_K0)
}

/// Track IDs of the primary simulated particles
pub fn primary_track_ids(event: &Event) -> HashSet<i32> {
    event
        .sim_particles
        .iter()
        .filter(|particle| particle.is_primary())
        .map(|particle| particle.track_id)
        .collect()
}

/// List the photons which come out of the neutrino interaction
///
/// A simulated photon qualifies if its mother is a primary particle, or if it
/// was created within `photon_vertex_tolerance` of the true vertex on every
/// axis. Every selection that deals with true photons, including the truth
/// matching of reconstructed photons, goes through this function.
///
pub fn true_photons(event: &Event, thresholds: &CutThresholds) -> Vec<TruePhoton> {
    let primaries = primary_track_ids(event);
    event
        .sim_particles
        .iter()
        .filter(|particle| particle.pdg == PDG_PHOTON)
        .filter(|photon| {
            primaries.contains(&photon.mother_id)
                || within_box(
                    &photon.start,
                    &event.true_vertex,
                    thresholds.photon_vertex_tolerance,
                )
        })
        .map(|photon| TruePhoton {
            track_id: photon.track_id,
            energy: photon.energy,
            start: photon.start,
            deposit: photon.deposit,
        })
        .collect()
}

/// Truth that every photon deposits energy within the fiducial volume
pub fn deposits_in_fiducial(photons: &[TruePhoton], detector: &Detector, width: Float) -> bool {
    photons
        .iter()
        .all(|photon| detector.in_fiducial(&photon.deposit, width))
}

/// Track IDs of the energetic primary protons of the simulation
pub fn true_proton_track_ids(event: &Event, thresholds: &CutThresholds) -> Vec<i32> {
    event
        .sim_particles
        .iter()
        .filter(|particle| {
            particle.is_primary()
                && particle.pdg.abs() == PDG_PROTON
                && particle.kinetic_energy() >= thresholds.proton_ke_min
        })
        .map(|particle| particle.track_id)
        .collect()
}

/// Truth that a primary lepton of a given flavor (PDG code, either sign) is
/// above the lepton kinetic energy threshold
pub fn has_energetic_lepton(event: &Event, pdg: i32, thresholds: &CutThresholds) -> bool {
    event.sim_particles.iter().any(|particle| {
        particle.is_primary()
            && particle.pdg.abs() == pdg
            && particle.kinetic_energy() >= thresholds.lepton_ke_min
    })
}
