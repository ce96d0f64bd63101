//! This module defines the properties and storage of ntuple events
//!
//! Events are materialized from the event store once per row (see store.rs),
//! after which every field has a fixed name, a fixed type and a canonical
//! unit: energies and momenta in MeV, positions and lengths in cm.

use crate::{
    kinematics::{kinetic_energy, Momentum, Position},
    numeric::Float,
};
use serde::Serialize;
use std::fmt::{self, Display};

/// PDG code of the electron
pub const PDG_ELECTRON: i32 = 11;

/// PDG code of the muon
pub const PDG_MUON: i32 = 13;

/// PDG code of the photon
pub const PDG_PHOTON: i32 = 22;

/// PDG code of the neutral pion
pub const PDG_PI0: i32 = 111;

/// PDG code of the charged pion
pub const PDG_PI_PLUS: i32 = 211;

/// PDG code of the neutral kaon
pub const PDG_K0: i32 = 311;

/// PDG code of the proton
pub const PDG_PROTON: i32 = 2212;

/// Kind of neutrino interaction
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interaction {
    /// Charged current (the neutrino turns into its charged lepton)
    ChargedCurrent,

    /// Neutral current (the neutrino scatters off and stays a neutrino)
    NeutralCurrent,
}

/// Primary particle of the neutrino interaction, as listed by the generator
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pdg: i32,
    pub energy: Float,
    pub momentum: Momentum,
}
//
impl Particle {
    /// Kinetic energy of the particle (MeV)
    pub fn kinetic_energy(&self) -> Float {
        kinetic_energy(self.energy, &self.momentum)
    }
}

/// Particle from the detector simulation
#[derive(Clone, Debug, PartialEq)]
pub struct SimParticle {
    pub pdg: i32,

    /// Track ID of the particle
    pub track_id: i32,

    /// Track ID of the particle's mother (equal to `track_id` for primaries)
    pub mother_id: i32,

    pub energy: Float,
    pub momentum: Momentum,

    /// Where the particle was created
    pub start: Position,

    /// Where the particle first deposited energy
    pub deposit: Position,
}
//
impl SimParticle {
    /// Truth that this particle comes straight out of the interaction
    pub fn is_primary(&self) -> bool {
        self.track_id == self.mother_id
    }

    /// Kinetic energy of the particle (MeV)
    pub fn kinetic_energy(&self) -> Float {
        kinetic_energy(self.energy, &self.momentum)
    }
}

/// Reconstructed track
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// Particle ID hypothesis (PDG code)
    pub pid: i32,
    pub is_secondary: bool,

    /// Reconstructed kinetic energy (MeV)
    pub energy: Float,

    /// Track ID of the simulated particle that this track was matched to
    pub true_track_id: i32,

    /// Length (cm)
    pub length: Float,
    pub completeness: Float,
    pub primary_score: Float,
    pub start: Position,
}

/// Reconstructed shower
#[derive(Clone, Debug, PartialEq)]
pub struct Shower {
    /// Particle ID hypothesis (PDG code)
    pub pid: i32,
    pub is_secondary: bool,

    /// Reconstructed energy (MeV)
    pub energy: Float,

    /// Track ID of the simulated particle that this shower was matched to
    pub true_track_id: i32,
    pub primary_score: Float,

    /// Score of the hypothesis that this shower came from a charged particle
    pub from_charge_score: Float,
    pub completeness: Float,
    pub start: Position,
}

/// Identification of an event within the simulation production
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventId {
    pub file_id: i32,
    pub run: i32,
    pub subrun: i32,
    pub event: i32,
}

/// One ntuple event, with its simulated truth and its reconstruction
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub id: EventId,

    // ### TRUTH ###
    pub interaction: Interaction,
    pub true_vertex: Position,

    /// Fraction of the hits around the vertex attributed to cosmic rays
    pub cosmic_fraction: Float,

    /// True neutrino energy (MeV)
    pub nu_energy: Float,

    /// Cross-section weight
    pub weight: Float,
    pub primaries: Vec<Particle>,
    pub sim_particles: Vec<SimParticle>,

    // ### RECONSTRUCTION ###
    /// Reconstructed vertex, if the reconstruction found one
    pub vertex: Option<Position>,
    pub tracks: Vec<Track>,
    pub showers: Vec<Shower>,
}

impl Display for EventId {
    /// Same layout as the diagnostic side file
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "File ID:{}, Run:{}, Subrun:{}, Event: {}",
            self.file_id, self.run, self.subrun, self.event
        )
    }
}

/// Hand-built events for unit tests
#[cfg(test)]
pub mod testing {
    use super::*;

    /// Build a primary particle with a given kinetic energy along z (MeV)
    pub fn primary(pdg: i32, mass: Float, kinetic: Float) -> Particle {
        let energy = mass + kinetic;
        let p = (energy.powi(2) - mass.powi(2)).sqrt();
        Particle {
            pdg,
            energy,
            momentum: Momentum::new(0., 0., p),
        }
    }

    /// Build a simulated particle; positions default to `start`
    pub fn sim(
        pdg: i32,
        track_id: i32,
        mother_id: i32,
        mass: Float,
        kinetic: Float,
        start: Position,
    ) -> SimParticle {
        let energy = mass + kinetic;
        let p = (energy.powi(2) - mass.powi(2)).sqrt();
        SimParticle {
            pdg,
            track_id,
            mother_id,
            energy,
            momentum: Momentum::new(p, 0., 0.),
            start,
            deposit: start,
        }
    }

    /// Reconstructed track with neutral quality scores
    pub fn track(pid: i32, energy: Float, true_track_id: i32) -> Track {
        Track {
            pid,
            is_secondary: false,
            energy,
            true_track_id,
            length: 5.,
            completeness: 0.9,
            primary_score: 0.9,
            start: Position::new(128., 0., 518.),
        }
    }

    /// Reconstructed shower with neutral quality scores
    pub fn shower(pid: i32, energy: Float, true_track_id: i32) -> Shower {
        Shower {
            pid,
            is_secondary: false,
            energy,
            true_track_id,
            primary_score: 0.9,
            from_charge_score: 0.1,
            completeness: 0.9,
            start: Position::new(128., 0., 530.),
        }
    }

    pub const PROTON_MASS: Float = 938.272;
    pub const PION_MASS: Float = 139.570;
    pub const MUON_MASS: Float = 105.658;

    /// The reference signal event: NC at the center of the detector, one
    /// 80 MeV proton, two prompt photons of 200 and 400 MeV, all of them
    /// correctly reconstructed and truth-matched.
    pub fn signal_event() -> Event {
        let vertex = Position::new(128., 0., 518.);
        let mut photon_lo = sim(PDG_PHOTON, 3, 1, 0., 200., vertex);
        photon_lo.deposit = Position::new(128., 10., 560.);
        let mut photon_hi = sim(PDG_PHOTON, 4, 1, 0., 400., vertex);
        photon_hi.deposit = Position::new(140., -20., 600.);
        Event {
            id: EventId {
                file_id: 7,
                run: 5000,
                subrun: 12,
                event: 604,
            },
            interaction: Interaction::NeutralCurrent,
            true_vertex: vertex,
            cosmic_fraction: 0.,
            nu_energy: 1250.,
            weight: 0.8,
            primaries: vec![
                primary(PDG_PROTON, PROTON_MASS, 80.),
                primary(PDG_PI0, 134.977, 500.),
            ],
            sim_particles: vec![
                sim(PDG_PI0, 1, 1, 134.977, 500., vertex),
                sim(PDG_PROTON, 2, 2, PROTON_MASS, 80., vertex),
                photon_lo,
                photon_hi,
            ],
            vertex: Some(Position::new(128.5, 0.2, 518.3)),
            tracks: vec![track(PDG_PROTON, 78., 2)],
            showers: vec![shower(PDG_PHOTON, 190., 3), shower(PDG_PHOTON, 385., 4)],
        }
    }
}
