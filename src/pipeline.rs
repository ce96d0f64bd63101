//! Event classification pipeline
//!
//! An analysis variant is an ordered list of [`Stage`]s. Each event goes
//! through the stages in order, and the first stage which stops it decides its
//! terminal [`Label`]. Events that go through every stage are `Selected`. Some
//! stages never stop an event, but record intermediate histogram fills or
//! assign the event to a multiplicity group instead.

use crate::{
    config::{Configuration, CutThresholds},
    event::{Event, PDG_ELECTRON, PDG_MUON},
    numeric::Float,
    recocut::{self, ProtonMatch, RecoPhoton},
    store::EventError,
    truthcut::{self, HadronCount, TruePhoton},
    variant::{FillQuantity, FillSource, PhotonQuantity, VariantSpec},
};
use std::{
    cell::OnceCell,
    fmt::{self, Display},
};

/// Classification bucket
///
/// Most labels are terminal: they name the stage which stopped an event.
/// `Total`, `TrueSignal` and the `Photon*` labels only tag intermediate fills.
///
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Label {
    // ### INTERMEDIATE FILLS ###
    /// Every event reaching a given point of the selection
    Total,
    /// Events passing the truth-level signal definition
    TrueSignal,
    /// Any true photon of an event which reached photon matching
    PhotonAll,
    /// True photon which was truth-matched by a reconstructed photon
    PhotonReconstructed,
    /// True photon which no reconstructed photon matches
    PhotonNotReconstructed,

    // ### TRUTH ###
    TrueChargedCurrent,
    TrueOutsideFiducial,
    Cosmic,
    /// Wrong number of true protons, or a true charged pion
    TrueProtonPion,
    /// Number of true photons (capped)
    TruePhotons(u8),
    /// A true photon deposits energy outside the fiducial volume
    DepositOutsideFiducial,
    TrueMuon,
    TrueElectron,
    /// Number of true protons (capped)
    TrueProtons(u8),

    // ### RECONSTRUCTION ###
    NoVertex,
    RecoOutsideFiducial,
    RecoChargedCurrent,
    RecoMuon,
    RecoElectron,
    RecoPion,
    NoRecoProton,
    MultipleRecoProtons,
    WrongRecoProton,
    NoRecoPhotons,
    /// Number of reconstructed photons (capped)
    RecoPhotons(u8),
    ShowerFromCharge,
    PrimaryScore,
    LongTrack,
    ShowerCompleteness,
    MuonCompleteness,
    /// Number of true photons which were truth-matched in reconstruction
    PhotonsMatched(u8),

    /// Went through every stage
    Selected,
}

impl Display for Label {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total => write!(fmt, "total"),
            Self::TrueSignal => write!(fmt, "true signal"),
            Self::PhotonAll => write!(fmt, "true photon"),
            Self::PhotonReconstructed => write!(fmt, "photon reconstructed"),
            Self::PhotonNotReconstructed => write!(fmt, "photon not reconstructed"),
            Self::TrueChargedCurrent => write!(fmt, "charged current"),
            Self::TrueOutsideFiducial => write!(fmt, "outside fiducial"),
            Self::Cosmic => write!(fmt, "cosmic"),
            Self::TrueProtonPion => write!(fmt, "proton count or charged pion"),
            Self::TruePhotons(n) => write!(fmt, "{n} true photon(s)"),
            Self::DepositOutsideFiducial => write!(fmt, "photon deposit outside fiducial"),
            Self::TrueMuon => write!(fmt, "true muon"),
            Self::TrueElectron => write!(fmt, "true electron"),
            Self::TrueProtons(n) => write!(fmt, "{n} true proton(s)"),
            Self::NoVertex => write!(fmt, "no vertex found"),
            Self::RecoOutsideFiducial => write!(fmt, "reco outside fiducial"),
            Self::RecoChargedCurrent => write!(fmt, "reco charged current"),
            Self::RecoMuon => write!(fmt, "reco muon"),
            Self::RecoElectron => write!(fmt, "reco electron"),
            Self::RecoPion => write!(fmt, "reco charged pion"),
            Self::NoRecoProton => write!(fmt, "no reco proton"),
            Self::MultipleRecoProtons => write!(fmt, "multiple reco protons"),
            Self::WrongRecoProton => write!(fmt, "wrong reco proton"),
            Self::NoRecoPhotons => write!(fmt, "no reco photon"),
            Self::RecoPhotons(n) => write!(fmt, "{n} reco photon(s)"),
            Self::ShowerFromCharge => write!(fmt, "shower from charged particle"),
            Self::PrimaryScore => write!(fmt, "low primary score"),
            Self::LongTrack => write!(fmt, "long track"),
            Self::ShowerCompleteness => write!(fmt, "incomplete shower"),
            Self::MuonCompleteness => write!(fmt, "incomplete muon"),
            Self::PhotonsMatched(n) => write!(fmt, "{n} photon(s) matched"),
            Self::Selected => write!(fmt, "selected"),
        }
    }
}

/// Requirement on the number of energetic true or reconstructed protons
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Multiplicity {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}
//
impl Multiplicity {
    /// Truth that a count satisfies the requirement
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
            Self::AtMost(n) => count <= n,
        }
    }
}

/// How reconstructed protons are checked
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecoProtonRule {
    /// Exactly one proton, truth-matched to a true proton
    SingleMatched,

    /// No more than `max` protons passing the energy cut
    AtMost { max: usize, cut: EnergyCut },
}

/// Which energy threshold a reconstructed pion or proton must pass to count
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnergyCut {
    /// The particle's own threshold (30 MeV pions, 60 MeV protons by default)
    Dedicated,

    /// The threshold shared with the lepton vetoes
    Classification,
}
//
impl EnergyCut {
    fn energy_min(self, dedicated: Float, thresholds: &CutThresholds) -> Float {
        match self {
            Self::Dedicated => dedicated,
            Self::Classification => thresholds.classification_threshold,
        }
    }
}

/// One step of an event selection
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    // ### TRUTH CUTS ###
    TrueNeutralCurrent,
    TrueFiducial,
    TrueCosmic,
    /// Proton multiplicity requirement and charged pion veto
    TrueHadrons(Multiplicity),
    /// Photon multiplicity requirement, optionally satisfied by a true π⁰/K⁰
    TruePhotons {
        count: Multiplicity,
        meson_shortcut: bool,
    },
    TrueDeposits,
    TrueMuon,
    TrueElectron,

    // ### TRUTH SORTING ###
    /// Stop every event, labeled by its true proton count
    SortByTrueProtons { cap: u8 },
    /// Stop every event, labeled by its true photon count
    SortByTruePhotons { cap: u8 },
    /// Group events by true photon count
    GroupByTruePhotons { cap: u8 },
    /// Group events by reconstructed photon count
    GroupByRecoPhotons { cap: u8 },

    /// Fill the histogram of a label and carry on
    Record(Label),

    // ### RECONSTRUCTION CUTS ###
    RecoVertex,
    RecoFiducial,
    RecoChargedCurrent,
    RecoMuon,
    RecoElectron,
    RecoPion(EnergyCut),
    RecoProtons(RecoProtonRule),
    RecoPhotonsPresent,
    /// Reconstructed photon count (capped) must equal the event's group
    RecoPhotonCount { cap: u8 },
    ShowerCharge,
    PrimaryScore,
    LongTracks,
    ShowerCompleteness,
    MuonCompleteness,

    /// Stop every event, labeled by its number of truth-matched photons
    PhotonMatching,
}

/// Outcome of a stage
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Continue,
    Stop(Label),
}

/// Value to be filled into the histogram of a label
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    pub label: Label,
    pub group: Option<u8>,
    pub value: Float,
}

/// Outcome of the classification of one event
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    /// Terminal bucket
    pub label: Label,

    /// Multiplicity group, for variants which group events
    pub group: Option<u8>,

    /// Event weight
    pub weight: Float,

    /// Histogram fills, including the terminal one if the label is histogrammed
    pub fills: Vec<Fill>,

    /// Truth that the event belongs to the variant's diagnostic side file
    pub flagged: bool,
}

/// Classifier of events according to an analysis variant
pub struct Selector<'cfg> {
    cfg: &'cfg Configuration,
    spec: &'static VariantSpec,
}
//
impl<'cfg> Selector<'cfg> {
    /// Set up the selection of the configured variant
    pub fn new(cfg: &'cfg Configuration) -> Self {
        Self {
            cfg,
            spec: cfg.variant.spec(),
        }
    }

    /// Run one event through the stages of the variant
    pub fn classify(&self, event: &Event) -> Result<Classification, EventError> {
        let mut selection = Selection::new(self, event);
        let mut label = Label::Selected;
        for stage in self.spec.stages {
            if let Verdict::Stop(stop) = selection.apply(stage)? {
                label = stop;
                break;
            }
        }

        // Only compute the fill value when a histogram wants it, since the
        // quantity may not exist for events which stopped early
        if self.spec.histogram(label, selection.group).is_some() {
            let value = selection.fill_value()?;
            selection.push_fill(label, value);
        }

        Ok(Classification {
            label,
            group: selection.group,
            weight: event.weight,
            flagged: self
                .spec
                .diagnostic
                .map_or(false, |(flagged, _)| flagged == label),
            fills: selection.fills,
        })
    }
}

/// State of the selection of one event
///
/// Derived quantities are computed on first use and then shared by the
/// following stages.
///
struct Selection<'sel, 'cfg> {
    selector: &'sel Selector<'cfg>,
    event: &'sel Event,
    group: Option<u8>,
    hadrons: OnceCell<HadronCount>,
    true_photons: OnceCell<Vec<TruePhoton>>,
    reco_photons: OnceCell<Vec<RecoPhoton>>,
    fills: Vec<Fill>,
}
//
impl<'sel, 'cfg> Selection<'sel, 'cfg> {
    fn new(selector: &'sel Selector<'cfg>, event: &'sel Event) -> Self {
        Self {
            selector,
            event,
            group: None,
            hadrons: OnceCell::new(),
            true_photons: OnceCell::new(),
            reco_photons: OnceCell::new(),
            fills: Vec::new(),
        }
    }

    fn cfg(&self) -> &'cfg Configuration {
        self.selector.cfg
    }

    /// Fiducial margin of this variant
    fn fiducial_width(&self) -> Float {
        let thresholds = &self.cfg().thresholds;
        if self.selector.spec.wide_fiducial {
            thresholds.wide_fiducial_width
        } else {
            thresholds.fiducial_width
        }
    }

    fn hadrons(&self) -> HadronCount {
        *self
            .hadrons
            .get_or_init(|| truthcut::count_hadrons(self.event, &self.cfg().thresholds))
    }

    fn true_photons(&self) -> &[TruePhoton] {
        self.true_photons
            .get_or_init(|| truthcut::true_photons(self.event, &self.cfg().thresholds))
    }

    fn reco_photons(&self) -> &[RecoPhoton] {
        self.reco_photons.get_or_init(|| {
            recocut::reco_photons(
                self.event,
                self.selector.spec.reco_photons,
                &self.cfg().detector,
                self.fiducial_width(),
            )
        })
    }

    fn push_fill(&mut self, label: Label, value: Float) {
        self.fills.push(Fill {
            label,
            group: self.group,
            value,
        });
    }

    /// Value of the variant's fill quantity for this event
    fn fill_value(&self) -> Result<Float, EventError> {
        let FillQuantity { source, unit } = self.selector.spec.fill;
        let value = match source {
            FillSource::LeadingTruePhoton => leading(self.true_photons().iter().map(|p| p.energy))
                .ok_or(EventError::MissingEntity("true photon"))?,
            FillSource::LeadingRecoPhoton => leading(self.reco_photons().iter().map(|p| p.energy))
                .ok_or(EventError::MissingEntity("reconstructed photon"))?,
            FillSource::NeutrinoEnergy => self.event.nu_energy,
        };
        Ok(unit.scale(value))
    }

    /// Evaluate one stage
    fn apply(&mut self, stage: &Stage) -> Result<Verdict, EventError> {
        let cfg = self.cfg();
        let thresholds = &cfg.thresholds;
        let event = self.event;
        let stop_unless = |pass: bool, label: Label| {
            if pass {
                Verdict::Continue
            } else {
                Verdict::Stop(label)
            }
        };

        let verdict = match *stage {
            Stage::TrueNeutralCurrent => {
                stop_unless(truthcut::is_neutral_current(event), Label::TrueChargedCurrent)
            }
            Stage::TrueFiducial => stop_unless(
                truthcut::vertex_in_fiducial(event, &cfg.detector, self.fiducial_width()),
                Label::TrueOutsideFiducial,
            ),
            Stage::TrueCosmic => stop_unless(!truthcut::is_cosmic(event, thresholds), Label::Cosmic),
            Stage::TrueHadrons(protons) => {
                let hadrons = self.hadrons();
                stop_unless(
                    !hadrons.charged_pion && protons.accepts(hadrons.protons),
                    Label::TrueProtonPion,
                )
            }
            Stage::TruePhotons {
                count,
                meson_shortcut,
            } => {
                if meson_shortcut
                    && thresholds.neutral_meson_shortcut
                    && truthcut::has_neutral_meson(event)
                {
                    Verdict::Continue
                } else {
                    let n = self.true_photons().len();
                    stop_unless(count.accepts(n), Label::TruePhotons(cap(n, u8::MAX)))
                }
            }
            Stage::TrueDeposits => stop_unless(
                truthcut::deposits_in_fiducial(
                    self.true_photons(),
                    &cfg.detector,
                    self.fiducial_width(),
                ),
                Label::DepositOutsideFiducial,
            ),
            Stage::TrueMuon => stop_unless(
                !truthcut::has_energetic_lepton(event, PDG_MUON, thresholds),
                Label::TrueMuon,
            ),
            Stage::TrueElectron => stop_unless(
                !truthcut::has_energetic_lepton(event, PDG_ELECTRON, thresholds),
                Label::TrueElectron,
            ),
            Stage::SortByTrueProtons { cap: max } => {
                Verdict::Stop(Label::TrueProtons(cap(self.hadrons().protons, max)))
            }
            Stage::SortByTruePhotons { cap: max } => {
                Verdict::Stop(Label::TruePhotons(cap(self.true_photons().len(), max)))
            }
            Stage::GroupByTruePhotons { cap: max } => {
                self.group = Some(cap(self.true_photons().len(), max));
                Verdict::Continue
            }
            Stage::GroupByRecoPhotons { cap: max } => {
                self.group = Some(cap(self.reco_photons().len(), max));
                Verdict::Continue
            }
            Stage::Record(label) => {
                let value = self.fill_value()?;
                self.push_fill(label, value);
                Verdict::Continue
            }
            Stage::RecoVertex => stop_unless(recocut::vertex_found(event), Label::NoVertex),
            Stage::RecoFiducial => stop_unless(
                recocut::vertex_in_fiducial(event, &cfg.detector, self.fiducial_width()),
                Label::RecoOutsideFiducial,
            ),
            Stage::RecoChargedCurrent => stop_unless(
                !recocut::has_charged_lepton(event),
                Label::RecoChargedCurrent,
            ),
            Stage::RecoMuon => {
                stop_unless(!recocut::has_primary_muon(event, thresholds), Label::RecoMuon)
            }
            Stage::RecoElectron => stop_unless(
                !recocut::has_primary_electron(event, thresholds),
                Label::RecoElectron,
            ),
            Stage::RecoPion(cut) => {
                let energy_min = cut.energy_min(thresholds.reco_pion_energy_min, thresholds);
                stop_unless(!recocut::has_charged_pion(event, energy_min), Label::RecoPion)
            }
            Stage::RecoProtons(RecoProtonRule::SingleMatched) => {
                let true_ids = truthcut::true_proton_track_ids(event, thresholds);
                match recocut::match_proton(event, thresholds, &true_ids) {
                    ProtonMatch::Matched => Verdict::Continue,
                    ProtonMatch::Wrong => Verdict::Stop(Label::WrongRecoProton),
                    ProtonMatch::None => Verdict::Stop(Label::NoRecoProton),
                    ProtonMatch::Multiple => Verdict::Stop(Label::MultipleRecoProtons),
                }
            }
            Stage::RecoProtons(RecoProtonRule::AtMost { max, cut }) => {
                let energy_min = cut.energy_min(thresholds.reco_proton_energy_min, thresholds);
                stop_unless(
                    recocut::reco_protons(event, energy_min).len() <= max,
                    Label::MultipleRecoProtons,
                )
            }
            Stage::RecoPhotonsPresent => {
                stop_unless(!self.reco_photons().is_empty(), Label::NoRecoPhotons)
            }
            Stage::RecoPhotonCount { cap: max } => {
                let count = cap(self.reco_photons().len(), max);
                stop_unless(self.group == Some(count), Label::RecoPhotons(count))
            }
            Stage::ShowerCharge => stop_unless(
                recocut::showers_neutral(event, self.reco_photons(), thresholds),
                Label::ShowerFromCharge,
            ),
            Stage::PrimaryScore => stop_unless(
                recocut::photons_primary(event, self.reco_photons(), thresholds),
                Label::PrimaryScore,
            ),
            Stage::LongTracks => stop_unless(
                !recocut::has_long_track(event, self.reco_photons(), thresholds),
                Label::LongTrack,
            ),
            Stage::ShowerCompleteness => stop_unless(
                recocut::showers_complete(event, self.reco_photons(), thresholds),
                Label::ShowerCompleteness,
            ),
            Stage::MuonCompleteness => stop_unless(
                recocut::muons_complete(event, thresholds),
                Label::MuonCompleteness,
            ),
            Stage::PhotonMatching => {
                let truth = self.true_photons();
                let reco = self.reco_photons();
                let matched = recocut::count_matched_photons(truth, reco);
                let photon_fills = match self.selector.spec.photon_fill {
                    Some(quantity) => truth
                        .iter()
                        .flat_map(|photon| {
                            let value = match quantity {
                                PhotonQuantity::Energy => photon.energy,
                                PhotonQuantity::DepositDistance => photon.deposit_distance(),
                            };
                            let outcome = if recocut::is_matched(photon, reco) {
                                Label::PhotonReconstructed
                            } else {
                                Label::PhotonNotReconstructed
                            };
                            [(Label::PhotonAll, value), (outcome, value)]
                        })
                        .collect::<Vec<_>>(),
                    None => Vec::new(),
                };
                for (label, value) in photon_fills {
                    self.push_fill(label, value);
                }
                Verdict::Stop(Label::PhotonsMatched(cap(matched, u8::MAX)))
            }
        };
        Ok(verdict)
    }
}

/// Cap a multiplicity, so that e.g. "3" stands for "3 or more"
fn cap(count: usize, max: u8) -> u8 {
    u8::try_from(count).map_or(max, |count| count.min(max))
}

/// Highest of a set of energies
fn leading(energies: impl Iterator<Item = Float>) -> Option<Float> {
    energies.fold(None, |max, energy| match max {
        Some(max) if max >= energy => Some(max),
        _ => Some(energy),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{testing::*, Interaction, PDG_PHOTON, PDG_PI_PLUS, PDG_PROTON},
        kinematics::Position,
        variant::VariantName,
    };
    use approx::assert_relative_eq;

    fn config(variant: VariantName) -> Configuration {
        Configuration::for_tests(variant)
    }

    fn classify(variant: VariantName, event: &Event) -> Classification {
        let cfg = config(variant);
        let selector = Selector::new(&cfg);
        selector.classify(event).unwrap()
    }

    fn terminal_fill(classification: &Classification) -> Option<Float> {
        classification
            .fills
            .iter()
            .find(|fill| fill.label == classification.label)
            .map(|fill| fill.value)
    }

    #[test]
    fn signal_event_has_both_photons_matched() {
        let result = classify(VariantName::OneProtonTwoPhoton, &signal_event());
        assert_eq!(result.label, Label::PhotonsMatched(2));
        assert_eq!(terminal_fill(&result), Some(400.));
        assert_eq!(result.weight, 0.8);
        assert!(!result.flagged);

        // The true signal histogram and the per-photon histograms got filled
        let labels = result.fills.iter().map(|f| f.label).collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![
                Label::TrueSignal,
                Label::PhotonAll,
                Label::PhotonReconstructed,
                Label::PhotonAll,
                Label::PhotonReconstructed,
                Label::PhotonsMatched(2),
            ]
        );
        assert_eq!(result.fills[1].value, 200.);
        assert_eq!(result.fills[3].value, 400.);
    }

    #[test]
    fn missing_vertex_is_its_own_bucket() {
        let mut event = signal_event();
        event.vertex = None;
        let result = classify(VariantName::OneProtonTwoPhoton, &event);
        assert_eq!(result.label, Label::NoVertex);
        assert_eq!(terminal_fill(&result), Some(400.));
        assert_eq!(result.weight, 0.8);
    }

    #[test]
    fn non_fiducial_vertex_fails_whatever_the_rest() {
        let mut event = signal_event();
        event.true_vertex = Position::new(5., 0., 500.);
        for variant in [
            VariantName::OneProtonTwoPhoton,
            VariantName::PhotonDepositEfficiency,
            VariantName::ProtonMultiplicity,
            VariantName::PhotonProton,
            VariantName::RecoEfficiency,
        ] {
            let result = classify(variant, &event);
            assert_eq!(result.label, Label::TrueOutsideFiducial, "{variant:?}");
        }
    }

    #[test]
    fn charged_current_never_reaches_signal_buckets() {
        let mut event = signal_event();
        event.interaction = Interaction::ChargedCurrent;
        for variant in [
            VariantName::OneProtonTwoPhoton,
            VariantName::PhotonDepositEfficiency,
            VariantName::ProtonMultiplicity,
            VariantName::PhotonMultiplicity,
            VariantName::PhotonProton,
            VariantName::RecoEfficiency,
        ] {
            let result = classify(variant, &event);
            assert_eq!(result.label, Label::TrueChargedCurrent, "{variant:?}");
            assert!(result.fills.is_empty(), "{variant:?}");
        }
    }

    #[test]
    fn reco_buckets_follow_stage_order() {
        // Reconstruction both misplaces the vertex and finds a pion: the
        // fiducial cut comes first
        let mut event = signal_event();
        event.vertex = Some(Position::new(3., 0., 518.));
        event.tracks.push(track(PDG_PI_PLUS, 100., 8));
        let result = classify(VariantName::OneProtonTwoPhoton, &event);
        assert_eq!(result.label, Label::RecoOutsideFiducial);

        event.vertex = signal_event().vertex;
        assert_eq!(
            classify(VariantName::OneProtonTwoPhoton, &event).label,
            Label::RecoPion
        );
    }

    #[test]
    fn reco_proton_buckets() {
        let mut event = signal_event();
        event.tracks[0].true_track_id = 3;
        assert_eq!(
            classify(VariantName::OneProtonTwoPhoton, &event).label,
            Label::WrongRecoProton
        );
        event.tracks.push(track(PDG_PROTON, 200., 2));
        assert_eq!(
            classify(VariantName::OneProtonTwoPhoton, &event).label,
            Label::MultipleRecoProtons
        );
        event.tracks.clear();
        assert_eq!(
            classify(VariantName::OneProtonTwoPhoton, &event).label,
            Label::NoRecoProton
        );
    }

    #[test]
    fn partially_reconstructed_photons() {
        let mut event = signal_event();
        event.showers[1].pid = 11;
        event.showers[1].is_secondary = true;
        let result = classify(VariantName::OneProtonTwoPhoton, &event);
        assert_eq!(result.label, Label::PhotonsMatched(1));
        assert!(result
            .fills
            .iter()
            .any(|f| f.label == Label::PhotonNotReconstructed && f.value == 400.));

        event.showers.clear();
        let result = classify(VariantName::OneProtonTwoPhoton, &event);
        assert_eq!(result.label, Label::PhotonsMatched(0));
    }

    #[test]
    fn fixed_charged_current_veto_sees_electron_showers() {
        let mut event = signal_event();
        event.showers.push(shower(-11, 120., 12));
        assert_eq!(
            classify(VariantName::OneProtonTwoPhoton, &event).label,
            Label::RecoChargedCurrent
        );
    }

    #[test]
    fn deposit_efficiency_fills_distances() {
        let result = classify(VariantName::PhotonDepositEfficiency, &signal_event());
        assert_eq!(result.label, Label::PhotonsMatched(2));
        let distances = result
            .fills
            .iter()
            .filter(|f| f.label == Label::PhotonAll)
            .map(|f| f.value)
            .collect::<Vec<_>>();
        assert_eq!(distances.len(), 2);
        assert_relative_eq!(distances[0], (10f64.powi(2) + 42f64.powi(2)).sqrt() as Float);
    }

    #[test]
    fn truth_selection_shared_between_photon_variants() {
        // A third prompt photon breaks the two photon signal definition for
        // both variants built on it
        let mut event = signal_event();
        let vertex = event.true_vertex;
        event.sim_particles.push(sim(PDG_PHOTON, 30, 29, 0., 20., vertex));
        for variant in [
            VariantName::OneProtonTwoPhoton,
            VariantName::PhotonDepositEfficiency,
        ] {
            assert_eq!(classify(variant, &event).label, Label::TruePhotons(3));
        }
    }

    #[test]
    fn proton_multiplicity_sorting() {
        let mut event = signal_event();
        let result = classify(VariantName::ProtonMultiplicity, &event);
        assert_eq!(result.label, Label::TrueProtons(1));
        let labels = result.fills.iter().map(|f| f.label).collect::<Vec<_>>();
        assert_eq!(labels, vec![Label::Total, Label::TrueProtons(1)]);
        assert_relative_eq!(result.fills[0].value, 1.25);

        for _ in 0..4 {
            event.primaries.push(primary(PDG_PROTON, PROTON_MASS, 100.));
        }
        assert_eq!(
            classify(VariantName::ProtonMultiplicity, &event).label,
            Label::TrueProtons(4)
        );
    }

    #[test]
    fn meson_shortcut_stands_for_photons() {
        let mut event = signal_event();
        event.sim_particles.retain(|p| p.pdg != PDG_PHOTON);
        assert_eq!(
            classify(VariantName::PhotonProton, &event).label,
            Label::Selected
        );
        // Without the shortcut, enumeration finds no photon
        assert_eq!(
            classify(VariantName::PhotonMultiplicity, &event).label,
            Label::TruePhotons(0)
        );

        let mut cfg = config(VariantName::PhotonProton);
        cfg.thresholds.neutral_meson_shortcut = false;
        let result = Selector::new(&cfg).classify(&event).unwrap();
        assert_eq!(result.label, Label::TruePhotons(0));
    }

    #[test]
    fn photon_multiplicity_sorting() {
        let result = classify(VariantName::PhotonMultiplicity, &signal_event());
        assert_eq!(result.label, Label::TruePhotons(2));
        assert_relative_eq!(terminal_fill(&result).unwrap(), 1.25);

        let mut event = signal_event();
        event.vertex = None;
        let result = classify(VariantName::PhotonMultiplicity, &event);
        assert_eq!(result.label, Label::NoVertex);
        assert!(result.fills.is_empty());
    }

    #[test]
    fn neutrino_energy_selects_everything() {
        let mut event = signal_event();
        event.interaction = Interaction::ChargedCurrent;
        event.vertex = None;
        let result = classify(VariantName::NeutrinoEnergy, &event);
        assert_eq!(result.label, Label::Selected);
        assert_relative_eq!(terminal_fill(&result).unwrap(), 1.25);
    }

    #[test]
    fn reco_purity_groups_by_reco_photons() {
        let result = classify(VariantName::RecoPurity, &signal_event());
        assert_eq!(result.group, Some(2));
        assert_eq!(result.label, Label::TruePhotons(2));
        assert_relative_eq!(terminal_fill(&result).unwrap(), 0.385);
    }

    #[test]
    fn reco_purity_flags_true_muons() {
        let mut event = signal_event();
        let vertex = event.true_vertex;
        event.sim_particles.push(sim(13, 40, 40, MUON_MASS, 250., vertex));
        let result = classify(VariantName::RecoPurity, &event);
        assert_eq!(result.label, Label::TrueMuon);
        assert!(result.flagged);
    }

    #[test]
    fn reco_purity_stops_silently_without_photons() {
        let mut event = signal_event();
        event.vertex = None;
        event.showers.clear();
        let result = classify(VariantName::RecoPurity, &event);
        assert_eq!(result.label, Label::NoVertex);
        assert_eq!(result.group, None);
        assert!(result.fills.is_empty());
    }

    #[test]
    fn reco_efficiency_compares_photon_counts() {
        let result = classify(VariantName::RecoEfficiency, &signal_event());
        assert_eq!(result.label, Label::Selected);
        assert_eq!(result.group, Some(2));
        assert_eq!(result.fills[0].label, Label::Total);
        assert_relative_eq!(result.fills[0].value, 0.4);

        let mut event = signal_event();
        event.showers.pop();
        let result = classify(VariantName::RecoEfficiency, &event);
        assert_eq!(result.label, Label::RecoPhotons(1));
        assert_eq!(result.group, Some(2));
    }

    #[test]
    fn proton_without_true_track_is_wrong() {
        // The truth has no simulated proton track to match the reconstructed
        // proton with
        let mut event = signal_event();
        event.sim_particles.retain(|p| p.pdg != PDG_PROTON);
        let result = classify(VariantName::OneProtonTwoPhoton, &event);
        assert_eq!(result.label, Label::WrongRecoProton);
        assert_eq!(result.fills[0].label, Label::TrueSignal);
        assert_eq!(terminal_fill(&result), Some(400.));
    }

    #[test]
    fn reco_scraper_counts_soft_pions_and_protons() {
        let mut event = signal_event();
        event.tracks.push(track(PDG_PI_PLUS, 20., 60));
        let result = classify(VariantName::RecoPurity, &event);
        assert_eq!(result.label, Label::RecoPion);
        let result = classify(VariantName::RecoEfficiency, &event);
        assert_eq!(result.label, Label::RecoPion);

        // The 1p2g selection keeps its own pion threshold
        let result = classify(VariantName::OneProtonTwoPhoton, &event);
        assert_eq!(result.label, Label::PhotonsMatched(2));

        let mut event = signal_event();
        event.tracks.push(track(PDG_PROTON, 40., 61));
        let result = classify(VariantName::RecoPurity, &event);
        assert_eq!(result.label, Label::MultipleRecoProtons);
    }

    #[test]
    fn capped_counts() {
        assert_eq!(cap(0, 3), 0);
        assert_eq!(cap(2, 3), 2);
        assert_eq!(cap(7, 3), 3);
        assert_eq!(cap(1000, u8::MAX), u8::MAX);
        assert_eq!(leading([200., 400., 300.].into_iter()), Some(400.));
        assert_eq!(leading(std::iter::empty()), None);
    }
}
