//! Analysis variants
//!
//! Every variant is a static configuration of the classification pipeline:
//! which stages run in which order, what gets histogrammed, and where the
//! results go by default. All variants share the cut library.

use crate::{
    numeric::{Float, MEV_PER_GEV},
    pipeline::{
        Label,
        Multiplicity::{AtLeast, AtMost, Exactly},
        EnergyCut, RecoProtonRule, Stage,
    },
    recocut::RecoPhotonRule,
};
use clap::ValueEnum;

/// Name of an analysis variant, as selected on the command line
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum VariantName {
    /// NC 1 proton 2 photon truth selection, followed by the reconstruction
    /// cuts and photon truth-matching
    OneProtonTwoPhoton,

    /// Photon reconstruction efficiency versus deposit distance
    PhotonDepositEfficiency,

    /// NC events with photons, sorted by true proton count
    ProtonMultiplicity,

    /// NC events with protons, sorted by true photon count
    PhotonMultiplicity,

    /// NC events with at least one photon and one proton
    PhotonProton,

    /// True neutrino energy of every event
    NeutrinoEnergy,

    /// Truth content of the events passing the reconstructed selection
    RecoPurity,

    /// Fate of true signal events in the reconstructed selection
    RecoEfficiency,
}
//
impl VariantName {
    /// Static configuration of this variant
    pub fn spec(self) -> &'static VariantSpec {
        match self {
            Self::OneProtonTwoPhoton => &ONE_PROTON_TWO_PHOTON,
            Self::PhotonDepositEfficiency => &PHOTON_DEPOSIT_EFFICIENCY,
            Self::ProtonMultiplicity => &PROTON_MULTIPLICITY,
            Self::PhotonMultiplicity => &PHOTON_MULTIPLICITY,
            Self::PhotonProton => &PHOTON_PROTON,
            Self::NeutrinoEnergy => &NEUTRINO_ENERGY,
            Self::RecoPurity => &RECO_PURITY,
            Self::RecoEfficiency => &RECO_EFFICIENCY,
        }
    }
}

/// Unit of a histogrammed energy
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Unit {
    MeV,
    GeV,
}
//
impl Unit {
    /// Express an energy (MeV) in this unit
    pub fn scale(self, mev: Float) -> Float {
        match self {
            Self::MeV => mev,
            Self::GeV => mev / MEV_PER_GEV,
        }
    }
}

/// What an event's histogram fills are made of
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FillSource {
    LeadingTruePhoton,
    LeadingRecoPhoton,
    NeutrinoEnergy,
}

/// Per-event fill quantity
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FillQuantity {
    pub source: FillSource,
    pub unit: Unit,
}

/// Per-photon fill quantity of the photon matching stage
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhotonQuantity {
    /// Photon energy (MeV)
    Energy,

    /// Distance from the photon's creation point to its first deposit (cm)
    DepositDistance,
}

/// Binning shared by the histograms of a variant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binning {
    pub axis: &'static str,
    pub bins: usize,
    pub low: Float,
    pub high: Float,
}

/// Histogram of a variant, and which events go into it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramDef {
    pub name: &'static str,
    pub title: &'static str,
    pub label: Label,

    /// Multiplicity group of the events, `None` meaning any group
    pub group: Option<u8>,
}

/// Bin-by-bin ratio of two histograms of a variant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioDef {
    pub name: &'static str,
    pub title: &'static str,
    pub numerator: &'static str,
    pub denominator: &'static str,
}

/// Static configuration of an analysis variant
#[derive(Debug)]
pub struct VariantSpec {
    /// Name, as used on the command line
    pub name: &'static str,

    /// Result file when none is specified
    pub default_outfile: &'static str,

    /// Selection stages, in order
    pub stages: &'static [Stage],

    /// Per-event fill quantity
    pub fill: FillQuantity,

    /// Per-photon fill quantity, if the photon matching stage fills
    /// per-photon histograms
    pub photon_fill: Option<PhotonQuantity>,

    /// Which reconstructed objects are photon candidates
    pub reco_photons: RecoPhotonRule,

    /// Use the wide fiducial margin rather than the standard one
    pub wide_fiducial: bool,

    pub binning: Binning,
    pub histograms: &'static [HistogramDef],
    pub ratios: &'static [RatioDef],

    /// Label of the events which get logged to a side file, and default
    /// location of that file
    pub diagnostic: Option<(Label, &'static str)>,
}
//
impl VariantSpec {
    /// Index of the histogram that events with a given label and group go to
    pub fn histogram(&self, label: Label, group: Option<u8>) -> Option<usize> {
        self.histograms.iter().position(|def| {
            def.label == label && def.group.map_or(true, |expected| group == Some(expected))
        })
    }

    /// Index of a histogram by name
    pub fn histogram_named(&self, name: &str) -> Option<usize> {
        self.histograms.iter().position(|def| def.name == name)
    }
}

const fn hist(name: &'static str, title: &'static str, label: Label) -> HistogramDef {
    HistogramDef {
        name,
        title,
        label,
        group: None,
    }
}

const fn grouped(
    name: &'static str,
    title: &'static str,
    label: Label,
    group: u8,
) -> HistogramDef {
    HistogramDef {
        name,
        title,
        label,
        group: Some(group),
    }
}

const NU_ENERGY: FillQuantity = FillQuantity {
    source: FillSource::NeutrinoEnergy,
    unit: Unit::GeV,
};

const NU_ENERGY_AXIS: &str = "true neutrino energy (GeV)";

/// Truth definition of the NC 1 proton 2 photon signal
const ONE_PROTON_TWO_PHOTON_TRUTH: [Stage; 6] = [
    Stage::TrueNeutralCurrent,
    Stage::TrueFiducial,
    Stage::TrueCosmic,
    Stage::TrueHadrons(Exactly(1)),
    Stage::TruePhotons {
        count: Exactly(2),
        meson_shortcut: false,
    },
    Stage::TrueDeposits,
];

static ONE_PROTON_TWO_PHOTON: VariantSpec = VariantSpec {
    name: "one-proton-two-photon",
    default_outfile: "1p2gRecoTID805NoSTC.json",
    stages: &[
        ONE_PROTON_TWO_PHOTON_TRUTH[0],
        ONE_PROTON_TWO_PHOTON_TRUTH[1],
        ONE_PROTON_TWO_PHOTON_TRUTH[2],
        ONE_PROTON_TWO_PHOTON_TRUTH[3],
        ONE_PROTON_TWO_PHOTON_TRUTH[4],
        ONE_PROTON_TWO_PHOTON_TRUTH[5],
        Stage::Record(Label::TrueSignal),
        Stage::RecoVertex,
        Stage::RecoFiducial,
        Stage::RecoChargedCurrent,
        Stage::RecoPion(EnergyCut::Dedicated),
        Stage::RecoProtons(RecoProtonRule::SingleMatched),
        Stage::PhotonMatching,
    ],
    fill: FillQuantity {
        source: FillSource::LeadingTruePhoton,
        unit: Unit::MeV,
    },
    photon_fill: Some(PhotonQuantity::Energy),
    reco_photons: RecoPhotonRule {
        include_tracks: false,
        require_fiducial: false,
    },
    wide_fiducial: false,
    binning: Binning {
        axis: "leading photon energy (MeV)",
        bins: 60,
        low: 0.,
        high: 1500.,
    },
    histograms: &[
        hist("trueSignalHist", "True NC 1 proton 2 gamma Events", Label::TrueSignal),
        hist("No Vertex Found", "Reco couldn't find a vertex", Label::NoVertex),
        hist(
            "Outside Fiducial",
            "Reco placed vertex outside fiducial volume",
            Label::RecoOutsideFiducial,
        ),
        hist(
            "Charged Current",
            "Reco identified as charged-current",
            Label::RecoChargedCurrent,
        ),
        hist("pi+", "Reco found a pi+", Label::RecoPion),
        hist("No Protons", "Reco found no protons", Label::NoRecoProton),
        hist(
            "Multiple Protons",
            "Reco found multiple protons",
            Label::MultipleRecoProtons,
        ),
        hist(
            "1 Wrong Proton",
            "Reco found 1 proton but failed TID matching",
            Label::WrongRecoProton,
        ),
        hist(
            "No Photons",
            "Neither true photon was TID-matched in reco",
            Label::PhotonsMatched(0),
        ),
        hist(
            "One Photon",
            "One true photon was TID-matched in reco",
            Label::PhotonsMatched(1),
        ),
        hist(
            "Reco = True",
            "Both true photons TID-matched in reco",
            Label::PhotonsMatched(2),
        ),
        hist(
            "reco reconstructed the photon",
            "Photon was TID-matched in Reco",
            Label::PhotonReconstructed,
        ),
        hist(
            "reco didn't reconstruct the photon",
            "Photon not TID-matched in Reco",
            Label::PhotonNotReconstructed,
        ),
    ],
    ratios: &[],
    diagnostic: None,
};

static PHOTON_DEPOSIT_EFFICIENCY: VariantSpec = VariantSpec {
    name: "photon-deposit-efficiency",
    default_outfile: "1p2gRecoTIDMatchEDep722.json",
    stages: &[
        ONE_PROTON_TWO_PHOTON_TRUTH[0],
        ONE_PROTON_TWO_PHOTON_TRUTH[1],
        ONE_PROTON_TWO_PHOTON_TRUTH[2],
        ONE_PROTON_TWO_PHOTON_TRUTH[3],
        ONE_PROTON_TWO_PHOTON_TRUTH[4],
        ONE_PROTON_TWO_PHOTON_TRUTH[5],
        Stage::RecoVertex,
        Stage::RecoFiducial,
        Stage::RecoChargedCurrent,
        Stage::RecoPion(EnergyCut::Dedicated),
        Stage::RecoProtons(RecoProtonRule::SingleMatched),
        Stage::PhotonMatching,
    ],
    fill: FillQuantity {
        source: FillSource::LeadingTruePhoton,
        unit: Unit::MeV,
    },
    photon_fill: Some(PhotonQuantity::DepositDistance),
    reco_photons: RecoPhotonRule {
        include_tracks: false,
        require_fiducial: false,
    },
    wide_fiducial: false,
    binning: Binning {
        axis: "deposit to creation point distance (cm)",
        bins: 60,
        low: 0.,
        high: 200.,
    },
    histograms: &[
        hist(
            "True EDep Dist of all Photons",
            "EDep-Vtx Distance of all True Photons",
            Label::PhotonAll,
        ),
        hist(
            "reco reconstructed the photon",
            "Photon was TID-matched in Reco",
            Label::PhotonReconstructed,
        ),
        hist(
            "reco didn't reconstruct the photon",
            "Photon not TID-matched in Reco",
            Label::PhotonNotReconstructed,
        ),
    ],
    ratios: &[RatioDef {
        name: "Photon Reconstruction Efficiency",
        title: "Efficiency of photon reconstruction as a function of EDep-Vtx Distance",
        numerator: "reco reconstructed the photon",
        denominator: "True EDep Dist of all Photons",
    }],
    diagnostic: None,
};

static PROTON_MULTIPLICITY: VariantSpec = VariantSpec {
    name: "proton-multiplicity",
    default_outfile: "NpNgSorter.json",
    stages: &[
        Stage::TrueNeutralCurrent,
        Stage::TrueFiducial,
        Stage::TrueCosmic,
        Stage::TrueHadrons(AtLeast(1)),
        Stage::TruePhotons {
            count: AtLeast(1),
            meson_shortcut: true,
        },
        Stage::Record(Label::Total),
        Stage::SortByTrueProtons { cap: 4 },
    ],
    fill: NU_ENERGY,
    photon_fill: None,
    reco_photons: RecoPhotonRule {
        include_tracks: false,
        require_fiducial: false,
    },
    wide_fiducial: false,
    binning: Binning {
        axis: NU_ENERGY_AXIS,
        bins: 60,
        low: 0.,
        high: 6.,
    },
    histograms: &[
        hist(
            "nProton_nGammaHist",
            "Energy of NC events with N photon(s) and N proton(s)",
            Label::Total,
        ),
        hist(
            "1Proton_nGammaHist",
            "Energy of NC events with N photon(s) and 1 proton",
            Label::TrueProtons(1),
        ),
        hist(
            "2Proton_nGammaHist",
            "Energy of NC events with N photon(s) and 2 protons",
            Label::TrueProtons(2),
        ),
        hist(
            "3Proton_nGammaHist",
            "Energy of NC events with N photon(s) and 3 protons",
            Label::TrueProtons(3),
        ),
        hist(
            "manyProton_nGammaHist",
            "Energy of NC events with N photon(s) and >3 protons",
            Label::TrueProtons(4),
        ),
    ],
    ratios: &[],
    diagnostic: None,
};

static PHOTON_MULTIPLICITY: VariantSpec = VariantSpec {
    name: "photon-multiplicity",
    default_outfile: "NpNgOutput.json",
    stages: &[
        Stage::RecoVertex,
        Stage::TrueFiducial,
        Stage::TrueCosmic,
        Stage::TrueNeutralCurrent,
        Stage::TruePhotons {
            count: AtLeast(1),
            meson_shortcut: false,
        },
        Stage::TrueHadrons(AtLeast(1)),
        Stage::SortByTruePhotons { cap: 3 },
    ],
    fill: NU_ENERGY,
    photon_fill: None,
    reco_photons: RecoPhotonRule {
        include_tracks: false,
        require_fiducial: false,
    },
    wide_fiducial: false,
    binning: Binning {
        axis: NU_ENERGY_AXIS,
        bins: 24,
        low: 0.,
        high: 6.,
    },
    histograms: &[
        hist(
            "1Photon_nProtonHist",
            "Energy of NC events with N proton(s) and 1 photon",
            Label::TruePhotons(1),
        ),
        hist(
            "2Photon_nProtonHist",
            "Energy of NC events with N proton(s) and 2 photons",
            Label::TruePhotons(2),
        ),
        hist(
            "3Photon_nProtonHist",
            "Energy of NC events with N proton(s) and 3+ photons",
            Label::TruePhotons(3),
        ),
    ],
    ratios: &[],
    diagnostic: None,
};

static PHOTON_PROTON: VariantSpec = VariantSpec {
    name: "photon-proton",
    default_outfile: "photonProtonSorter.json",
    stages: &[
        Stage::TrueNeutralCurrent,
        Stage::TrueFiducial,
        Stage::TrueCosmic,
        Stage::TruePhotons {
            count: AtLeast(1),
            meson_shortcut: true,
        },
        Stage::TrueHadrons(AtLeast(1)),
    ],
    fill: NU_ENERGY,
    photon_fill: None,
    reco_photons: RecoPhotonRule {
        include_tracks: false,
        require_fiducial: false,
    },
    wide_fiducial: false,
    binning: Binning {
        axis: NU_ENERGY_AXIS,
        bins: 60,
        low: 0.,
        high: 6.,
    },
    histograms: &[hist(
        "twoPhotonHist",
        "Energy of NC events with photons and protons",
        Label::Selected,
    )],
    ratios: &[],
    diagnostic: None,
};

static NEUTRINO_ENERGY: VariantSpec = VariantSpec {
    name: "neutrino-energy",
    default_outfile: "example_ntuple_analysis_script_output.json",
    stages: &[],
    fill: NU_ENERGY,
    photon_fill: None,
    reco_photons: RecoPhotonRule {
        include_tracks: false,
        require_fiducial: false,
    },
    wide_fiducial: false,
    binning: Binning {
        axis: "energy (GeV)",
        bins: 30,
        low: 0.,
        high: 6.,
    },
    histograms: &[hist("h_trueNuE", "True Neutrino Energy", Label::Selected)],
    ratios: &[],
    diagnostic: None,
};

/// Reconstructed photon candidates of the reconstruction-driven selections
const FIDUCIAL_SHOWERS_AND_TRACKS: RecoPhotonRule = RecoPhotonRule {
    include_tracks: true,
    require_fiducial: true,
};

const RECO_ENERGY: Binning = Binning {
    axis: "leading photon energy (GeV)",
    bins: 60,
    low: 0.,
    high: 2.,
};

static RECO_PURITY: VariantSpec = VariantSpec {
    name: "reco-purity",
    default_outfile: "muonScraper.json",
    stages: &[
        Stage::RecoVertex,
        Stage::RecoMuon,
        Stage::RecoElectron,
        Stage::TrueCosmic,
        Stage::RecoFiducial,
        Stage::RecoPion(EnergyCut::Classification),
        Stage::RecoProtons(RecoProtonRule::AtMost {
            max: 1,
            cut: EnergyCut::Classification,
        }),
        Stage::RecoPhotonsPresent,
        Stage::ShowerCharge,
        Stage::PrimaryScore,
        Stage::LongTracks,
        Stage::MuonCompleteness,
        Stage::GroupByRecoPhotons { cap: 3 },
        Stage::TrueMuon,
        Stage::TrueElectron,
        Stage::TrueFiducial,
        Stage::TrueHadrons(AtMost(1)),
        Stage::SortByTruePhotons { cap: 3 },
    ],
    fill: FillQuantity {
        source: FillSource::LeadingRecoPhoton,
        unit: Unit::GeV,
    },
    photon_fill: None,
    reco_photons: FIDUCIAL_SHOWERS_AND_TRACKS,
    wide_fiducial: true,
    binning: RECO_ENERGY,
    histograms: &[
        grouped("PSignal1", "Signal", Label::TruePhotons(1), 1),
        grouped("PMuon1", "Over-threshold Muon", Label::TrueMuon, 1),
        grouped("PElectron1", "Over-threshold Electron", Label::TrueElectron, 1),
        grouped("PFiducial1", "Out of Fiducial", Label::TrueOutsideFiducial, 1),
        grouped("PPionProton1", "Charged Pion or Proton", Label::TrueProtonPion, 1),
        grouped("PNoPhoton1", "No Real Photons", Label::TruePhotons(0), 1),
        grouped("PTwoPhoton1", "2 Real Photons", Label::TruePhotons(2), 1),
        grouped("PMorePhoton1", "3+ Real Photons", Label::TruePhotons(3), 1),
        grouped("PSignal2", "Signal", Label::TruePhotons(2), 2),
        grouped("PMuon2", "Over-threshold Muon", Label::TrueMuon, 2),
        grouped("PElectron2", "Over-threshold Electron", Label::TrueElectron, 2),
        grouped("PFiducial2", "Out of Fiducial", Label::TrueOutsideFiducial, 2),
        grouped("PPionProton2", "Charged Pion or Proton", Label::TrueProtonPion, 2),
        grouped("PNoPhoton2", "No Real Photons", Label::TruePhotons(0), 2),
        grouped("POnePhoton2", "1 Real Photon", Label::TruePhotons(1), 2),
        grouped("PManyPhoton2", "3+ Real Photons", Label::TruePhotons(3), 2),
        grouped("PSignal3", "Signal", Label::TruePhotons(3), 3),
        grouped("PMuon3", "Over-threshold Muon", Label::TrueMuon, 3),
        grouped("PElectron3", "Over-threshold Electron", Label::TrueElectron, 3),
        grouped("PFiducial3", "Out of Fiducial", Label::TrueOutsideFiducial, 3),
        grouped("PPionProton3", "Charged Pion or Proton", Label::TrueProtonPion, 3),
        grouped("PNoPhoton3", "No Real Photons", Label::TruePhotons(0), 3),
        grouped("POnePhoton3", "1 Real Photon", Label::TruePhotons(1), 3),
        grouped("PTwoPhoton3", "2 Real Photons", Label::TruePhotons(2), 3),
    ],
    ratios: &[],
    diagnostic: Some((Label::TrueMuon, "MuonFile.txt")),
};

static RECO_EFFICIENCY: VariantSpec = VariantSpec {
    name: "reco-efficiency",
    default_outfile: "muonScraperEfficiency.json",
    stages: &[
        Stage::TrueNeutralCurrent,
        Stage::TrueFiducial,
        Stage::TrueCosmic,
        Stage::TrueHadrons(AtMost(1)),
        Stage::TruePhotons {
            count: AtLeast(1),
            meson_shortcut: false,
        },
        Stage::GroupByTruePhotons { cap: 3 },
        Stage::Record(Label::Total),
        Stage::RecoVertex,
        Stage::RecoMuon,
        Stage::RecoElectron,
        Stage::RecoFiducial,
        Stage::RecoPion(EnergyCut::Classification),
        Stage::RecoProtons(RecoProtonRule::AtMost {
            max: 1,
            cut: EnergyCut::Classification,
        }),
        Stage::ShowerCharge,
        Stage::RecoPhotonsPresent,
        Stage::RecoPhotonCount { cap: 3 },
        Stage::PrimaryScore,
        Stage::LongTracks,
        Stage::ShowerCompleteness,
        Stage::MuonCompleteness,
    ],
    fill: FillQuantity {
        source: FillSource::LeadingTruePhoton,
        unit: Unit::GeV,
    },
    photon_fill: None,
    reco_photons: FIDUCIAL_SHOWERS_AND_TRACKS,
    wide_fiducial: true,
    binning: Binning {
        axis: "leading true photon energy (GeV)",
        ..RECO_ENERGY
    },
    histograms: &[
        grouped("effTotal1", "One Photon", Label::Total, 1),
        grouped("effNoVertex1", "No Vertex Found", Label::NoVertex, 1),
        grouped("effMuon1", "Muon False Positive", Label::RecoMuon, 1),
        grouped("effElectron1", "Electron False Positive", Label::RecoElectron, 1),
        grouped("effFiducial1", "Placed out of Fiducial", Label::RecoOutsideFiducial, 1),
        grouped("effPion1", "Pion False Positive", Label::RecoPion, 1),
        grouped("effProton1", "Proton False Positive", Label::MultipleRecoProtons, 1),
        grouped("effShowerCharge1", "Shower from Charged Cut", Label::ShowerFromCharge, 1),
        grouped("effNoPhotons1", "No Photons Found", Label::NoRecoPhotons, 1),
        grouped("effTwoPhotons1", "Two Photons Found", Label::RecoPhotons(2), 1),
        grouped("effManyPhotons1", "Many Photons Found", Label::RecoPhotons(3), 1),
        grouped("effPrimary1", "Primary Score Cut", Label::PrimaryScore, 1),
        grouped("effLongTracks1", "Tracks with length > 20 cm", Label::LongTrack, 1),
        grouped(
            "effCompleteness1",
            "Showers with completeness below 0.3",
            Label::ShowerCompleteness,
            1,
        ),
        grouped("effMuonComp1", "Muons with too-low Efficiency", Label::MuonCompleteness, 1),
        grouped("effSignal1", "Signal", Label::Selected, 1),
        grouped("effTotal2", "Two Photons", Label::Total, 2),
        grouped("effNoVertex2", "No Vertex Found", Label::NoVertex, 2),
        grouped("effMuon2", "Muon False Positive", Label::RecoMuon, 2),
        grouped("effElectron2", "Electron False Positive", Label::RecoElectron, 2),
        grouped("effFiducial2", "Placed out of Fiducial", Label::RecoOutsideFiducial, 2),
        grouped("effPion2", "Pion False Positive", Label::RecoPion, 2),
        grouped("effProton2", "Proton False Positive", Label::MultipleRecoProtons, 2),
        grouped("effShowerCharge2", "Shower from Charged Cut", Label::ShowerFromCharge, 2),
        grouped("effNoPhotons2", "No Photons Found", Label::NoRecoPhotons, 2),
        grouped("effOnePhoton2", "One Photon Found", Label::RecoPhotons(1), 2),
        grouped("effManyPhotons2", "Many Photons Found", Label::RecoPhotons(3), 2),
        grouped("effPrimary2", "Primary Score Cut", Label::PrimaryScore, 2),
        grouped("effLongTracks2", "Tracks with length > 20 cm", Label::LongTrack, 2),
        grouped(
            "effCompleteness2",
            "Showers with completeness below 0.3",
            Label::ShowerCompleteness,
            2,
        ),
        grouped("effMuonComp2", "Muons with too-low Efficiency", Label::MuonCompleteness, 2),
        grouped("effSignal2", "Signal", Label::Selected, 2),
        grouped("effTotal3", "3+ Photons", Label::Total, 3),
        grouped("effNoVertex3", "No Vertex Found", Label::NoVertex, 3),
        grouped("effMuon3", "Muon False Positive", Label::RecoMuon, 3),
        grouped("effElectron3", "Electron False Positive", Label::RecoElectron, 3),
        grouped("effFiducial3", "Placed out of Fiducial", Label::RecoOutsideFiducial, 3),
        grouped("effPion3", "Pion False Positive", Label::RecoPion, 3),
        grouped("effProton3", "Proton False Positive", Label::MultipleRecoProtons, 3),
        grouped("effShowerCharge3", "Shower from Charged Cut", Label::ShowerFromCharge, 3),
        grouped("effNoPhotons3", "No Photons Found", Label::NoRecoPhotons, 3),
        grouped("effOnePhoton3", "One Photon Found", Label::RecoPhotons(1), 3),
        grouped("effTwoPhotons3", "Two Photons Found", Label::RecoPhotons(2), 3),
        grouped("effPrimary3", "Primary Score Cut", Label::PrimaryScore, 3),
        grouped("effLongTracks3", "Tracks with length > 20 cm", Label::LongTrack, 3),
        grouped(
            "effCompleteness3",
            "Showers with completeness below 0.3",
            Label::ShowerCompleteness,
            3,
        ),
        grouped("effMuonComp3", "Muons with too-low Efficiency", Label::MuonCompleteness, 3),
        grouped("effSignal3", "Signal", Label::Selected, 3),
    ],
    ratios: &[
        RatioDef {
            name: "efficiency1",
            title: "Selection efficiency of one photon events",
            numerator: "effSignal1",
            denominator: "effTotal1",
        },
        RatioDef {
            name: "efficiency2",
            title: "Selection efficiency of two photon events",
            numerator: "effSignal2",
            denominator: "effTotal2",
        },
        RatioDef {
            name: "efficiency3",
            title: "Selection efficiency of 3+ photon events",
            numerator: "effSignal3",
            denominator: "effTotal3",
        },
    ],
    diagnostic: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_is_consistent() {
        for variant in VariantName::value_variants() {
            let spec = variant.spec();
            assert_eq!(
                variant.to_possible_value().unwrap().get_name(),
                spec.name,
                "{variant:?}"
            );
            assert!(spec.binning.bins > 0 && spec.binning.low < spec.binning.high);

            // Histogram names are unique, and ratios refer to existing ones
            for (idx, def) in spec.histograms.iter().enumerate() {
                assert_eq!(spec.histogram_named(def.name), Some(idx), "{}", def.name);
            }
            for ratio in spec.ratios {
                assert!(spec.histogram_named(ratio.numerator).is_some());
                assert!(spec.histogram_named(ratio.denominator).is_some());
            }

            // Grouped histograms only make sense if some stage sets a group
            let groups = spec.stages.iter().any(|stage| {
                matches!(
                    stage,
                    Stage::GroupByRecoPhotons { .. } | Stage::GroupByTruePhotons { .. }
                )
            });
            if !groups {
                assert!(spec.histograms.iter().all(|def| def.group.is_none()));
            }
        }
    }

    #[test]
    fn grouped_histogram_lookup() {
        let spec = VariantName::RecoPurity.spec();
        let signal2 = spec.histogram(Label::TruePhotons(2), Some(2)).unwrap();
        assert_eq!(spec.histograms[signal2].name, "PSignal2");
        let other = spec.histogram(Label::TruePhotons(2), Some(1)).unwrap();
        assert_eq!(spec.histograms[other].name, "PTwoPhoton1");
        assert_eq!(spec.histogram(Label::TruePhotons(2), None), None);
        assert_eq!(spec.histogram(Label::NoVertex, Some(2)), None);

        let spec = VariantName::OneProtonTwoPhoton.spec();
        assert_eq!(spec.histogram(Label::NoVertex, None), Some(1));
        assert_eq!(spec.histogram(Label::NoVertex, Some(3)), Some(1));
    }

    #[test]
    fn energy_units() {
        assert_eq!(Unit::MeV.scale(385.), 385.);
        assert_eq!(Unit::GeV.scale(1250.), 1.25);
    }

    #[test]
    fn efficiency_is_measured_against_the_true_photon() {
        let spec = VariantName::RecoEfficiency.spec();
        assert_eq!(
            spec.fill,
            FillQuantity {
                source: FillSource::LeadingTruePhoton,
                unit: Unit::GeV,
            }
        );
        assert!(spec.binning.axis.contains("true"));
        assert_eq!(VariantName::RecoPurity.spec().fill.source, FillSource::LeadingRecoPhoton);
    }
}
