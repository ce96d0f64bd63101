//! Mechanism for loading and sharing the analysis configuration

use crate::{kinematics::Position, numeric::Float, variant::VariantName, Result};

use clap::Parser;
use eyre::{bail, ensure, eyre, WrapErr};

use std::{fs, path::PathBuf, str::FromStr};

/// Classify the events of a neutrino ntuple and histogram the survivors
#[derive(Debug, Parser)]
#[command(name = "ncgamma_select", version)]
pub struct Cli {
    /// Input event store (EventTree and potTree of a BNB nu overlay ntuple)
    #[arg(short, long)]
    pub infile: PathBuf,

    /// Output result file [default: depends on the variant]
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// Event selection to run
    #[arg(long, value_enum, default_value_t = VariantName::OneProtonTwoPhoton)]
    pub variant: VariantName,

    /// Only consider fully contained events (reserved, no effect yet)
    #[arg(long = "fullyContained")]
    pub fully_contained: bool,

    /// Don't apply cosmic rejection cuts (reserved, no effect yet)
    #[arg(long = "noCosmicCuts")]
    pub no_cosmic_cuts: bool,

    /// File overriding the default cut thresholds
    #[arg(long)]
    pub cuts: Option<PathBuf>,

    /// Side file where flagged events get appended [default: depends on the
    /// variant]
    #[arg(long)]
    pub diagnostics: Option<PathBuf>,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: tracing::Level,
}

/// Analysis configuration
pub struct Configuration {
    /// Event store to be analyzed
    pub infile: PathBuf,

    /// Where the results go
    pub outfile: PathBuf,

    /// Where flagged events are logged, for variants that flag events
    pub diagnostics: Option<PathBuf>,

    /// Which event selection is run
    pub variant: VariantName,

    /// Cut values
    pub thresholds: CutThresholds,

    /// Active volume of the detector
    pub detector: Detector,

    /// Exposure which histograms are normalized to (POT)
    pub target_pot: Float,

    /// Reserved: restrict the selection to fully contained events (UNUSED)
    fully_contained: bool,

    /// Reserved: skip the cosmic rejection cuts (UNUSED)
    no_cosmic_cuts: bool,
}
//
impl Configuration {
    /// Build the configuration from the command line, check it, and print it
    pub fn load(cli: Cli) -> Result<Self> {
        let thresholds = match &cli.cuts {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .wrap_err_with(|| format!("Failed to read cut file {}", path.display()))?;
                CutThresholds::parse(&text)
                    .wrap_err_with(|| format!("Invalid cut file {}", path.display()))?
            }
            None => CutThresholds::default(),
        };

        let spec = cli.variant.spec();
        let config = Configuration {
            outfile: cli
                .outfile
                .unwrap_or_else(|| PathBuf::from(spec.default_outfile)),
            diagnostics: spec
                .diagnostic
                .map(|(_, default)| cli.diagnostics.unwrap_or_else(|| PathBuf::from(default))),
            infile: cli.infile,
            variant: cli.variant,
            thresholds,
            detector: Detector::default(),
            target_pot: 6.67e20,
            fully_contained: cli.fully_contained,
            no_cosmic_cuts: cli.no_cosmic_cuts,
        };

        // These flags are accepted for compatibility with the other analysis
        // tools, but no cut uses them yet
        if config.fully_contained {
            tracing::warn!("--fullyContained is reserved and has no effect");
        }
        if config.no_cosmic_cuts {
            tracing::warn!("--noCosmicCuts is reserved and has no effect");
        }

        config.print();
        Ok(config)
    }

    /// Default configuration of a variant, as used by unit tests
    #[cfg(test)]
    pub fn for_tests(variant: VariantName) -> Self {
        Self {
            infile: PathBuf::from("ntuple.json"),
            outfile: PathBuf::from(variant.spec().default_outfile),
            diagnostics: None,
            variant,
            thresholds: CutThresholds::default(),
            detector: Detector::default(),
            target_pot: 6.67e20,
            fully_contained: false,
            no_cosmic_cuts: false,
        }
    }

    /// Log the configuration
    pub fn print(&self) {
        tracing::info!(
            infile = %self.infile.display(),
            outfile = %self.outfile.display(),
            variant = ?self.variant,
            target_pot = self.target_pot,
            "run configuration"
        );
        self.thresholds.print();
    }
}

/// Active volume of the detector (cm)
#[derive(Clone, Debug, PartialEq)]
pub struct Detector {
    pub min: Position,
    pub max: Position,
}
//
impl Default for Detector {
    fn default() -> Self {
        Self {
            min: Position::new(0., -116.5, 0.),
            max: Position::new(256., 116.5, 1036.),
        }
    }
}
//
impl Detector {
    /// Truth that a point lies more than `width` away from every face of the
    /// active volume. A point at exactly `width` from a face is outside.
    pub fn in_fiducial(&self, point: &Position, width: Float) -> bool {
        (0..3).all(|axis| {
            point[axis] > self.min[axis] + width && point[axis] < self.max[axis] - width
        })
    }
}

/// Cut values used by the truth and reconstruction selections
///
/// Energies are in MeV and lengths in cm.
///
#[derive(Clone, Debug, PartialEq)]
pub struct CutThresholds {
    /// Distance from the detector faces below which vertices are rejected
    pub fiducial_width: Float,

    /// Wider fiducial margin used by the reconstruction-driven selections
    pub wide_fiducial_width: Float,

    /// Cosmic hit fraction at which an event is considered a cosmic
    pub cosmic_fraction_max: Float,

    /// Minimal kinetic energy of a counted true proton
    pub proton_ke_min: Float,

    /// Minimal kinetic energy of a vetoed true charged pion
    pub pion_ke_min: Float,

    /// Minimal kinetic energy of a vetoed true muon or electron
    pub lepton_ke_min: Float,

    /// Per-axis distance from the vertex within which a photon is prompt
    pub photon_vertex_tolerance: Float,

    /// Whether a true π⁰ or K⁰ may stand for the presence of photons
    pub neutral_meson_shortcut: bool,

    /// Minimal reconstructed energy of a counted reco proton
    pub reco_proton_energy_min: Float,

    /// Minimal reconstructed energy of a vetoed reco charged pion
    pub reco_pion_energy_min: Float,

    /// Minimal reconstructed energy of a vetoed reco muon or electron, also
    /// used for the pions and protons of the purity and efficiency selections
    pub classification_threshold: Float,

    /// Maximal "shower from charged particle" score of a photon shower
    pub shower_charge_max: Float,

    /// Minimal primary score of a photon candidate
    pub primary_score_min: Float,

    /// Length above which a non-photon track is too long
    pub long_track_length: Float,

    /// Minimal completeness of a photon shower
    pub shower_completeness_min: Float,

    /// Minimal completeness of a muon track
    pub muon_completeness_min: Float,
}
//
impl Default for CutThresholds {
    fn default() -> Self {
        Self {
            fiducial_width: 10.,
            wide_fiducial_width: 30.,
            cosmic_fraction_max: 1.,
            proton_ke_min: 60.,
            pion_ke_min: 30.,
            lepton_ke_min: 100.,
            photon_vertex_tolerance: 0.15,
            neutral_meson_shortcut: true,
            reco_proton_energy_min: 60.,
            reco_pion_energy_min: 30.,
            classification_threshold: 0.,
            shower_charge_max: 0.5,
            primary_score_min: 0.5,
            long_track_length: 20.,
            shower_completeness_min: 0.3,
            muon_completeness_min: 0.5,
        }
    }
}
//
impl CutThresholds {
    /// Parse a cut file
    ///
    /// Like the other analysis configuration files, it lists one value per
    /// line, in a fixed order, and only the first non-whitespace chunk of text
    /// of each line is considered (the rest is free-form commentary). Blank
    /// lines are ignored.
    ///
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = CutFileReader {
            tokens: text.lines().filter_map(|line| line.split_whitespace().next()),
        };
        let thresholds = CutThresholds {
            fiducial_width: reader.value("fiducial_width")?,
            wide_fiducial_width: reader.value("wide_fiducial_width")?,
            cosmic_fraction_max: reader.value("cosmic_fraction_max")?,
            proton_ke_min: reader.value("proton_ke_min")?,
            pion_ke_min: reader.value("pion_ke_min")?,
            lepton_ke_min: reader.value("lepton_ke_min")?,
            photon_vertex_tolerance: reader.value("photon_vertex_tolerance")?,
            neutral_meson_shortcut: reader.flag("neutral_meson_shortcut")?,
            reco_proton_energy_min: reader.value("reco_proton_energy_min")?,
            reco_pion_energy_min: reader.value("reco_pion_energy_min")?,
            classification_threshold: reader.value("classification_threshold")?,
            shower_charge_max: reader.value("shower_charge_max")?,
            primary_score_min: reader.value("primary_score_min")?,
            long_track_length: reader.value("long_track_length")?,
            shower_completeness_min: reader.value("shower_completeness_min")?,
            muon_completeness_min: reader.value("muon_completeness_min")?,
        };
        if reader.tokens.next().is_some() {
            tracing::warn!("Ignoring trailing values at the end of the cut file");
        }

        // Fiducial margins are subtracted from both sides of the detector
        for width in [thresholds.fiducial_width, thresholds.wide_fiducial_width] {
            ensure!(
                (0. ..116.5).contains(&width),
                "Fiducial width {width} does not leave any fiducial volume"
            );
        }
        ensure!(
            thresholds.photon_vertex_tolerance >= 0.,
            "The photon vertex tolerance cannot be negative"
        );

        Ok(thresholds)
    }

    /// Log the cut values
    pub fn print(&self) {
        tracing::info!(
            fiducial_width = self.fiducial_width,
            wide_fiducial_width = self.wide_fiducial_width,
            cosmic_fraction_max = self.cosmic_fraction_max,
            proton_ke_min = self.proton_ke_min,
            pion_ke_min = self.pion_ke_min,
            lepton_ke_min = self.lepton_ke_min,
            photon_vertex_tolerance = self.photon_vertex_tolerance,
            neutral_meson_shortcut = self.neutral_meson_shortcut,
            "truth cuts"
        );
        tracing::info!(
            reco_proton_energy_min = self.reco_proton_energy_min,
            reco_pion_energy_min = self.reco_pion_energy_min,
            classification_threshold = self.classification_threshold,
            shower_charge_max = self.shower_charge_max,
            primary_score_min = self.primary_score_min,
            long_track_length = self.long_track_length,
            shower_completeness_min = self.shower_completeness_min,
            muon_completeness_min = self.muon_completeness_min,
            "reconstruction cuts"
        );
    }
}

/// Reads the values of a cut file in order, naming the threshold being read
/// when something goes wrong
struct CutFileReader<Tokens> {
    tokens: Tokens,
}
//
impl<'text, Tokens: Iterator<Item = &'text str>> CutFileReader<Tokens> {
    fn token(&mut self, name: &str) -> Result<&'text str> {
        self.tokens
            .next()
            .ok_or_else(|| eyre!("The cut file ends before {name}"))
    }

    fn value<T>(&mut self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let token = self.token(name)?;
        token
            .parse()
            .wrap_err_with(|| format!("Invalid value {token:?} for {name}"))
    }

    /// Flags may be spelled the Rust way or the Fortran way (`.TRUE.`, `.f.`)
    fn flag(&mut self, name: &str) -> Result<bool> {
        let token = self.token(name)?;
        let lowercase = token.to_ascii_lowercase();
        match lowercase.as_str() {
            "true" | ".true." | ".t." => Ok(true),
            "false" | ".false." | ".f." => Ok(false),
            _ => bail!("Invalid flag {token:?} for {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cut_file_matches_defaults() {
        let parsed = CutThresholds::parse(include_str!("../cuts.default")).unwrap();
        assert_eq!(parsed, CutThresholds::default());
    }

    #[test]
    fn cut_file_accepts_fortran_booleans_and_comments() {
        let text = include_str!("../cuts.default")
            .replace(".true.", ".FALSE.")
            .replacen("10.", "12.5", 1);
        let parsed = CutThresholds::parse(&text).unwrap();
        assert!(!parsed.neutral_meson_shortcut);
        assert_eq!(parsed.fiducial_width, 12.5);
    }

    #[test]
    fn cut_file_errors_name_the_faulty_item() {
        let truncated = "10.\n30.\n";
        let err = CutThresholds::parse(truncated).unwrap_err();
        assert!(err.to_string().contains("cosmic_fraction_max"));

        let garbled = include_str!("../cuts.default").replacen("60.", "sixty", 1);
        let err = CutThresholds::parse(&garbled).unwrap_err();
        assert!(err.to_string().contains("proton_ke_min"));
    }

    #[test]
    fn cut_file_flags() {
        let with_flag = |flag: &str| include_str!("../cuts.default").replace(".true.", flag);
        assert!(CutThresholds::parse(&with_flag(".T.")).unwrap().neutral_meson_shortcut);
        assert!(CutThresholds::parse(&with_flag("true")).unwrap().neutral_meson_shortcut);
        assert!(!CutThresholds::parse(&with_flag("false")).unwrap().neutral_meson_shortcut);
        let err = CutThresholds::parse(&with_flag("yes")).unwrap_err();
        assert!(err.to_string().contains("neutral_meson_shortcut"));
    }

    #[test]
    fn cut_file_rejects_margins_wider_than_the_detector() {
        let text = include_str!("../cuts.default").replacen("30.", "200.", 1);
        assert!(CutThresholds::parse(&text).is_err());
    }

    #[test]
    fn fiducial_boundary_is_exclusive() {
        let detector = Detector::default();
        let width = 10.;
        assert!(detector.in_fiducial(&Position::new(128., 0., 518.), width));
        assert!(detector.in_fiducial(&Position::new(10.001, -106.4, 1025.9), width));
        assert!(!detector.in_fiducial(&Position::new(10., 0., 518.), width));
        assert!(!detector.in_fiducial(&Position::new(128., 106.5, 518.), width));
        assert!(!detector.in_fiducial(&Position::new(128., 0., 1026.), width));
        assert!(!detector.in_fiducial(&Position::new(5., 0., 500.), width));
        assert!(!detector.in_fiducial(&Position::new(300., 0., 500.), width));
    }

    #[test]
    fn command_line_uses_variant_defaults() {
        let cli = Cli::try_parse_from([
            "ncgamma_select",
            "--infile",
            "ntuple.json",
            "--variant",
            "reco-purity",
            "--noCosmicCuts",
        ])
        .unwrap();
        assert!(cli.no_cosmic_cuts);
        assert!(!cli.fully_contained);
        let config = Configuration::load(cli).unwrap();
        assert_eq!(config.outfile, PathBuf::from("muonScraper.json"));
        assert_eq!(config.diagnostics, Some(PathBuf::from("MuonFile.txt")));
        assert_eq!(config.thresholds, CutThresholds::default());
    }

    #[test]
    fn command_line_requires_an_input() {
        assert!(Cli::try_parse_from(["ncgamma_select"]).is_err());
    }
}
