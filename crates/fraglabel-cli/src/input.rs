use anyhow::{ensure, Context};
use clap::ArgMatches;
use fraglabel_core::peaks::PeakDetector;
use fraglabel_core::sequence::BOUNDARY_MARKER;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Amyloid beta 1-16, flanked by boundary markers
pub const DEFAULT_SEQUENCE: &str = "*DAEFRHDSGYEVHHQK*";

#[derive(Serialize, Clone, Debug)]
/// Actual run parameters - may include overrides or default values not set by user
pub struct Settings {
    pub version: String,
    pub sequence: String,
    pub peaks: PeakDetector,
    pub tsv_paths: Vec<String>,
    pub output_paths: Vec<String>,

    #[serde(skip_serializing)]
    pub output_directory: PathBuf,
}

#[derive(Deserialize, Default, Debug)]
/// Input parameters deserialized from JSON file
pub struct Input {
    sequence: Option<String>,
    tsv_paths: Option<Vec<String>>,
    output_directory: Option<String>,
    peaks: Option<PeakOptions>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct PeakOptions {
    min_snr: Option<f64>,
    noise_percentile: Option<f64>,
    window_fraction: Option<f64>,
}

impl From<PeakOptions> for PeakDetector {
    fn from(value: PeakOptions) -> PeakDetector {
        let default = PeakDetector::default();
        let settings = PeakDetector {
            min_snr: value.min_snr.unwrap_or(default.min_snr).abs(),
            noise_percentile: value
                .noise_percentile
                .unwrap_or(default.noise_percentile)
                .clamp(0.0, 100.0),
            window_fraction: value
                .window_fraction
                .unwrap_or(default.window_fraction)
                .clamp(0.0, 1.0),
        };
        if settings.min_snr > 10.0 {
            log::warn!("peaks.min_snr is higher than expected - most peaks will be discarded");
        }
        if settings.window_fraction == 0.0 {
            log::warn!("peaks.window_fraction is 0, noise will be estimated from single samples");
        }
        settings
    }
}

impl Input {
    pub fn from_arguments(matches: ArgMatches) -> anyhow::Result<Self> {
        let mut input = match matches.get_one::<String>("parameters") {
            Some(path) => Input::load(path)
                .with_context(|| format!("Failed to read parameters from `{path}`"))?,
            None => Input::default(),
        };

        // Handle JSON configuration overrides
        if let Some(sequence) = matches.get_one::<String>("sequence") {
            log::trace!("overriding `sequence` parameter.");
            input.sequence = Some(sequence.into());
        }
        if let Some(output_directory) = matches.get_one::<String>("output_directory") {
            log::trace!("overriding `output_directory` parameter.");
            input.output_directory = Some(output_directory.into());
        }
        if let Some(tsv_paths) = matches.get_many::<String>("tsv_paths") {
            log::trace!("overriding `tsv_paths` parameter.");
            input.tsv_paths = Some(tsv_paths.into_iter().map(|p| p.into()).collect());
        }

        ensure!(
            input.tsv_paths.as_ref().map_or(false, |p| !p.is_empty()),
            "`tsv_paths` must be set. For more information try '--help'"
        );

        Ok(input)
    }

    pub fn load<S: AsRef<std::path::Path>>(path: S) -> anyhow::Result<Self> {
        fraglabel_core::read_json(path).map_err(anyhow::Error::from)
    }

    pub fn build(self) -> anyhow::Result<Settings> {
        let sequence = self
            .sequence
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SEQUENCE.into());
        ensure!(
            sequence.chars().count() >= 3,
            "`sequence` must contain at least one residue between two boundary markers, e.g. `{}PEPTIDE{}`",
            BOUNDARY_MARKER,
            BOUNDARY_MARKER
        );

        let tsv_paths = self.tsv_paths.unwrap_or_default();
        ensure!(
            !tsv_paths.is_empty(),
            "`tsv_paths` must be set. For more information try '--help'"
        );

        let output_directory = match self.output_directory {
            Some(path) => {
                let path = PathBuf::from(path);
                std::fs::create_dir_all(&path).with_context(|| {
                    format!("Failed to create output directory `{}`", path.display())
                })?;
                path
            }
            None => std::env::current_dir()?,
        };

        Ok(Settings {
            version: clap::crate_version!().into(),
            sequence,
            peaks: self.peaks.map(Into::into).unwrap_or_default(),
            tsv_paths,
            output_paths: Vec::new(),
            output_directory,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() -> anyhow::Result<()> {
        let input: Input = serde_json::from_str(r#"{ "tsv_paths": ["a.tsv"] }"#)?;
        let settings = input.build()?;
        assert_eq!(settings.sequence, DEFAULT_SEQUENCE);
        assert_eq!(settings.peaks, PeakDetector::default());
        assert_eq!(settings.tsv_paths, vec!["a.tsv".to_string()]);
        Ok(())
    }

    #[test]
    fn peak_options() -> anyhow::Result<()> {
        let input: Input = serde_json::from_str(
            r#"{ "tsv_paths": ["a.tsv"], "sequence": " *pep* ", "peaks": { "min_snr": -2.0, "noise_percentile": 150 } }"#,
        )?;
        let settings = input.build()?;
        assert_eq!(settings.sequence, "*PEP*");
        assert_eq!(settings.peaks.min_snr, 2.0);
        assert_eq!(settings.peaks.noise_percentile, 100.0);
        assert_eq!(
            settings.peaks.window_fraction,
            PeakDetector::default().window_fraction
        );
        Ok(())
    }

    #[test]
    fn missing_inputs() {
        assert!(Input::default().build().is_err());

        let input: Input =
            serde_json::from_str(r#"{ "tsv_paths": ["a.tsv"], "sequence": "**" }"#).unwrap();
        assert!(input.build().is_err());
    }
}
