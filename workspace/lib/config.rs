//! TOML job files for the `qho` binary.
//!
//! ```toml
//! [lattice]
//! n = 199
//! a = 1e-8
//! k = 1.0
//! mass = "m_e"
//!
//! [units]
//! scales = ["1 rad", "1 e", "1 mol", "1 eV", "1 nm", "1 K", "1 fs"]
//!
//! [output]
//! directory = "figures"
//! format = "npz"
//! ```
//!
//! Every section and every field is optional.

use std::path::{ Path, PathBuf };
use serde::Deserialize;
use tbspace::{
    pipeline::Config,
    units::{ SI_SCALES, UResult, UnitHandler },
};

/// Top-level job configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub lattice: LatticeConfig,
    pub units: UnitsConfig,
    pub output: OutputConfig,
}

impl JobConfig {
    /// Collect the lattice settings into a pipeline configuration.
    pub fn pipeline_config(&self) -> Config {
        Config {
            n: self.lattice.n,
            a: self.lattice.a,
            k: self.lattice.k,
            mass: self.lattice.mass.clone(),
            maxiters: self.lattice.maxiters,
        }
    }

    /// Build the unit system the lattice settings are expressed in.
    pub fn unit_handler(&self) -> UResult<UnitHandler> {
        UnitHandler::from_slice(&self.units.scales)
    }
}

/// Chain parameters, in the natural units selected by [`UnitsConfig`].
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub n: usize,
    pub a: f64,
    pub k: f64,
    pub mass: String,
    pub maxiters: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        let Config { n, a, k, mass, maxiters } = Config::default();
        Self { n, a, k, mass, maxiters }
    }
}

/// Base units for angle, charge, count, energy, length, temperature, and
/// time, in that order.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UnitsConfig {
    pub scales: Vec<String>,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self { scales: SI_SCALES.iter().map(|s| s.to_string()).collect() }
    }
}

/// Output file format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One interactive Plotly page per plot.
    #[default]
    Html,
    /// A single `.npz` archive.
    Npz,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory (default: "figures").
    pub directory: PathBuf,
    /// Output format (default: "html").
    pub format: Format,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { directory: PathBuf::from("figures"), format: Format::Html }
    }
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}
