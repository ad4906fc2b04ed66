//! End-to-end computation: discretize → assemble → diagonalize → extract →
//! render.
//!
//! Collaborators (the unit system and the renderer) are passed in explicitly;
//! the unit system alone determines which natural units the numbers in
//! [`Config`] are read in.
//!
//! ```
//! use tbspace::{ pipeline::{ self, Config }, units::UnitHandler };
//!
//! let config = Config { n: 20, ..Config::default() };
//! let pe = pipeline::compute(&config, &UnitHandler::default()).unwrap();
//! assert_eq!(pe.eigenvalues().len(), 20);
//! ```

use serde::Deserialize;
use crate::{
    error::{ ConfigError, PipelineError },
    extract::{ Pattern, PropertyExtractor },
    lattice::{ Chain, harmonic },
    model::Model,
    render::{ Labels, Renderer },
    solve::Diagonalizer,
    units::ConstantSource,
    DEF_MAXITERS,
};

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Parameters of a harmonic-chain computation.
///
/// All physical quantities are given in the natural units of the
/// [`ConstantSource`] the configuration is run with.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of lattice sites (default: `99`).
    pub n: usize,
    /// Spatial extent of the chain, boundary points included (default:
    /// `1e-9`).
    pub a: f64,
    /// Stiffness of the harmonic potential V(x) = k x² / 2 (default: `5000`).
    pub k: f64,
    /// Name of the constant used as the particle mass (default: `"m_e"`).
    pub mass: String,
    /// Maximum number of QL sweeps per eigenvalue (default: `30`).
    pub maxiters: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n: 99,
            a: 1e-9,
            k: 5000.0,
            mass: "m_e".to_string(),
            maxiters: DEF_MAXITERS,
        }
    }
}

impl Config {
    /// Check that the configuration describes a non-empty, finite chain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 { return Err(ConfigError::NoSites); }
        if !(self.a.is_finite() && self.a > 0.0) {
            return Err(ConfigError::BadExtent(self.a));
        }
        if !self.k.is_finite() { return Err(ConfigError::BadStiffness(self.k)); }
        if self.maxiters == 0 { return Err(ConfigError::BadMaxiters(0)); }
        Ok(())
    }
}

/// Build and diagonalize the harmonic chain described by `config`.
///
/// `ħ` and the particle mass are taken from `units`.
pub fn compute<U>(config: &Config, units: &U)
    -> PipelineResult<PropertyExtractor>
where U: ConstantSource + ?Sized
{
    config.validate()?;
    let hbar = units.constant_in_natural_units("hbar")?;
    let mass = units.constant_in_natural_units(&config.mass)?;

    let chain = Chain::new(config.a, config.n);
    let t = chain.hopping(hbar, mass);
    ConfigError::check_hopping(t)?;
    log::debug!(
        "pipeline: {} sites, dx = {:e}, t = {:e}", config.n, chain.dx(), t);

    let mut model = Model::new(config.n);
    model
        .add_terms(chain.coupling_terms(hbar, mass, harmonic(config.k)))?
        .construct();

    let spectrum
        = Diagonalizer::new()
        .with_maxiters(config.maxiters)
        .run(&model)?;
    log::info!(
        "pipeline: ground state energy {:e}", spectrum.eigenvalues()[0]);
    Ok(PropertyExtractor::new(spectrum))
}

/// Run the full pipeline, handing the eigenvalues and one wavefunction per
/// eigenstate to `renderer`.
///
/// All numerical work (including extraction of every wavefunction) completes
/// before the renderer is first called, so a failure in any core stage
/// produces no output at all.
pub fn run<U, R>(config: &Config, units: &U, mut renderer: R)
    -> PipelineResult<PropertyExtractor>
where
    U: ConstantSource + ?Sized,
    R: Renderer,
{
    let pe = compute(config, units)?;
    let wfs = pe.wavefunctions(Pattern::All, Pattern::All)?;
    let evals: Vec<f64> = pe.eigenvalues().to_vec();

    renderer.eigenvalues(&Labels::eigenvalues(), &evals)?;
    for &state in wfs.states() {
        let amps: Vec<_> = wfs.state(state)?.to_vec();
        renderer.wavefunction(&Labels::wavefunction(state), state, &amps)?;
    }
    renderer.finish()?;
    log::info!("pipeline: rendered {} eigenstates", wfs.states().len());
    Ok(pe)
}

#[cfg(test)]
mod tests {
    use crate::{ error::UnitError, units::UResult };
    use super::*;

    struct Fixed { hbar: f64, mass: f64 }

    impl ConstantSource for Fixed {
        fn constant_in_natural_units(&self, name: &str) -> UResult<f64> {
            match name {
                "hbar" => Ok(self.hbar),
                "m_e" => Ok(self.mass),
                other => Err(UnitError::UnknownConstant(other.to_string())),
            }
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_configs() {
        let bad = Config { n: 0, ..Config::default() };
        assert_eq!(bad.validate(), Err(ConfigError::NoSites));
        let bad = Config { a: -1.0, ..Config::default() };
        assert_eq!(bad.validate(), Err(ConfigError::BadExtent(-1.0)));
        let bad = Config { k: f64::NAN, ..Config::default() };
        assert!(matches!(bad.validate(), Err(ConfigError::BadStiffness(_))));
        let bad = Config { maxiters: 0, ..Config::default() };
        assert_eq!(bad.validate(), Err(ConfigError::BadMaxiters(0)));
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let units = Fixed { hbar: 1.0, mass: -1.0 };
        let config = Config { n: 4, a: 1.0, k: 1.0, ..Config::default() };
        assert!(matches!(
            compute(&config, &units),
            Err(PipelineError::Config(ConfigError::BadHopping(_)))
        ));
    }

    #[test]
    fn unknown_mass_constant() {
        let units = Fixed { hbar: 1.0, mass: 1.0 };
        let config = Config { mass: "m_mu".into(), ..Config::default() };
        assert!(matches!(
            compute(&config, &units),
            Err(PipelineError::Unit(UnitError::UnknownConstant(_)))
        ));
    }
}
