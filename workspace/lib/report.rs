//! Comparison of computed energies against the continuum harmonic oscillator.

use std::fmt;
use tbspace::{
    extract::PropertyExtractor,
    pipeline::Config,
    units::{ ConstantSource, UResult },
};

/// One computed energy level next to its exact value ħω(n + ½).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Level {
    pub n: usize,
    pub computed: f64,
    pub exact: f64,
}

impl Level {
    /// Relative deviation of the computed level from the exact one.
    pub fn rel_error(&self) -> f64 {
        (self.computed - self.exact).abs() / self.exact.abs()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "E[{}] = {:.6e} (exact {:.6e}, rel. error {:.2e})",
            self.n, self.computed, self.exact, self.rel_error(),
        )
    }
}

/// Pair the lowest `count` computed levels with ħω(n + ½), ω = √(k / m).
pub fn harmonic_levels<U>(
    config: &Config,
    units: &U,
    pe: &PropertyExtractor,
    count: usize,
) -> UResult<Vec<Level>>
where U: ConstantSource + ?Sized
{
    let hbar = units.constant_in_natural_units("hbar")?;
    let mass = units.constant_in_natural_units(&config.mass)?;
    let hw = hbar * (config.k / mass).sqrt();
    let levels
        = pe.eigenvalues().iter()
        .take(count)
        .enumerate()
        .map(|(n, &computed)| {
            Level { n, computed, exact: hw * (n as f64 + 0.5) }
        })
        .collect();
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use tbspace::{ pipeline, units::UnitHandler };
    use super::*;

    #[test]
    fn levels_follow_oscillator() {
        let units = UnitHandler::from_strs(
            ["1 rad", "1 C", "1 pcs", "1 eV", "1 nm", "1 K", "1 fs"]).unwrap();
        // k in eV/nm² for a level spacing of a few tens of meV
        let config = Config { n: 150, a: 12.0, k: 1.0, ..Config::default() };
        let pe = pipeline::compute(&config, &units).unwrap();
        let levels = harmonic_levels(&config, &units, &pe, 5).unwrap();
        assert_eq!(levels.len(), 5);
        for (n, level) in levels.iter().enumerate() {
            assert_eq!(level.n, n);
            assert!(level.rel_error() < 1e-2, "{level}");
        }
        assert!((levels[1].exact / levels[0].exact - 3.0).abs() < 1e-12);
    }

    #[test]
    fn display() {
        let level = Level { n: 2, computed: 2.51, exact: 2.5 };
        assert_eq!(
            level.to_string(),
            "E[2] = 2.510000e0 (exact 2.500000e0, rel. error 4.00e-3)",
        );
    }

    #[test]
    fn count_is_capped() {
        let config = Config { n: 3, a: 1.0, k: 1.0, ..Config::default() };
        let units = UnitHandler::default();
        let pe = pipeline::compute(&config, &units).unwrap();
        assert_eq!(harmonic_levels(&config, &units, &pe, 10).unwrap().len(), 3);
    }
}
