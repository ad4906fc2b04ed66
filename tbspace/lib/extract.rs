//! Derived quantities computed from a [`Spectrum`].
//!
//! ```
//! use tbspace::{
//!     extract::{ Pattern, PropertyExtractor },
//!     model::Model,
//!     solve::Diagonalizer,
//! };
//!
//! let mut model = Model::new(4);
//! for i in 0..4 {
//!     model.add_coupling_term(2.0, i, i, true).unwrap();
//!     if i + 1 < 4 { model.add_coupling_term(-1.0, i, i + 1, true).unwrap(); }
//! }
//! model.construct();
//! let pe = PropertyExtractor::new(Diagonalizer::new().run(&model).unwrap());
//!
//! // one full spatial wavefunction per eigenstate
//! let wfs = pe.wavefunctions(Pattern::All, Pattern::All).unwrap();
//! let ground = wfs.state(0).unwrap();
//! let norm: f64 = ground.iter().map(|a| a.norm_sqr()).sum();
//! assert!((norm - 1.0).abs() < 1e-12);
//! ```

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ IndexError, IndexKind, PropError },
    solve::Spectrum,
};

pub type PResult<T> = Result<T, PropError>;

/// A selection of indices along one axis of the spectrum (states or sites).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Every index.
    All,
    /// A single index.
    Only(usize),
    /// An explicit list of indices, in the given order.
    List(Vec<usize>),
}

impl Pattern {
    // resolve to an explicit, bounds-checked list of indices
    fn resolve(&self, kind: IndexKind, len: usize) -> PResult<Vec<usize>> {
        match self {
            Self::All => Ok((0..len).collect()),
            Self::Only(i) => {
                IndexError::check(kind, *i, len)?;
                Ok(vec![*i])
            },
            Self::List(idx) => {
                idx.iter()
                    .try_for_each(|i| IndexError::check(kind, *i, len))?;
                Ok(idx.clone())
            },
        }
    }
}

impl From<usize> for Pattern {
    fn from(i: usize) -> Self { Self::Only(i) }
}

impl From<Vec<usize>> for Pattern {
    fn from(idx: Vec<usize>) -> Self { Self::List(idx) }
}

/// A block of wavefunction amplitudes for a selection of states and sites.
///
/// Rows index the selected states and columns the selected sites, both in the
/// order given by the [`Pattern`]s that produced them.
#[derive(Clone, Debug)]
pub struct WaveFunctions {
    states: Vec<usize>,
    sites: Vec<usize>,
    data: nd::Array2<C64>,
}

impl WaveFunctions {
    /// Get the selected eigenvalue indices.
    pub fn states(&self) -> &[usize] { &self.states }

    /// Get the selected site indices.
    pub fn sites(&self) -> &[usize] { &self.sites }

    /// Get a reference to the amplitude block.
    pub fn data(&self) -> &nd::Array2<C64> { &self.data }

    /// Get the amplitude for eigenvalue index `state` at `site`.
    ///
    /// Fails with [`IndexError`] if either was not part of the selection.
    pub fn get(&self, state: usize, site: usize) -> PResult<C64> {
        let row = self.row_of(state)?;
        let col
            = self.sites.iter().position(|s| *s == site)
            .ok_or(IndexError {
                kind: IndexKind::Site,
                index: site,
                len: self.sites.len(),
            })?;
        Ok(self.data[[row, col]])
    }

    /// Get every selected site amplitude for eigenvalue index `state`.
    pub fn state(&self, state: usize) -> PResult<nd::ArrayView1<C64>> {
        let row = self.row_of(state)?;
        Ok(self.data.row(row))
    }

    fn row_of(&self, state: usize) -> PResult<usize> {
        let row
            = self.states.iter().position(|s| *s == state)
            .ok_or(IndexError {
                kind: IndexKind::Eigenvalue,
                index: state,
                len: self.states.len(),
            })?;
        Ok(row)
    }
}

/// Histogram of eigenvalues over an energy window, in states per unit energy.
#[derive(Clone, Debug)]
pub struct DensityOfStates {
    lower: f64,
    upper: f64,
    data: nd::Array1<f64>,
}

impl DensityOfStates {
    /// Get the lower bound of the energy window.
    pub fn lower(&self) -> f64 { self.lower }

    /// Get the upper bound of the energy window.
    pub fn upper(&self) -> f64 { self.upper }

    /// Get the bin width.
    pub fn de(&self) -> f64 { (self.upper - self.lower) / self.data.len() as f64 }

    /// Get the bin centers.
    pub fn energies(&self) -> nd::Array1<f64> {
        let de = self.de();
        (0..self.data.len())
            .map(|k| self.lower + (k as f64 + 0.5) * de)
            .collect()
    }

    /// Get a reference to the density values.
    pub fn data(&self) -> &nd::Array1<f64> { &self.data }

    /// Return a copy of `self` convolved with a normalized Gaussian of width
    /// `sigma`.
    ///
    /// Weight falling outside the window is lost.
    pub fn gaussian_smoothed(&self, sigma: f64) -> PResult<Self> {
        PropError::check_sigma(sigma)?;
        let e = self.energies();
        let de = self.de();
        let norm = de / (sigma * (2.0 * std::f64::consts::PI).sqrt());
        let data: nd::Array1<f64>
            = e.iter()
            .map(|ei| {
                e.iter().zip(&self.data)
                    .map(|(ej, rho)| {
                        rho * norm * (-(ei - ej).powi(2) / (2.0 * sigma.powi(2))).exp()
                    })
                    .sum::<f64>()
            })
            .collect();
        Ok(Self { lower: self.lower, upper: self.upper, data })
    }
}

/// Read-only access to eigenvalues, wavefunctions, and derived quantities.
///
/// The extractor owns the [`Spectrum`] it was built from; no query recomputes
/// or modifies it.
#[derive(Clone, Debug)]
pub struct PropertyExtractor {
    spectrum: Spectrum,
}

impl PropertyExtractor {
    /// Create a new `PropertyExtractor`.
    pub fn new(spectrum: Spectrum) -> Self { Self { spectrum } }

    /// Get a reference to the underlying spectrum.
    pub fn spectrum(&self) -> &Spectrum { &self.spectrum }

    /// Get the number of eigenstates (equal to the number of sites).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.spectrum.len() }

    /// Get a view of all eigenvalues, in ascending order.
    pub fn eigenvalues(&self) -> nd::ArrayView1<f64> {
        self.spectrum.eigenvalues().view()
    }

    /// Get the `state`-th eigenvalue.
    pub fn eigenvalue(&self, state: usize) -> PResult<f64> {
        IndexError::check(IndexKind::Eigenvalue, state, self.len())?;
        Ok(self.spectrum.eigenvalues()[state])
    }

    /// Get the amplitude of the `state`-th normalized eigenvector at `site`.
    pub fn wavefunction_amplitude(&self, state: usize, site: usize)
        -> PResult<C64>
    {
        IndexError::check(IndexKind::Eigenvalue, state, self.len())?;
        IndexError::check(IndexKind::Site, site, self.len())?;
        Ok(self.spectrum.eigenvectors()[[site, state]])
    }

    /// Get every site amplitude of the `state`-th normalized eigenvector.
    pub fn wavefunction(&self, state: usize) -> PResult<nd::ArrayView1<C64>> {
        IndexError::check(IndexKind::Eigenvalue, state, self.len())?;
        Ok(self.spectrum.eigenvector(state))
    }

    /// Get |ψ|² at every site for the `state`-th eigenvector.
    pub fn probability_density(&self, state: usize)
        -> PResult<nd::Array1<f64>>
    {
        self.wavefunction(state).map(|wf| wf.mapv(|a| a.norm_sqr()))
    }

    /// Collect the amplitudes for every combination of the selected states
    /// and sites.
    pub fn wavefunctions<P, Q>(&self, states: P, sites: Q)
        -> PResult<WaveFunctions>
    where
        P: Into<Pattern>,
        Q: Into<Pattern>,
    {
        let n = self.len();
        let states = states.into().resolve(IndexKind::Eigenvalue, n)?;
        let sites = sites.into().resolve(IndexKind::Site, n)?;
        let data: nd::Array2<C64>
            = self.spectrum.eigenvectors()
            .select(nd::Axis(1), &states)
            .select(nd::Axis(0), &sites)
            .reversed_axes();
        Ok(WaveFunctions { states, sites, data })
    }

    /// Histogram the eigenvalues into `resolution` equal bins over
    /// `[lower, upper]`.
    ///
    /// Eigenvalues outside the window are not counted.
    pub fn density_of_states(&self, lower: f64, upper: f64, resolution: usize)
        -> PResult<DensityOfStates>
    {
        PropError::check_window(lower, upper)?;
        PropError::check_resolution(resolution)?;
        let de = (upper - lower) / resolution as f64;
        let mut data: nd::Array1<f64> = nd::Array1::zeros(resolution);
        self.spectrum.eigenvalues().iter()
            .filter(|e| (lower..=upper).contains(*e))
            .for_each(|e| {
                let k = (((e - lower) / de) as usize).min(resolution - 1);
                data[k] += 1.0 / de;
            });
        Ok(DensityOfStates { lower, upper, data })
    }
}
