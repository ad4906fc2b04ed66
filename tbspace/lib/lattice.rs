//! Discretization of a continuous coordinate range into a finite chain of
//! sites coupled by nearest-neighbor hopping.
//!
//! The kinetic operator -(ħ²/2m) ∂²/∂x² is replaced by its three-point
//! finite-difference form on a uniform grid, which in tight-binding language
//! is an on-site energy 2*t* and a hopping amplitude -*t* between adjacent
//! sites, with *t* = ħ²/(2 *m* Δx²). See [`docs`][crate::docs#discretization]
//! for details.

use ndarray as nd;
use crate::model::CouplingTerm;

/// A "linspace-style" set of evenly spaced sample points, including both
/// endpoints.
#[derive(Clone, Debug)]
pub struct Range {
    x: nd::Array1<f64>,
}

impl Range {
    /// Create a new `Range` from a start, an inclusive end, and a number of
    /// points.
    pub fn new(start: f64, end: f64, points: usize) -> Self {
        Self { x: nd::Array1::linspace(start, end, points) }
    }

    /// Get the `i`-th sample point, if it exists.
    pub fn get(&self, i: usize) -> Option<f64> { self.x.get(i).copied() }

    /// Get the spacing between adjacent points, or `None` if there are fewer
    /// than two.
    pub fn spacing(&self) -> Option<f64> {
        (self.x.len() > 1).then(|| self.x[1] - self.x[0])
    }

    /// Get a reference to the sample points.
    pub fn as_array(&self) -> &nd::Array1<f64> { &self.x }

    /// Get the number of sample points.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.x.len() }
}

/// A finite one-dimensional chain with open boundary conditions.
///
/// The coordinate interval `[-extent/2, extent/2]` is sampled with `n + 2`
/// points. The two endpoints are boundary points at which the wavefunction is
/// taken to vanish; the `n` interior points are the sites of the chain, so
/// that site `i` sits at the `(i + 1)`-th sample point.
#[derive(Clone, Debug)]
pub struct Chain {
    // full sample range, boundary points included
    range: Range,
    // grid spacing
    dx: f64,
    // number of sites
    n: usize,
}

impl Chain {
    /// Create a new `Chain` of `n` sites spanning a total spatial extent
    /// `extent`.
    pub fn new(extent: f64, n: usize) -> Self {
        let range = Range::new(-extent / 2.0, extent / 2.0, n + 2);
        let dx = extent / (n + 1) as f64;
        Self { range, dx, n }
    }

    /// Get the number of sites.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.n }

    /// Get the grid spacing.
    pub fn dx(&self) -> f64 { self.dx }

    /// Get the full sample range, boundary points included.
    pub fn range(&self) -> &Range { &self.range }

    /// Get the coordinates of the sites, boundary points excluded.
    pub fn x(&self) -> nd::ArrayView1<f64> {
        self.range.as_array().slice(nd::s![1..self.n + 1])
    }

    /// Return the hopping amplitude *t* = ħ²/(2 *m* Δx²) for a particle of
    /// mass `mass`.
    ///
    /// Both arguments are expected in the same (natural) unit system; *t* > 0
    /// is required for the resulting operator to be bounded from below, but is
    /// not checked here.
    pub fn hopping(&self, hbar: f64, mass: f64) -> f64 {
        hbar.powi(2) / (2.0 * mass * self.dx.powi(2))
    }

    /// Generate the coupling terms of the discretized Hamiltonian
    /// -(ħ²/2m) ∂²/∂x² + V(x).
    ///
    /// For each site `i` this produces an on-site term 2*t* + V(x\[i\]) and,
    /// if `i + 1 < n`, a hop of amplitude -*t* from `i` to `i + 1`. All terms
    /// are marked as Hermitian-conjugate pairs; there is no hop between the
    /// last and first sites.
    pub fn coupling_terms<F>(&self, hbar: f64, mass: f64, mut potential: F)
        -> Vec<CouplingTerm>
    where F: FnMut(f64) -> f64
    {
        let t = self.hopping(hbar, mass);
        let mut terms: Vec<CouplingTerm> = Vec::with_capacity(2 * self.n);
        for (i, &xi) in self.x().iter().enumerate() {
            terms.push(CouplingTerm::new(2.0 * t + potential(xi), i, i).hc());
            if i + 1 < self.n {
                terms.push(CouplingTerm::new(-t, i, i + 1).hc());
            }
        }
        terms
    }
}

/// Return the harmonic potential V(x) = k x² / 2 with stiffness `k`.
pub fn harmonic(k: f64) -> impl Fn(f64) -> f64 + Copy {
    move |x| 0.5 * k * x * x
}
