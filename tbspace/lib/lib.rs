//! Provides functions and higher-level constructs to compute the bound-state
//! spectrum and wavefunctions of a particle in a one-dimensional potential via
//! a tight-binding (finite-difference) discretization of the time-independent
//! Schrödinger equation and dense diagonalization of the resulting Hermitian
//! operator.
//!
//! The computation is a strictly forward pipeline:
//! - [`lattice`]: discretize a coordinate range and potential into on-site
//!   and nearest-neighbor coupling terms
//! - [`model`]: assemble coupling terms into a sealed Hermitian operator
//! - [`solve`]: diagonalize the operator (LAPACK, or a scaled Householder +
//!   implicit QL solver)
//! - [`extract`]: query eigenvalues, wavefunction amplitudes, and derived
//!   quantities
//!
//! [`pipeline`] strings these together for a harmonic potential, with the unit
//! system ([`units`]) and output backend ([`render`]) passed in explicitly.
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod units;
pub mod lattice;
pub mod model;
pub mod solve;
pub mod extract;
pub mod render;
pub mod pipeline;

pub mod docs;

pub(crate) const DEF_MAXITERS: usize = 30;
