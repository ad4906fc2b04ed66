//! Interface to plotting/output backends.
//!
//! The numerical pipeline only hands over plain data and string labels;
//! everything to do with file formats and paths belongs to implementors of
//! [`Renderer`].

use num_complex::Complex64 as C64;
use crate::error::RenderError;

pub type RResult<T> = Result<T, RenderError>;

/// Title and axis labels for a single plot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    pub title: String,
    pub x: String,
    pub y: String,
}

impl Labels {
    /// Create a new set of labels.
    pub fn new(title: &str, x: &str, y: &str) -> Self {
        Self { title: title.to_string(), x: x.to_string(), y: y.to_string() }
    }

    /// Labels for an eigenvalue plot.
    pub fn eigenvalues() -> Self {
        Self::new("Eigenvalues", "Eigenvalue number", "Energy")
    }

    /// Labels for the wavefunction plot of the `state`-th eigenstate.
    pub fn wavefunction(state: usize) -> Self {
        Self::new(&format!("Wave function {state}"), "Site", "Amplitude")
    }
}

/// A consumer of the pipeline's output.
pub trait Renderer {
    /// Plot a sequence of (ascending) eigenvalues against their index.
    fn eigenvalues(&mut self, labels: &Labels, evals: &[f64]) -> RResult<()>;

    /// Plot the site amplitudes of the `state`-th eigenstate.
    fn wavefunction(&mut self, labels: &Labels, state: usize, amps: &[C64])
        -> RResult<()>;

    /// Called once after all plots have been handed over.
    fn finish(&mut self) -> RResult<()> { Ok(()) }
}

impl<R> Renderer for &mut R
where R: Renderer + ?Sized
{
    fn eigenvalues(&mut self, labels: &Labels, evals: &[f64]) -> RResult<()> {
        (**self).eigenvalues(labels, evals)
    }

    fn wavefunction(&mut self, labels: &Labels, state: usize, amps: &[C64])
        -> RResult<()>
    {
        (**self).wavefunction(labels, state, amps)
    }

    fn finish(&mut self) -> RResult<()> { (**self).finish() }
}

/// A [`Renderer`] that discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn eigenvalues(&mut self, _: &Labels, _: &[f64]) -> RResult<()> { Ok(()) }

    fn wavefunction(&mut self, _: &Labels, _: usize, _: &[C64]) -> RResult<()> {
        Ok(())
    }
}
