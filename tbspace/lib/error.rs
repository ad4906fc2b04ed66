//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use thiserror::Error;

/// Returned when a site index or matrix shape does not fit the operator it is
/// applied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// A site index fell outside `[0, dim)`.
    #[error("site index {index} is out of bounds for an operator of dimension {dim}")]
    OutOfBounds { index: usize, dim: usize },

    /// A matrix passed to the solver was not square.
    #[error("operator must be square; got shape {0}×{1}")]
    NotSquare(usize, usize),

    /// A matrix passed to the solver had zero dimension.
    #[error("operator must have non-zero dimension")]
    Empty,
}

impl DimensionError {
    pub(crate) fn check_index(index: usize, dim: usize) -> Result<(), Self> {
        (index < dim).then_some(()).ok_or(Self::OutOfBounds { index, dim })
    }

    pub(crate) fn check_shape(shape: &[usize]) -> Result<(), Self> {
        let (r, c) = (shape[0], shape[1]);
        if r != c { return Err(Self::NotSquare(r, c)); }
        (r != 0).then_some(()).ok_or(Self::Empty)
    }
}

/// Returned when a coupling term is added to a [`Model`][crate::model::Model]
/// after it has been constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("model has already been constructed; no further terms may be added")]
pub struct SealedError;

impl SealedError {
    pub(crate) fn check(sealed: bool) -> Result<(), Self> {
        (!sealed).then_some(()).ok_or(Self)
    }
}

/// The kind of index rejected by an [`IndexError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexKind {
    /// Position in the ascending spectrum.
    Eigenvalue,
    /// Lattice site.
    Site,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eigenvalue => write!(f, "eigenvalue"),
            Self::Site => write!(f, "site"),
        }
    }
}

/// Returned when a query to the
/// [`PropertyExtractor`][crate::extract::PropertyExtractor] names a state or
/// site that does not exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} index {index} is out of range for length {len}")]
pub struct IndexError {
    pub kind: IndexKind,
    pub index: usize,
    pub len: usize,
}

impl IndexError {
    pub(crate) fn check(kind: IndexKind, index: usize, len: usize)
        -> Result<(), Self>
    {
        (index < len).then_some(()).ok_or(Self { kind, index, len })
    }
}

/// Returned when the eigensolver fails to isolate an eigenvalue within the
/// allowed number of sweeps.
///
/// For the QL solver, `index` is the eigenvalue being isolated; for LAPACK it
/// is the number of off-diagonal elements left unconverged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("eigensolver did not converge (index {index}) within {maxiters} sweeps per eigenvalue")]
pub struct ConvergenceError {
    pub index: usize,
    pub maxiters: usize,
}

/// Returned from operator assembly.
#[derive(Debug, Error)]
pub enum ModelError {
    /// [`DimensionError`]
    #[error("dimension error: {0}")]
    Dimension(#[from] DimensionError),

    /// [`SealedError`]
    #[error("sealed error: {0}")]
    Sealed(#[from] SealedError),

    /// Returned when the assembled matrix is requested before
    /// [`construct`][crate::model::Model::construct] has been called.
    #[error("model has not been constructed")]
    Unconstructed,
}

/// Returned from the spectral solver.
#[derive(Debug, Error)]
pub enum DiagError {
    /// [`DimensionError`]
    #[error("dimension error: {0}")]
    Dimension(#[from] DimensionError),

    /// [`ConvergenceError`]
    #[error("convergence error: {0}")]
    Convergence(#[from] ConvergenceError),

    /// Returned when the input matrix differs from its conjugate transpose by
    /// more than round-off.
    #[error("operator is not Hermitian at ({0}, {1})")]
    NotHermitian(usize, usize),

    /// Returned when the solver is handed a model that is still open for
    /// assembly.
    #[error("model must be constructed before diagonalization")]
    Unconstructed,

    /// [`LinalgError`][ndarray_linalg::error::LinalgError].
    #[error("linalg error: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),
}

/// Returned from the observable extractor.
#[derive(Debug, Error)]
pub enum PropError {
    /// [`IndexError`]
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Returned when an energy window has `lower >= upper` or non-finite
    /// bounds.
    #[error("energy window must satisfy lower < upper; got [{0}, {1}]")]
    BadWindow(f64, f64),

    /// Returned when a density of states is requested with fewer than one
    /// bin.
    #[error("resolution must be greater than 0; got {0}")]
    BadResolution(usize),

    /// Returned when a smoothing width is not strictly positive.
    #[error("smoothing width must be greater than 0; got {0}")]
    BadSigma(f64),
}

impl PropError {
    pub(crate) fn check_window(lower: f64, upper: f64) -> Result<(), Self> {
        (lower.is_finite() && upper.is_finite() && lower < upper)
            .then_some(())
            .ok_or(Self::BadWindow(lower, upper))
    }

    pub(crate) fn check_resolution(resolution: usize) -> Result<(), Self> {
        (resolution != 0).then_some(()).ok_or(Self::BadResolution(resolution))
    }

    pub(crate) fn check_sigma(sigma: f64) -> Result<(), Self> {
        (sigma > 0.0).then_some(()).ok_or(Self::BadSigma(sigma))
    }
}

/// Returned from the unit system.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UnitError {
    /// Returned when a unit string is not of the form `"<scale> <unit>"`.
    #[error("expected a unit string of the form '<scale> <unit>'; got '{0}'")]
    BadFormat(String),

    /// Returned when the unit symbol is not recognized for any quantity.
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    /// Returned when a recognized unit is given in the slot of a different
    /// base quantity.
    #[error("unit '{unit}' is not a unit of {expected}")]
    WrongQuantity { unit: String, expected: &'static str },

    /// Returned when a scale factor is not a finite, positive number.
    #[error("scale factors must be finite and greater than 0; got '{0}'")]
    BadScale(String),

    /// Returned when a named constant is not known to the unit system.
    #[error("unknown constant '{0}'")]
    UnknownConstant(String),
}

/// Returned when a pipeline configuration cannot describe a physical chain.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Returned when the number of sites is zero.
    #[error("number of sites must be greater than 0")]
    NoSites,

    /// Returned when the spatial extent is not finite and positive.
    #[error("spatial extent must be finite and greater than 0; got {0}")]
    BadExtent(f64),

    /// Returned when the potential stiffness is not finite.
    #[error("potential stiffness must be finite; got {0}")]
    BadStiffness(f64),

    /// Returned when the QL sweep bound is zero.
    #[error("maxiters must be greater than 0; got {0}")]
    BadMaxiters(usize),

    /// Returned when the particle mass or reduced Planck constant resolves to
    /// a non-positive value, which would make the hopping amplitude
    /// unphysical.
    #[error("hopping amplitude must be finite and greater than 0; got {0}")]
    BadHopping(f64),
}

impl ConfigError {
    pub(crate) fn check_hopping(t: f64) -> Result<(), Self> {
        (t.is_finite() && t > 0.0).then_some(()).ok_or(Self::BadHopping(t))
    }
}

/// Returned from a [`Renderer`][crate::render::Renderer] backend.
#[derive(Debug, Error)]
#[error("render error: {0}")]
pub struct RenderError(pub Box<dyn std::error::Error + Send + Sync + 'static>);

impl RenderError {
    /// Wrap any backend error.
    pub fn new<E>(err: E) -> Self
    where E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>
    {
        Self(err.into())
    }
}

/// Returned from the pipeline entry points in [`pipeline`][crate::pipeline].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// [`ConfigError`]
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// [`UnitError`]
    #[error("unit error: {0}")]
    Unit(#[from] UnitError),

    /// [`ModelError`]
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// [`DiagError`]
    #[error("diagonalization error: {0}")]
    Diag(#[from] DiagError),

    /// [`PropError`]
    #[error("property error: {0}")]
    Prop(#[from] PropError),

    /// [`RenderError`]
    #[error("{0}")]
    Render(#[from] RenderError),
}
