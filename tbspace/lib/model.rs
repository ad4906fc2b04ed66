//! Assembly of coupling terms into a finite-dimensional Hermitian operator.
//!
//! ```
//! use tbspace::model::Model;
//!
//! let mut model = Model::new(2);
//! model
//!     .add_coupling_term(1.0, 0, 0, true).unwrap()
//!     .add_coupling_term(-0.5, 0, 1, true).unwrap();
//! model.construct();
//! let h = model.matrix().unwrap();
//! assert_eq!(h[[1, 0]], h[[0, 1]].conj());
//! assert!(model.add_coupling_term(1.0, 1, 1, true).is_err());
//! ```

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::error::{ DimensionError, ModelError, SealedError };

pub type MResult<T> = Result<T, ModelError>;

/// A single contribution to the operator, representing the matrix element
/// `H[to][from] = amplitude`.
///
/// If `hc` is set, the Hermitian-conjugate element
/// `H[from][to] = conj(amplitude)` is implied as well. Diagonal terms are
/// self-conjugate and are only ever applied once.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CouplingTerm {
    /// Matrix element.
    pub amplitude: C64,
    /// Column index.
    pub from: usize,
    /// Row index.
    pub to: usize,
    /// Whether the Hermitian-conjugate term is implied.
    pub hc: bool,
}

impl CouplingTerm {
    /// Create a new term without its Hermitian conjugate.
    pub fn new<A>(amplitude: A, from: usize, to: usize) -> Self
    where A: Into<C64>
    {
        Self { amplitude: amplitude.into(), from, to, hc: false }
    }

    /// Mark `self` as a Hermitian-conjugate pair.
    pub fn hc(mut self) -> Self {
        self.hc = true;
        self
    }

    /// Return `true` if `self` lies on the diagonal.
    pub fn is_diagonal(&self) -> bool { self.from == self.to }

    /// Return `true` if `self` is a diagonal term with a non-zero imaginary
    /// part, which no choice of `hc` can make Hermitian.
    pub fn is_complex_diagonal(&self) -> bool {
        self.is_diagonal() && self.amplitude.im != 0.0
    }
}

/// An operator under assembly.
///
/// Coupling terms accumulate additively into an `n × n` complex matrix until
/// [`construct`][Self::construct] is called, after which the model is sealed:
/// the matrix becomes readable and every further attempt to add a term fails
/// with [`SealedError`].
#[derive(Clone, Debug)]
pub struct Model {
    // operator dimension
    n: usize,
    // accumulated matrix elements
    h: nd::Array2<C64>,
    // number of terms applied so far
    num_terms: usize,
    sealed: bool,
}

impl Model {
    /// Create a new, empty model over `n` sites.
    pub fn new(n: usize) -> Self {
        Self { n, h: nd::Array2::zeros((n, n)), num_terms: 0, sealed: false }
    }

    /// Add a single coupling term.
    ///
    /// `amplitude` is added to `H[to][from]` and, if `hc` is set and
    /// `from != to`, its complex conjugate is added to `H[from][to]`. Both
    /// indices are checked before anything is applied, so a failed call leaves
    /// the model unchanged.
    pub fn add_coupling_term<A>(
        &mut self,
        amplitude: A,
        from: usize,
        to: usize,
        hc: bool,
    ) -> MResult<&mut Self>
    where A: Into<C64>
    {
        SealedError::check(self.sealed)?;
        DimensionError::check_index(from, self.n)?;
        DimensionError::check_index(to, self.n)?;
        let amplitude: C64 = amplitude.into();
        if from == to && amplitude.im != 0.0 {
            log::warn!(
                "model: complex amplitude {amplitude} on diagonal element \
                H[{to}][{to}] makes the operator non-Hermitian"
            );
        }
        self.h[[to, from]] += amplitude;
        if hc && from != to {
            self.h[[from, to]] += amplitude.conj();
        }
        self.num_terms += 1;
        log::trace!(
            "model: H[{to}][{from}] += {amplitude}{}",
            if hc { " + h.c." } else { "" },
        );
        Ok(self)
    }

    /// Add a single [`CouplingTerm`].
    pub fn add(&mut self, term: CouplingTerm) -> MResult<&mut Self> {
        self.add_coupling_term(term.amplitude, term.from, term.to, term.hc)
    }

    /// Add a sequence of [`CouplingTerm`]s in order, stopping at the first
    /// failure.
    ///
    /// Terms preceding a failing one remain applied.
    pub fn add_terms<I>(&mut self, terms: I) -> MResult<&mut Self>
    where I: IntoIterator<Item = CouplingTerm>
    {
        for term in terms.into_iter() {
            self.add(term)?;
        }
        Ok(self)
    }

    /// Seal the model, finalizing the operator.
    ///
    /// Calling this more than once has no further effect.
    pub fn construct(&mut self) -> &mut Self {
        if !self.sealed {
            log::debug!(
                "model: constructed {n}×{n} operator from {} terms",
                self.num_terms,
                n = self.n,
            );
            let scale = self.h.iter().map(|hij| hij.norm()).fold(0.0, f64::max);
            let tol = 64.0 * f64::EPSILON * scale * self.n as f64;
            if let Some((i, j)) = first_non_hermitian(&self.h.view(), tol) {
                log::warn!(
                    "model: constructed operator is not Hermitian at ({i}, {j})");
            }
        }
        self.sealed = true;
        self
    }

    /// Return `true` if [`construct`][Self::construct] has been called.
    pub fn is_constructed(&self) -> bool { self.sealed }

    /// Get the operator dimension.
    pub fn dim(&self) -> usize { self.n }

    /// Get the number of terms applied so far.
    pub fn num_terms(&self) -> usize { self.num_terms }

    /// Get a single matrix element `H[i][j]`.
    pub fn element(&self, i: usize, j: usize) -> MResult<C64> {
        DimensionError::check_index(i, self.n)?;
        DimensionError::check_index(j, self.n)?;
        Ok(self.h[[i, j]])
    }

    /// Get a view of the finalized operator.
    ///
    /// Fails with [`ModelError::Unconstructed`] if the model is still open.
    pub fn matrix(&self) -> MResult<nd::ArrayView2<C64>> {
        self.sealed.then(|| self.h.view()).ok_or(ModelError::Unconstructed)
    }

    /// Return `true` if `H[i][j]` and `conj(H[j][i])` agree to within `tol`
    /// for all `i`, `j`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        is_hermitian(&self.h.view(), tol)
    }
}

pub(crate) fn is_hermitian(h: &nd::ArrayView2<C64>, tol: f64) -> bool {
    first_non_hermitian(h, tol).is_none()
}

// locate the first element violating H[i][j] == conj(H[j][i])
pub(crate) fn first_non_hermitian(h: &nd::ArrayView2<C64>, tol: f64)
    -> Option<(usize, usize)>
{
    let n = h.nrows();
    (0..n)
        .flat_map(|i| (i..n).map(move |j| (i, j)))
        .find(|&(i, j)| (h[[i, j]] - h[[j, i]].conj()).norm() > tol)
}

#[cfg(test)]
mod tests {
    use rand::{ Rng, SeedableRng, rngs::StdRng };
    use super::*;

    #[test]
    fn hc_pair_adds_conjugate() {
        let mut model = Model::new(3);
        model.add_coupling_term(C64::new(1.0, 2.0), 0, 2, true).unwrap();
        model.construct();
        assert_eq!(model.element(2, 0).unwrap(), C64::new(1.0, 2.0));
        assert_eq!(model.element(0, 2).unwrap(), C64::new(1.0, -2.0));
        assert!(model.is_hermitian(0.0));
    }

    #[test]
    fn non_hc_term_is_one_sided() {
        let mut model = Model::new(2);
        model.add_coupling_term(1.0, 0, 1, false).unwrap();
        assert_eq!(model.element(1, 0).unwrap(), C64::from(1.0));
        assert_eq!(model.element(0, 1).unwrap(), C64::from(0.0));
        assert!(!model.is_hermitian(1e-12));
    }

    #[test]
    fn diagonal_hc_not_double_counted() {
        let mut model = Model::new(1);
        model.add_coupling_term(5.0, 0, 0, true).unwrap();
        model.construct();
        assert_eq!(model.matrix().unwrap()[[0, 0]], C64::from(5.0));
    }

    #[test]
    fn contributions_accumulate() {
        let mut model = Model::new(2);
        model
            .add(CouplingTerm::new(2.0, 1, 1)).unwrap()
            .add(CouplingTerm::new(0.5, 1, 1).hc()).unwrap()
            .add(CouplingTerm::new(-1.0, 0, 1).hc()).unwrap()
            .add(CouplingTerm::new(-1.0, 0, 1).hc()).unwrap();
        assert_eq!(model.num_terms(), 4);
        assert_eq!(model.element(1, 1).unwrap(), C64::from(2.5));
        assert_eq!(model.element(1, 0).unwrap(), C64::from(-2.0));
        assert_eq!(model.element(0, 1).unwrap(), C64::from(-2.0));
    }

    #[test]
    fn out_of_range_site_is_rejected() {
        let mut model = Model::new(3);
        let err = model.add_coupling_term(1.0, 3, 0, true).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Dimension(DimensionError::OutOfBounds { index: 3, dim: 3 })
        ));
        let err = model.add(CouplingTerm::new(1.0, 0, 7)).unwrap_err();
        assert!(matches!(err, ModelError::Dimension(_)));
        // nothing applied, nothing resized
        assert_eq!(model.num_terms(), 0);
        assert_eq!(model.dim(), 3);
        model.construct();
        assert!(model.matrix().unwrap().iter().all(|h| *h == C64::from(0.0)));
    }

    #[test]
    fn sealed_model_rejects_terms() {
        let mut model = Model::new(2);
        model.add_coupling_term(1.0, 0, 0, true).unwrap();
        assert!(matches!(model.matrix(), Err(ModelError::Unconstructed)));
        model.construct().construct();
        assert!(model.is_constructed());
        let err = model.add_coupling_term(1.0, 1, 1, true).unwrap_err();
        assert!(matches!(err, ModelError::Sealed(SealedError)));
        let err = model.add_terms([CouplingTerm::new(1.0, 0, 1)]).unwrap_err();
        assert!(matches!(err, ModelError::Sealed(_)));
        assert_eq!(model.element(1, 1).unwrap(), C64::from(0.0));
    }

    #[test]
    fn random_terms_give_hermitian_operator() {
        let mut rng = StdRng::seed_from_u64(10546);
        let n = 12;
        for _ in 0..20 {
            let mut model = Model::new(n);
            let terms: Vec<CouplingTerm>
                = (0..60)
                .map(|_| {
                    let from = rng.gen_range(0..n);
                    let to = rng.gen_range(0..n);
                    let amp = if from == to {
                        C64::from(rng.gen_range(-1.0..1.0_f64))
                    } else {
                        C64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
                    };
                    CouplingTerm::new(amp, from, to).hc()
                })
                .collect();
            model.add_terms(terms).unwrap().construct();
            let h = model.matrix().unwrap();
            for i in 0..n {
                for j in 0..n {
                    assert!((h[[i, j]] - h[[j, i]].conj()).norm() < 1e-15);
                }
            }
        }
    }

    #[test]
    fn complex_diagonal_is_flagged() {
        let real = CouplingTerm::new(C64::new(2.0, 0.0), 1, 1).hc();
        let complex = CouplingTerm::new(C64::new(2.0, 0.5), 1, 1).hc();
        let hop = CouplingTerm::new(C64::new(0.0, 1.0), 0, 1).hc();
        assert!(!real.is_complex_diagonal());
        assert!(complex.is_complex_diagonal());
        assert!(!hop.is_complex_diagonal());

        // the term is still applied, once, and the operator is left
        // non-Hermitian for the solver to reject
        let mut model = Model::new(2);
        model.add(hop).unwrap().add(complex).unwrap().construct();
        assert_eq!(model.num_terms(), 2);
        assert_eq!(model.element(1, 1).unwrap(), C64::new(2.0, 0.5));
        assert!(!model.is_hermitian(1e-12));
        assert_eq!(
            first_non_hermitian(&model.matrix().unwrap(), 1e-12),
            Some((1, 1)),
        );
    }
}
