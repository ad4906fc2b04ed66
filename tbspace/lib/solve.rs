//! Dense diagonalization of Hermitian operators.
//!
//! By default the operator is handed to LAPACK's Hermitian eigensolver
//! through `ndarray-linalg`. A self-contained alternative reduces the
//! operator to real symmetric tridiagonal form with Householder reflections
//! and a diagonal phase rotation, then finds the eigenpairs of the
//! tridiagonal matrix by implicitly shifted QL iteration. Both are backward
//! stable for Hermitian input. See [`docs`][crate::docs#diagonalization] for
//! details.

use ndarray as nd;
use ndarray_linalg::{ self as la, EighInto, error::LinalgError };
use num_complex::Complex64 as C64;
use crate::{
    error::{ ConvergenceError, DiagError, DimensionError },
    model::{ Model, first_non_hermitian },
    DEF_MAXITERS,
};

pub type DResult<T> = Result<T, DiagError>;

// per-eigenvalue sweep limit of LAPACK's ?steqr, used by ?heev
const LAPACK_MAXITERS: usize = 30;

/// The full set of eigenpairs of a Hermitian operator.
///
/// Eigenvalues are stored in ascending order; the `k`-th column of the
/// eigenvector matrix is the normalized eigenvector belonging to the `k`-th
/// eigenvalue.
#[derive(Clone, Debug)]
pub struct Spectrum {
    evals: nd::Array1<f64>,
    evecs: nd::Array2<C64>,
}

impl Spectrum {
    /// Get the number of eigenpairs.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.evals.len() }

    /// Get a reference to the (ascending) eigenvalues.
    pub fn eigenvalues(&self) -> &nd::Array1<f64> { &self.evals }

    /// Get a reference to the eigenvector matrix.
    pub fn eigenvectors(&self) -> &nd::Array2<C64> { &self.evecs }

    /// Get a view of the `k`-th eigenvector.
    ///
    /// *Panics if `k` is out of bounds*.
    pub fn eigenvector(&self, k: usize) -> nd::ArrayView1<C64> {
        self.evecs.column(k)
    }

    /// Reassemble the operator `V diag(λ) V†` from its eigenpairs.
    pub fn reconstruct(&self) -> nd::Array2<C64> {
        let scaled: nd::Array2<C64>
            = &self.evecs * &self.evals.mapv(C64::from).insert_axis(nd::Axis(0));
        scaled.dot(&self.evecs.t().mapv(|v| v.conj()))
    }
}

/// Diagonalization method selector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// LAPACK's Hermitian eigensolver (`zheev`), via `ndarray-linalg`.
    #[default]
    Lapack,
    /// Householder tridiagonalization followed by implicit QL iteration.
    Householder,
}

impl Method {
    /// All available methods.
    pub const ALL: [Self; 2] = [Self::Lapack, Self::Householder];
}

/// Solver for constructed [`Model`]s.
#[derive(Copy, Clone, Debug)]
pub struct Diagonalizer {
    /// Maximum number of QL sweeps allowed per eigenvalue (default: `30`).
    ///
    /// Only [`Method::Householder`] honors this; LAPACK uses its own fixed
    /// limit of 30.
    pub maxiters: usize,
    /// Diagonalization method (default: [`Method::Lapack`]).
    pub method: Method,
}

impl Default for Diagonalizer {
    fn default() -> Self {
        Self { maxiters: DEF_MAXITERS, method: Method::default() }
    }
}

impl Diagonalizer {
    /// Create a new `Diagonalizer` with default settings.
    pub fn new() -> Self { Self::default() }

    /// Set the maximum number of QL sweeps per eigenvalue.
    pub fn with_maxiters(mut self, maxiters: usize) -> Self {
        self.maxiters = maxiters;
        self
    }

    /// Set the diagonalization method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Compute all eigenpairs of a constructed model.
    pub fn run(&self, model: &Model) -> DResult<Spectrum> {
        let h = model.matrix().map_err(|_| DiagError::Unconstructed)?;
        self.diagonalize(&h)
    }

    /// Compute all eigenpairs of a Hermitian matrix.
    pub fn diagonalize(&self, h: &nd::ArrayView2<C64>) -> DResult<Spectrum> {
        log::debug!(
            "diagonalize: {n}×{n} operator, method {:?}",
            self.method,
            n = h.nrows(),
        );
        let (evals, evecs) = match self.method {
            Method::Lapack => eigh(h)?,
            Method::Householder => eigh_ql(h, self.maxiters)?,
        };
        Ok(Spectrum { evals, evecs })
    }
}

// check that `h` is square, non-empty, and Hermitian to within round-off,
// returning its largest element magnitude
fn check_hermitian(h: &nd::ArrayView2<C64>) -> DResult<f64> {
    DimensionError::check_shape(h.shape())?;
    let scale = h.iter().map(|hij| hij.norm()).fold(0.0, f64::max);
    let tol = 64.0 * f64::EPSILON * scale * h.nrows() as f64;
    if let Some((i, j)) = first_non_hermitian(h, tol) {
        log::warn!("diagonalize: H[{i}][{j}] != conj(H[{j}][{i}])");
        return Err(DiagError::NotHermitian(i, j));
    }
    Ok(scale)
}

// failures of ?heev with a positive return code are convergence failures
fn lapack_error(err: LinalgError) -> DiagError {
    match err {
        LinalgError::Lapack(
            lax::error::Error::LapackComputationalFailure { return_code }
        ) if return_code > 0 => {
            ConvergenceError {
                index: return_code as usize,
                maxiters: LAPACK_MAXITERS,
            }.into()
        },
        err => err.into(),
    }
}

/// Compute all eigenvalues (ascending) and normalized eigenvectors (as
/// columns) of a Hermitian matrix using LAPACK.
///
/// Fails if `h` is not square, is empty, or is not Hermitian to within
/// round-off, or if LAPACK fails to converge.
///
/// ```
/// use ndarray as nd;
/// use num_complex::Complex64 as C64;
/// use tbspace::solve::eigh;
///
/// // Pauli-y
/// let h: nd::Array2<C64> = nd::array![
///     [C64::new(0.0, 0.0), C64::new(0.0, -1.0)],
///     [C64::new(0.0, 1.0), C64::new(0.0, 0.0)],
/// ];
/// let (evals, _evecs) = eigh(&h.view()).unwrap();
/// assert!((evals[0] + 1.0).abs() < 1e-12);
/// assert!((evals[1] - 1.0).abs() < 1e-12);
/// ```
pub fn eigh(h: &nd::ArrayView2<C64>)
    -> DResult<(nd::Array1<f64>, nd::Array2<C64>)>
{
    check_hermitian(h)?;
    let (evals, evecs): (nd::Array1<f64>, nd::Array2<C64>)
        = h.to_owned().eigh_into(la::UPLO::Lower).map_err(lapack_error)?;
    let (evals, evecs) = sorted(evals, evecs);
    log::trace!("diagonalize: eigenvalue range [{}, {}]",
        evals[0], evals[evals.len() - 1]);
    Ok((evals, evecs))
}

/// Like [`eigh`], but using Householder tridiagonalization and implicit QL
/// iteration instead of LAPACK.
///
/// The matrix is normalized by its largest element before the reduction, so
/// the result does not depend on its overall scale. Fails with
/// [`ConvergenceError`] if the QL iteration needs more than `maxiters` sweeps
/// to isolate any single eigenvalue.
pub fn eigh_ql(h: &nd::ArrayView2<C64>, maxiters: usize)
    -> DResult<(nd::Array1<f64>, nd::Array2<C64>)>
{
    let scale = check_hermitian(h)?;
    let n = h.nrows();
    if scale == 0.0 {
        return Ok((nd::Array1::zeros(n), nd::Array2::eye(n)));
    }
    let hs: nd::Array2<C64> = h.mapv(|hij| hij / scale);
    let (d, e, q) = tridiagonalize(&hs.view());
    let (evals, z) = tql(d, e, maxiters)?;
    let evecs = q.dot(&z.mapv(C64::from));
    let (evals, evecs) = sorted(evals.mapv(|l| l * scale), evecs);
    log::trace!("diagonalize: eigenvalue range [{}, {}]",
        evals[0], evals[evals.len() - 1]);
    Ok((evals, evecs))
}

// reduce a Hermitian matrix to real symmetric tridiagonal form
//
// returns the diagonal `d`, the sub-diagonal `e` (padded with a trailing zero
// to length n), and the unitary `q` such that h = q T q†, with T the real
// tridiagonal matrix
fn tridiagonalize(h: &nd::ArrayView2<C64>)
    -> (Vec<f64>, Vec<f64>, nd::Array2<C64>)
{
    let n = h.nrows();
    let mut a: nd::Array2<C64> = h.to_owned();
    let mut q: nd::Array2<C64> = nd::Array2::eye(n);
    let zero = C64::from(0.0);

    for k in 0..n.saturating_sub(2) {
        // reflect a[k+1.., k] onto a multiple of the first unit vector
        let mut v: nd::Array1<C64> = a.slice(nd::s![k + 1.., k]).to_owned();
        let alpha = v.iter().map(|vi| vi.norm_sqr()).sum::<f64>().sqrt();
        if alpha == 0.0 { continue; }
        let phase
            = if v[0].norm() == 0.0 { C64::from(1.0) } else { v[0] / v[0].norm() };
        v[0] += phase * alpha;
        let vnorm2: f64 = v.iter().map(|vi| vi.norm_sqr()).sum();
        if vnorm2 == 0.0 { continue; }
        let beta = 2.0 / vnorm2;

        // trailing block: B ← P B P, P = 1 - β v v†
        let mut b = a.slice_mut(nd::s![k + 1.., k + 1..]);
        let p: nd::Array1<C64> = b.dot(&v).mapv(|pi| pi * beta);
        let kk: f64
            = 0.5 * beta
            * v.iter().zip(&p).map(|(vi, pi)| vi.conj() * pi).sum::<C64>().re;
        let w: nd::Array1<C64> = &p - &v.mapv(|vi| vi * kk);
        let m = v.len();
        for i in 0..m {
            for j in 0..m {
                b[[i, j]] -= v[i] * w[j].conj() + w[i] * v[j].conj();
            }
        }

        // column/row k now hold -phase α in their first sub-diagonal slot
        let sub = -phase * alpha;
        a.slice_mut(nd::s![k + 1.., k]).fill(zero);
        a.slice_mut(nd::s![k, k + 1..]).fill(zero);
        a[[k + 1, k]] = sub;
        a[[k, k + 1]] = sub.conj();

        // accumulate q ← q P
        let mut qs = q.slice_mut(nd::s![.., k + 1..]);
        let qv: nd::Array1<C64> = qs.dot(&v).mapv(|x| x * beta);
        for i in 0..n {
            for j in 0..m {
                qs[[i, j]] -= qv[i] * v[j].conj();
            }
        }
    }

    // rotate away the phases of the sub-diagonal: T = D T' D†, with T' real
    let d: Vec<f64> = (0..n).map(|i| a[[i, i]].re).collect();
    let mut e: Vec<f64> = vec![0.0; n];
    let mut delta = C64::from(1.0);
    for i in 0..n {
        if i > 0 {
            let ei = a[[i, i - 1]];
            let r = ei.norm();
            e[i - 1] = r;
            if r != 0.0 { delta *= ei / r; }
        }
        q.column_mut(i).mapv_inplace(|qji| qji * delta);
    }
    (d, e, q)
}

// implicitly shifted QL iteration on a real symmetric tridiagonal matrix with
// diagonal `d` and sub-diagonal `e` (e[i] couples i and i + 1; e[n - 1] is
// ignored)
//
// returns the (unsorted) eigenvalues and the orthogonal matrix of
// eigenvectors
fn tql(mut d: Vec<f64>, mut e: Vec<f64>, maxiters: usize)
    -> DResult<(nd::Array1<f64>, nd::Array2<f64>)>
{
    let n = d.len();
    let mut z: nd::Array2<f64> = nd::Array2::eye(n);
    if n > 0 { e[n - 1] = 0.0; }

    for l in 0..n {
        let mut iter: usize = 0;
        loop {
            // look for a single small sub-diagonal element to split the matrix
            let mut m = l;
            while m + 1 < n {
                let dd = d[m].abs() + d[m + 1].abs();
                if e[m].abs() <= f64::EPSILON * dd { break; }
                m += 1;
            }
            if m == l { break; }
            if iter == maxiters {
                return Err(ConvergenceError { index: l, maxiters }.into());
            }
            iter += 1;

            let mut g = (d[l + 1] - d[l]) / (2.0 * e[l]);
            let mut r = g.hypot(1.0);
            g = d[m] - d[l] + e[l] / (g + r.copysign(g));
            let (mut s, mut c, mut p) = (1.0, 1.0, 0.0);
            let mut deflated = false;
            for i in (l..m).rev() {
                let f = s * e[i];
                let b = c * e[i];
                r = f.hypot(g);
                e[i + 1] = r;
                if r == 0.0 {
                    // recover from underflow
                    d[i + 1] -= p;
                    e[m] = 0.0;
                    deflated = true;
                    break;
                }
                s = f / r;
                c = g / r;
                g = d[i + 1] - p;
                r = (d[i] - g) * s + 2.0 * c * b;
                p = s * r;
                d[i + 1] = g + p;
                g = c * r - b;
                for k in 0..n {
                    let f = z[[k, i + 1]];
                    z[[k, i + 1]] = s * z[[k, i]] + c * f;
                    z[[k, i]] = c * z[[k, i]] - s * f;
                }
            }
            if deflated { continue; }
            d[l] -= p;
            e[l] = g;
            e[m] = 0.0;
        }
        log::trace!("diagonalize: eigenvalue {l} isolated after {iter} sweeps");
    }
    Ok((nd::Array1::from(d), z))
}

// sort eigenpairs by ascending eigenvalue
fn sorted(evals: nd::Array1<f64>, evecs: nd::Array2<C64>)
    -> (nd::Array1<f64>, nd::Array2<C64>)
{
    let mut idx: Vec<usize> = (0..evals.len()).collect();
    idx.sort_by(|&i, &j| evals[i].total_cmp(&evals[j]));
    let evals: nd::Array1<f64> = idx.iter().map(|&i| evals[i]).collect();
    let evecs: nd::Array2<C64> = evecs.select(nd::Axis(1), &idx);
    (evals, evecs)
}

#[cfg(test)]
mod tests {
    use rand::{ Rng, SeedableRng, rngs::StdRng };
    use super::*;

    fn random_hermitian(rng: &mut StdRng, n: usize) -> nd::Array2<C64> {
        let mut h: nd::Array2<C64> = nd::Array2::zeros((n, n));
        for i in 0..n {
            h[[i, i]] = C64::from(rng.gen_range(-1.0..1.0_f64));
            for j in 0..i {
                let hij = C64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                h[[i, j]] = hij;
                h[[j, i]] = hij.conj();
            }
        }
        h
    }

    fn max_abs_diff(a: &nd::Array2<C64>, b: &nd::Array2<C64>) -> f64 {
        a.iter().zip(b)
            .map(|(aij, bij)| (aij - bij).norm())
            .fold(0.0, f64::max)
    }

    fn solver(method: Method) -> Diagonalizer {
        Diagonalizer::new().with_method(method)
    }

    #[test]
    fn tridiagonal_laplacian() {
        let mut model = Model::new(3);
        for i in 0..3 {
            model.add_coupling_term(2.0, i, i, true).unwrap();
            if i + 1 < 3 {
                model.add_coupling_term(-1.0, i, i + 1, true).unwrap();
            }
        }
        model.construct();
        let expected = [2.0 - 2.0_f64.sqrt(), 2.0, 2.0 + 2.0_f64.sqrt()];
        for method in Method::ALL {
            let spectrum = solver(method).run(&model).unwrap();
            assert_eq!(spectrum.len(), 3);
            for (ev, ex) in spectrum.eigenvalues().iter().zip(expected) {
                assert!((ev - ex).abs() < 1e-9, "{method:?}: {ev} vs {ex}");
            }
        }
    }

    #[test]
    fn single_site() {
        let mut model = Model::new(1);
        model.add_coupling_term(5.0, 0, 0, true).unwrap();
        model.construct();
        for method in Method::ALL {
            let spectrum = solver(method).run(&model).unwrap();
            assert!((spectrum.eigenvalues()[0] - 5.0).abs() < 1e-12);
            assert!((spectrum.eigenvector(0)[0].norm() - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn random_hermitian_decomposition() {
        let mut rng = StdRng::seed_from_u64(602214076);
        for n in [2, 3, 5, 8, 17, 40] {
            let h = random_hermitian(&mut rng, n);
            for method in Method::ALL {
                let spectrum = solver(method).diagonalize(&h.view()).unwrap();
                let evals = spectrum.eigenvalues();
                assert_eq!(evals.len(), n);
                assert!(evals.windows(2).into_iter().all(|w| w[0] <= w[1]));

                let v = spectrum.eigenvectors();
                let overlap = v.t().mapv(|x| x.conj()).dot(v);
                let eye: nd::Array2<C64> = nd::Array2::eye(n);
                assert!(max_abs_diff(&overlap, &eye) < 1e-12, "{method:?}, n = {n}");
                assert!(
                    max_abs_diff(&spectrum.reconstruct(), &h) < 1e-12,
                    "{method:?}, n = {n}",
                );
            }
        }
    }

    #[test]
    fn methods_agree() {
        let mut rng = StdRng::seed_from_u64(1380649);
        let h = random_hermitian(&mut rng, 12);
        let (e_lapack, _) = eigh(&h.view()).unwrap();
        let (e_ql, _) = eigh_ql(&h.view(), DEF_MAXITERS).unwrap();
        for (a, b) in e_lapack.iter().zip(&e_ql) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn extreme_scales() {
        let mut rng = StdRng::seed_from_u64(6);
        let h = random_hermitian(&mut rng, 6);
        let (reference, _) = eigh(&h.view()).unwrap();
        let exps = [-170, -160, -100, -10, 0, 10, 100, 160, 170];
        for method in Method::ALL {
            for p in exps {
                let s = 10.0_f64.powi(p);
                let hs = h.mapv(|hij| hij * s);
                let spectrum = solver(method).diagonalize(&hs.view()).unwrap();
                for (ev, ex) in spectrum.eigenvalues().iter().zip(&reference) {
                    assert!(
                        (ev / s - ex).abs() < 1e-10 * ex.abs().max(1.0),
                        "{method:?}, s = 1e{p}: {} vs {ex}", ev / s,
                    );
                }
                let err = max_abs_diff(&spectrum.reconstruct(), &hs) / s;
                assert!(err < 1e-12, "{method:?}, s = 1e{p}: {err}");
            }
        }
    }

    #[test]
    fn degenerate_spectrum() {
        // two decoupled copies of the same 2-site dimer
        let mut model = Model::new(4);
        model
            .add_coupling_term(1.0, 0, 1, true).unwrap()
            .add_coupling_term(1.0, 2, 3, true).unwrap()
            .construct();
        for method in Method::ALL {
            let spectrum = solver(method).run(&model).unwrap();
            let evals = spectrum.eigenvalues();
            for (ev, ex) in evals.iter().zip([-1.0, -1.0, 1.0, 1.0]) {
                assert!((ev - ex).abs() < 1e-12);
            }
            let v = spectrum.eigenvectors();
            let overlap = v.t().mapv(|x| x.conj()).dot(v);
            assert!(max_abs_diff(&overlap, &nd::Array2::eye(4)) < 1e-12);
        }
    }

    #[test]
    fn already_diagonal() {
        let h: nd::Array2<C64> = nd::Array2::from_diag(
            &nd::array![3.0, -1.0, 2.0, 0.0].mapv(C64::from));
        for method in Method::ALL {
            let spectrum = solver(method).diagonalize(&h.view()).unwrap();
            let evals = spectrum.eigenvalues();
            for (ev, ex) in evals.iter().zip([-1.0, 0.0, 2.0, 3.0]) {
                assert!((ev - ex).abs() < 1e-15);
            }
            let evecs = spectrum.eigenvectors();
            assert!((evecs[[1, 0]].norm() - 1.0).abs() < 1e-15);
            assert!((evecs[[3, 1]].norm() - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn zero_matrix() {
        let h: nd::Array2<C64> = nd::Array2::zeros((3, 3));
        for method in Method::ALL {
            let spectrum = solver(method).diagonalize(&h.view()).unwrap();
            assert!(spectrum.eigenvalues().iter().all(|ev| *ev == 0.0));
            let v = spectrum.eigenvectors();
            let overlap = v.t().mapv(|x| x.conj()).dot(v);
            assert!(max_abs_diff(&overlap, &nd::Array2::eye(3)) < 1e-15);
        }
    }

    #[test]
    fn bad_shapes() {
        for method in Method::ALL {
            let h: nd::Array2<C64> = nd::Array2::zeros((2, 3));
            assert!(matches!(
                solver(method).diagonalize(&h.view()),
                Err(DiagError::Dimension(DimensionError::NotSquare(2, 3)))
            ));
            let h: nd::Array2<C64> = nd::Array2::zeros((0, 0));
            assert!(matches!(
                solver(method).diagonalize(&h.view()),
                Err(DiagError::Dimension(DimensionError::Empty))
            ));
            let mut model = Model::new(0);
            model.construct();
            assert!(matches!(
                solver(method).run(&model),
                Err(DiagError::Dimension(DimensionError::Empty))
            ));
        }
    }

    #[test]
    fn non_hermitian_input() {
        let h: nd::Array2<C64> = nd::array![
            [C64::from(1.0), C64::from(2.0)],
            [C64::from(0.0), C64::from(1.0)],
        ];
        for method in Method::ALL {
            assert!(matches!(
                solver(method).diagonalize(&h.view()),
                Err(DiagError::NotHermitian(0, 1))
            ));
        }
    }

    #[test]
    fn unconstructed_model() {
        let mut model = Model::new(2);
        model.add_coupling_term(1.0, 0, 0, true).unwrap();
        for method in Method::ALL {
            assert!(matches!(
                solver(method).run(&model),
                Err(DiagError::Unconstructed)
            ));
        }
    }

    #[test]
    fn sweep_limit_is_enforced() {
        let mut rng = StdRng::seed_from_u64(299792458);
        let h = random_hermitian(&mut rng, 10);
        assert!(matches!(
            solver(Method::Householder).with_maxiters(0).diagonalize(&h.view()),
            Err(DiagError::Convergence(ConvergenceError { index: 0, maxiters: 0 }))
        ));
    }

    #[test]
    fn lapack_failures() {
        let err = lapack_error(LinalgError::Lapack(
            lax::error::Error::LapackComputationalFailure { return_code: 2 }));
        assert!(matches!(
            err,
            DiagError::Convergence(ConvergenceError { index: 2, maxiters: 30 })
        ));
        let err = lapack_error(LinalgError::Lapack(
            lax::error::Error::LapackInvalidValue { return_code: -3 }));
        assert!(matches!(err, DiagError::Linalg(_)));
    }
}
