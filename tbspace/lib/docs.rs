//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Discretization](#discretization)
//! - [Hermitian-conjugate pairs](#hermitian-conjugate-pairs)
//! - [Diagonalization](#diagonalization)
//! - [Units](#units)
//!
//! # Background
//! Bound states of a particle of mass *m* in a one-dimensional potential
//! *V*(*x*) are the eigenpairs of the Hamiltonian
//! ```text
//!      ħ²  ∂²
//! H = - --- --- + V(x)
//!      2 m ∂x²
//! ```
//! which is Hermitian, so that its eigenvalues (energies) are real and its
//! eigenfunctions can be chosen orthonormal. For the harmonic potential
//! *V*(*x*) = *k* *x*² / 2 the exact spectrum is *E*<sub>*n*</sub> = *ħ* *ω*
//! (*n* + 1/2) with *ω* = √(*k* / *m*), which serves as a reference for the
//! discretized problem.
//!
//! # Discretization
//! Replacing the continuous coordinate by *N* + 2 evenly spaced points
//! ```text
//! x[i] = -a/2 + i δx, i ∊ {0, ..., N + 1}, δx = a / (N + 1)
//! ```
//! and requiring the wavefunction to vanish at the two endpoints, the second
//! derivative is approximated by the three-point difference
//! ```text
//! ∂²ψ           ψ[i + 1] - 2 ψ[i] + ψ[i - 1]
//! ---  (x[i]) ≈ ----------------------------
//! ∂x²                      δx²
//! ```
//! so that *H* becomes an *N*×*N* matrix acting on the values of *ψ* at the
//! interior points (the *sites*):
//! ```text
//! H[i][i]     = 2 t + V(x[i + 1])
//! H[i + 1][i] = H[i][i + 1] = -t
//!
//!       ħ²
//! t = -------
//!     2 m δx²
//! ```
//! In the language of tight-binding models, 2*t* + *V* is an on-site energy
//! and -*t* is a hopping amplitude between nearest neighbors. The chain has
//! open boundary conditions: there is no coupling between the first and last
//! sites. The discretization error in low-lying energies is *O*(*δx*²), and
//! the spectrum is only meaningful well below the band edge 4*t*, above which
//! the lattice no longer resolves the wavefunction.
//!
//! # Hermitian-conjugate pairs
//! Operators are built as sums of *coupling terms* (*A*, *j*, *i*), each adding
//! the amplitude *A* to the matrix element *H*\[*i*\]\[*j*\]. Because *H* must
//! be Hermitian, it is convenient to mark a term as a Hermitian-conjugate
//! pair, implying that conj(*A*) is added to *H*\[*j*\]\[*i*\] as well. For
//! diagonal terms (*i* = *j*) this would double-count the contribution, so the
//! conjugate is only applied for *i* ≠ *j*; consequently, a diagonal amplitude
//! must itself be real for *H* to remain Hermitian.
//!
//! # Diagonalization
//! By default the dense Hermitian eigenproblem is handed to LAPACK (`zheev`,
//! through [`ndarray_linalg`]), after checking that the matrix is square,
//! non-empty, and Hermitian to within 64 ε max|*H*<sub>*ij*</sub>| *N*. LAPACK
//! reports a failure to converge as the number of off-diagonal elements of
//! its intermediate tridiagonal form that did not reach zero.
//!
//! A self-contained alternative ([`Method::Householder`][crate::solve::Method])
//! first divides *H* by max|*H*<sub>*ij*</sub>|, so that the rotations below
//! neither overflow nor underflow for very large or very small energy scales,
//! and then proceeds in three stages.
//!
//! First, a sequence of *N* - 2 Householder reflections
//! ```text
//! P = 1 - β v v†,  β = 2 / (v† v)
//! ```
//! reduces *H* to Hermitian tridiagonal form *T* = *Q*† *H* *Q*, each
//! reflection zeroing one column below its first sub-diagonal element. The
//! reflections are unitary, so the reduction is backward stable.
//!
//! Second, the complex sub-diagonal of *T* is made real by a diagonal unitary
//! *D* = diag(*δ*<sub>0</sub>, *δ*<sub>1</sub>, ...) with
//! ```text
//! δ[0] = 1,  δ[i] = δ[i - 1] T[i][i - 1] / |T[i][i - 1]|
//! ```
//! so that *T* = *D* *T'* *D*† with *T'* real symmetric and tridiagonal.
//!
//! Third, the eigenpairs of *T'* are found by the QL algorithm with implicit
//! (Wilkinson-type) shifts: plane rotations chase the shift-induced bulge down
//! the matrix until the sub-diagonal element next to the current eigenvalue
//! falls below machine precision relative to its diagonal neighbors. Each
//! eigenvalue is normally isolated in one to two sweeps; the solver reports a
//! convergence failure if any single eigenvalue takes more than a fixed number
//! of sweeps (30 by default). Accumulating the rotations into *Z* gives the
//! eigenvectors of *H* as the columns of *Q* *D* *Z*, which are finally sorted
//! by ascending eigenvalue, and the eigenvalues are multiplied back by the
//! scale factor.
//!
//! The total cost is *O*(*N*³), dominated by the reduction and by the
//! eigenvector accumulation.
//!
//! # Units
//! Physical constants enter the computation only through *ħ* and *m* (via
//! *t*). These are expressed in *natural units* chosen by fixing one base unit
//! for each of seven quantities: angle, charge, count, energy, length,
//! temperature, and time. Mass is derived as energy × time² / length². A
//! constant with SI value *c* and dimensions ∏ *Q*<sub>*i*</sub><sup>*p*ᵢ</sup>
//! then has the natural value
//! ```text
//! c' = c / ∏ s[i]^p[i]
//! ```
//! where *s*\[*i*\] is the SI value of the chosen base unit of *Q*<sub>*i*</sub>.
//! Choosing e.g. `"1 eV"` for energy and `"1 nm"` for length makes the
//! computed energies come out in eV when the spatial extent is given in nm.
//!
//! Items in [`units`][crate::units] handle the parsing of base units and the
//! conversion of constants.
