//! Miscellaneous tools for small dense matrices and state vectors.

use ndarray::{ self as nd, Ix1, Ix2 };
use num_complex::Complex64 as C64;

/// Promote a real matrix to a complex one.
pub fn complexify<S>(a: &nd::ArrayBase<S, Ix2>) -> nd::Array2<C64>
where S: nd::Data<Elem = f64>
{
    a.mapv(C64::from)
}

/// Return the conjugate transpose of a complex matrix.
pub fn dagger<S>(a: &nd::ArrayBase<S, Ix2>) -> nd::Array2<C64>
where S: nd::Data<Elem = C64>
{
    a.t().mapv(|ak| ak.conj())
}

/// Return `true` if `a` is square and equal to its conjugate transpose up to
/// an absolute tolerance `tol` on every element.
pub fn is_hermitian<S>(a: &nd::ArrayBase<S, Ix2>, tol: f64) -> bool
where S: nd::Data<Elem = C64>
{
    a.is_square()
        && nd::Zip::from(a).and(a.t())
            .all(|aij, aji| (aij - aji.conj()).norm() <= tol)
}

/// Return `true` if `aᵀ a` equals the identity up to an absolute tolerance
/// `tol` on every element.
pub fn is_orthogonal<S>(a: &nd::ArrayBase<S, Ix2>, tol: f64) -> bool
where S: nd::Data<Elem = f64>
{
    if !a.is_square() { return false; }
    let n = a.nrows();
    let ata = a.t().dot(a);
    (ata - nd::Array2::<f64>::eye(n)).iter().all(|x| x.abs() <= tol)
}

/// Squared norm ‖ψ‖² of a state vector.
pub fn norm_sqr<S>(psi: &nd::ArrayBase<S, Ix1>) -> f64
where S: nd::Data<Elem = C64>
{
    psi.iter().map(|psik| psik.norm_sqr()).sum()
}

/// Return `true` if every element of a state vector is finite.
pub fn is_finite<S>(psi: &nd::ArrayBase<S, Ix1>) -> bool
where S: nd::Data<Elem = C64>
{
    psi.iter().all(|psik| psik.re.is_finite() && psik.im.is_finite())
}

/// Largest absolute difference between two arrays, compared element-wise over
/// the length of the shorter one.
pub fn max_abs_diff<S, T>(
    a: &nd::ArrayBase<S, Ix1>,
    b: &nd::ArrayBase<T, Ix1>,
) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    a.iter().zip(b)
        .map(|(ak, bk)| (ak - bk).abs())
        .fold(0.0, f64::max)
}
