//! Rotation into the instantaneous (adiabatic) basis.
//!
//! The rotation is parameterized by the mixing angle
//! ```text
//! θ(t) = ½ atan2(W, ε(t))
//! ```
//! which sweeps from π/2 at large negative times to 0 at large positive times.
//! Because the basis itself depends on time, the Hamiltonian seen by the
//! rotated amplitudes picks up a non-adiabatic coupling term in addition to the
//! rotated diabatic Hamiltonian:
//! ```text
//! H_ad(t) = Uᵀ(t) H(t) U(t) - i ħ Uᵀ(t) dU/dt
//! ```
//! See [`docs`][crate::docs#adiabatic-basis] for details.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::DomainError,
    hamiltonian::{ hamiltonian, HBuild },
    params::Params,
    probability::Trajectory,
    utils::{ complexify, dagger },
};

pub type DResult<T> = Result<T, DomainError>;

/// Compute the mixing angle `θ(t) = ½ atan2(W, ε(t))`.
pub fn mixing_angle(params: &Params, t: f64) -> f64 {
    0.5 * params.w().atan2(params.epsilon(t))
}

/// Compute the time derivative of the mixing angle,
/// ```text
/// dθ/dt = -½ W a / (ε² + W²)
/// ```
/// for coupling `w`, slope `a`, and detuning `eps`.
///
/// Fails if `a` is zero, if `w` and `eps` are both zero, or if any argument is
/// non-finite.
pub fn mixing_angle_rate(w: f64, a: f64, eps: f64) -> DResult<f64> {
    DomainError::check_finite("w", w)?;
    DomainError::check_finite("a", a)?;
    DomainError::check_finite("eps", eps)?;
    (a != 0.0).then_some(()).ok_or(DomainError::ZeroSlope)?;
    (eps.powi(2) + w.powi(2) > 0.0).then_some(())
        .ok_or(DomainError::Degenerate)?;
    Ok(rate(w, a, eps))
}

// unchecked dθ/dt; requires `eps² + w² > 0`
fn rate(w: f64, a: f64, eps: f64) -> f64 {
    -0.5 * w * a / (eps.powi(2) + w.powi(2))
}

// `Params` guarantees `w > 0`, so the denominator never vanishes
fn theta_dot(params: &Params, t: f64) -> f64 {
    rate(params.w(), params.a(), params.epsilon(t))
}

/// Compute the transformation matrix
/// ```text
///        [ cos θ   -sin θ ]
/// U(t) = [                ]
///        [ sin θ    cos θ ]
/// ```
/// whose columns are the rotated basis vectors expressed in the diabatic
/// basis.
pub fn transformation_matrix(params: &Params, t: f64) -> nd::Array2<f64> {
    let (s, c) = mixing_angle(params, t).sin_cos();
    nd::array![[c, -s], [s, c]]
}

/// Compute the exact time derivative of [`transformation_matrix`],
/// ```text
///                [ -sin θ   -cos θ ]
/// dU/dt = dθ/dt  [                 ]
///                [  cos θ   -sin θ ]
/// ```
pub fn d_transformation_matrix(params: &Params, t: f64) -> nd::Array2<f64> {
    let (s, c) = mixing_angle(params, t).sin_cos();
    let dtheta = theta_dot(params, t);
    nd::array![[-s * dtheta, -c * dtheta], [c * dtheta, -s * dtheta]]
}

/// Compute `Uᵀ H U`, the diabatic Hamiltonian expressed in the rotated basis
/// without the non-adiabatic coupling term.
pub fn rotated_hamiltonian(params: &Params, t: f64) -> nd::Array2<C64> {
    let u = complexify(&transformation_matrix(params, t));
    dagger(&u).dot(&hamiltonian(params, t)).dot(&u)
}

/// Compute `U h Uᵀ`, taking a rotated-basis operator back to the diabatic
/// basis.
pub fn unrotate<S>(params: &Params, t: f64, h: &nd::ArrayBase<S, nd::Ix2>)
    -> nd::Array2<C64>
where S: nd::Data<Elem = C64>
{
    let u = complexify(&transformation_matrix(params, t));
    u.dot(h).dot(&dagger(&u))
}

/// Compute the Hamiltonian governing the rotated-basis amplitudes,
/// ```text
/// H_ad(t) = Uᵀ H U - i ħ Uᵀ dU/dt
/// ```
/// The second term is the non-adiabatic coupling; it is purely imaginary and
/// antisymmetric in the rotated basis, so `H_ad` remains Hermitian.
pub fn adiabatic_hamiltonian(params: &Params, t: f64) -> nd::Array2<C64> {
    let u = transformation_matrix(params, t);
    let du = d_transformation_matrix(params, t);
    let coupling = complexify(&u.t().dot(&du)) * (-C64::i() * params.hbar());
    rotated_hamiltonian(params, t) + coupling
}

/// Take a diabatic-basis state to the rotated basis, `ψ_ad = Uᵀ ψ`.
pub fn to_adiabatic<S>(params: &Params, t: f64, psi: &nd::ArrayBase<S, nd::Ix1>)
    -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    complexify(&transformation_matrix(params, t)).t().dot(psi)
}

/// Take a rotated-basis state to the diabatic basis, `ψ = U ψ_ad`.
pub fn to_diabatic<S>(params: &Params, t: f64, psi: &nd::ArrayBase<S, nd::Ix1>)
    -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    complexify(&transformation_matrix(params, t)).dot(psi)
}

/// Map every sample of a rotated-basis trajectory to the diabatic basis.
pub fn trajectory_to_diabatic(params: &Params, traj: &Trajectory)
    -> Trajectory
{
    let mut psi: nd::Array2<C64> = nd::Array2::zeros(traj.psi().raw_dim());
    let iter
        = traj.t().iter()
        .zip(traj.psi().axis_iter(nd::Axis(0)))
        .zip(psi.axis_iter_mut(nd::Axis(0)));
    for ((&tk, psik), psi_dk) in iter {
        to_diabatic(params, tk, &psik).move_into(psi_dk);
    }
    Trajectory::from_parts(traj.t().to_owned(), psi)
}

/// [`HBuild`] for the rotated-basis Hamiltonian [`adiabatic_hamiltonian`].
#[derive(Copy, Clone, Debug)]
pub struct Adiabatic<'a> {
    params: &'a Params,
}

impl<'a> Adiabatic<'a> {
    pub fn new(params: &'a Params) -> Self { Self { params } }

    pub fn params(&self) -> &Params { self.params }
}

impl<'a> HBuild for Adiabatic<'a> {
    fn hamiltonian(&self, t: f64) -> nd::Array2<C64> {
        adiabatic_hamiltonian(self.params, t)
    }

    fn hbar(&self) -> f64 { self.params.hbar() }
}
