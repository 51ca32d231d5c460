//! Closed-form Landau-Zener transition probability.

use std::f64::consts::TAU;
use crate::{
    error::DomainError,
    params::Params,
};

/// Compute the asymptotic Landau-Zener transition probability
/// ```text
/// P = 1 - exp(-2π W² / (ħ a))
/// ```
/// for coupling `w`, sweep slope `a`, and reduced Planck constant `hbar`.
///
/// Tends to 0 for weak coupling or fast sweeps and to 1 in the adiabatic limit.
/// Fails if `a` or `hbar` is zero, or if any argument is non-finite.
pub fn analytical_probability(w: f64, a: f64, hbar: f64)
    -> Result<f64, DomainError>
{
    DomainError::check_finite("w", w)?;
    DomainError::check_finite("a", a)?;
    DomainError::check_finite("hbar", hbar)?;
    (a != 0.0).then_some(()).ok_or(DomainError::ZeroSlope)?;
    (hbar != 0.0).then_some(()).ok_or(DomainError::ZeroHbar)?;
    let gamma = w.powi(2) / (hbar * a);
    Ok(1.0 - (-TAU * gamma).exp())
}

/// [`analytical_probability`] for a validated parameter set.
pub fn analytical_probability_for(params: &Params) -> f64 {
    1.0 - (-TAU * params.adiabaticity()).exp()
}
