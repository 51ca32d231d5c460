//! Solved state trajectories and the populations extracted from them.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::LengthError,
    utils::norm_sqr,
};

/// A state trajectory sampled at a series of times.
///
/// In the state array, the first (or zero-th) axis indexes time and the second
/// indexes the two basis levels.
#[derive(Clone, Debug)]
pub struct Trajectory {
    t: nd::Array1<f64>,
    psi: nd::Array2<C64>,
}

impl Trajectory {
    /// Pair an array of sample times with an array of states.
    ///
    /// Fails if the number of times differs from the number of states, or if
    /// the states are not 2-vectors.
    pub fn new(t: nd::Array1<f64>, psi: nd::Array2<C64>)
        -> Result<Self, LengthError>
    {
        let (nt, npsi) = (t.len(), psi.nrows());
        (nt == npsi).then_some(()).ok_or(LengthError(nt, npsi))?;
        (psi.ncols() == 2).then_some(()).ok_or(LengthError(2, psi.ncols()))?;
        Ok(Self { t, psi })
    }

    pub(crate) fn from_parts(t: nd::Array1<f64>, psi: nd::Array2<C64>) -> Self {
        Self { t, psi }
    }

    /// Sample times.
    pub fn t(&self) -> &nd::Array1<f64> { &self.t }

    /// States, one row per sample time.
    pub fn psi(&self) -> &nd::Array2<C64> { &self.psi }

    /// Number of samples.
    pub fn len(&self) -> usize { self.t.len() }

    pub fn is_empty(&self) -> bool { self.t.is_empty() }

    /// Final state.
    pub fn last(&self) -> Option<nd::ArrayView1<C64>> {
        (!self.is_empty()).then(|| self.psi.row(self.len() - 1))
    }

    /// ‖ψ(t)‖² at every sample time.
    pub fn norms(&self) -> nd::Array1<f64> {
        self.psi.axis_iter(nd::Axis(0))
            .map(|psik| norm_sqr(&psik))
            .collect()
    }

    /// Largest deviation of ‖ψ(t)‖² from 1 over all samples.
    pub fn max_norm_drift(&self) -> f64 {
        self.norms().iter()
            .map(|n| (n - 1.0).abs())
            .fold(0.0, f64::max)
    }
}

/// Population `|ψₖ(t)|²` of level `k` at every sample time.
///
/// *Panics if `k` is not 0 or 1*.
pub fn population(traj: &Trajectory, k: usize) -> nd::Array1<f64> {
    traj.psi().column(k).mapv(|psik| psik.norm_sqr())
}

/// Transition probability `P(t) = |ψ₁(t)|²` over a trajectory.
#[derive(Clone, Debug)]
pub struct Probability {
    /// Sample times.
    pub t: nd::Array1<f64>,
    /// `P(t)` at each sample time.
    pub p: nd::Array1<f64>,
    /// `P` at the last sample time.
    pub p_final: f64,
}

impl Probability {
    /// Largest absolute difference from another probability series.
    ///
    /// Fails if the series have different lengths.
    pub fn max_abs_diff(&self, other: &Self) -> Result<f64, LengthError> {
        LengthError::check(&self.p, &other.p)?;
        Ok(crate::utils::max_abs_diff(&self.p, &other.p))
    }
}

/// Extract the population of the second basis level over a trajectory, along
/// with its final value.
///
/// An empty trajectory yields an empty series with `p_final = NaN`.
pub fn transition_probability(traj: &Trajectory) -> Probability {
    let p = population(traj, 1);
    let p_final = p.len().checked_sub(1).map_or(f64::NAN, |n| p[n]);
    Probability { t: traj.t().to_owned(), p, p_final }
}
