//! The physical constants of a Landau-Zener sweep.

use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::error::ParamError;

pub type PResult<T> = Result<T, ParamError>;

/// Coupling strength, sweep slope, reduced Planck constant and time
/// half-width for a single linear sweep through an avoided crossing.
///
/// Values are validated once on construction and are read-only afterward; every
/// other component borrows (or copies) a `Params` rather than holding its own
/// constants.
///
/// The integration window is `[-τ₀ / a, τ₀ / a]`, symmetric about the crossing
/// at `t = 0`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct Params {
    w: f64,
    a: f64,
    hbar: f64,
    tau0: f64,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default)]
struct RawParams {
    w: f64,
    a: f64,
    hbar: f64,
    tau0: f64,
}

impl Default for RawParams {
    fn default() -> Self {
        let Params { w, a, hbar, tau0 } = Params::default();
        Self { w, a, hbar, tau0 }
    }
}

impl TryFrom<RawParams> for Params {
    type Error = ParamError;

    fn try_from(raw: RawParams) -> PResult<Self> {
        Self::new(raw.w, raw.a, raw.hbar, raw.tau0)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self { w: 1.0, a: 0.1, hbar: 1.0, tau0: 10.0 }
    }
}

impl Params {
    /// Create a new parameter set.
    ///
    /// Fails if any value is non-finite, if `w`, `hbar`, or `tau0` is not
    /// strictly positive, or if `a` is zero.
    pub fn new(w: f64, a: f64, hbar: f64, tau0: f64) -> PResult<Self> {
        ParamError::check_finite("w", w)?;
        ParamError::check_finite("a", a)?;
        ParamError::check_finite("hbar", hbar)?;
        ParamError::check_finite("tau0", tau0)?;
        (w > 0.0).then_some(()).ok_or(ParamError::BadCoupling(w))?;
        (a != 0.0).then_some(()).ok_or(ParamError::ZeroSlope)?;
        (hbar > 0.0).then_some(()).ok_or(ParamError::BadHbar(hbar))?;
        (tau0 > 0.0).then_some(()).ok_or(ParamError::BadTau(tau0))?;
        Ok(Self { w, a, hbar, tau0 })
    }

    /// Return a copy with a different coupling strength.
    pub fn with_w(&self, w: f64) -> PResult<Self> {
        Self::new(w, self.a, self.hbar, self.tau0)
    }

    /// Return a copy with a different sweep slope.
    pub fn with_a(&self, a: f64) -> PResult<Self> {
        Self::new(self.w, a, self.hbar, self.tau0)
    }

    /// Coupling strength *W*.
    pub fn w(&self) -> f64 { self.w }

    /// Sweep slope *a*.
    pub fn a(&self) -> f64 { self.a }

    /// Reduced Planck constant *ħ*.
    pub fn hbar(&self) -> f64 { self.hbar }

    /// Time half-width *τ*₀.
    pub fn tau0(&self) -> f64 { self.tau0 }

    /// Start of the integration window, `-τ₀ / a`.
    pub fn t_min(&self) -> f64 { -self.tau0 / self.a }

    /// End of the integration window, `τ₀ / a`.
    pub fn t_max(&self) -> f64 { self.tau0 / self.a }

    /// `(t_min, t_max)`.
    pub fn t_bounds(&self) -> (f64, f64) { (self.t_min(), self.t_max()) }

    /// Energy detuning `ε(t) = a t`.
    pub fn epsilon(&self, t: f64) -> f64 { self.a * t }

    /// Dimensionless adiabaticity parameter `Γ = W² / (ħ a)`.
    pub fn adiabaticity(&self) -> f64 {
        self.w.powi(2) / (self.hbar * self.a)
    }

    /// `n` evenly spaced times covering the integration window, endpoints
    /// included.
    pub fn eval_times(&self, n: usize) -> PResult<nd::Array1<f64>> {
        (n >= 2).then_some(()).ok_or(ParamError::BadSamples(n))?;
        let (t0, t1) = self.t_bounds();
        Ok(nd::Array1::linspace(t0, t1, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window() {
        let p = Params::default();
        assert_eq!(p.t_bounds(), (-100.0, 100.0));
        assert!(p.t_min() < 0.0 && 0.0 < p.t_max());
        assert_eq!(p.epsilon(0.0), 0.0);
        assert!((p.adiabaticity() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(Params::new(0.0, 0.1, 1.0, 10.0), Err(ParamError::BadCoupling(_))));
        assert!(matches!(Params::new(1.0, 0.0, 1.0, 10.0), Err(ParamError::ZeroSlope)));
        assert!(matches!(Params::new(1.0, 0.1, 0.0, 10.0), Err(ParamError::BadHbar(_))));
        assert!(matches!(Params::new(1.0, 0.1, 1.0, -1.0), Err(ParamError::BadTau(_))));
        assert!(matches!(Params::new(f64::NAN, 0.1, 1.0, 10.0), Err(ParamError::NonFinite("w"))));
    }

    #[test]
    fn eval_times_cover_window() {
        let p = Params::default();
        let t = p.eval_times(1000).unwrap();
        assert_eq!(t.len(), 1000);
        assert_eq!(t[0], p.t_min());
        assert!((t[999] - p.t_max()).abs() < 1e-12);
        assert!(p.eval_times(1).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let p: Params = toml::from_str("w = 2.0").unwrap();
        assert_eq!(p.w(), 2.0);
        assert_eq!(p.a(), 0.1);
        let bad: Result<Params, _> = toml::from_str("a = 0.0");
        assert!(bad.is_err());
    }
}
