//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned when constructing a [`Params`][crate::params::Params] from invalid
/// physical constants.
#[derive(Debug, Error)]
pub enum ParamError {
    /// Returned when the coupling strength is not strictly positive.
    #[error("coupling strength must be greater than 0; got {0}")]
    BadCoupling(f64),

    /// Returned when the sweep slope is zero.
    #[error("sweep slope must be nonzero")]
    ZeroSlope,

    /// Returned when the reduced Planck constant is not strictly positive.
    #[error("hbar must be greater than 0; got {0}")]
    BadHbar(f64),

    /// Returned when the time half-width is not strictly positive.
    #[error("time half-width must be greater than 0; got {0}")]
    BadTau(f64),

    /// Returned when any parameter is NaN or infinite.
    #[error("parameter `{0}` must be finite")]
    NonFinite(&'static str),

    /// Returned when fewer than two sample times are requested.
    #[error("at least 2 sample times are required; got {0}")]
    BadSamples(usize),
}

impl ParamError {
    pub(crate) fn check_finite(name: &'static str, x: f64) -> Result<(), Self> {
        x.is_finite().then_some(()).ok_or(Self::NonFinite(name))
    }
}

/// Returned from closed-form expressions evaluated outside their domain.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Division by a zero sweep slope.
    #[error("sweep slope must be nonzero")]
    ZeroSlope,

    /// Division by a zero reduced Planck constant.
    #[error("hbar must be nonzero")]
    ZeroHbar,

    /// Both the coupling and the detuning vanish, leaving the mixing angle
    /// undefined.
    #[error("mixing angle is undefined for W = 0 and ε = 0")]
    Degenerate,

    /// An input was NaN or infinite.
    #[error("argument `{0}` must be finite")]
    NonFinite(&'static str),
}

impl DomainError {
    pub(crate) fn check_finite(name: &'static str, x: f64) -> Result<(), Self> {
        x.is_finite().then_some(()).ok_or(Self::NonFinite(name))
    }
}

/// Returned from the initial-value-problem driver in
/// [`timedep`][crate::timedep].
#[derive(Debug, Error)]
pub enum IvpError {
    /// Returned when a non-positive or non-finite tolerance is encountered.
    #[error("tolerances must be finite and greater than 0; got {0}")]
    BadTolerance(f64),

    /// Returned when a zero step budget is encountered.
    #[error("max_steps must be greater than 0")]
    BadMaxSteps,

    /// Returned when a non-positive or non-finite initial step is given.
    #[error("initial step must be finite and greater than 0; got {0}")]
    BadInitialStep(f64),

    /// Returned when the initial state is not a complex 2-vector.
    #[error("initial state must have length 2; got {0}")]
    BadStateLength(usize),

    /// Returned when the initial state does not have unit norm.
    #[error("initial state must have unit norm; got ‖ψ₀‖² = {0}")]
    NotNormalized(f64),

    /// Returned when fewer than two evaluation times are given.
    #[error("at least 2 evaluation times are required; got {0}")]
    TooFewTimes(usize),

    /// Returned when the integration interval is empty or reversed.
    #[error("integration interval must satisfy t_min < t_max; got ({0}, {1})")]
    BadBounds(f64, f64),

    /// Returned when evaluation times are decreasing or non-finite.
    #[error("evaluation times must be finite and non-decreasing; offending value at index {0}")]
    BadEvalTimes(usize),

    /// Returned when the total number of attempted steps exceeds the budget.
    #[error("step budget of {0} exhausted before reaching t = {1}")]
    StepBudget(usize, f64),

    /// Returned when the adaptive step shrinks below floating-point
    /// resolution.
    #[error("step size underflow at t = {0}")]
    StepUnderflow(f64),

    /// Returned when a single step is rejected too many times in a row.
    #[error("error bound could not be satisfied at t = {0}")]
    ErrorBound(f64),

    /// Returned when the state picks up NaN or infinite components.
    #[error("encountered non-finite state at t = {0}")]
    NonFinite(f64),
}

impl IvpError {
    pub(crate) fn check_tolerance(tol: f64) -> Result<(), Self> {
        (tol.is_finite() && tol > 0.0).then_some(()).ok_or(Self::BadTolerance(tol))
    }

    pub(crate) fn check_max_steps(max_steps: usize) -> Result<(), Self> {
        (max_steps != 0).then_some(()).ok_or(Self::BadMaxSteps)
    }
}

/// Returned when reading a [`Config`][crate::config::Config].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// [`std::io::Error`]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// [`toml::de::Error`]
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level error type for whole simulation runs.
#[derive(Debug, Error)]
pub enum LZError {
    /// [`ParamError`]
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),

    /// [`DomainError`]
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// [`IvpError`]
    #[error("integration error: {0}")]
    Ivp(#[from] IvpError),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`ConfigError`]
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

pub type LZResult<T> = Result<T, LZError>;
