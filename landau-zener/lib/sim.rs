//! Whole-run orchestration: integrate in either basis, extract the transition
//! probability, and compare against the closed-form result.

use std::fmt;
use ndarray as nd;
use num_complex::Complex64 as C64;
use tracing::info;
use crate::{
    adiabatic::{ to_adiabatic, trajectory_to_diabatic, Adiabatic },
    analytical::analytical_probability,
    config::Config,
    error::LZResult,
    hamiltonian::{ eigen_energies_series, Diabatic },
    params::Params,
    probability::{ transition_probability, Probability, Trajectory },
    timedep::evolve,
};

/// Coupling used for the weak-coupling sanity check in [`Comparison`].
pub const WEAK_COUPLING: f64 = 0.01;

/// Basis in which the state amplitudes are integrated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Basis {
    /// Fixed basis of the bare levels.
    Diabatic,
    /// Rotating basis defined by the mixing angle.
    Adiabatic,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diabatic => write!(f, "Diabatic Basis"),
            Self::Adiabatic => write!(f, "Adiabatic Basis"),
        }
    }
}

/// Choice of initial state at `t_min`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InitialState {
    /// `(1, 0)` in whichever basis is integrated.
    #[default]
    FirstLevel,
    /// The first diabatic level, expressed in the integrated basis.
    ///
    /// Identical to `FirstLevel` for [`Basis::Diabatic`]; for
    /// [`Basis::Adiabatic`] this is `Uᵀ(t_min) (1, 0)`, so that both bases
    /// describe the same physical evolution.
    DiabaticFirstLevel,
}

/// Result of integrating in a single basis.
#[derive(Clone, Debug)]
pub struct BasisRun {
    /// Basis of the amplitudes in `trajectory`.
    pub basis: Basis,
    /// Solved amplitudes.
    pub trajectory: Trajectory,
    /// Population of the second level of `basis`.
    pub probability: Probability,
}

impl BasisRun {
    /// Population of the second *diabatic* level over the run, mapping the
    /// amplitudes back through `U(t)` if they were integrated in the rotating
    /// basis.
    pub fn diabatic_probability(&self, params: &Params) -> Probability {
        match self.basis {
            Basis::Diabatic => self.probability.clone(),
            Basis::Adiabatic => transition_probability(
                &trajectory_to_diabatic(params, &self.trajectory)),
        }
    }
}

fn initial_state(params: &Params, basis: Basis, initial: InitialState)
    -> nd::Array1<C64>
{
    let first = nd::array![C64::from(1.0), C64::from(0.0)];
    match (basis, initial) {
        (Basis::Adiabatic, InitialState::DiabaticFirstLevel)
            => to_adiabatic(params, params.t_min(), &first),
        _ => first,
    }
}

/// Integrate the TDSE over the configured window in a single basis and extract
/// the transition probability.
pub fn run_basis(config: &Config, basis: Basis, initial: InitialState)
    -> LZResult<BasisRun>
{
    config.validate()?;
    let params = &config.params;
    let t = params.eval_times(config.samples)?;
    let psi0 = initial_state(params, basis, initial);
    let trajectory
        = match basis {
            Basis::Diabatic
                => evolve(&Diabatic::new(params), &psi0, &t, &config.solver)?,
            Basis::Adiabatic
                => evolve(&Adiabatic::new(params), &psi0, &t, &config.solver)?,
        };
    let probability = transition_probability(&trajectory);
    info!(%basis, p_final = probability.p_final, "basis run finished");
    Ok(BasisRun { basis, trajectory, probability })
}

/// Numerical results in both bases alongside the closed-form values.
#[derive(Clone, Debug)]
pub struct Comparison {
    /// Parameters used for the run.
    pub params: Params,
    /// Run integrated in the diabatic basis.
    pub diabatic: BasisRun,
    /// Run integrated in the rotating basis.
    pub adiabatic: BasisRun,
    /// Closed-form probability for `params`.
    pub analytical: f64,
    /// Closed-form probability with the coupling replaced by
    /// [`WEAK_COUPLING`].
    pub analytical_weak: f64,
}

impl Comparison {
    /// Final probabilities `[diabatic, adiabatic, analytical]`.
    pub fn finals(&self) -> [f64; 3] {
        [
            self.diabatic.probability.p_final,
            self.adiabatic.probability.p_final,
            self.analytical,
        ]
    }

    /// Instantaneous eigenenergies over the sample times, shape `(n, 2)`.
    pub fn eigen_energies(&self) -> nd::Array2<f64> {
        eigen_energies_series(&self.params, self.diabatic.trajectory.t())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Final Transition Probability ({}): {:.6}",
            self.diabatic.basis,
            self.diabatic.probability.p_final,
        )?;
        writeln!(
            f,
            "Final Transition Probability ({}): {:.6}",
            self.adiabatic.basis,
            self.adiabatic.probability.p_final,
        )?;
        writeln!(f, "Analytical Transition Probability: {:.6}", self.analytical)?;
        write!(
            f,
            "Analytical Probability with W -> 0: {:.6}",
            self.analytical_weak,
        )
    }
}

/// Integrate in both bases, each starting from `(1, 0)` in its own basis, and
/// evaluate the closed-form probability for the same parameters.
pub fn compare(config: &Config) -> LZResult<Comparison> {
    let params = config.params;
    let diabatic = run_basis(config, Basis::Diabatic, InitialState::FirstLevel)?;
    let adiabatic
        = run_basis(config, Basis::Adiabatic, InitialState::FirstLevel)?;
    let analytical
        = analytical_probability(params.w(), params.a(), params.hbar())?;
    let analytical_weak
        = analytical_probability(WEAK_COUPLING, params.a(), params.hbar())?;
    Ok(Comparison { params, diabatic, adiabatic, analytical, analytical_weak })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> Config {
        Config { samples: 50, ..Config::default() }
    }

    #[test]
    fn diabatic_initial_state_is_unchanged() {
        let p = Params::default();
        let a = initial_state(&p, Basis::Diabatic, InitialState::FirstLevel);
        let b = initial_state(&p, Basis::Diabatic, InitialState::DiabaticFirstLevel);
        assert_eq!(a, b);
        let c = initial_state(&p, Basis::Adiabatic, InitialState::DiabaticFirstLevel);
        assert!((crate::utils::norm_sqr(&c) - 1.0).abs() < 1e-12);
        assert!(c[1].re < 0.0);
    }

    #[test]
    fn run_has_requested_samples() {
        let config = quick();
        let run = run_basis(&config, Basis::Diabatic, InitialState::FirstLevel)
            .unwrap();
        assert_eq!(run.trajectory.len(), 50);
        assert_eq!(run.probability.p.len(), 50);
        assert_eq!(run.probability.p[0], 0.0);
        assert_eq!(run.probability.t[0], config.params.t_min());
    }

    #[test]
    fn report_format() {
        let cmp = compare(&quick()).unwrap();
        let report = cmp.to_string();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Final Transition Probability (Diabatic Basis): "));
        assert!(lines[1].starts_with("Final Transition Probability (Adiabatic Basis): "));
        assert_eq!(lines[2], "Analytical Transition Probability: 1.000000");
        assert_eq!(lines[3], "Analytical Probability with W -> 0: 0.006263");
        assert_eq!(cmp.finals()[2], cmp.analytical);
        assert_eq!(cmp.eigen_energies().dim(), (50, 2));
    }

    #[test]
    fn invalid_config_fails_before_solving() {
        let config = Config { samples: 0, ..Config::default() };
        assert!(run_basis(&config, Basis::Adiabatic, InitialState::FirstLevel).is_err());
    }
}
