//! The two-level Hamiltonian in the fixed (diabatic) basis and the trait
//! through which the integration driver consumes time-dependent
//! Hamiltonians.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::params::Params;

/// Compute the diabatic Hamiltonian
/// ```text
///        [ -ε(t)/2    W/2   ]
/// H(t) = [                  ]
///        [   W/2     ε(t)/2 ]
/// ```
/// at time `t`.
pub fn hamiltonian(params: &Params, t: f64) -> nd::Array2<C64> {
    let eps = params.epsilon(t);
    let w = params.w();
    nd::array![
        [C64::from(-eps / 2.0), C64::from(w / 2.0)],
        [C64::from(w / 2.0),    C64::from(eps / 2.0)],
    ]
}

/// Instantaneous eigenenergies `(E₋, E₊) = (-½√(ε² + W²), ½√(ε² + W²))` at
/// time `t`.
pub fn eigen_energies(params: &Params, t: f64) -> (f64, f64) {
    let half_gap = 0.5 * params.epsilon(t).hypot(params.w());
    (-half_gap, half_gap)
}

/// Evaluate [`eigen_energies`] over an array of times.
///
/// The returned array has shape `(t.len(), 2)` with columns `(E₋, E₊)`.
pub fn eigen_energies_series<S>(params: &Params, t: &nd::ArrayBase<S, nd::Ix1>)
    -> nd::Array2<f64>
where S: nd::Data<Elem = f64>
{
    let mut e: nd::Array2<f64> = nd::Array2::zeros((t.len(), 2));
    nd::Zip::from(e.axis_iter_mut(nd::Axis(0))).and(t)
        .for_each(|mut ek, &tk| {
            let (em, ep) = eigen_energies(params, tk);
            ek[0] = em;
            ek[1] = ep;
        });
    e
}

/// A source of 2×2 Hamiltonians as a function of time.
pub trait HBuild {
    /// Build the Hamiltonian at time `t`.
    fn hamiltonian(&self, t: f64) -> nd::Array2<C64>;

    /// Reduced Planck constant associated with the Hamiltonian's units.
    fn hbar(&self) -> f64;
}

/// [`HBuild`] for the diabatic-basis Hamiltonian.
#[derive(Copy, Clone, Debug)]
pub struct Diabatic<'a> {
    params: &'a Params,
}

impl<'a> Diabatic<'a> {
    pub fn new(params: &'a Params) -> Self { Self { params } }

    pub fn params(&self) -> &Params { self.params }
}

impl<'a> HBuild for Diabatic<'a> {
    fn hamiltonian(&self, t: f64) -> nd::Array2<C64> {
        hamiltonian(self.params, t)
    }

    fn hbar(&self) -> f64 { self.params.hbar() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::is_hermitian;

    #[test]
    fn crossing_point() {
        let p = Params::default();
        let h = hamiltonian(&p, 0.0);
        assert_eq!(h.dim(), (2, 2));
        assert_eq!(h[[0, 0]], C64::from(0.0));
        assert_eq!(h[[1, 1]], C64::from(0.0));
        assert_eq!(h[[0, 1]], C64::from(0.5));
        assert_eq!(h[[1, 0]], C64::from(0.5));
    }

    #[test]
    fn hermitian_everywhere() {
        let p = Params::new(0.7, 0.3, 1.0, 5.0).unwrap();
        for &t in nd::Array1::linspace(-50.0, 50.0, 101).iter() {
            assert!(is_hermitian(&hamiltonian(&p, t), 0.0));
        }
    }

    #[test]
    fn eigen_energies_match_trace_and_determinant() {
        let p = Params::default();
        let t: nd::Array1<f64> = nd::Array1::linspace(-100.0, 100.0, 11);
        let e = eigen_energies_series(&p, &t);
        for (ek, &tk) in e.axis_iter(nd::Axis(0)).zip(&t) {
            let h = hamiltonian(&p, tk);
            let det = (h[[0, 0]] * h[[1, 1]] - h[[0, 1]] * h[[1, 0]]).re;
            assert!((ek[0] + ek[1]).abs() < 1e-12);
            assert!((ek[0] * ek[1] - det).abs() < 1e-10);
        }
        assert_eq!(eigen_energies(&p, 0.0), (-0.5, 0.5));
    }

    #[test]
    fn builder_matches_free_function() {
        let p = Params::default();
        let hb = Diabatic::new(&p);
        assert_eq!(hb.hamiltonian(12.5), hamiltonian(&p, 12.5));
        assert_eq!(hb.hbar(), 1.0);
    }
}
