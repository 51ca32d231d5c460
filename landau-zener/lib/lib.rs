#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for simulating the
//! Landau-Zener problem: a two-level system driven linearly through an avoided
//! crossing, integrated under the time-dependent Schrödinger equation in both
//! the fixed (diabatic) basis and the rotating (adiabatic) basis, and compared
//! against the closed-form transition probability.
//!
//! Provides implementations for the following:
//! - Hamiltonians:
//!     - Diabatic-basis Hamiltonian and instantaneous eigenenergies
//!     - Mixing angle, transformation matrix and its exact time derivative
//!     - Rotated-basis Hamiltonian with the non-adiabatic coupling term
//! - Time-dependent:
//!     - Adaptive fourth-order Runge-Kutta with step doubling
//!     - Adaptive Dormand-Prince 5(4) integration
//! - Analysis:
//!     - Transition probability series and final value
//!     - Closed-form Landau-Zener probability
//!
//! A full run is driven by a [`Config`][config::Config] and
//! [`sim::compare`]:
//! ```no_run
//! use landau_zener::{ config::Config, sim };
//!
//! let cmp = sim::compare(&Config::default()).unwrap();
//! println!("{}", cmp);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod params;
pub mod config;
pub mod utils;
pub mod hamiltonian;
pub mod adiabatic;
pub mod timedep;
pub mod probability;
pub mod analytical;
pub mod sim;

pub mod docs;

pub(crate) const DEF_ATOL: f64 = 1e-8;
pub(crate) const DEF_RTOL: f64 = 1e-8;
pub(crate) const DEF_MAXSTEPS: usize = 1_000_000;
pub(crate) const DEF_SAMPLES: usize = 1000;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
