//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Adiabatic basis](#adiabatic-basis)
//! - [Time dependence](#time-dependence)
//! - [Landau-Zener formula](#landau-zener-formula)
//!
//! # Background
//! The Landau-Zener problem concerns a two-level system whose bare (diabatic)
//! energies are swept linearly through each other while a constant coupling
//! mixes them. In the diabatic basis {|0⟩, |1⟩} the Hamiltonian is
//! ```text
//!        [ -ε(t)/2    W/2   ]
//! H(t) = [                  ],    ε(t) = a t
//!        [   W/2     ε(t)/2 ]
//! ```
//! where *W* is the coupling strength and *a* is the sweep slope. The bare
//! energies ∓*ε*/2 cross at *t* = 0, but the coupling opens a gap there, so
//! that the instantaneous eigenenergies
//! ```text
//! E±(t) = ± ½ √(ε(t)² + W²)
//! ```
//! never meet: the crossing is *avoided*, with minimum gap *W* at *t* = 0.
//!
//! Far from the crossing (|*ε*| ≫ *W*) the eigenstates coincide with the
//! diabatic states, but the labels swap: the upper level at *t* → -∞ is |0⟩
//! while the upper level at *t* → +∞ is |1⟩. A state that starts in |0⟩ and
//! follows its eigenstate perfectly (slow sweep) therefore ends in |1⟩; a state
//! swept through infinitely fast stays in |0⟩. The transition probability
//! *P* = |⟨1|ψ(+∞)⟩|² interpolates between these two limits.
//!
//! # Adiabatic basis
//! A time-dependent rotation
//! ```text
//!        [ cos θ   -sin θ ]
//! U(t) = [                ],    θ(t) = ½ atan2(W, ε(t))
//!        [ sin θ    cos θ ]
//! ```
//! re-expresses the amplitudes in a basis that turns with the mixing angle
//! *θ*, which decreases monotonically from π/2 (at *t* → -∞) to 0 (at
//! *t* → +∞). The atan2 form is well-defined through *ε* = 0, and since
//! ```text
//! dθ     1    W a
//! -- = - - -------
//! dt     2 ε² + W²
//! ```
//! has a denominator bounded below by *W*², the rotation and its derivative are
//! smooth for all times.
//!
//! Writing ψ = *U* ψ<sub>ad</sub> and substituting into the Schrödinger
//! equation gives
//! ```text
//!    ∂ψ_ad
//! iħ ----- = [Uᵀ H U - iħ Uᵀ dU/dt] ψ_ad ≡ H_ad ψ_ad
//!     ∂t
//! ```
//! The first term is the diabatic Hamiltonian seen from the rotating frame. The
//! second is the non-adiabatic coupling, which for a planar rotation reduces to
//! ```text
//!                    [ 0   -1 ]
//! -iħ Uᵀ dU/dt = -iħ [        ] dθ/dt
//!                    [ 1    0 ]
//! ```
//! It is purely imaginary and antisymmetric, so *H*<sub>ad</sub> stays
//! Hermitian. Dropping it yields the adiabatic *approximation*; keeping it, as
//! is done here, makes the rotated-basis evolution exact, and mapping the
//! solved amplitudes back with *U*(*t*) must reproduce the diabatic-basis
//! solution for the same initial state.
//!
//! # Time dependence
//! Both bases lead to a linear system of two complex ODEs,
//! ```text
//! dψ     i
//! -- = - - H(t) ψ
//! dt     ħ
//! ```
//! which is integrated with an explicit adaptive Runge-Kutta scheme. The
//! default advances with classic fourth-order Runge-Kutta and estimates the
//! local error by comparing one step of size *dt* against two steps of size
//! *dt*/2, keeping the two-half-step result. A step is accepted if, for every
//! component *k*,
//! ```text
//! |err[k]| ≤ atol + rtol max(|ψ[k]|, |ψ_new[k]|)
//! ```
//! and the next step size is scaled by 0.9 *r*<sup>-1/5</sup>, where *r* is the
//! worst-case ratio of error to allowance, bounded to the interval [0.2, 10].
//!
//! The alternative is the Dormand-Prince 5(4) embedded pair[^1]: each step
//! evaluates seven stages (the last of which is reused as the first stage of
//! the next step), advances with the fifth-order solution, and estimates the
//! local error from the difference with the embedded fourth-order solution,
//! under the same acceptance rule.
//!
//! Unitary evolution preserves ‖ψ‖ exactly, but explicit Runge-Kutta schemes
//! do not; the norm of the solved trajectory is therefore a useful check on the
//! chosen tolerances. With `atol = rtol = 1e-8` over the default window, the
//! step-doubling scheme keeps the drift near 3 × 10⁻⁷. The Dormand-Prince pair
//! takes fewer steps but, since its error estimate belongs to the lower-order
//! solution, lets the drift grow to roughly 4 × 10⁻⁶ at the same tolerances.
//!
//! # Landau-Zener formula
//! In the limit of an infinite sweep window, the transition probability takes
//! the closed form
//! ```text
//! P = 1 - exp(-2π Γ),    Γ = W² / (ħ a)
//! ```
//! which tends to 0 for weak coupling or fast sweeps (the system stays in its
//! initial diabatic level) and to 1 in the adiabatic limit. A finite window of
//! half-width *τ*₀ / *a* truncates the asymptotic tails: at *t*<sub>max</sub>
//! the eigenstates still carry a residual admixture of order (*W* / *ε*)², so
//! numerical results approach the formula only as *τ*₀ grows.
//!
//! [^1]: J. R. Dormand and P. J. Prince, "A family of embedded Runge-Kutta
//! formulae." Journal of Computational and Applied Mathematics **6** 1 19-26
//! (1980).
