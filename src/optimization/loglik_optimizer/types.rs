//! loglik_optimizer::types: shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and the solver alias used by the rate
//! optimizer, so the rest of the optimization code stays agnostic to
//! `ndarray` and Argmin generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors and scalar costs
//!   (`Theta`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose the pre-wired Nelder–Mead solver alias ([`RateSimplex`]) and
//!   the iteration-state shape it runs with ([`SimplexState`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `Theta` always has three entries `[delta, tau, lambda]` when it reaches
//!   the objective; other lengths are rejected there.
//! - `Cost` is the negative log-likelihood; higher layers flip the sign for
//!   reporting.
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases; correctness is exercised by the
//!   builders and runner tests.
use argmin::{core::IterState, solver::neldermead::NelderMead};
use ndarray::Array1;
use std::collections::HashMap;

/// Optimizer vector `θ = [delta, tau, lambda]`.
pub type Theta = Array1<f64>;

/// Scalar objective value: the negative log-likelihood `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Downhill-simplex solver over the rate vector.
pub type RateSimplex = NelderMead<Theta, Cost>;

/// Iteration state of [`RateSimplex`]; gradients, Jacobians, Hessians and
/// residuals are unused.
pub type SimplexState = IterState<Theta, (), (), (), (), Cost>;
