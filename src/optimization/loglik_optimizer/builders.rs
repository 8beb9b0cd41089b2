//! loglik_optimizer::builders: Nelder–Mead solver construction.
//!
//! Purpose
//! -------
//! Hide Argmin's generic wiring behind one builder that turns a start point
//! and [`SimplexOptions`] into a configured [`RateSimplex`].
//!
//! Key behaviors
//! -------------
//! - Build the initial simplex around the start point: the start itself plus
//!   one vertex per rate, scaled by `1 + initial_step` (or `1 - initial_step`
//!   when scaling up would leave the feasible box).
//! - Apply the standard-deviation tolerance from [`SimplexOptions`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The start point is inside the open box; every initial vertex is too,
//!   so the first simplex never contains a sentinel cost.
//! - Any invalid tolerance passed into Argmin's `with_sd_tolerance` is
//!   surfaced as an [`OptError`](crate::optimization::errors::OptError) via
//!   the crate's `From<Error>` implementation.
//!
//! Conventions
//! -----------
//! - The builder does **not** set `max_iters`; that is applied by the runner.
//!
//! Testing notes
//! -------------
//! - Unit tests check vertex count, feasibility near the upper bound, and
//!   rejection of an infeasible start.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            traits::SimplexOptions,
            types::{RateSimplex, Theta},
        },
    },
    reconciliation::{RateBounds, RateParameters},
};

/// Initial simplex vertices around `start`, all strictly inside `bounds`.
///
/// # Errors
/// - [`OptError::ConstraintViolation`] if `start` is outside `bounds`.
pub fn initial_simplex(
    start: &RateParameters, bounds: &RateBounds, step: f64,
) -> OptResult<Vec<Theta>> {
    if let Some((name, value)) = bounds.violation(start) {
        return Err(OptError::ConstraintViolation {
            name,
            value,
            lower: bounds.lower,
            upper: bounds.upper,
        });
    }
    let base = start.as_array();
    let mut vertices = vec![base.clone()];
    for i in 0..base.len() {
        let mut v = base.clone();
        let up = base[i] * (1.0 + step);
        v[i] = if bounds.contains(up) { up } else { base[i] * (1.0 - step) };
        vertices.push(v);
    }
    Ok(vertices)
}

/// build_simplex: construct Nelder–Mead over `[delta, tau, lambda]`.
///
/// # Errors
/// - See [`initial_simplex`].
/// - Argmin errors from `with_sd_tolerance`, converted to `OptError`.
pub fn build_simplex(
    start: &RateParameters, bounds: &RateBounds, opts: &SimplexOptions,
) -> OptResult<RateSimplex> {
    let vertices = initial_simplex(start, bounds, opts.initial_step)?;
    let solver = RateSimplex::new(vertices).with_sd_tolerance(opts.tols.sd_tolerance)?;
    Ok(solver)
}
