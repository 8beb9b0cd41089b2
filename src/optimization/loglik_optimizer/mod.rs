//! loglik_optimizer: argmin-powered maximum-likelihood fitting of DTL rates.
//!
//! Purpose
//! -------
//! Expose the reconciliation likelihood as a constrained objective over
//! `(delta, tau, lambda)` and fit it with a derivative-free downhill simplex.
//!
//! Key behaviors
//! -------------
//! - [`adapter::RateObjective`] bridges the model to `argmin`'s
//!   `CostFunction`: bound checks, change detection, cached cost, sentinel for
//!   degenerate likelihoods.
//! - [`fit_rates`] builds a Nelder–Mead solver via [`builders`], executes it
//!   via [`run::run_simplex`], and normalizes results into a [`RateFit`].
//! - Optimizer configuration ([`Tolerances`], [`SimplexOptions`]) and its
//!   validation ([`validation`]) live here so callers can assume sane inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ = ln p` by minimizing `c = -ℓ`.
//! - Proposals outside the open box `(RATE_LOWER, RATE_UPPER)` never reach
//!   the model; they cost `DEGENERATE_NLL`.
//! - The objective is driven from a single thread; the model is shared via
//!   `RefCell`.
//!
//! Conventions
//! -----------
//! - [`Theta`] is `[delta, tau, lambda]` as `Array1<f64>`.
//! - Errors bubble up as `OptResult<T>`; argmin errors are converted at the
//!   boundary.
//!
//! Downstream usage
//! ----------------
//! - The pipeline builds a [`adapter::RateObjective`] over its model and the
//!   loaded posterior, calls [`fit_rates`], then re-offers the best rates so
//!   the model ends at the optimum.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover the objective's caching and constraint
//!   rules, simplex construction, option validation, and a short fit on a
//!   4-leaf tree.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::adapter::RateObjective;
pub use self::api::fit_rates;
pub use self::traits::{RateFit, SimplexOptions, Tolerances};
pub use self::types::{Cost, FnEvalMap, Theta};

pub mod prelude {
    pub use super::adapter::RateObjective;
    pub use super::api::fit_rates;
    pub use super::traits::{RateFit, SimplexOptions, Tolerances};
    pub use super::types::{Cost, Theta};
}
