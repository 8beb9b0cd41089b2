//! optimization: rate objective, simplex driver, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the layer between the reconciliation model and a generic
//! minimizer: a constrained negative-log-likelihood objective over the DTL
//! rates, an Argmin-backed Nelder–Mead driver, numerical guards, and a single
//! error/result surface.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: the objective adapter, solver construction and
//!   execution, and the [`loglik_optimizer::fit_rates`] entry point.
//! - `numerical_stability`: sentinel cost for degenerate likelihoods and the
//!   exponential ODE step shared with the model.
//! - `errors`: [`errors::OptError`] with conversions from `argmin` and model
//!   errors, plus the `OptResult<T>` alias.
//!
//! Invariants & assumptions
//! ------------------------
//! - Invalid states are reported as `OptError`, never as panics.
//! - A degenerate likelihood is a value (the sentinel), not an error, so a
//!   minimizer can step away from it.
//!
//! Conventions
//! -----------
//! - Costs are `-ln p`; user-facing outcomes are expressed as `ln p`.
//! - This module logs through `tracing` only (`debug`/`trace` for
//!   evaluations, `warn` for degenerate likelihoods, `info` at the end of a
//!   fit); subscribers are installed by the binary.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the integration tests under
//!   `tests/` exercise the objective through the pipeline.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
