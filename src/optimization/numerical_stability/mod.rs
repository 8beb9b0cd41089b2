//! numerical_stability: guarded scalar helpers for likelihood evaluation.
//!
//! Purpose
//! -------
//! Collect the small numerical guards shared by the reconciliation model and
//! the rate objective so both agree on what a "degenerate" likelihood is and
//! how probabilities are stepped through time.
//!
//! Key behaviors
//! -------------
//! - [`safe_neg_log`] maps a probability to `-ln(p)` and degenerate inputs
//!   (zero, negative, non-finite) to the finite sentinel [`DEGENERATE_NLL`].
//! - [`exp_relax`] advances `dx/dt = source - rate·x` with the decay part
//!   integrated exactly, keeping probabilities inside `[0, 1]` for any step
//!   size.
//! - [`relative_eq`] compares costs with a relative tolerance.
//!
//! Conventions
//! -----------
//! - Pure functions on `f64`; no I/O, no logging, no global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover sentinel mapping, agreement of
//!   the exponential step with the closed-form solution, and unit-interval
//!   preservation at large steps.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{DEGENERATE_NLL, exp_relax, relative_eq, safe_neg_log};

pub mod prelude {
    pub use super::transformations::{DEGENERATE_NLL, relative_eq, safe_neg_log};
}
