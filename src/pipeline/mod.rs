//! pipeline: load inputs, build the model, evaluate, report.
//!
//! Purpose
//! -------
//! Drive one gene family end to end: read a species tree and a tree-sample
//! summary, build a [`crate::reconciliation::ReconciliationModel`], time a
//! probability query at the seed rates, and write the `<summary>.times`
//! report. Optionally fit the rates with the Nelder–Mead driver.
//!
//! Key behaviors
//! -------------
//! - [`PipelineContext`] is the explicit run context (model options, seed
//!   rates, simplex settings); a model snapshots its config at build time.
//! - [`Pipeline::run_times`] is the diagnostic entry point used by the
//!   `reconcile_times` binary.
//! - [`Pipeline::optimize`] fits the rates and leaves the model at the best
//!   rates found.
//!
//! Invariants & assumptions
//! ------------------------
//! - Load and build failures abort the run before any report is written.
//! - A failed or zero-probability evaluation is still reported; it never
//!   turns into an error.
//! - Re-running on the same inputs replaces the previous report.
//!
//! Conventions
//! -----------
//! - The report line is
//!   `<elapsed_seconds>\t<clade_pair_count>\t<leaf_count>\t<prefix_count>\t<summary_path>`.
//! - Console output belongs to the binary; this module only logs through
//!   `tracing`.
//!
//! Testing notes
//! -------------
//! - Unit tests use `tempfile` directories; `tests/` covers the binary and
//!   multi-step runs.

pub mod context;
pub mod errors;
pub mod report;
pub mod run;

pub use self::context::PipelineContext;
pub use self::errors::{EXIT_FAILURE, PipelineError, PipelineResult};
pub use self::report::{Evaluation, TimesReport, times_path_for};
pub use self::run::{LoadedInputs, Pipeline};
