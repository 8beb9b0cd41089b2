//! rust_reconcile: maximum-likelihood duplication / transfer / loss rates for
//! gene families on dated species trees.
//!
//! Purpose
//! -------
//! Serve as the crate root for the reconciliation library and the
//! `reconcile_times` binary. The library evaluates the probability of a
//! conditional-clade summary of gene trees under a DTL birth–death process
//! along a dated species tree, and fits the three rates by Nelder–Mead.
//!
//! Key behaviors
//! -------------
//! - `phylo`: newick parsing and a rooted, arena-backed tree.
//! - `posterior`: the conditional-clade summary (`.ale`-style) loader and its
//!   clade / split tables.
//! - `reconciliation`: model options, dated species tree, time grid and the
//!   probability oracle.
//! - `optimization`: the rate objective adapter, the Argmin simplex driver
//!   and numerical guards.
//! - `pipeline`: load → build → evaluate → report, plus the optional fit.
//!
//! Invariants & assumptions
//! ------------------------
//! - Execution is single-threaded and synchronous; the model is shared with
//!   the objective through a `RefCell`, never a lock.
//! - Library code never writes to stdout; it logs through `tracing`.
//!
//! Conventions
//! -----------
//! - Each module owns a hand-written error enum and a `XResult<T>` alias.
//! - Rates are per unit of relative time (root age 1, present 0).
//!
//! Downstream usage
//! ----------------
//! - Most callers need only [`pipeline::Pipeline`]; callers who fit rates
//!   for many families can hold a `ReconciliationModel` and a
//!   `RateObjective` directly.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/` covers the binary, the
//!   multi-step pipeline and the objective's bound handling.

pub mod optimization;
pub mod phylo;
pub mod pipeline;
pub mod posterior;
pub mod reconciliation;
