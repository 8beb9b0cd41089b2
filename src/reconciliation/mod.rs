//! reconciliation: DTL likelihood of a gene family on a dated species tree.
//!
//! Purpose
//! -------
//! Provide the likelihood oracle the rate objective and the pipeline drive:
//! given duplication / transfer / loss rates, compute the probability of a
//! conditional-clade summary of gene trees under a time-discretized
//! birth–death–transfer process along a dated species tree.
//!
//! Key behaviors
//! -------------
//! - [`ModelConfig`] carries the named model options (`grid_delta_t`,
//!   `min_D`, `gene_name_separators`, `BOOTSTRAP_LABELS`, `event_node`,
//!   `leaf_events`, `N`) with a validated by-name setter.
//! - [`SpeciesTree`] parses and dates the species tree (root age 1, deepest
//!   leaf age 0) and maps gene names onto species leaves.
//! - [`TimeGrid`] cuts time at node ages and sub-divides each slice.
//! - [`ReconciliationModel::apply_rates`] sets rates and recomputes the
//!   extinction table in one transactional call.
//! - [`ReconciliationModel::p`] evaluates the survival-conditioned
//!   probability of a summary.
//!
//! Invariants & assumptions
//! ------------------------
//! - The species tree is strictly binary, has at least two uniquely named
//!   leaves, and positive height.
//! - Extinction values stay inside `[0, 1]`; gene probabilities are
//!   non-negative.
//! - A probability query never mutates the model.
//!
//! Conventions
//! -----------
//! - Time is relative and runs backward: present = 0, root = 1. Rates are per
//!   unit of relative time.
//! - There is no stem above the root.
//! - `event_node` and `N` are validated and carried only.
//!
//! Downstream usage
//! ----------------
//! - `optimization::loglik_optimizer::adapter::RateObjective` wraps the model
//!   in a `RefCell` and turns `p` into a negative log-likelihood.
//! - `pipeline` builds the model from the species file and the run context.
//!
//! Testing notes
//! -------------
//! - Unit tests cover option parsing, dating and validation, grid step
//!   rules and alive sets, bounded extinction, transactional rate updates and
//!   probability sanity on a balanced 4-leaf tree.

pub mod config;
pub mod errors;
pub mod grid;
pub mod model;
pub mod params;
pub mod species;

pub use self::config::ModelConfig;
pub use self::errors::{ConfigError, ConfigResult, ModelError, ModelResult};
pub use self::grid::{TimeGrid, TimeSlice};
pub use self::model::ReconciliationModel;
pub use self::params::{RATE_LOWER, RATE_UPPER, RateBounds, RateParameters};
pub use self::species::SpeciesTree;
