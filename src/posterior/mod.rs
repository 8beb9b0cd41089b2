//! posterior: conditional-clade summaries of gene-tree samples.
//!
//! Purpose
//! -------
//! Load the pre-computed summary of a sampled gene-tree posterior for one
//! gene family and expose it in the shape the likelihood recursion wants.
//!
//! Key behaviors
//! -------------
//! - [`loader::load_summary`] / [`loader::parse_summary`] read the sectioned
//!   text format (`#constructor_string`, `#observations`, `#Bip_counts`,
//!   `#Bip_bls`, `#Dip_counts`, `#last_leafset_id`, `#leaf-id`, `#set-id`).
//! - [`ApproxPosterior`] validates ids and split consistency once, then stays
//!   immutable.
//! - [`ApproxPosterior::conditional_clades`] produces a [`CladeTable`] ordered
//!   children-first with the whole gene set last.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every clade id used by a split is declared in `#set-id`, and every leaf
//!   id used by a clade is declared in `#leaf-id`.
//! - The two children of a recorded split partition their parent exactly.
//! - Gene names are unique and contain no whitespace.
//!
//! Downstream usage
//! ----------------
//! - The reconciliation model maps gene names onto species and evaluates the
//!   recursion over the [`CladeTable`].
//! - The pipeline reports `split_table_len`, the constructor-tree leaf count,
//!   and the distinct leaf-name prefix count.
//!
//! Testing notes
//! -------------
//! - Unit tests cover section parsing, malformed inputs, trivial-bipartition
//!   defaults, and clade ordering / normalization.

pub mod approx;
pub mod clades;
pub mod errors;
pub mod loader;

pub use self::approx::{ApproxPosterior, DipCounts};
pub use self::clades::{Clade, CladeTable, Split};
pub use self::errors::{PosteriorError, PosteriorResult};
pub use self::loader::{load_summary, parse_summary};
