//! phylo: newick parsing and rooted-tree utilities.
//!
//! Purpose
//! -------
//! Turn newick strings (dated species trees, sampled gene trees) into an
//! index-based [`RootedTree`] and provide the small traversal helpers the
//! reconciliation model and the diagnostics need.
//!
//! Key behaviors
//! -------------
//! - [`newick::parse`] tokenizes and parses one tree, keeping labels and
//!   branch lengths verbatim.
//! - [`RootedTree`] exposes pre/postorder traversals, leaf listings and
//!   root-to-node depths.
//! - [`tree::distinct_prefix_count`] counts leaf-name prefixes (the
//!   "species per family" statistic written to `.times` files).
//!
//! Conventions
//! -----------
//! - Node ids are indices into the arena; `parent == None` only for the root.
//! - This module knows nothing about dates or bootstrap semantics; the
//!   reconciliation layer interprets lengths and internal labels.

pub mod errors;
pub mod newick;
pub mod tree;

pub use self::errors::{TreeError, TreeResult};
pub use self::tree::{RootedTree, TreeNode, distinct_prefix_count, name_prefix};
