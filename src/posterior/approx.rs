//! [`ApproxPosterior`]: a validated conditional-clade summary for one family.
//!
//! The summary approximates the posterior over gene-tree topologies by
//! counting, over a sample of trees, how often each bipartition (clade) and
//! each clade split was seen. It is built once by the loader and is read-only
//! afterwards.
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    phylo::RootedTree,
    posterior::errors::{PosteriorError, PosteriorResult},
};

/// Split counts keyed by parent clade id, then by `(left, right)` child ids.
pub type DipCounts = BTreeMap<usize, BTreeMap<(usize, usize), f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ApproxPosterior {
    constructor_string: String,
    constructor_tree: RootedTree,
    observations: f64,
    bip_counts: BTreeMap<usize, f64>,
    bip_bls: BTreeMap<usize, f64>,
    dip_counts: DipCounts,
    last_leafset_id: usize,
    leaf_names: BTreeMap<usize, String>,
    sets: BTreeMap<usize, Vec<usize>>,
}

impl ApproxPosterior {
    /// Build and validate a summary.
    ///
    /// # Errors
    /// - [`PosteriorError::InvalidObservations`] unless `observations` is finite and > 0.
    /// - [`PosteriorError::InvalidConstructor`] if the constructor string is not newick.
    /// - [`PosteriorError::EmptyLeafSet`] / [`PosteriorError::DuplicateLeafName`] for a
    ///   bad leaf table.
    /// - [`PosteriorError::UnknownLeaf`] / [`PosteriorError::UnknownClade`] for dangling ids.
    /// - [`PosteriorError::InvalidSplit`] if a split's children do not partition the parent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        constructor_string: String, observations: f64, bip_counts: BTreeMap<usize, f64>,
        bip_bls: BTreeMap<usize, f64>, dip_counts: DipCounts, last_leafset_id: usize,
        leaf_names: BTreeMap<usize, String>, sets: BTreeMap<usize, Vec<usize>>,
    ) -> PosteriorResult<Self> {
        if !observations.is_finite() || observations <= 0.0 {
            return Err(PosteriorError::InvalidObservations { value: observations });
        }
        if leaf_names.is_empty() {
            return Err(PosteriorError::EmptyLeafSet);
        }
        let mut seen = BTreeSet::new();
        for name in leaf_names.values() {
            if !seen.insert(name.as_str()) {
                return Err(PosteriorError::DuplicateLeafName { name: name.clone() });
            }
        }
        for leaves in sets.values() {
            if let Some(&leaf_id) = leaves.iter().find(|l| !leaf_names.contains_key(l)) {
                return Err(PosteriorError::UnknownLeaf { leaf_id });
            }
        }
        for (&parent, splits) in &dip_counts {
            let parent_set = sets.get(&parent).ok_or(PosteriorError::UnknownClade { clade_id: parent })?;
            for &(left, right) in splits.keys() {
                let l = sets.get(&left).ok_or(PosteriorError::UnknownClade { clade_id: left })?;
                let r = sets.get(&right).ok_or(PosteriorError::UnknownClade { clade_id: right })?;
                let mut union: Vec<usize> = l.iter().chain(r.iter()).copied().collect();
                union.sort_unstable();
                if union.len() != parent_set.len() || union != *parent_set {
                    return Err(PosteriorError::InvalidSplit { parent, left, right });
                }
            }
        }
        let constructor_tree = RootedTree::from_newick(&constructor_string)?;

        Ok(ApproxPosterior {
            constructor_string,
            constructor_tree,
            observations,
            bip_counts,
            bip_bls,
            dip_counts,
            last_leafset_id,
            leaf_names,
            sets,
        })
    }

    /// Canonical topology string (one sampled tree) used to recover leaf names.
    pub fn constructor_string(&self) -> &str {
        &self.constructor_string
    }

    pub fn constructor_tree(&self) -> &RootedTree {
        &self.constructor_tree
    }

    /// Number of trees summarized.
    pub fn observations(&self) -> f64 {
        self.observations
    }

    pub fn dip_counts(&self) -> &DipCounts {
        &self.dip_counts
    }

    pub fn last_leafset_id(&self) -> usize {
        self.last_leafset_id
    }

    /// Length of the clade-pair table: one row per clade id plus row 0.
    pub fn split_table_len(&self) -> usize {
        self.last_leafset_id + 1
    }

    pub fn num_leaves(&self) -> usize {
        self.leaf_names.len()
    }

    /// Gene names ordered by leaf id.
    pub fn gene_names(&self) -> Vec<&str> {
        self.leaf_names.values().map(String::as_str).collect()
    }

    /// `(leaf_id, gene_name)` pairs ordered by leaf id.
    pub fn leaves(&self) -> impl Iterator<Item = (usize, &str)> {
        self.leaf_names.iter().map(|(&id, name)| (id, name.as_str()))
    }

    /// Sorted leaf ids of clade `clade_id`.
    pub fn clade_leaves(&self, clade_id: usize) -> Option<&[usize]> {
        self.sets.get(&clade_id).map(Vec::as_slice)
    }

    /// `(clade_id, leaves)` pairs ordered by clade id.
    pub fn clades(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.sets.iter().map(|(&id, leaves)| (id, leaves.as_slice()))
    }

    /// Mean branch length recorded for a clade, if any.
    pub fn mean_branch_length(&self, clade_id: usize) -> Option<f64> {
        self.bip_bls.get(&clade_id).copied()
    }

    /// Number of sampled trees containing the bipartition defined by `clade_id`.
    ///
    /// Trivial bipartitions (a single leaf, or all leaves but one) are present
    /// in every tree, so they default to `observations` when not stored.
    pub fn bip_count(&self, clade_id: usize) -> f64 {
        if let Some(&count) = self.bip_counts.get(&clade_id) {
            return count;
        }
        match self.sets.get(&clade_id) {
            Some(leaves) if leaves.len() == 1 || leaves.len() + 1 == self.num_leaves() => {
                self.observations
            }
            _ => 0.0,
        }
    }
}
