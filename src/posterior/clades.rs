//! Conditional clade probabilities in evaluation order.
//!
//! The likelihood recursion needs, for every clade γ, the set of ways γ can
//! split into two child clades together with the conditional probability
//! `p(γ', γ'' | γ)`. [`CladeTable`] flattens the summary into that form:
//!
//! - clades are sorted by size (then by leaf ids), so every child precedes its
//!   parent and a single forward pass can evaluate the recursion;
//! - the whole gene set Γ is always the **last** entry; its splits are the
//!   observed bipartitions of the unrooted trees, weighted by
//!   `bip_count(γ) / observations`, each unordered bipartition counted once;
//! - every other clade splits according to
//!   `Dip(γ, γ', γ'') / bip_count(γ)`.
use std::collections::BTreeMap;

use crate::posterior::{
    approx::ApproxPosterior,
    errors::{PosteriorError, PosteriorResult},
};

/// One way of splitting a clade. `left`/`right` index into [`CladeTable::clades`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub left: usize,
    pub right: usize,
    pub prob: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clade {
    /// Summary clade id, `None` for a synthesized whole-set clade.
    pub id: Option<usize>,
    /// Sorted leaf ids.
    pub leaves: Vec<usize>,
    pub splits: Vec<Split>,
}

impl Clade {
    pub fn size(&self) -> usize {
        self.leaves.len()
    }

    /// The leaf id if this clade is a single gene.
    pub fn gene(&self) -> Option<usize> {
        match self.leaves.as_slice() {
            [leaf] => Some(*leaf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CladeTable {
    pub clades: Vec<Clade>,
}

impl CladeTable {
    /// Index of the whole gene set Γ.
    pub fn root_index(&self) -> usize {
        self.clades.len() - 1
    }

    pub fn len(&self) -> usize {
        self.clades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clades.is_empty()
    }
}

impl ApproxPosterior {
    /// Flatten the summary into a [`CladeTable`].
    ///
    /// Leaves without an explicit singleton clade in `#set-id` get one
    /// synthesized (with `id = None`), as does the whole set Γ.
    ///
    /// # Errors
    /// - [`PosteriorError::MissingSupport`] when a clade has recorded splits but
    ///   a zero bipartition count.
    pub fn conditional_clades(&self) -> PosteriorResult<CladeTable> {
        let mut by_leaves: BTreeMap<Vec<usize>, Option<usize>> = BTreeMap::new();
        for (id, leaves) in self.clades() {
            by_leaves.entry(leaves.to_vec()).or_insert(Some(id));
        }
        for (leaf_id, _) in self.leaves() {
            by_leaves.entry(vec![leaf_id]).or_insert(None);
        }
        let all: Vec<usize> = self.leaves().map(|(id, _)| id).collect();
        let root_id = by_leaves.remove(&all).flatten();

        let mut clades: Vec<Clade> = by_leaves
            .into_iter()
            .map(|(leaves, id)| Clade { id, leaves, splits: Vec::new() })
            .collect();
        clades.sort_by(|a, b| a.size().cmp(&b.size()).then_with(|| a.leaves.cmp(&b.leaves)));
        clades.push(Clade { id: root_id, leaves: all.clone(), splits: Vec::new() });

        let index_of_id: BTreeMap<usize, usize> =
            clades.iter().enumerate().filter_map(|(i, c)| c.id.map(|id| (id, i))).collect();
        let index_of_leaves: BTreeMap<&[usize], usize> =
            clades.iter().enumerate().map(|(i, c)| (c.leaves.as_slice(), i)).collect();

        let mut splits_per_clade: Vec<Vec<Split>> = vec![Vec::new(); clades.len()];
        let root = clades.len() - 1;

        for (&parent, splits) in self.dip_counts() {
            let Some(&pi) = index_of_id.get(&parent) else { continue };
            if pi == root {
                continue;
            }
            let support = self.bip_count(parent);
            if support <= 0.0 {
                return Err(PosteriorError::MissingSupport { clade_id: parent });
            }
            for (&(left, right), &count) in splits {
                let (Some(&li), Some(&ri)) = (index_of_id.get(&left), index_of_id.get(&right))
                else {
                    continue;
                };
                splits_per_clade[pi].push(Split { left: li, right: ri, prob: count / support });
            }
        }

        let observations = self.observations();
        for (i, clade) in clades[..root].iter().enumerate() {
            let complement: Vec<usize> =
                all.iter().copied().filter(|l| clade.leaves.binary_search(l).is_err()).collect();
            let Some(&j) = index_of_leaves.get(complement.as_slice()) else { continue };
            if j <= i || j == root {
                continue;
            }
            let count = clade
                .id
                .map(|id| self.bip_count(id))
                .into_iter()
                .chain(clades[j].id.map(|id| self.bip_count(id)))
                .fold(0.0_f64, f64::max);
            let count = if clade.size() == 1 || complement.len() == 1 {
                count.max(observations)
            } else {
                count
            };
            if count > 0.0 {
                splits_per_clade[root].push(Split { left: i, right: j, prob: count / observations });
            }
        }

        for (clade, splits) in clades.iter_mut().zip(splits_per_clade) {
            clade.splits = splits;
        }
        Ok(CladeTable { clades })
    }
}
