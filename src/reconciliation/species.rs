//! Dated, strictly binary species tree.
//!
//! Ages are relative: the deepest leaf sits at 0 and the root at 1. A leaf
//! that is shallower than the deepest one (non-ultrametric input) gets a
//! positive age, so its lineage simply starts later in the backward-time
//! recursion.
use std::collections::BTreeMap;

use crate::{
    phylo::{RootedTree, name_prefix},
    reconciliation::{
        config::ModelConfig,
        errors::{ModelError, ModelResult},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTree {
    tree: RootedTree,
    ages: Vec<f64>,
    height: f64,
    leaf_by_name: BTreeMap<String, usize>,
}

impl SpeciesTree {
    /// Parse and date a species tree from newick text.
    ///
    /// Only the first non-empty line is read. With `BOOTSTRAP_LABELS` set,
    /// internal node labels are support values and are dropped.
    ///
    /// # Errors
    /// - [`ModelError::Tree`] for malformed newick.
    /// - [`ModelError::NotBinary`] unless every internal node has two children.
    /// - [`ModelError::TooFewLeaves`], [`ModelError::UnnamedLeaf`],
    ///   [`ModelError::DuplicateSpecies`] for a bad leaf set.
    /// - [`ModelError::NegativeLength`] / [`ModelError::NoDates`] when branch
    ///   lengths cannot date the tree.
    pub fn from_newick(text: &str, config: &ModelConfig) -> ModelResult<Self> {
        let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
        let mut tree = RootedTree::from_newick(line)?;
        if config.bootstrap_labels {
            tree = strip_internal_labels(tree);
        }
        Self::from_tree(tree)
    }

    /// Date and validate an already parsed tree.
    pub fn from_tree(tree: RootedTree) -> ModelResult<Self> {
        let mut leaf_by_name = BTreeMap::new();
        for (id, node) in tree.nodes().iter().enumerate() {
            match node.children.len() {
                0 => {
                    let name = node.label.as_deref().unwrap_or("");
                    if name.is_empty() {
                        return Err(ModelError::UnnamedLeaf { node: id });
                    }
                    if leaf_by_name.insert(name.to_string(), id).is_some() {
                        return Err(ModelError::DuplicateSpecies { name: name.to_string() });
                    }
                }
                2 => {}
                children => return Err(ModelError::NotBinary { node: id, children }),
            }
            if let Some(length) = node.length {
                if !length.is_finite() || length < 0.0 {
                    return Err(ModelError::NegativeLength { node: id, length });
                }
            }
        }
        if leaf_by_name.len() < 2 {
            return Err(ModelError::TooFewLeaves { found: leaf_by_name.len() });
        }

        let depths = tree.depths();
        let height = depths.iter().copied().fold(0.0_f64, f64::max);
        if !(height > 0.0) {
            return Err(ModelError::NoDates);
        }
        let ages = depths.iter().map(|d| ((height - d) / height).clamp(0.0, 1.0)).collect();

        Ok(SpeciesTree { tree, ages, height, leaf_by_name })
    }

    pub fn tree(&self) -> &RootedTree {
        &self.tree
    }

    /// Relative age of every node, indexed by node id.
    pub fn ages(&self) -> &[f64] {
        &self.ages
    }

    pub fn age(&self, node: usize) -> f64 {
        self.ages[node]
    }

    /// Root-to-deepest-leaf path length in input units.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn num_leaves(&self) -> usize {
        self.leaf_by_name.len()
    }

    pub fn leaf_named(&self, name: &str) -> Option<usize> {
        self.leaf_by_name.get(name).copied()
    }

    /// Species leaf a gene belongs to: the first token of its name split on
    /// any character of `separators`.
    pub fn species_of(&self, gene: &str, separators: &str) -> ModelResult<usize> {
        let species = name_prefix(gene, separators);
        self.leaf_named(species).ok_or_else(|| ModelError::UnknownSpecies {
            gene: gene.to_string(),
            species: species.to_string(),
        })
    }
}

fn strip_internal_labels(tree: RootedTree) -> RootedTree {
    let root = tree.root();
    let mut nodes = tree.nodes().to_vec();
    for node in nodes.iter_mut().filter(|n| !n.children.is_empty()) {
        node.label = None;
    }
    RootedTree::from_nodes(nodes, root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Ages are relative to the tree height, root at 1 and deepest leaf at 0.
    fn ages_are_relative_to_height() {
        let sp = SpeciesTree::from_newick("((A:1,B:1):1,C:2);\n", &ModelConfig::default()).unwrap();

        let a = sp.leaf_named("A").unwrap();
        let ab = sp.tree().node(a).parent.unwrap();

        assert_eq!(sp.height(), 2.0);
        assert_eq!(sp.age(sp.tree().root()), 1.0);
        assert_eq!(sp.age(a), 0.0);
        assert_eq!(sp.age(ab), 0.5);
    }

    #[test]
    // Purpose
    // -------
    // Structural problems are reported with a specific error.
    fn from_newick_rejects_invalid_species_trees() {
        let cfg = ModelConfig::default();

        let polytomy = SpeciesTree::from_newick("(A:1,B:1,C:1);", &cfg).unwrap_err();
        let dup = SpeciesTree::from_newick("(A:1,A:1);", &cfg).unwrap_err();
        let flat = SpeciesTree::from_newick("(A,B);", &cfg).unwrap_err();
        let single = SpeciesTree::from_newick("(A:1);", &cfg).unwrap_err();
        let negative = SpeciesTree::from_newick("(A:1,B:-1);", &cfg).unwrap_err();

        assert_eq!(polytomy, ModelError::NotBinary { node: 0, children: 3 });
        assert_eq!(dup, ModelError::DuplicateSpecies { name: "A".into() });
        assert_eq!(flat, ModelError::NoDates);
        assert!(matches!(single, ModelError::NotBinary { children: 1, .. }));
        assert!(matches!(negative, ModelError::NegativeLength { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Support values on internal nodes are dropped when BOOTSTRAP_LABELS is on,
    // and gene names map to species by their first token.
    fn bootstrap_labels_and_species_mapping() {
        let mut cfg = ModelConfig::default();
        cfg.set("BOOTSTRAP_LABELS", "yes").unwrap();

        let sp = SpeciesTree::from_newick("((hs:1,pt:1)95:1,mm:2)100;", &cfg).unwrap();

        assert!(sp.tree().nodes().iter().filter(|n| !n.children.is_empty()).all(|n| n.label.is_none()));
        assert_eq!(sp.species_of("hs_gene7", "_"), Ok(sp.leaf_named("hs").unwrap()));
        assert_eq!(
            sp.species_of("rn_1", "_"),
            Err(ModelError::UnknownSpecies { gene: "rn_1".into(), species: "rn".into() })
        );
    }
}
