//! Arena-backed rooted tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by index. The parser
//! produces nodes in preorder, so index order is a valid preorder; helpers
//! below do not rely on that and walk the links explicitly.

#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Branch length to the parent, if the newick string gave one.
    pub length: Option<f64>,
    pub label: Option<String>,
}

impl TreeNode {
    pub fn blank() -> Self {
        TreeNode { parent: None, children: Vec::new(), length: None, label: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RootedTree {
    nodes: Vec<TreeNode>,
    root: usize,
}

impl RootedTree {
    pub(crate) fn from_nodes(nodes: Vec<TreeNode>, root: usize) -> Self {
        RootedTree { nodes, root }
    }

    /// Parse a newick string. See [`crate::phylo::newick::parse`].
    pub fn from_newick(s: &str) -> crate::phylo::errors::TreeResult<Self> {
        crate::phylo::newick::parse(s)
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: usize) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn is_leaf(&self, id: usize) -> bool {
        self.nodes[id].children.is_empty()
    }

    /// Node ids in preorder (parents before children, children left to right).
    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Node ids in postorder (children before parents).
    pub fn postorder(&self) -> Vec<usize> {
        let mut order = self.preorder();
        order.reverse();
        order
    }

    /// Leaf ids, left to right.
    pub fn leaves(&self) -> Vec<usize> {
        self.preorder().into_iter().filter(|&id| self.is_leaf(id)).collect()
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.children.is_empty()).count()
    }

    /// Leaf labels, left to right; unlabeled leaves yield `""`.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.leaves().into_iter().map(|id| self.nodes[id].label.as_deref().unwrap_or("")).collect()
    }

    /// Root-to-node path lengths; missing branch lengths count as zero.
    pub fn depths(&self) -> Vec<f64> {
        let mut depth = vec![0.0; self.nodes.len()];
        for id in self.preorder() {
            if let Some(parent) = self.nodes[id].parent {
                depth[id] = depth[parent] + self.nodes[id].length.unwrap_or(0.0);
            }
        }
        depth
    }
}

/// First token of `name` split on any character of `separators`.
///
/// Leading separators produce an empty first token, matching the way gene
/// names such as `_x` are treated by the species mapping.
pub fn name_prefix<'n>(name: &'n str, separators: &str) -> &'n str {
    name.split(|c: char| separators.contains(c)).next().unwrap_or(name)
}

/// Number of distinct leaf-name prefixes (see [`name_prefix`]).
pub fn distinct_prefix_count(tree: &RootedTree, separators: &str) -> usize {
    let mut prefixes: Vec<&str> =
        tree.leaf_names().into_iter().map(|n| name_prefix(n, separators)).collect();
    prefixes.sort_unstable();
    prefixes.dedup();
    prefixes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Depths accumulate branch lengths along root-to-leaf paths.
    fn depths_sum_branch_lengths() {
        let tree = RootedTree::from_newick("((A:1,B:2):3,C:4);").unwrap();

        let depths = tree.depths();
        let leaves = tree.leaves();

        assert_eq!(depths[tree.root()], 0.0);
        assert_eq!(leaves.iter().map(|&l| depths[l]).collect::<Vec<_>>(), vec![4.0, 5.0, 4.0]);
    }

    #[test]
    fn postorder_visits_children_first() {
        let tree = RootedTree::from_newick("((A,B),C);").unwrap();

        let order = tree.postorder();
        let pos = |id: usize| order.iter().position(|&x| x == id).unwrap();
        for id in 0..tree.len() {
            if let Some(parent) = tree.node(id).parent {
                assert!(pos(id) < pos(parent));
            }
        }
        assert_eq!(*order.last().unwrap(), tree.root());
    }

    #[test]
    // Purpose
    // -------
    // Prefix counting splits on any separator character and compresses
    // repeated names.
    fn distinct_prefix_count_groups_by_first_token() {
        let tree = RootedTree::from_newick("((hs_1,hs_2),(mm@3,(pt_a_b,(hs,mm_4))));").unwrap();

        assert_eq!(distinct_prefix_count(&tree, "_"), 4);
        assert_eq!(distinct_prefix_count(&tree, "_@"), 3);
        assert_eq!(name_prefix("_x", "_"), "");
    }
}
