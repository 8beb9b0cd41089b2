//! [`ReconciliationModel`]: DTL likelihood of a clade summary on a dated
//! species tree.
//!
//! Two quantities are integrated backward in time over the [`TimeGrid`]:
//!
//! - `E_e(t)`, the probability that a gene lineage on branch `e` at time `t`
//!   leaves no sampled descendant. It depends on the rates only and is
//!   recomputed by [`ReconciliationModel::apply_rates`].
//! - `Π_e^γ(t)`, the probability that such a lineage has exactly the
//!   descendants in gene clade γ. It depends on the clade summary too and is
//!   computed on demand by [`ReconciliationModel::p`].
//!
//! Within a slice both follow linear-decay ODEs
//! `dx/dt = S(x) − (δ_e + τ_e + λ)·x` and are stepped with
//! [`exp_relax`], the source `S` being evaluated from the values at the
//! start of each step. At a boundary, leaves are born (`E = 0`, `Π = 1` for
//! the genes of that species) and internal nodes combine their children.
//! Transfers draw recipients uniformly among the other alive branches; with
//! a single alive branch they are disabled.
use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1};

use crate::{
    optimization::numerical_stability::exp_relax,
    posterior::{ApproxPosterior, Clade, CladeTable},
    reconciliation::{
        config::ModelConfig,
        errors::{ModelError, ModelResult},
        grid::{TimeGrid, TimeSlice},
        params::RateParameters,
        species::SpeciesTree,
    },
};

/// Extinction probabilities for one set of rates.
#[derive(Debug, Clone, PartialEq)]
struct ExtinctionTable {
    /// Per slice, shape `(steps + 1, alive.len())`; row `s` holds the values
    /// after `s` steps.
    slices: Vec<Array2<f64>>,
    /// Value at the bottom of each node's branch.
    birth: Vec<f64>,
    /// Value at the top of each node's branch (the root has no stem).
    top: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationModel {
    config: ModelConfig,
    species: SpeciesTree,
    grid: TimeGrid,
    rates: Option<RateParameters>,
    extinction: Option<ExtinctionTable>,
}

impl ReconciliationModel {
    /// Build a model from species-tree newick text and a config snapshot.
    ///
    /// # Errors
    /// - Any [`SpeciesTree::from_newick`] error.
    pub fn new(species_newick: &str, config: ModelConfig) -> ModelResult<Self> {
        let species = SpeciesTree::from_newick(species_newick, &config)?;
        let grid = TimeGrid::new(&species, &config);
        tracing::debug!(
            leaves = species.num_leaves(),
            nodes = species.tree().len(),
            slices = grid.slices().len(),
            "built reconciliation model"
        );
        Ok(ReconciliationModel { config, species, grid, rates: None, extinction: None })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn species(&self) -> &SpeciesTree {
        &self.species
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Rates the extinction table was last computed with.
    pub fn rates(&self) -> Option<RateParameters> {
        self.rates
    }

    /// Extinction probability at the root, if rates have been applied.
    pub fn extinction_root(&self) -> Option<f64> {
        self.extinction.as_ref().map(|e| e.birth[self.species.tree().root()])
    }

    /// Extinction probability at the bottom of `node`'s branch.
    pub fn extinction_at_birth(&self, node: usize) -> Option<f64> {
        self.extinction.as_ref().and_then(|e| e.birth.get(node).copied())
    }

    /// Set the rates and recompute the extinction table.
    ///
    /// Transactional: on error the previous rates and table are kept.
    ///
    /// # Errors
    /// - [`ModelError::InvalidRate`] for a negative or non-finite component.
    pub fn apply_rates(&mut self, rates: RateParameters) -> ModelResult<()> {
        if let Some((name, value)) =
            rates.components().into_iter().find(|&(_, v)| !v.is_finite() || v < 0.0)
        {
            return Err(ModelError::InvalidRate { name, value });
        }
        let table = self.compute_extinction(&rates);
        self.rates = Some(rates);
        self.extinction = Some(table);
        Ok(())
    }

    /// Species leaf for every gene leaf id of `posterior`.
    ///
    /// # Errors
    /// - [`ModelError::UnknownSpecies`] for the first gene that does not map.
    pub fn map_genes(&self, posterior: &ApproxPosterior) -> ModelResult<BTreeMap<usize, usize>> {
        posterior
            .leaves()
            .map(|(id, gene)| {
                self.species.species_of(gene, &self.config.gene_name_separators).map(|s| (id, s))
            })
            .collect()
    }

    /// Probability of the clade summary under the current rates, conditioned
    /// on survival: `Π_root^Γ / (1 − E_root)`, or 0 when survival is 0.
    ///
    /// # Errors
    /// - [`ModelError::RatesNotSet`] before [`ReconciliationModel::apply_rates`].
    /// - [`ModelError::UnknownSpecies`] for unmappable gene names.
    /// - [`ModelError::Posterior`] if the summary cannot be flattened.
    pub fn p(&self, posterior: &ApproxPosterior) -> ModelResult<f64> {
        let (Some(rates), Some(ext)) = (self.rates.as_ref(), self.extinction.as_ref()) else {
            return Err(ModelError::RatesNotSet);
        };
        let gene_species = self.map_genes(posterior)?;
        let clades = posterior.conditional_clades()?;
        let pi = self.compute_pi(rates, ext, &clades, &gene_species);

        let root = self.species.tree().root();
        let survival = 1.0 - ext.birth[root];
        if survival.is_nan() || survival <= 0.0 {
            return Ok(0.0);
        }
        Ok(pi[[root, clades.root_index()]] / survival)
    }

    /// `(δ_e, τ_e)` for `node`: duplication and transfer are off on terminal
    /// branches unless `leaf_events` is set.
    fn branch_rates(&self, node: usize, rates: &RateParameters) -> (f64, f64) {
        if !self.config.leaf_events && self.species.tree().is_leaf(node) {
            (0.0, 0.0)
        } else {
            (rates.delta, rates.tau)
        }
    }

    fn compute_extinction(&self, rates: &RateParameters) -> ExtinctionTable {
        let tree = self.species.tree();
        let mut current = vec![0.0; tree.len()];
        let mut birth = vec![0.0; tree.len()];
        let mut top = vec![0.0; tree.len()];
        let mut slices = Vec::with_capacity(self.grid.slices().len());

        for b in 0..self.grid.boundaries().len() {
            for &node in self.grid.births(b) {
                let children = &tree.node(node).children;
                let e = match children.as_slice() {
                    [f, g] => {
                        top[*f] = current[*f];
                        top[*g] = current[*g];
                        current[*f] * current[*g]
                    }
                    _ => 0.0,
                };
                current[node] = e;
                birth[node] = e;
            }
            if let Some(slice) = self.grid.slices().get(b) {
                slices.push(self.integrate_extinction(slice, rates, &mut current));
            }
        }
        let root = tree.root();
        top[root] = current[root];

        ExtinctionTable { slices, birth, top }
    }

    fn integrate_extinction(
        &self, slice: &TimeSlice, rates: &RateParameters, current: &mut [f64],
    ) -> Array2<f64> {
        let n = slice.alive.len();
        let branch: Vec<(f64, f64)> = slice
            .alive
            .iter()
            .map(|&e| {
                let (d, t) = self.branch_rates(e, rates);
                (d, if n > 1 { t } else { 0.0 })
            })
            .collect();
        let mut table = Array2::zeros((slice.steps + 1, n));
        let mut row: Array1<f64> = slice.alive.iter().map(|&e| current[e]).collect();
        table.row_mut(0).assign(&row);

        for s in 1..=slice.steps {
            let sum = row.sum();
            let next: Array1<f64> = row
                .iter()
                .zip(&branch)
                .map(|(&e, &(delta, tau))| {
                    let e_bar = if n > 1 { (sum - e) / (n - 1) as f64 } else { 0.0 };
                    let source = rates.lambda + delta * e * e + tau * e * e_bar;
                    exp_relax(e, delta + tau + rates.lambda, slice.dt, source).clamp(0.0, 1.0)
                })
                .collect();
            table.row_mut(s).assign(&next);
            row = next;
        }
        for (i, &e) in slice.alive.iter().enumerate() {
            current[e] = row[i];
        }
        table
    }

    /// `Π` at the top of every branch, shape `(nodes, clades)`.
    fn compute_pi(
        &self, rates: &RateParameters, ext: &ExtinctionTable, clades: &CladeTable,
        gene_species: &BTreeMap<usize, usize>,
    ) -> Array2<f64> {
        let tree = self.species.tree();
        let mut pi = Array2::<f64>::zeros((tree.len(), clades.len()));

        for b in 0..self.grid.boundaries().len() {
            for &node in self.grid.births(b) {
                match tree.node(node).children.as_slice() {
                    [f, g] => {
                        let (f, g) = (*f, *g);
                        let (e_f, e_g) = (ext.top[f], ext.top[g]);
                        for (c, clade) in clades.clades.iter().enumerate() {
                            let mut v = pi[[f, c]] * e_g + pi[[g, c]] * e_f;
                            for split in &clade.splits {
                                let (l, r) = (split.left, split.right);
                                v += split.prob
                                    * (pi[[f, l]] * pi[[g, r]] + pi[[f, r]] * pi[[g, l]]);
                            }
                            pi[[node, c]] = v;
                        }
                    }
                    _ => {
                        for (c, clade) in clades.clades.iter().enumerate() {
                            let here = clade
                                .gene()
                                .and_then(|gene| gene_species.get(&gene))
                                .is_some_and(|&s| s == node);
                            pi[[node, c]] = if here { 1.0 } else { 0.0 };
                        }
                    }
                }
            }
            if let (Some(slice), Some(e_table)) = (self.grid.slices().get(b), ext.slices.get(b)) {
                self.integrate_pi(slice, e_table, rates, clades, &mut pi);
            }
        }
        pi
    }

    fn integrate_pi(
        &self, slice: &TimeSlice, e_table: &Array2<f64>, rates: &RateParameters,
        clades: &CladeTable, pi: &mut Array2<f64>,
    ) {
        let n = slice.alive.len();
        let m = clades.len();
        let branch: Vec<(f64, f64)> = slice
            .alive
            .iter()
            .map(|&e| {
                let (d, t) = self.branch_rates(e, rates);
                (d, if n > 1 { t } else { 0.0 })
            })
            .collect();
        let mut local = Array2::<f64>::zeros((n, m));
        for (i, &e) in slice.alive.iter().enumerate() {
            local.row_mut(i).assign(&pi.row(e));
        }

        for s in 0..slice.steps {
            let e_row = e_table.row(s);
            let e_sum = e_row.sum();
            let pi_sum = local.sum_axis(ndarray::Axis(0));
            let mut next = Array2::<f64>::zeros((n, m));
            for i in 0..n {
                let (delta, tau) = branch[i];
                let e = e_row[i];
                let others = if n > 1 { (n - 1) as f64 } else { 1.0 };
                let e_bar = if n > 1 { (e_sum - e) / others } else { 0.0 };
                let own = local.row(i);
                let bar = |c: usize| if n > 1 { (pi_sum[c] - own[c]) / others } else { 0.0 };
                for (c, clade) in clades.clades.iter().enumerate() {
                    let x = own[c];
                    let mut source = 2.0 * delta * e * x + tau * (e_bar * x + bar(c) * e);
                    source += split_source(&own, &bar, clade, delta, tau);
                    next[[i, c]] =
                        exp_relax(x, delta + tau + rates.lambda, slice.dt, source).max(0.0);
                }
            }
            local = next;
        }
        for (i, &e) in slice.alive.iter().enumerate() {
            pi.row_mut(e).assign(&local.row(i));
        }
    }
}

/// Duplication and transfer contributions of a clade's splits.
fn split_source(
    own: &ArrayView1<f64>, bar: &impl Fn(usize) -> f64, clade: &Clade,
    delta: f64, tau: f64,
) -> f64 {
    clade
        .splits
        .iter()
        .map(|split| {
            let (l, r) = (split.left, split.right);
            split.prob * (delta * own[l] * own[r] + tau * (own[l] * bar(r) + bar(l) * own[r]))
        })
        .sum()
}
