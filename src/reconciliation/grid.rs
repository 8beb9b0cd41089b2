//! Time discretization of a dated species tree.
//!
//! Slice boundaries are the distinct node ages, sorted from the present
//! (age 0) to the root (age 1). Within a slice the set of alive branches is
//! constant, so the recursion integrates each slice on a uniform sub-grid
//! and handles speciations only at boundaries.
use crate::{
    optimization::numerical_stability::relative_eq,
    reconciliation::{config::ModelConfig, species::SpeciesTree},
};

/// Ages closer than this are treated as one boundary.
const AGE_SNAP: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlice {
    pub bottom: f64,
    pub top: f64,
    pub steps: usize,
    pub dt: f64,
    /// Node ids whose branch spans the whole slice, ascending.
    pub alive: Vec<usize>,
}

impl TimeSlice {
    pub fn len(&self) -> f64 {
        self.top - self.bottom
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    boundaries: Vec<f64>,
    node_boundary: Vec<usize>,
    births: Vec<Vec<usize>>,
    slices: Vec<TimeSlice>,
}

impl TimeGrid {
    /// Build the grid for `species` with the step rules of `config`:
    /// every slice gets `max(min_D, ceil(len / grid_delta_t))` equal steps.
    pub fn new(species: &SpeciesTree, config: &ModelConfig) -> Self {
        let tree = species.tree();
        let mut sorted: Vec<f64> = species.ages().to_vec();
        sorted.sort_by(f64::total_cmp);
        let mut boundaries: Vec<f64> = Vec::with_capacity(sorted.len());
        for age in sorted {
            match boundaries.last() {
                Some(&last) if relative_eq(age, last, AGE_SNAP) => {}
                _ => boundaries.push(age),
            }
        }

        let node_boundary: Vec<usize> = species
            .ages()
            .iter()
            .map(|&age| {
                boundaries
                    .iter()
                    .position(|&b| relative_eq(age, b, AGE_SNAP))
                    .unwrap_or(boundaries.len() - 1)
            })
            .collect();

        let mut births = vec![Vec::new(); boundaries.len()];
        for id in tree.postorder() {
            births[node_boundary[id]].push(id);
        }

        let slices = boundaries
            .windows(2)
            .enumerate()
            .map(|(k, w)| {
                let len = w[1] - w[0];
                let steps = ((len / config.grid_delta_t).ceil() as usize).max(config.min_d);
                let alive = (0..tree.len())
                    .filter(|&id| {
                        node_boundary[id] <= k
                            && tree.node(id).parent.is_some_and(|p| node_boundary[p] > k)
                    })
                    .collect();
                TimeSlice { bottom: w[0], top: w[1], steps, dt: len / steps as f64, alive }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            boundaries = boundaries.len(),
            slices = slices.len(),
            steps = slices.iter().map(|s| s.steps).sum::<usize>(),
            "built time grid"
        );
        TimeGrid { boundaries, node_boundary, births, slices }
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn slices(&self) -> &[TimeSlice] {
        &self.slices
    }

    /// Boundary index at which `node` is born.
    pub fn boundary_of(&self, node: usize) -> usize {
        self.node_boundary[node]
    }

    /// Nodes born at boundary `b`, children before parents.
    pub fn births(&self, b: usize) -> &[usize] {
        &self.births[b]
    }

    pub fn total_steps(&self) -> usize {
        self.slices.iter().map(|s| s.steps).sum()
    }
}
