//! DTL rate parameters and their feasibility box.
use ndarray::{Array1, array};

/// Per-lineage rates of duplication (`delta`), transfer (`tau`) and loss
/// (`lambda`), in events per unit of relative time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateParameters {
    pub delta: f64,
    pub tau: f64,
    pub lambda: f64,
}

impl Default for RateParameters {
    fn default() -> Self {
        RateParameters { delta: 0.01, tau: 0.01, lambda: 0.1 }
    }
}

impl RateParameters {
    /// Component names, in optimizer-vector order.
    pub const NAMES: [&'static str; 3] = ["delta", "tau", "lambda"];

    pub fn new(delta: f64, tau: f64, lambda: f64) -> Self {
        RateParameters { delta, tau, lambda }
    }

    /// `(name, value)` pairs in optimizer-vector order.
    pub fn components(&self) -> [(&'static str, f64); 3] {
        [("delta", self.delta), ("tau", self.tau), ("lambda", self.lambda)]
    }

    /// Optimizer vector `[delta, tau, lambda]`.
    pub fn as_array(&self) -> Array1<f64> {
        array![self.delta, self.tau, self.lambda]
    }

    /// Inverse of [`RateParameters::as_array`]. `None` unless `theta` has
    /// exactly three entries.
    pub fn from_slice(theta: &[f64]) -> Option<Self> {
        match theta {
            [delta, tau, lambda] => Some(RateParameters::new(*delta, *tau, *lambda)),
            _ => None,
        }
    }

    /// Sum of all event rates; the decay rate of every branch probability.
    pub fn total(&self) -> f64 {
        self.delta + self.tau + self.lambda
    }
}

/// Lower bound shared by all three rates.
pub const RATE_LOWER: f64 = 1e-6;
/// Upper bound shared by all three rates.
pub const RATE_UPPER: f64 = 10.0 - 1e-6;

/// Feasible box for the rates. The interval is open: a component equal to
/// either bound is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBounds {
    pub lower: f64,
    pub upper: f64,
}

impl Default for RateBounds {
    fn default() -> Self {
        RateBounds { lower: RATE_LOWER, upper: RATE_UPPER }
    }
}

impl RateBounds {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value > self.lower && value < self.upper
    }

    /// First component outside the box, as `(name, value)`.
    pub fn violation(&self, rates: &RateParameters) -> Option<(&'static str, f64)> {
        rates.components().into_iter().find(|&(_, v)| !self.contains(v))
    }
}
