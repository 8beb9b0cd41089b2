//! Explicit run context.
//!
//! Everything a run depends on besides its input files: the model options,
//! the seed rates, the simplex settings, and the separators used to count
//! leaf-name prefixes in the report. The pipeline snapshots the config when
//! it builds a model, so later edits to a context never reach a model that
//! already exists.
//!
//! The report separators and `config.gene_name_separators` are independent:
//! the former only affect the prefix count, the latter map genes onto
//! species.
use crate::{
    optimization::{errors::OptError, loglik_optimizer::SimplexOptions},
    pipeline::errors::{PipelineError, PipelineResult},
    reconciliation::{ModelConfig, RateBounds, RateParameters},
};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineContext {
    pub config: ModelConfig,
    /// Rates applied before the diagnostic evaluation, and the simplex start.
    /// Must lie inside [`RateBounds::default`]; checked when seeding.
    pub seed_rates: RateParameters,
    pub simplex: SimplexOptions,
    /// Separators for the report's distinct-prefix count.
    pub prefix_separators: String,
}

impl Default for PipelineContext {
    fn default() -> Self {
        PipelineContext {
            config: ModelConfig::default(),
            seed_rates: RateParameters::default(),
            simplex: SimplexOptions::default(),
            prefix_separators: "_".to_string(),
        }
    }
}

impl PipelineContext {
    /// Override the prefix-count separators (CLI third positional).
    ///
    /// Gene-to-species mapping keeps `config.gene_name_separators`.
    ///
    /// # Errors
    /// - [`PipelineError::Usage`] for an empty separator string.
    pub fn with_separators(mut self, separators: &str) -> PipelineResult<Self> {
        if separators.is_empty() {
            return Err(PipelineError::Usage {
                message: "gene name separator must not be empty".to_string(),
            });
        }
        self.prefix_separators = separators.to_string();
        Ok(self)
    }

    /// Apply a named model option.
    ///
    /// # Errors
    /// - [`PipelineError::Usage`] for unknown names or invalid values.
    pub fn with_option(mut self, name: &str, value: &str) -> PipelineResult<Self> {
        self.config.set(name, value).map_err(|e| PipelineError::Usage { message: e.to_string() })?;
        Ok(self)
    }

    /// Replace the seed rates.
    ///
    /// # Errors
    /// - [`PipelineError::Optimize`] wrapping [`OptError::ConstraintViolation`]
    ///   when a component lies outside the rate bounds.
    pub fn with_seed_rates(mut self, rates: RateParameters) -> PipelineResult<Self> {
        check_seed(&rates)?;
        self.seed_rates = rates;
        Ok(self)
    }

    pub fn separators(&self) -> &str {
        &self.prefix_separators
    }
}

/// Seed rates obey the same open box as every optimizer candidate.
pub(crate) fn check_seed(rates: &RateParameters) -> PipelineResult<()> {
    let bounds = RateBounds::default();
    match bounds.violation(rates) {
        Some((name, value)) => Err(OptError::ConstraintViolation {
            name,
            value,
            lower: bounds.lower,
            upper: bounds.upper,
        }
        .into()),
        None => Ok(()),
    }
}
