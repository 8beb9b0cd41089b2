//! Errors for model configuration, species-tree construction, and likelihood
//! queries.
//!
//! [`ConfigError`] is raised by the by-name option setter; [`ModelError`]
//! covers everything from building the dated species tree to mapping genes
//! onto species during a probability query.
use crate::{phylo::TreeError, posterior::PosteriorError};

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result alias for model construction and evaluation.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The option name is not recognized.
    UnknownOption { name: String },

    /// The option value could not be parsed or is out of range.
    InvalidValue { name: &'static str, value: String, reason: &'static str },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownOption { name } => write!(f, "Unknown model option '{name}'"),
            ConfigError::InvalidValue { name, value, reason } => {
                write!(f, "Invalid value '{value}' for option '{name}': {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Construction ----
    /// Invalid model configuration.
    Config(ConfigError),

    /// Species tree is not valid newick.
    Tree(TreeError),

    /// Every internal species node must have exactly two children.
    NotBinary { node: usize, children: usize },

    /// The species tree needs at least two leaves.
    TooFewLeaves { found: usize },

    /// Branch lengths must be finite and non-negative.
    NegativeLength { node: usize, length: f64 },

    /// Branch lengths give the tree zero height, so no dates can be derived.
    NoDates,

    /// Every species leaf needs a non-empty name.
    UnnamedLeaf { node: usize },

    /// Species leaf names must be unique.
    DuplicateSpecies { name: String },

    // ---- Rates ----
    /// Model rates must be finite and non-negative.
    InvalidRate { name: &'static str, value: f64 },

    /// A probability was requested before any rates were applied.
    RatesNotSet,

    // ---- Queries ----
    /// A gene name does not map onto any species leaf.
    UnknownSpecies { gene: String, species: String },

    /// The posterior summary could not be flattened into clades.
    Posterior(PosteriorError),
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Config(err) => write!(f, "{err}"),
            ModelError::Tree(err) => write!(f, "Invalid species tree: {err}"),
            ModelError::NotBinary { node, children } => {
                write!(f, "Species node {node} has {children} children, expected 2")
            }
            ModelError::TooFewLeaves { found } => {
                write!(f, "Species tree has {found} leaves, at least 2 are required")
            }
            ModelError::NegativeLength { node, length } => {
                write!(f, "Species node {node} has invalid branch length {length}")
            }
            ModelError::NoDates => {
                write!(f, "Species tree has zero height; branch lengths are required for dating")
            }
            ModelError::UnnamedLeaf { node } => write!(f, "Species leaf {node} has no name"),
            ModelError::DuplicateSpecies { name } => {
                write!(f, "Species name '{name}' appears more than once")
            }
            ModelError::InvalidRate { name, value } => {
                write!(f, "Invalid rate {name} = {value}, must be finite and >= 0")
            }
            ModelError::RatesNotSet => write!(f, "Rates have not been applied to the model"),
            ModelError::UnknownSpecies { gene, species } => {
                write!(f, "Gene '{gene}' maps to unknown species '{species}'")
            }
            ModelError::Posterior(err) => write!(f, "{err}"),
        }
    }
}

impl From<ConfigError> for ModelError {
    fn from(err: ConfigError) -> Self {
        ModelError::Config(err)
    }
}

impl From<TreeError> for ModelError {
    fn from(err: TreeError) -> Self {
        ModelError::Tree(err)
    }
}

impl From<PosteriorError> for ModelError {
    fn from(err: PosteriorError) -> Self {
        ModelError::Posterior(err)
    }
}
