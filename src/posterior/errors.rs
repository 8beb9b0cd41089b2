//! Errors for loading and interpreting conditional-clade summaries.
//!
//! Line numbers reported by [`PosteriorError::InvalidLine`] are 1-based so
//! they can be pasted straight into an editor.
use crate::phylo::TreeError;

/// Result alias for posterior-summary operations.
pub type PosteriorResult<T> = Result<T, PosteriorError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PosteriorError {
    // ---- I/O ----
    /// The summary file could not be read.
    Io { path: String, reason: String },

    // ---- Format ----
    /// A required `#section` header never appeared.
    MissingSection { name: &'static str },

    /// A line inside a section could not be parsed.
    InvalidLine { section: String, line_no: usize, line: String },

    /// The observation count must be finite and > 0.
    InvalidObservations { value: f64 },

    /// The constructor string is not valid newick.
    InvalidConstructor(TreeError),

    // ---- Consistency ----
    /// The leaf table is empty.
    EmptyLeafSet,

    /// Two leaf ids share the same gene name.
    DuplicateLeafName { name: String },

    /// A clade refers to a leaf id absent from `#leaf-id`.
    UnknownLeaf { leaf_id: usize },

    /// A split refers to a clade id absent from `#set-id`.
    UnknownClade { clade_id: usize },

    /// A split's two children do not partition its parent.
    InvalidSplit { parent: usize, left: usize, right: usize },

    /// A clade has recorded splits but no bipartition support.
    MissingSupport { clade_id: usize },
}

impl std::error::Error for PosteriorError {}

impl std::fmt::Display for PosteriorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PosteriorError::Io { path, reason } => write!(f, "Cannot read '{path}': {reason}"),
            PosteriorError::MissingSection { name } => write!(f, "Missing section '#{name}'"),
            PosteriorError::InvalidLine { section, line_no, line } => {
                write!(f, "Invalid line {line_no} in section '#{section}': '{line}'")
            }
            PosteriorError::InvalidObservations { value } => {
                write!(f, "Invalid observation count {value}, must be finite and > 0")
            }
            PosteriorError::InvalidConstructor(err) => {
                write!(f, "Invalid constructor string: {err}")
            }
            PosteriorError::EmptyLeafSet => write!(f, "Summary lists no leaves"),
            PosteriorError::DuplicateLeafName { name } => {
                write!(f, "Leaf name '{name}' appears more than once")
            }
            PosteriorError::UnknownLeaf { leaf_id } => write!(f, "Unknown leaf id {leaf_id}"),
            PosteriorError::UnknownClade { clade_id } => write!(f, "Unknown clade id {clade_id}"),
            PosteriorError::InvalidSplit { parent, left, right } => {
                write!(f, "Clades {left} and {right} do not partition clade {parent}")
            }
            PosteriorError::MissingSupport { clade_id } => {
                write!(f, "Clade {clade_id} has splits but no bipartition count")
            }
        }
    }
}

impl From<TreeError> for PosteriorError {
    fn from(err: TreeError) -> Self {
        PosteriorError::InvalidConstructor(err)
    }
}
