//! Errors surfaced by the pipeline and mapped to exit codes by the binary.
use crate::{optimization::errors::OptError, reconciliation::ModelError};

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Missing or invalid command-line arguments.
    Usage { message: String },

    /// An input file is missing, unreadable, empty or malformed.
    Load { what: &'static str, path: String, reason: String },

    /// The reconciliation model could not be built from the inputs.
    Build(ModelError),

    /// Rate optimization failed.
    Optimize(OptError),

    /// The report could not be written.
    Io { path: String, reason: String },
}

/// Process exit code for every pipeline failure.
pub const EXIT_FAILURE: i32 = 1;

impl PipelineError {
    pub(crate) fn load(what: &'static str, path: &std::path::Path, reason: impl ToString) -> Self {
        PipelineError::Load { what, path: path.display().to_string(), reason: reason.to_string() }
    }
}

impl std::error::Error for PipelineError {}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Usage { message } => write!(f, "{message}"),
            PipelineError::Load { what, path, reason } => {
                write!(f, "Cannot load {what} from '{path}': {reason}")
            }
            PipelineError::Build(err) => write!(f, "Cannot build reconciliation model: {err}"),
            PipelineError::Optimize(err) => write!(f, "Rate optimization failed: {err}"),
            PipelineError::Io { path, reason } => write!(f, "Cannot write '{path}': {reason}"),
        }
    }
}

impl From<ModelError> for PipelineError {
    fn from(err: ModelError) -> Self {
        PipelineError::Build(err)
    }
}

impl From<OptError> for PipelineError {
    fn from(err: OptError) -> Self {
        PipelineError::Optimize(err)
    }
}
