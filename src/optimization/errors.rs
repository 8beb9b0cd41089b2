use argmin::core::{ArgminError, Error};

use crate::reconciliation::ModelError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Objective ----
    /// A rate candidate lies outside the feasible box. Nothing was evaluated.
    ConstraintViolation { name: &'static str, value: f64, lower: f64, upper: f64 },

    /// The objective value was requested before any evaluation.
    NotEvaluated,

    /// Optimizer vector has the wrong number of entries.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// The reconciliation model rejected an operation.
    Model(ModelError),

    // ---- Simplex options ----
    /// Standard-deviation tolerance needs to be positive and finite.
    InvalidSdTolerance { tol: f64, reason: &'static str },

    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: u64, reason: &'static str },

    /// Relative size of the initial simplex needs to be in (0, 1).
    InvalidSimplexStep { step: f64, reason: &'static str },

    // ---- Optimizer outcome ----
    /// Cost function returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Objective ----
            OptError::ConstraintViolation { name, value, lower, upper } => {
                write!(f, "Parameter {name} = {value} outside the open interval ({lower}, {upper})")
            }
            OptError::NotEvaluated => write!(f, "Objective has not been evaluated yet"),
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::Model(err) => write!(f, "Model error: {err}"),

            // ---- Simplex options ----
            OptError::InvalidSdTolerance { tol, reason } => {
                write!(f, "Invalid standard-deviation tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidSimplexStep { step, reason } => {
                write!(f, "Invalid initial simplex step {step}: {reason}")
            }

            // ---- Optimizer outcome ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    /// Errors raised by our own cost function come back through argmin
    /// boxed; recover them before falling back to argmin's own kinds.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        OptError::Model(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // An OptError that travelled through argmin comes back unchanged; argmin's
    // own errors map onto the wrapper variants.
    fn from_argmin_error_recovers_own_errors_first() {
        let own = OptError::ThetaLengthMismatch { expected: 3, actual: 2 };
        let boxed: Error = own.clone().into();
        let argmin: Error = ArgminError::InvalidParameter { text: "x".into() }.into();

        assert_eq!(OptError::from(boxed), own);
        assert_eq!(OptError::from(argmin), OptError::InvalidParameter { text: "x".into() });
    }
}
