//! Validation helpers for rate optimization.
//!
//! - **Option checks**: [`verify_sd_tolerance`], [`verify_max_iter`],
//!   [`verify_simplex_step`] ensure simplex settings are usable.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks costs for finiteness.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`OptError`] variants.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::Theta,
};

/// Validate the simplex standard-deviation tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidSdTolerance`] if the value is non-finite or ≤ 0.0.
pub fn verify_sd_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// # Errors
/// Returns [`OptError::InvalidMaxIter`] if `max_iter == 0`.
pub fn verify_max_iter(max_iter: u64) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate the relative size of the initial simplex.
///
/// # Errors
/// Returns [`OptError::InvalidSimplexStep`] unless `0 < step < 1`.
pub fn verify_simplex_step(step: f64) -> OptResult<()> {
    if !(step > 0.0 && step < 1.0) {
        return Err(OptError::InvalidSimplexStep {
            step,
            reason: "Relative step must lie strictly between 0 and 1.",
        });
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// Accepts only a present vector with all **finite** entries.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar cost is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
