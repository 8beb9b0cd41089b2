//! Public configuration and outcome types for rate optimization.
//!
//! - [`SimplexOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`RateFit`]: normalized result returned by [`fit_rates`](super::fit_rates).
//!
//! Convention: we *maximize* the log-likelihood `ℓ(δ, τ, λ)` by minimizing
//! the cost `c = -ℓ`. Outcomes report both.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            Cost, FnEvalMap, Theta,
            validation::{
                validate_theta_hat, validate_value, verify_max_iter, verify_sd_tolerance,
                verify_simplex_step,
            },
        },
    },
    reconciliation::RateParameters,
};
use argmin::core::TerminationStatus;

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances`: stopping rules.
/// - `initial_step`: relative size of the initial simplex around the start
///   point, in `(0, 1)`.
/// - `verbose: bool`: if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
///
/// Default:
/// - `tols`: `sd_tolerance = 1e-6`, `max_iter = 200`
/// - `initial_step`: `0.5`
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexOptions {
    pub tols: Tolerances,
    pub initial_step: f64,
    pub verbose: bool,
}

impl SimplexOptions {
    /// # Errors
    /// - [`OptError::InvalidSimplexStep`] unless `0 < initial_step < 1`.
    pub fn new(tols: Tolerances, initial_step: f64, verbose: bool) -> OptResult<Self> {
        verify_simplex_step(initial_step)?;
        Ok(Self { tols, initial_step, verbose })
    }
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self { tols: Tolerances::default(), initial_step: 0.5, verbose: false }
    }
}

/// Stopping rules for the simplex.
///
/// - `sd_tolerance`: stop when the standard deviation of the vertex costs
///   falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub sd_tolerance: f64,
    pub max_iter: u64,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - `OptError::InvalidSdTolerance` for a non-finite or non-positive tolerance.
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(sd_tolerance: f64, max_iter: u64) -> OptResult<Self> {
        verify_sd_tolerance(sd_tolerance)?;
        verify_max_iter(max_iter)?;
        Ok(Self { sd_tolerance, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { sd_tolerance: 1e-6, max_iter: 200 }
    }
}

/// Canonical result returned by `fit_rates`.
///
/// - `rates`: best rates found.
/// - `log_likelihood`: `ℓ` at `rates` (not the cost).
/// - `start_log_likelihood`: `ℓ` at the start point.
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateFit {
    pub rates: RateParameters,
    pub log_likelihood: f64,
    pub start_log_likelihood: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl RateFit {
    /// Build a validated [`RateFit`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` or the costs.
    /// - `OptError::ThetaLengthMismatch` unless `theta_hat` has three entries.
    pub fn new(
        theta_hat_opt: Option<Theta>, best_cost: Cost, start_cost: Cost,
        termination: TerminationStatus, iterations: u64, fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(best_cost)?;
        validate_value(start_cost)?;
        let rates = RateParameters::from_slice(&theta_hat.to_vec()).ok_or(
            OptError::ThetaLengthMismatch {
                expected: RateParameters::NAMES.len(),
                actual: theta_hat.len(),
            },
        )?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        Ok(Self {
            rates,
            log_likelihood: -best_cost,
            start_log_likelihood: -start_cost,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::TerminationReason;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Option constructors validate their inputs; defaults are usable.
    fn options_validate_inputs() {
        assert!(Tolerances::new(1e-6, 100).is_ok());
        assert!(matches!(Tolerances::new(-1.0, 100), Err(OptError::InvalidSdTolerance { .. })));
        assert!(matches!(Tolerances::new(1e-6, 0), Err(OptError::InvalidMaxIter { .. })));
        assert!(matches!(
            SimplexOptions::new(Tolerances::default(), 0.0, false),
            Err(OptError::InvalidSimplexStep { .. })
        ));
        let d = SimplexOptions::default();
        assert_eq!(SimplexOptions::new(d.tols, d.initial_step, d.verbose), Ok(d));
    }

    #[test]
    // Purpose
    // -------
    // Costs are reported as log-likelihoods and the status is normalized.
    fn rate_fit_flips_sign_and_maps_status() {
        let fit = RateFit::new(
            Some(array![0.1, 0.2, 0.3]),
            4.0,
            5.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
        )
        .unwrap();

        assert_eq!(fit.rates, RateParameters::new(0.1, 0.2, 0.3));
        assert_eq!(fit.log_likelihood, -4.0);
        assert_eq!(fit.start_log_likelihood, -5.0);
        assert!(fit.converged);
        assert_eq!(fit.iterations, 12);
    }
}
