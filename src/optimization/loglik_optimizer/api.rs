//! High-level entry point for fitting DTL rates.
//!
//! Builds a Nelder–Mead simplex around the objective's held parameters and
//! delegates the run to `run_simplex`. The objective *minimizes* `-ℓ`; the
//! returned [`RateFit`] reports `ℓ`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        RateFit, adapter::RateObjective, builders::build_simplex, run::run_simplex,
        traits::SimplexOptions,
    },
};

/// Maximize the log-likelihood over `(delta, tau, lambda)` with Nelder–Mead.
///
/// # Behavior
/// - Starts from `objective.parameters()`; the start point is one vertex of
///   the initial simplex, so the reported optimum is never worse than it.
/// - Infeasible proposals cost [`DEGENERATE_NLL`](crate::optimization::numerical_stability::DEGENERATE_NLL)
///   and are never accepted.
/// - On return the objective (and the shared model) hold the parameters of
///   the **last** evaluation, which need not be the best vertex; callers that
///   need the model at the optimum re-offer `fit.rates` to the objective.
///
/// # Errors
/// - Builder errors (infeasible start, bad tolerance).
/// - Model errors raised while evaluating.
/// - Argmin runtime errors, converted to `OptError`.
pub fn fit_rates(objective: &RateObjective<'_>, opts: &SimplexOptions) -> OptResult<RateFit> {
    let solver = build_simplex(&objective.parameters(), &objective.bounds(), opts)?;
    let fit = run_simplex(objective, opts, solver)?;
    tracing::info!(
        delta = fit.rates.delta,
        tau = fit.rates.tau,
        lambda = fit.rates.lambda,
        log_likelihood = fit.log_likelihood,
        iterations = fit.iterations,
        status = %fit.status,
        "rate optimization finished"
    );
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::{
        optimization::loglik_optimizer::Tolerances,
        posterior::ApproxPosterior,
        reconciliation::{ModelConfig, RateParameters, ReconciliationModel},
    };
    use std::cell::RefCell;

    const SPECIES: &str = "((A:1,B:1):1,(C:1,D:1):1);";
    const FAMILY: &str = "#constructor_string\n((A_1,B_1),(C_1,D_1));\n#observations\n4\n\
#Bip_counts\n5\t4\n6\t4\n#Dip_counts\n5\t1\t2\t4\n6\t3\t4\t4\n#last_leafset_id\n6\n\
#leaf-id\nA_1\t1\nB_1\t2\nC_1\t3\nD_1\t4\n\
#set-id\n1\t:\t1\n2\t:\t2\n3\t:\t3\n4\t:\t4\n5\t:\t1\t2\n6\t:\t3\t4\n#END\n";

    #[test]
    // Purpose
    // -------
    // The fit is never worse than the start, stays in the box, and
    // re-offering the best rates leaves the model at the optimum.
    //
    // Given
    // -----
    // - Balanced 4-leaf species tree and a concordant family.
    // - Start at (0.5, 0.5, 0.5), 40 iterations.
    //
    // Expect
    // ------
    // - log_likelihood >= start_log_likelihood.
    // - Objective value after re-offering equals -log_likelihood.
    fn fit_rates_improves_on_start() {
        let model =
            RefCell::new(ReconciliationModel::new(SPECIES, ModelConfig::default()).unwrap());
        let post: ApproxPosterior = FAMILY.parse().unwrap();
        let start = RateParameters::new(0.5, 0.5, 0.5);
        let objective = RateObjective::new(&model, &post, start).unwrap();
        let opts = SimplexOptions::new(Tolerances::new(1e-8, 40).unwrap(), 0.5, false).unwrap();

        let fit = fit_rates(&objective, &opts).unwrap();
        objective.set_parameters(fit.rates).unwrap();

        assert!(fit.log_likelihood >= fit.start_log_likelihood);
        assert!(objective.bounds().violation(&fit.rates).is_none());
        assert_relative_eq!(objective.value().unwrap(), -fit.log_likelihood, epsilon = 1e-9);
        assert_eq!(model.borrow().rates(), Some(fit.rates));
    }
}
