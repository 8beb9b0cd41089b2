//! Execution helper that runs the simplex on a rate objective and returns a
//! crate-friendly [`RateFit`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        RateFit, SimplexOptions,
        adapter::RateObjective,
        types::{RateSimplex, SimplexState},
    },
};
use argmin::core::{Executor, State};

/// Run Nelder–Mead on a borrowed [`RateObjective`].
///
/// The executor drives `&objective`, so every evaluation goes through the
/// caller's instance and its cache stays in step with the shared model.
///
/// # Arguments
/// - `objective`: evaluated at its held parameters before the run; that
///   value becomes [`RateFit::start_log_likelihood`].
/// - `opts`: tolerances, verbosity.
/// - `solver`: from [`build_simplex`](super::builders::build_simplex).
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always`.
///
/// # Errors
/// - Propagates objective errors for the start point.
/// - Propagates any `argmin` runtime error via `From<argmin::core::Error>`.
/// - Propagates validation errors from [`RateFit::new`].
pub fn run_simplex(
    objective: &RateObjective<'_>, opts: &SimplexOptions, solver: RateSimplex,
) -> OptResult<RateFit> {
    objective.set_parameters(objective.parameters())?;
    let start_cost = objective.value()?;
    tracing::debug!(start_cost, max_iter = opts.tols.max_iter, "starting simplex");

    let mut optimizer = Executor::new(objective, solver);
    optimizer = optimizer.configure(|state: SimplexState| state.max_iters(opts.tols.max_iter));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let best_cost = result.get_best_cost();
    RateFit::new(
        result.take_best_param(),
        best_cost,
        start_cost,
        termination,
        iterations,
        function_counts,
    )
}
