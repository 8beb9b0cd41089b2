//! Objective adapter that exposes the reconciliation likelihood to `argmin`.
//!
//! We turn a *maximization* of the log-likelihood `ℓ(δ, τ, λ) = ln p` into a
//! *minimization* of the cost `c = -ℓ`. [`RateObjective`] owns no model or
//! data: it borrows a shared [`ReconciliationModel`] (behind a `RefCell`, as
//! rates are pushed into it on every change) and an immutable
//! [`ApproxPosterior`], and caches the cost of the last accepted candidate.
//!
//! Evaluation happens only when the parameters actually change, so a
//! minimizer may re-query a vertex for free.
use std::cell::{Cell, RefCell};

use crate::{
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::types::{Cost, Theta},
        numerical_stability::{DEGENERATE_NLL, safe_neg_log},
    },
    posterior::ApproxPosterior,
    reconciliation::{RateBounds, RateParameters, ReconciliationModel},
};
use argmin::core::{CostFunction, Error};

/// Constrained negative log-likelihood over `(delta, tau, lambda)`.
///
/// - `set_parameters` validates a candidate against the open box
///   `(RATE_LOWER, RATE_UPPER)`, all-or-nothing, and recomputes only when
///   something changed or nothing has been evaluated yet.
/// - `value` returns the cached cost.
/// - `Clone` shares the model and posterior references and copies the
///   state, so the copies evolve independently afterwards.
///
/// The model is shared through a `RefCell`, so an objective is not `Sync`
/// and must be driven from one thread.
#[derive(Debug, Clone)]
pub struct RateObjective<'a> {
    model: &'a RefCell<ReconciliationModel>,
    posterior: &'a ApproxPosterior,
    bounds: RateBounds,
    params: Cell<RateParameters>,
    value: Cell<Option<Cost>>,
    recomputations: Cell<u64>,
}

impl<'a> RateObjective<'a> {
    /// Bind an objective to a model and a posterior summary.
    ///
    /// Nothing is evaluated yet: [`RateObjective::value`] fails with
    /// [`OptError::NotEvaluated`] until the first `set_parameters`.
    ///
    /// # Errors
    /// - [`OptError::ConstraintViolation`] if `start` lies outside the bounds.
    /// - [`OptError::Model`] if a gene of `posterior` maps to no species.
    pub fn new(
        model: &'a RefCell<ReconciliationModel>, posterior: &'a ApproxPosterior,
        start: RateParameters,
    ) -> OptResult<Self> {
        let bounds = RateBounds::default();
        check_bounds(&bounds, &start)?;
        model.borrow().map_genes(posterior)?;
        Ok(RateObjective {
            model,
            posterior,
            bounds,
            params: Cell::new(start),
            value: Cell::new(None),
            recomputations: Cell::new(0),
        })
    }

    /// Offer a candidate.
    ///
    /// # Errors
    /// - [`OptError::ConstraintViolation`] naming the first out-of-box
    ///   component; held parameters, cached value and model are untouched.
    /// - [`OptError::Model`] if the model rejects the rates or the query.
    pub fn set_parameters(&self, candidate: RateParameters) -> OptResult<()> {
        check_bounds(&self.bounds, &candidate)?;
        // Clones share the model, so it may hold another instance's rates.
        let model_current = self.model.borrow().rates() == Some(candidate);
        if candidate != self.params.get() || self.value.get().is_none() || !model_current {
            self.params.set(candidate);
            self.on_parameters_changed()?;
        }
        Ok(())
    }

    /// Cached negative log-likelihood of the held parameters.
    ///
    /// # Errors
    /// - [`OptError::NotEvaluated`] before the first evaluation.
    pub fn value(&self) -> OptResult<Cost> {
        self.value.get().ok_or(OptError::NotEvaluated)
    }

    /// Last accepted parameters.
    pub fn parameters(&self) -> RateParameters {
        self.params.get()
    }

    /// Number of full likelihood evaluations performed by this instance.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.get()
    }

    pub fn bounds(&self) -> RateBounds {
        self.bounds
    }

    fn on_parameters_changed(&self) -> OptResult<()> {
        let rates = self.params.get();
        let p = {
            let mut model = self.model.borrow_mut();
            model.apply_rates(rates)?;
            model.p(self.posterior)?
        };
        let cost = safe_neg_log(p);
        if cost == DEGENERATE_NLL {
            tracing::warn!(
                delta = rates.delta,
                tau = rates.tau,
                lambda = rates.lambda,
                p,
                "degenerate likelihood, using sentinel cost"
            );
        }
        self.recomputations.set(self.recomputations.get() + 1);
        self.value.set(Some(cost));
        tracing::trace!(
            delta = rates.delta,
            tau = rates.tau,
            lambda = rates.lambda,
            cost,
            "objective evaluated"
        );
        Ok(())
    }
}

fn check_bounds(bounds: &RateBounds, rates: &RateParameters) -> OptResult<()> {
    match bounds.violation(rates) {
        Some((name, value)) => Err(OptError::ConstraintViolation {
            name,
            value,
            lower: bounds.lower,
            upper: bounds.upper,
        }),
        None => Ok(()),
    }
}

impl CostFunction for RateObjective<'_> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost at `θ = [delta, tau, lambda]`.
    ///
    /// A proposal outside the box is rejected by returning
    /// [`DEGENERATE_NLL`] without touching the model, so simplex steps that
    /// leave the feasible region are simply never accepted.
    ///
    /// # Errors
    /// - [`OptError::ThetaLengthMismatch`] unless `θ` has three entries.
    /// - Model errors raised during evaluation.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let candidate = RateParameters::from_slice(&theta.to_vec()).ok_or(
            OptError::ThetaLengthMismatch {
                expected: RateParameters::NAMES.len(),
                actual: theta.len(),
            },
        )?;
        match self.set_parameters(candidate) {
            Ok(()) => Ok(self.value()?),
            Err(OptError::ConstraintViolation { .. }) => Ok(DEGENERATE_NLL),
            Err(err) => Err(err.into()),
        }
    }
}

/// Lets an executor drive a borrowed objective, so the caller keeps the
/// state that matches the shared model.
impl CostFunction for &RateObjective<'_> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        (**self).cost(theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::ModelConfig;
    use ndarray::array;

    const SPECIES: &str = "((A:1,B:1):1,C:2);";
    const FAMILY: &str = "#constructor_string\n((A_1,B_1),C_1);\n#observations\n10\n\
#Bip_counts\n4\t10\n#Dip_counts\n4\t1\t2\t10\n#last_leafset_id\n4\n\
#leaf-id\nA_1\t1\nB_1\t2\nC_1\t3\n#set-id\n1\t:\t1\n2\t:\t2\n3\t:\t3\n4\t:\t1\t2\n#END\n";

    fn fixture() -> (RefCell<ReconciliationModel>, ApproxPosterior) {
        let model = ReconciliationModel::new(SPECIES, ModelConfig::default()).unwrap();
        (RefCell::new(model), FAMILY.parse().unwrap())
    }

    #[test]
    // Purpose
    // -------
    // The value is unavailable until the first evaluation, and the first
    // set_parameters evaluates even when the candidate equals the start.
    fn first_set_evaluates_even_when_unchanged() {
        let (model, post) = fixture();
        let start = RateParameters::default();
        let obj = RateObjective::new(&model, &post, start).unwrap();

        let before = obj.value();
        obj.set_parameters(start).unwrap();

        assert_eq!(before, Err(OptError::NotEvaluated));
        assert_eq!(obj.recomputations(), 1);
        let v = obj.value().unwrap();
        assert!(v.is_finite() && v >= 0.0 && v < DEGENERATE_NLL);
        assert_eq!(model.borrow().rates(), Some(start));
    }

    #[test]
    // Purpose
    // -------
    // Re-offering the held parameters is free; a change recomputes once.
    fn recompute_only_on_change() {
        let (model, post) = fixture();
        let obj = RateObjective::new(&model, &post, RateParameters::default()).unwrap();
        let other = RateParameters::new(0.2, 0.05, 0.3);

        obj.set_parameters(RateParameters::default()).unwrap();
        obj.set_parameters(RateParameters::default()).unwrap();
        obj.set_parameters(other).unwrap();
        obj.set_parameters(other).unwrap();

        assert_eq!(obj.recomputations(), 2);
        assert_eq!(obj.parameters(), other);
    }

    #[test]
    // Purpose
    // -------
    // An out-of-box candidate is rejected as a whole and leaves state and
    // model untouched.
    fn constraint_violation_is_all_or_nothing() {
        let (model, post) = fixture();
        let obj = RateObjective::new(&model, &post, RateParameters::default()).unwrap();
        obj.set_parameters(RateParameters::default()).unwrap();
        let cached = obj.value().unwrap();

        let err = obj.set_parameters(RateParameters::new(0.5, 0.5, 10.0)).unwrap_err();

        assert!(matches!(err, OptError::ConstraintViolation { name: "lambda", value, .. } if value == 10.0));
        assert_eq!(obj.value(), Ok(cached));
        assert_eq!(obj.parameters(), RateParameters::default());
        assert_eq!(model.borrow().rates(), Some(RateParameters::default()));
        assert_eq!(obj.recomputations(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Construction checks the start point and the gene-to-species mapping.
    fn new_rejects_bad_start_and_unmapped_genes() {
        let (model, post) = fixture();
        let unmapped: ApproxPosterior = FAMILY.replace("C_1", "Q_1").parse().unwrap();

        let bad_start = RateObjective::new(&model, &post, RateParameters::new(0.0, 0.1, 0.1));
        let bad_genes = RateObjective::new(&model, &unmapped, RateParameters::default());

        assert!(matches!(bad_start, Err(OptError::ConstraintViolation { name: "delta", .. })));
        assert!(matches!(bad_genes, Err(OptError::Model(_))));
    }

    #[test]
    // Purpose
    // -------
    // Clones share the model but keep their own cache and counters.
    fn clone_isolates_state() {
        let (model, post) = fixture();
        let a = RateObjective::new(&model, &post, RateParameters::default()).unwrap();
        a.set_parameters(RateParameters::default()).unwrap();

        let b = a.clone();
        b.set_parameters(RateParameters::new(0.3, 0.3, 0.3)).unwrap();

        assert_eq!(a.recomputations(), 1);
        assert_eq!(b.recomputations(), 2);
        assert_eq!(a.parameters(), RateParameters::default());
        assert_eq!(model.borrow().rates(), Some(RateParameters::new(0.3, 0.3, 0.3)));
    }

    #[test]
    // Purpose
    // -------
    // Re-offering an instance's own parameters after a clone moved the
    // shared model puts the model back and refreshes the cached value.
    //
    // Given
    // -----
    // - `a` evaluated at the defaults; its clone `b` evaluated elsewhere.
    //
    // Expect
    // ------
    // - `a` recomputes once more; model rates and `a.value()` agree again.
    fn reoffer_restores_model_moved_by_clone() {
        let (model, post) = fixture();
        let a = RateObjective::new(&model, &post, RateParameters::default()).unwrap();
        a.set_parameters(RateParameters::default()).unwrap();
        let own_cost = a.value().unwrap();
        let b = a.clone();
        b.set_parameters(RateParameters::new(0.3, 0.3, 0.3)).unwrap();

        a.set_parameters(RateParameters::default()).unwrap();

        assert_eq!(a.recomputations(), 2);
        assert_eq!(model.borrow().rates(), Some(RateParameters::default()));
        let model_cost = -model.borrow().p(&post).unwrap().ln();
        assert_eq!(a.value().unwrap(), model_cost);
        assert_eq!(a.value().unwrap(), own_cost);
    }

    #[test]
    // Purpose
    // -------
    // The argmin cost maps out-of-box proposals to the sentinel and rejects
    // vectors of the wrong length.
    fn cost_function_handles_infeasible_and_malformed_theta() {
        let (model, post) = fixture();
        let obj = RateObjective::new(&model, &post, RateParameters::default()).unwrap();

        let feasible = obj.cost(&array![0.01, 0.01, 0.1]).unwrap();
        let infeasible = obj.cost(&array![-1.0, 0.01, 0.1]).unwrap();
        let malformed = obj.cost(&array![0.01, 0.01]).unwrap_err();

        assert_eq!(feasible, obj.value().unwrap());
        assert_eq!(infeasible, DEGENERATE_NLL);
        assert_eq!(
            OptError::from(malformed),
            OptError::ThetaLengthMismatch { expected: 3, actual: 2 }
        );
        assert_eq!(obj.recomputations(), 1);
    }
}
