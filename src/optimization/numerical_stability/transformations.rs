//! Numerical stability utilities.
//!
//! Guarded versions of the few scalar operations the likelihood layer is
//! sensitive to: turning a probability into a negative log-likelihood
//! without producing `inf`/`NaN`, and stepping a linear-decay ODE without
//! the overshoot an explicit Euler step shows at high rates.
//!
//! # Provided items
//! - [`DEGENERATE_NLL`]: sentinel cost for zero or invalid probabilities.
//! - [`safe_neg_log(p)`]: `-ln(p)` or the sentinel.
//! - [`exp_relax(x, rate, dt, source)`]: one exponential-integrator step
//!   of `dx/dt = source - rate·x`.
//! - [`relative_eq(a, b, tol)`]: relative comparison with an absolute floor.

/// Sentinel negative log-likelihood for degenerate evaluations.
///
/// Returned when the model reports a probability that is zero, negative, or
/// not finite. It is finite, so simplex arithmetic on costs stays defined,
/// and it is larger than any attainable `-ln(p)` for `p ≥ f64::MIN_POSITIVE`
/// (about 708.4).
pub const DEGENERATE_NLL: f64 = 1.0e30;

/// Negative natural log of a probability, guarded.
///
/// Returns [`DEGENERATE_NLL`] when `p` is not finite, `p <= 0`, or the result
/// would not be finite.
pub fn safe_neg_log(p: f64) -> f64 {
    if !p.is_finite() || p <= 0.0 {
        return DEGENERATE_NLL;
    }
    let y = -p.ln();
    if y.is_finite() { y } else { DEGENERATE_NLL }
}

/// `true` when `a` and `b` agree to relative tolerance `tol`.
///
/// The denominator is floored at 1 so values near zero are compared
/// absolutely.
pub fn relative_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
}

/// One step of `dx/dt = source - rate·x` with `source` frozen over the step.
///
/// The decay part is integrated exactly:
/// `x' = x·e^{-rate·dt} + (1 - e^{-rate·dt})/rate · source`.
/// For non-negative inputs the result is non-negative for every `dt`, and
/// when `source <= rate` and `x <= 1` it stays `<= 1`, so probabilities never
/// leave `[0, 1]`. Falls back to an Euler step when `rate` is zero.
#[inline]
pub fn exp_relax(x: f64, rate: f64, dt: f64, source: f64) -> f64 {
    if rate > 0.0 {
        let decay = (-rate * dt).exp();
        x * decay + (1.0 - decay) / rate * source
    } else {
        x + dt * source
    }
}
