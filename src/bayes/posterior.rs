//! Single-evidence Bayesian update.

use tracing::debug;

use crate::bayes::BayesParams;
use crate::error::{LabError, LabResult};

/// Posterior probability `P(B|E) = P(B) · P(E|B) / P(E)`.
///
/// A zero (or negative) marginal leaves the posterior undefined and is
/// reported as an error rather than allowed to become NaN or infinity in
/// a display value. The classic fire-alarm case: prior 0.01, likelihood
/// 0.9, marginal 0.1 → posterior 0.09.
pub fn posterior(params: &BayesParams) -> LabResult<f64> {
    if params.marginal <= 0.0 {
        return Err(LabError::DivisionByZero {
            marginal: params.marginal,
        });
    }
    let value = params.prior * params.likelihood / params.marginal;
    debug!(
        prior = params.prior,
        likelihood = params.likelihood,
        marginal = params.marginal,
        posterior = value,
        "bayes update"
    );
    Ok(value)
}

/// Marginal evidence probability via total probability over the two
/// hypotheses: `P(E) = P(B)·P(E|B) + (1−P(B))·P(E|¬B)`.
///
/// The probability-square widget derives its marginal this way instead of
/// taking it as a direct slider.
pub fn marginal_by_total_probability(prior: f64, lik_true: f64, lik_false: f64) -> f64 {
    prior * lik_true + (1.0 - prior) * lik_false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_alarm_case() {
        let p = posterior(&BayesParams {
            prior: 0.01,
            likelihood: 0.9,
            marginal: 0.1,
        })
        .unwrap();
        assert!(
            (p - 0.09).abs() < 1e-12,
            "fire case must give exactly 9%, got {p}"
        );
    }

    #[test]
    fn test_zero_marginal_is_an_error() {
        let err = posterior(&BayesParams {
            prior: 0.5,
            likelihood: 0.5,
            marginal: 0.0,
        })
        .unwrap_err();
        assert!(matches!(err, LabError::DivisionByZero { .. }));
    }

    #[test]
    fn test_total_probability_marginal() {
        // P(E) = 0.1·0.9 + 0.9·0.2 = 0.27
        let m = marginal_by_total_probability(0.1, 0.9, 0.2);
        assert!((m - 0.27).abs() < 1e-12);

        // Feeding the derived marginal back in gives a consistent posterior.
        let p = posterior(&BayesParams {
            prior: 0.1,
            likelihood: 0.9,
            marginal: m,
        })
        .unwrap();
        assert!((p - 0.09 / 0.27).abs() < 1e-12);
    }
}
