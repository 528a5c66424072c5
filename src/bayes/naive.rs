//! Naive Bayes classification with additive smoothing.
//!
//! For each class `c` the raw score is
//! `prior(c) · Π_f (count(f, v_f, c) + α) / (total(c) + m(f)·α)` and the
//! displayed posterior is the raw score normalized across classes. With
//! α = 0 this reproduces the zero-frequency problem: one unseen
//! feature/class combination zeroes the whole product.
//!
//! Log-sum mode accumulates `ln(prior) + Σ ln(p)` with a small epsilon
//! substituted for zero probabilities. It exists to demonstrate numerical
//! stability; posteriors are always derived from the raw scores.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bayes::models::{Feature, NaiveBayesTable, Observation};
use crate::error::LabResult;

/// Which accumulation the widget displays as the per-class score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// Plain probability product (the default).
    Product,
    /// Log-domain sum, shown for numerical-stability comparison.
    LogSum,
}

/// Tuning for a classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesSettings {
    /// Additive (Laplace) smoothing coefficient, α ≥ 0.
    pub alpha: f64,
    /// Score accumulation mode.
    pub mode: ScoreMode,
    /// Substitute for zero probabilities inside `ln`, keeping log-sum
    /// finite when a count is zero.
    pub log_epsilon: f64,
    /// Replace the first class's prior with this value, rescaling the
    /// remaining priors proportionally. The disease widget drives this
    /// from its draggable prior handle.
    pub prior_override: Option<f64>,
}

impl Default for NaiveBayesSettings {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            mode: ScoreMode::Product,
            log_epsilon: 1e-10,
            prior_override: None,
        }
    }
}

/// One factor of a class's likelihood chain, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodStep {
    /// "Prior" or the feature name.
    pub name: String,
    /// Display label, e.g. `P(BP|yes)`.
    pub label: String,
    /// The factor's probability.
    pub probability: f64,
}

/// Scores for a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub label: String,
    /// `prior · Π likelihoods`, before normalization.
    pub raw: f64,
    /// `ln(prior) + Σ ln(likelihood or ε)`.
    pub log_score: f64,
    /// Raw score normalized across all classes; 0.0 when every class
    /// scored zero (degenerate case).
    pub posterior: f64,
    /// The score as selected by [`ScoreMode`] — what the widget shows in
    /// its score column.
    pub score: f64,
    /// Factor-by-factor breakdown the widget renders.
    pub steps: Vec<LikelihoodStep>,
}

/// Full classification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesReport {
    pub classes: Vec<ClassScore>,
    /// True when every raw score was zero, so the posteriors above are a
    /// zero-filled sentinel rather than a distribution.
    pub degenerate: bool,
}

impl NaiveBayesReport {
    /// Label of the highest-posterior class.
    pub fn prediction(&self) -> Option<&str> {
        self.classes
            .iter()
            .max_by(|a, b| a.posterior.total_cmp(&b.posterior))
            .map(|c| c.label.as_str())
    }
}

/// Effective priors after applying an override to the first class.
fn effective_priors(table: &NaiveBayesTable, prior_override: Option<f64>) -> Vec<f64> {
    let priors: Vec<f64> = table.classes.iter().map(|c| c.prior).collect();
    let Some(first) = prior_override else {
        return priors;
    };
    let first = first.clamp(0.0, 1.0);
    let rest: f64 = priors.iter().skip(1).sum();
    if rest <= 0.0 {
        return priors;
    }
    let scale = (1.0 - first) / rest;
    priors
        .iter()
        .enumerate()
        .map(|(i, &p)| if i == 0 { first } else { p * scale })
        .collect()
}

/// Classify an observation against the count table.
///
/// Every feature named by the observation must exist in the table with
/// the given value; the observation may cover a subset of the table's
/// features (the chain simply has fewer factors).
pub fn classify(
    table: &NaiveBayesTable,
    observation: &Observation,
    settings: &NaiveBayesSettings,
) -> LabResult<NaiveBayesReport> {
    let alpha = settings.alpha.max(0.0);
    let eps = settings.log_epsilon;
    let priors = effective_priors(table, settings.prior_override);

    let mut classes = Vec::with_capacity(table.classes.len());

    for (idx, class) in table.classes.iter().enumerate() {
        let prior = priors[idx];
        let mut steps = vec![LikelihoodStep {
            name: "Prior".to_string(),
            label: format!("P(class={})", class.label),
            probability: prior,
        }];

        let mut product = 1.0;
        let mut log_score = if prior > 0.0 { prior.ln() } else { eps.ln() };

        for (feature_name, value) in &observation.0 {
            let count = table.count(feature_name, value, idx)?;
            let m = table
                .feature(feature_name)
                .map(Feature::cardinality)
                .unwrap_or(0);
            let p = (f64::from(count) + alpha) / (f64::from(class.total) + m as f64 * alpha);

            steps.push(LikelihoodStep {
                name: feature_name.clone(),
                label: format!("P({feature_name}|{})", class.label),
                probability: p,
            });
            product *= p;
            log_score += if p > 0.0 { p.ln() } else { eps.ln() };
        }

        let raw = prior * product;
        classes.push(ClassScore {
            label: class.label.clone(),
            raw,
            log_score,
            posterior: 0.0,
            score: match settings.mode {
                ScoreMode::Product => raw,
                ScoreMode::LogSum => log_score,
            },
            steps,
        });
    }

    let total: f64 = classes.iter().map(|c| c.raw).sum();
    let degenerate = total <= 0.0;
    if degenerate {
        warn!(alpha, "all raw scores are zero; posteriors degenerate to 0");
    } else {
        for class in &mut classes {
            class.posterior = class.raw / total;
        }
    }

    debug!(
        alpha,
        degenerate,
        classes = classes.len(),
        "naive bayes classification"
    );
    Ok(NaiveBayesReport {
        classes,
        degenerate,
    })
}
