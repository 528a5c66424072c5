//! Bayesian inference: single-evidence updates and naive Bayes
//! classification with additive smoothing.

pub mod models;
pub mod naive;
pub mod posterior;

pub use models::{
    default_observation, disease_table, BayesParams, ClassSummary, Feature, NaiveBayesTable,
    Observation, ValueCounts,
};
pub use naive::{
    classify, ClassScore, LikelihoodStep, NaiveBayesReport, NaiveBayesSettings, ScoreMode,
};
pub use posterior::{marginal_by_total_probability, posterior};
