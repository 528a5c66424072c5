//! Model types for the Bayes widgets: single-evidence parameters and the
//! categorical count table naive Bayes classifies against.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, LabResult};

/// Inputs to the single-evidence posterior update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BayesParams {
    /// P(B) — belief before seeing the evidence.
    pub prior: f64,
    /// P(E|B) — probability of the evidence given the belief holds.
    pub likelihood: f64,
    /// P(E) — total probability of the evidence. Must be positive.
    pub marginal: f64,
}

/// Per-class summary row of a [`NaiveBayesTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    /// Display label ("yes", "no", ...).
    pub label: String,
    /// P(class) before any evidence.
    pub prior: f64,
    /// Number of training rows with this class.
    pub total: u32,
}

/// Per-class counts for one value of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCounts {
    /// The categorical value ("High", "Mild", ...).
    pub value: String,
    /// Training-row counts, parallel to the table's class order.
    pub counts: Vec<u32>,
}

/// A categorical feature with its observed value vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub values: Vec<ValueCounts>,
}

impl Feature {
    /// Number of distinct values — the `m` in the smoothing denominator.
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }
}

/// Count table for naive Bayes classification: ordered classes crossed
/// with ordered categorical features. Order is significant because the
/// widget renders the likelihood chain in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesTable {
    pub classes: Vec<ClassSummary>,
    pub features: Vec<Feature>,
}

impl NaiveBayesTable {
    /// Look up the count of `(feature, value)` for the class at `class_idx`.
    pub fn count(&self, feature: &str, value: &str, class_idx: usize) -> LabResult<u32> {
        let feat = self
            .features
            .iter()
            .find(|f| f.name == feature)
            .ok_or_else(|| LabError::UnknownCategory {
                feature: feature.to_string(),
                value: value.to_string(),
            })?;
        let vc = feat
            .values
            .iter()
            .find(|v| v.value == value)
            .ok_or_else(|| LabError::UnknownCategory {
                feature: feature.to_string(),
                value: value.to_string(),
            })?;
        vc.counts
            .get(class_idx)
            .copied()
            .ok_or(LabError::IndexOutOfRange {
                what: "class index",
                index: class_idx,
                limit: self.classes.len(),
            })
    }

    /// Feature lookup by name.
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }
}

/// A feature-value assignment to classify, in table feature order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation(pub Vec<(String, String)>);

impl Observation {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(f, v)| (f.to_string(), v.to_string()))
                .collect(),
        )
    }
}

fn feature(name: &str, classes: usize, rows: &[(&str, &[u32])]) -> Feature {
    Feature {
        name: name.to_string(),
        values: rows
            .iter()
            .map(|(value, counts)| {
                debug_assert_eq!(counts.len(), classes);
                ValueCounts {
                    value: value.to_string(),
                    counts: counts.to_vec(),
                }
            })
            .collect(),
    }
}

/// The Disease-Z teaching table: 14 patients, 9 with the disease and 5
/// without, described by four categorical symptoms.
pub fn disease_table() -> NaiveBayesTable {
    NaiveBayesTable {
        classes: vec![
            ClassSummary {
                label: "yes".to_string(),
                prior: 9.0 / 14.0,
                total: 9,
            },
            ClassSummary {
                label: "no".to_string(),
                prior: 5.0 / 14.0,
                total: 5,
            },
        ],
        features: vec![
            feature(
                "BP",
                2,
                &[
                    ("High", &[2, 3]),
                    ("Normal", &[3, 2]),
                    ("Low", &[4, 0]),
                ],
            ),
            feature(
                "Fever",
                2,
                &[("High", &[2, 2]), ("Mild", &[4, 2]), ("No", &[3, 1])],
            ),
            feature("Diabetes", 2, &[("Yes", &[3, 4]), ("No", &[6, 1])]),
            feature("Vomit", 2, &[("Yes", &[3, 3]), ("No", &[6, 2])]),
        ],
    }
}

/// The default observation the disease widget opens with.
pub fn default_observation() -> Observation {
    Observation::new(&[
        ("BP", "High"),
        ("Fever", "No"),
        ("Diabetes", "Yes"),
        ("Vomit", "Yes"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_table_shape() {
        let table = disease_table();
        assert_eq!(table.classes.len(), 2);
        assert_eq!(table.features.len(), 4);
        // m values from the source material: BP 3, Fever 3, Diabetes 2, Vomit 2.
        let m: Vec<usize> = table.features.iter().map(Feature::cardinality).collect();
        assert_eq!(m, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_priors_sum_to_one() {
        let table = disease_table();
        let total: f64 = table.classes.iter().map(|c| c.prior).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_count_lookup() {
        let table = disease_table();
        assert_eq!(table.count("BP", "Low", 0).unwrap(), 4);
        assert_eq!(table.count("BP", "Low", 1).unwrap(), 0);
        assert!(matches!(
            table.count("BP", "Extreme", 0),
            Err(LabError::UnknownCategory { .. })
        ));
        assert!(matches!(
            table.count("Pulse", "High", 0),
            Err(LabError::UnknownCategory { .. })
        ));
    }
}
