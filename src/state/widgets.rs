//! Per-widget state holders.
//!
//! Each lab widget owns its adjustable parameters and non-scalar inputs
//! (kernel cells, symptom selections, the query point). Every mutation
//! re-derives the widget's full report synchronously; reports are pure
//! functions of the stored state, so re-running with unchanged state
//! yields an identical report. Widgets never share state with each other.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::backprop::{output_delta, sigmoid_grad, weight_update};
use crate::bayes::{
    classify, default_observation, disease_table, marginal_by_total_probability, posterior,
    BayesParams, NaiveBayesReport, NaiveBayesSettings, NaiveBayesTable, Observation, ScoreMode,
};
use crate::convolution::{convolve, ConvolutionSettings, KernelPreset};
use crate::error::{LabError, LabResult};
use crate::knn::{rank_neighbors, sample_dataset, KnnReport, LabeledPoint, QueryPoint};
use crate::matrix::{
    broadcast_add, classify_selection, demo_image, demo_matrix, Matrix, Selection, SelectionReport,
};
use crate::state::params::{ParamSpec, ParameterSet};

/// Common surface every widget exposes to the (out-of-scope) UI layer:
/// a stable name and a JSON snapshot of the current display state.
pub trait LabWidget {
    fn name(&self) -> &'static str;
    fn snapshot(&self) -> anyhow::Result<Value>;
}

// ============================================================================
// Slicing widget — view vs copy, plus the broadcasting demo
// ============================================================================

/// Broadcasting demo block of the slicing widget's snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastDemo {
    pub left_shape: Vec<usize>,
    pub right_shape: Vec<usize>,
    pub result_shape: Vec<usize>,
    pub result: Vec<Vec<f64>>,
}

/// State of the NumPy-mechanics widget: a fixed 4×4 matrix and the
/// currently chosen selection, if any.
pub struct SlicingLab {
    matrix: Matrix,
    selection: Option<Selection>,
    report: Option<SelectionReport>,
}

fn even_value(v: f64) -> bool {
    (v as i64) % 2 == 0
}

impl SlicingLab {
    pub fn new() -> Self {
        Self {
            matrix: demo_matrix(),
            selection: None,
            report: None,
        }
    }

    /// Apply a selection and recompute the overlay.
    pub fn select(&mut self, selection: Selection) -> LabResult<&SelectionReport> {
        let report = classify_selection(&self.matrix, &selection)?;
        self.selection = Some(selection);
        Ok(&*self.report.insert(report))
    }

    /// The `a[1:2, :]` button.
    pub fn select_slice(&mut self) -> LabResult<&SelectionReport> {
        self.select(Selection::Rows { start: 1, end: 2 })
    }

    /// The `a[[0, 2]]` button.
    pub fn select_fancy(&mut self) -> LabResult<&SelectionReport> {
        self.select(Selection::RowList(vec![0, 2]))
    }

    /// The `a[a % 2 == 0]` button.
    pub fn select_mask(&mut self) -> LabResult<&SelectionReport> {
        self.select(Selection::Mask(even_value))
    }

    /// Drop the selection (back to the idle prompt).
    pub fn clear(&mut self) {
        self.selection = None;
        self.report = None;
    }

    pub fn report(&self) -> Option<&SelectionReport> {
        self.report.as_ref()
    }

    /// The currently applied selection, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The fixed (3,1) + (1,4) broadcasting demonstration.
    pub fn broadcast_demo(&self) -> LabResult<BroadcastDemo> {
        let a = Matrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]])?;
        let b = Matrix::from_rows(vec![vec![10.0, 20.0, 30.0, 40.0]])?;
        let result = broadcast_add(&a, &b)?;
        Ok(BroadcastDemo {
            left_shape: a.shape().to_vec(),
            right_shape: b.shape().to_vec(),
            result_shape: result.shape().to_vec(),
            result: result.to_rows(),
        })
    }
}

impl Default for SlicingLab {
    fn default() -> Self {
        Self::new()
    }
}

impl LabWidget for SlicingLab {
    fn name(&self) -> &'static str {
        "slicing"
    }

    fn snapshot(&self) -> anyhow::Result<Value> {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            matrix: Vec<Vec<f64>>,
            selection: Option<&'a SelectionReport>,
            broadcast: BroadcastDemo,
        }
        Ok(serde_json::to_value(Snapshot {
            matrix: self.matrix.to_rows(),
            selection: self.report.as_ref(),
            broadcast: self.broadcast_demo()?,
        })?)
    }
}

// ============================================================================
// Filter widget — kernel editing and convolution
// ============================================================================

/// State of the convolution widget: the fixed demo image, an editable
/// 3×3 kernel, and the active preset name (None once a cell is edited).
pub struct FilterLab {
    source: Matrix,
    kernel: Matrix,
    preset: Option<KernelPreset>,
    settings: ConvolutionSettings,
    feature_map: Matrix,
}

impl FilterLab {
    pub fn new(settings: ConvolutionSettings) -> LabResult<Self> {
        let source = demo_image();
        let kernel = KernelPreset::SobelX.matrix();
        let feature_map = convolve(&source, &kernel, &settings)?;
        Ok(Self {
            source,
            kernel,
            preset: Some(KernelPreset::SobelX),
            settings,
            feature_map,
        })
    }

    /// Swap in a named preset kernel.
    pub fn apply_preset(&mut self, preset: KernelPreset) -> LabResult<()> {
        self.kernel = preset.matrix();
        self.preset = Some(preset);
        self.refresh()
    }

    /// Edit one kernel cell; the widget then shows a custom kernel.
    pub fn set_kernel_cell(&mut self, row: usize, col: usize, value: f64) -> LabResult<()> {
        self.kernel.set(row, col, value)?;
        self.preset = None;
        self.refresh()
    }

    fn refresh(&mut self) -> LabResult<()> {
        self.feature_map = convolve(&self.source, &self.kernel, &self.settings)?;
        Ok(())
    }

    pub fn preset(&self) -> Option<KernelPreset> {
        self.preset
    }

    pub fn kernel(&self) -> &Matrix {
        &self.kernel
    }

    pub fn feature_map(&self) -> &Matrix {
        &self.feature_map
    }
}

impl LabWidget for FilterLab {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn snapshot(&self) -> anyhow::Result<Value> {
        #[derive(Serialize)]
        struct Snapshot {
            source: Vec<Vec<f64>>,
            kernel: Vec<Vec<f64>>,
            preset: Option<&'static str>,
            feature_map: Vec<Vec<f64>>,
        }
        Ok(serde_json::to_value(Snapshot {
            source: self.source.to_rows(),
            kernel: self.kernel.to_rows(),
            preset: self.preset.map(|p| p.name()),
            feature_map: self.feature_map.to_rows(),
        })?)
    }
}

// ============================================================================
// Fire-alarm widget — single-evidence Bayes
// ============================================================================

/// Where the fire-alarm widget's marginal comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceMode {
    /// The marginal is its own slider.
    Direct,
    /// The marginal is derived by total probability from P(E|B) and
    /// P(E|¬B) (the probability-square layout).
    TotalProbability,
}

/// Display state of the fire-alarm widget.
#[derive(Debug, Clone, Serialize)]
pub struct PosteriorReport {
    pub prior: f64,
    pub likelihood: f64,
    pub marginal: f64,
    /// P(B ∩ E) — the blue area of the probability square.
    pub joint: f64,
    pub posterior: f64,
}

/// State of the Bayes-basics widget.
pub struct FireAlarmLab {
    params: ParameterSet,
    mode: EvidenceMode,
    report: PosteriorReport,
}

impl FireAlarmLab {
    pub fn new() -> LabResult<Self> {
        let params = ParameterSet::new(&[
            ("prior", ParamSpec::new(0.001, 0.2, 0.001, 0.01)),
            ("likelihood", ParamSpec::new(0.5, 1.0, 0.01, 0.9)),
            ("marginal", ParamSpec::new(0.01, 0.5, 0.01, 0.1)),
            ("likelihood_given_not", ParamSpec::new(0.01, 0.99, 0.01, 0.2)),
        ]);
        let mut lab = Self {
            params,
            mode: EvidenceMode::Direct,
            report: PosteriorReport {
                prior: 0.0,
                likelihood: 0.0,
                marginal: 0.0,
                joint: 0.0,
                posterior: 0.0,
            },
        };
        lab.refresh()?;
        Ok(lab)
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) -> LabResult<f64> {
        let stored = self.params.set(name, value)?;
        self.refresh()?;
        Ok(stored)
    }

    pub fn set_mode(&mut self, mode: EvidenceMode) -> LabResult<()> {
        self.mode = mode;
        self.refresh()
    }

    fn refresh(&mut self) -> LabResult<()> {
        let prior = self.params.get("prior")?;
        let likelihood = self.params.get("likelihood")?;
        let marginal = match self.mode {
            EvidenceMode::Direct => self.params.get("marginal")?,
            EvidenceMode::TotalProbability => marginal_by_total_probability(
                prior,
                likelihood,
                self.params.get("likelihood_given_not")?,
            ),
        };

        let params = BayesParams {
            prior,
            likelihood,
            marginal,
        };
        let value = posterior(&params)?;
        self.report = PosteriorReport {
            prior,
            likelihood,
            marginal,
            joint: prior * likelihood,
            posterior: value,
        };
        Ok(())
    }

    pub fn report(&self) -> &PosteriorReport {
        &self.report
    }
}

impl LabWidget for FireAlarmLab {
    fn name(&self) -> &'static str {
        "fire_alarm"
    }

    fn snapshot(&self) -> anyhow::Result<Value> {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            mode: EvidenceMode,
            report: &'a PosteriorReport,
        }
        Ok(serde_json::to_value(Snapshot {
            mode: self.mode,
            report: &self.report,
        })?)
    }
}

// ============================================================================
// Disease widget — naive Bayes diagnosis
// ============================================================================

/// State of the naive-Bayes diagnosis widget.
pub struct DiseaseLab {
    table: NaiveBayesTable,
    observation: Observation,
    params: ParameterSet,
    log_mode: bool,
    log_epsilon: f64,
    prior_override: Option<f64>,
    report: NaiveBayesReport,
}

impl DiseaseLab {
    pub fn new(log_epsilon: f64) -> LabResult<Self> {
        let table = disease_table();
        let observation = default_observation();
        let params = ParameterSet::new(&[("alpha", ParamSpec::new(0.0, 2.0, 0.1, 0.0))]);
        let settings = NaiveBayesSettings {
            log_epsilon,
            ..Default::default()
        };
        let report = classify(&table, &observation, &settings)?;
        Ok(Self {
            table,
            observation,
            params,
            log_mode: false,
            log_epsilon,
            prior_override: None,
            report,
        })
    }

    /// Change one symptom selection. The value must exist in the table.
    pub fn set_symptom(&mut self, feature: &str, value: &str) -> LabResult<()> {
        // Validate before mutating so a bad value leaves state untouched.
        self.table.count(feature, value, 0)?;
        match self
            .observation
            .0
            .iter_mut()
            .find(|(name, _)| name == feature)
        {
            Some(slot) => slot.1 = value.to_string(),
            None => {
                return Err(LabError::UnknownCategory {
                    feature: feature.to_string(),
                    value: value.to_string(),
                })
            }
        }
        self.refresh()
    }

    /// Set the smoothing coefficient α.
    pub fn set_alpha(&mut self, alpha: f64) -> LabResult<f64> {
        let stored = self.params.set("alpha", alpha)?;
        self.refresh()?;
        Ok(stored)
    }

    /// Toggle between product and log-sum score display.
    pub fn toggle_log_mode(&mut self) -> LabResult<bool> {
        self.log_mode = !self.log_mode;
        self.refresh()?;
        Ok(self.log_mode)
    }

    /// Drag the prior handle; clamped to (0, 1) by the caller's spec.
    pub fn set_prior(&mut self, prior: f64) -> LabResult<()> {
        self.prior_override = Some(prior.clamp(0.01, 0.99));
        self.refresh()
    }

    fn refresh(&mut self) -> LabResult<()> {
        let settings = NaiveBayesSettings {
            alpha: self.params.get("alpha")?,
            mode: if self.log_mode {
                ScoreMode::LogSum
            } else {
                ScoreMode::Product
            },
            log_epsilon: self.log_epsilon,
            prior_override: self.prior_override,
        };
        self.report = classify(&self.table, &self.observation, &settings)?;
        debug!(
            alpha = settings.alpha,
            log_mode = self.log_mode,
            degenerate = self.report.degenerate,
            "disease lab recomputed"
        );
        Ok(())
    }

    pub fn report(&self) -> &NaiveBayesReport {
        &self.report
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }
}

impl LabWidget for DiseaseLab {
    fn name(&self) -> &'static str {
        "disease"
    }

    fn snapshot(&self) -> anyhow::Result<Value> {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            observation: &'a Observation,
            alpha: f64,
            log_mode: bool,
            report: &'a NaiveBayesReport,
        }
        Ok(serde_json::to_value(Snapshot {
            observation: &self.observation,
            alpha: self.params.get("alpha")?,
            log_mode: self.log_mode,
            report: &self.report,
        })?)
    }
}

// ============================================================================
// Neighbor widget — k-NN
// ============================================================================

/// State of the k-NN widget.
pub struct NeighborLab {
    dataset: Vec<LabeledPoint>,
    query: QueryPoint,
    params: ParameterSet,
    standardize: bool,
    report: KnnReport,
}

impl NeighborLab {
    pub fn new(default_k: usize, standardize: bool) -> LabResult<Self> {
        let dataset = sample_dataset();
        let query = QueryPoint {
            height: 161.0,
            weight: 61.0,
        };
        let params = ParameterSet::new(&[(
            "k",
            ParamSpec::new(1.0, 15.0, 1.0, default_k as f64),
        )]);
        let k = params.get("k")? as usize;
        let report = rank_neighbors(&dataset, &query, k, standardize)?;
        Ok(Self {
            dataset,
            query,
            params,
            standardize,
            report,
        })
    }

    /// Move the query point (the click-to-place interaction).
    pub fn set_query(&mut self, height: f64, weight: f64) -> LabResult<()> {
        self.query = QueryPoint { height, weight };
        self.refresh()
    }

    /// Change k via the slider.
    pub fn set_k(&mut self, k: usize) -> LabResult<usize> {
        let stored = self.params.set("k", k as f64)? as usize;
        self.refresh()?;
        Ok(stored)
    }

    /// Switch between raw and standardized distances.
    pub fn set_standardize(&mut self, standardize: bool) -> LabResult<()> {
        self.standardize = standardize;
        self.refresh()
    }

    fn refresh(&mut self) -> LabResult<()> {
        let k = self.params.get("k")? as usize;
        self.report = rank_neighbors(&self.dataset, &self.query, k, self.standardize)?;
        Ok(())
    }

    pub fn report(&self) -> &KnnReport {
        &self.report
    }

    pub fn query(&self) -> QueryPoint {
        self.query
    }
}

impl LabWidget for NeighborLab {
    fn name(&self) -> &'static str {
        "neighbors"
    }

    fn snapshot(&self) -> anyhow::Result<Value> {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            query: QueryPoint,
            k: usize,
            standardize: bool,
            report: &'a KnnReport,
        }
        Ok(serde_json::to_value(Snapshot {
            query: self.query,
            k: self.params.get("k")? as usize,
            standardize: self.standardize,
            report: &self.report,
        })?)
    }
}

// ============================================================================
// Gradient widget — backprop chain rule
// ============================================================================

/// Display state of the backprop widget's notebook.
#[derive(Debug, Clone, Serialize)]
pub struct GradientReport {
    pub error: f64,
    pub output: f64,
    pub learning_rate: f64,
    pub upstream_output: f64,
    /// δk = error · O·(1−O)
    pub delta: f64,
    /// Δw = η · δk · Oj
    pub weight_update: f64,
}

/// State of the chain-rule widget.
pub struct GradientLab {
    params: ParameterSet,
    report: GradientReport,
}

impl GradientLab {
    pub fn new() -> LabResult<Self> {
        let params = ParameterSet::new(&[
            ("error", ParamSpec::new(0.0, 2.0, 0.1, 0.8)),
            ("output", ParamSpec::new(0.01, 0.99, 0.01, 0.5)),
            ("learning_rate", ParamSpec::new(0.01, 1.0, 0.01, 0.1)),
            ("upstream_output", ParamSpec::new(0.0, 1.0, 0.01, 1.0)),
        ]);
        let mut lab = Self {
            params,
            report: GradientReport {
                error: 0.0,
                output: 0.0,
                learning_rate: 0.0,
                upstream_output: 0.0,
                delta: 0.0,
                weight_update: 0.0,
            },
        };
        lab.refresh()?;
        Ok(lab)
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) -> LabResult<f64> {
        let stored = self.params.set(name, value)?;
        self.refresh()?;
        Ok(stored)
    }

    fn refresh(&mut self) -> LabResult<()> {
        let error = self.params.get("error")?;
        let output = self.params.get("output")?;
        let learning_rate = self.params.get("learning_rate")?;
        let upstream_output = self.params.get("upstream_output")?;

        let delta = output_delta(error, sigmoid_grad(output));
        self.report = GradientReport {
            error,
            output,
            learning_rate,
            upstream_output,
            delta,
            weight_update: weight_update(learning_rate, delta, upstream_output),
        };
        Ok(())
    }

    pub fn report(&self) -> &GradientReport {
        &self.report
    }
}

impl LabWidget for GradientLab {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn snapshot(&self) -> anyhow::Result<Value> {
        Ok(serde_json::to_value(&self.report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slicing_buttons_match_semantics() {
        let mut lab = SlicingLab::new();
        assert!(lab.report().is_none());

        let view = lab.select_slice().unwrap().clone();
        assert!(view.aliases_source);

        let fancy = lab.select_fancy().unwrap().clone();
        assert!(!fancy.aliases_source);

        let mask = lab.select_mask().unwrap().clone();
        assert!(!mask.aliases_source);
        assert_eq!(mask.highlighted.len(), 8);

        lab.clear();
        assert!(lab.report().is_none());
    }

    #[test]
    fn test_filter_custom_edit_clears_preset() {
        let mut lab = FilterLab::new(ConvolutionSettings::default()).unwrap();
        assert_eq!(lab.preset(), Some(KernelPreset::SobelX));

        lab.set_kernel_cell(0, 0, 3.0).unwrap();
        assert_eq!(lab.preset(), None, "editing a cell makes the kernel custom");

        lab.apply_preset(KernelPreset::Laplacian).unwrap();
        assert_eq!(lab.preset(), Some(KernelPreset::Laplacian));
        assert_eq!(lab.feature_map().shape(), [6, 6]);
    }

    #[test]
    fn test_fire_alarm_defaults_give_nine_percent() {
        let lab = FireAlarmLab::new().unwrap();
        let report = lab.report();
        assert!((report.posterior - 0.09).abs() < 1e-9);
    }

    #[test]
    fn test_fire_alarm_total_probability_mode() {
        let mut lab = FireAlarmLab::new().unwrap();
        lab.set_mode(EvidenceMode::TotalProbability).unwrap();
        let report = lab.report();
        // P(E) = 0.01·0.9 + 0.99·0.2
        let expected = 0.01 * 0.9 + 0.99 * 0.2;
        assert!((report.marginal - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fire_alarm_sliders_clamp() {
        let mut lab = FireAlarmLab::new().unwrap();
        let stored = lab.set_parameter("prior", 0.9).unwrap();
        assert!((stored - 0.2).abs() < 1e-12, "prior clamps to its max");
        assert!(lab.set_parameter("confidence", 0.5).is_err());
    }

    #[test]
    fn test_disease_lab_recomputes_on_symptom_change() {
        let mut lab = DiseaseLab::new(1e-10).unwrap();
        let before = lab.report().classes[0].posterior;

        lab.set_symptom("BP", "Low").unwrap();
        let after = lab.report().classes[0].posterior;
        // BP=Low zeroes the "no" class with α = 0, so "yes" saturates.
        assert!((after - 1.0).abs() < 1e-12);
        assert_ne!(before, after);

        // Unknown value leaves state untouched.
        assert!(lab.set_symptom("BP", "Astronomical").is_err());
        assert!((lab.report().classes[0].posterior - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disease_lab_alpha_snaps() {
        let mut lab = DiseaseLab::new(1e-10).unwrap();
        let stored = lab.set_alpha(0.27).unwrap();
        assert!((stored - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_neighbor_lab_clamps_k_slider() {
        let mut lab = NeighborLab::new(5, false).unwrap();
        assert_eq!(lab.set_k(40).unwrap(), 15, "slider range is 1..=15");
        assert_eq!(lab.report().effective_k, 15);
    }

    #[test]
    fn test_neighbor_lab_moves_query() {
        let mut lab = NeighborLab::new(5, false).unwrap();
        let before = lab.report().clone();
        lab.set_query(170.0, 67.0).unwrap();
        let after = lab.report();
        assert_ne!(before.neighbors, after.neighbors);
        assert_eq!(after.prediction, crate::knn::SizeLabel::L);
    }

    #[test]
    fn test_gradient_lab_defaults() {
        let lab = GradientLab::new().unwrap();
        let report = lab.report();
        // δ = 0.8 · 0.5·0.5 = 0.2, Δw = 0.1 · 0.2 · 1.0 = 0.02
        assert!((report.delta - 0.2).abs() < 1e-9);
        assert!((report.weight_update - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_snapshots_are_idempotent() {
        let lab = FireAlarmLab::new().unwrap();
        let a = lab.snapshot().unwrap();
        let b = lab.snapshot().unwrap();
        assert_eq!(a, b, "unchanged state must snapshot identically");
    }
}
