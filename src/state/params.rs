//! Declared parameter ranges and the clamp-and-snap store behind every
//! widget's sliders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LabError, LabResult};

/// Declared range of one adjustable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub min: f64,
    pub max: f64,
    /// Snap grid anchored at `min`; 0 disables snapping.
    pub step: f64,
    pub default: f64,
}

impl ParamSpec {
    pub fn new(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Clamp into `[min, max]`, then round onto the step grid. Snapping
    /// is idempotent: a snapped value snaps to itself.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

/// Named parameters with declared ranges. Ordered map so snapshots list
/// parameters deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    specs: BTreeMap<String, ParamSpec>,
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    /// Build a set from `(name, spec)` declarations; every parameter
    /// starts at its default.
    pub fn new(declarations: &[(&str, ParamSpec)]) -> Self {
        let specs: BTreeMap<String, ParamSpec> = declarations
            .iter()
            .map(|(name, spec)| (name.to_string(), *spec))
            .collect();
        let values = specs
            .iter()
            .map(|(name, spec)| (name.clone(), spec.snap(spec.default)))
            .collect();
        Self { specs, values }
    }

    /// Clamp, snap, and store a parameter. Returns the stored value.
    pub fn set(&mut self, name: &str, value: f64) -> LabResult<f64> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| LabError::UnknownParameter(name.to_string()))?;
        let snapped = spec.snap(value);
        self.values.insert(name.to_string(), snapped);
        debug!(name, requested = value, stored = snapped, "set parameter");
        Ok(snapped)
    }

    /// Current value of a parameter.
    pub fn get(&self, name: &str) -> LabResult<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| LabError::UnknownParameter(name.to_string()))
    }

    /// Declared spec of a parameter.
    pub fn spec(&self, name: &str) -> LabResult<ParamSpec> {
        self.specs
            .get(name)
            .copied()
            .ok_or_else(|| LabError::UnknownParameter(name.to_string()))
    }

    /// All current values, in name order.
    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> ParameterSet {
        ParameterSet::new(&[
            ("alpha", ParamSpec::new(0.0, 2.0, 0.1, 0.0)),
            ("k", ParamSpec::new(1.0, 15.0, 1.0, 5.0)),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let params = set();
        assert_eq!(params.get("alpha").unwrap(), 0.0);
        assert_eq!(params.get("k").unwrap(), 5.0);
    }

    #[test]
    fn test_clamping() {
        let mut params = set();
        assert_eq!(params.set("k", 99.0).unwrap(), 15.0);
        assert_eq!(params.set("k", -3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_snapping_to_step_grid() {
        let mut params = set();
        assert!((params.set("alpha", 0.34).unwrap() - 0.3).abs() < 1e-12);
        assert!((params.set("alpha", 0.36).unwrap() - 0.4).abs() < 1e-12);
        assert_eq!(params.set("k", 7.4).unwrap(), 7.0);
    }

    #[test]
    fn test_snap_idempotent() {
        let spec = ParamSpec::new(0.001, 0.2, 0.001, 0.01);
        for raw in [0.0004, 0.0555, 0.1999, 0.3] {
            let once = spec.snap(raw);
            let twice = spec.snap(once);
            assert_eq!(once, twice, "snap must be idempotent for {raw}");
            assert!((spec.min..=spec.max).contains(&once));
        }
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let mut params = set();
        assert!(matches!(
            params.set("gamma", 1.0),
            Err(LabError::UnknownParameter(_))
        ));
    }
}
