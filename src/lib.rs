//! Interactive ML Lab — numeric core
//!
//! The model layer behind a set of teaching widgets for introductory
//! machine-learning concepts:
//! - NumPy memory semantics (view vs copy) and broadcasting
//! - 2D convolution with editable kernels
//! - Bayesian evidence updates and naive-Bayes diagnosis
//! - k-nearest-neighbors distance ranking
//! - output-layer backpropagation quantities
//!
//! Everything is synchronous and pure: a UI event mutates one widget's
//! state holder, the derived report is recomputed on the spot, and the
//! rendering layer (out of scope here) reads the JSON snapshot. There is
//! no persistence and no I/O beyond the optional YAML config file.

pub mod backprop;
pub mod bayes;
pub mod convolution;
pub mod error;
pub mod knn;
pub mod matrix;
pub mod state;

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use convolution::ConvolutionSettings;
use state::{
    DiseaseLab, FilterLab, FireAlarmLab, GradientLab, LabWidget, NeighborLab, SlicingLab,
};

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub convolution: ConvolutionSettings,
    pub bayes: BayesYamlConfig,
    pub knn: KnnYamlConfig,
}

/// Bayes section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BayesYamlConfig {
    /// Substitute for zero probabilities in log-sum mode.
    pub log_epsilon: f64,
}

impl Default for BayesYamlConfig {
    fn default() -> Self {
        Self { log_epsilon: 1e-10 }
    }
}

/// k-NN section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnnYamlConfig {
    /// Initial position of the k slider.
    pub default_k: usize,
    /// Start in standardized-distance mode.
    pub standardize: bool,
}

impl Default for KnnYamlConfig {
    fn default() -> Self {
        Self {
            default_k: 5,
            standardize: false,
        }
    }
}

// ============================================================================
// Runtime config (what the widgets are actually built from)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub convolution: ConvolutionSettings,
    pub log_epsilon: f64,
    pub default_k: usize,
    pub standardize: bool,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to `from_yaml_and_env(None)`.
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with
    /// env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file
    /// doesn't exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            convolution: ConvolutionSettings {
                clamp_max: env_parse("ML_LAB_CLAMP_MAX").unwrap_or(yaml.convolution.clamp_max),
                ..yaml.convolution
            },
            log_epsilon: env_parse("ML_LAB_LOG_EPSILON").unwrap_or(yaml.bayes.log_epsilon),
            default_k: env_parse("ML_LAB_DEFAULT_K").unwrap_or(yaml.knn.default_k),
            standardize: env_parse("ML_LAB_STANDARDIZE").unwrap_or(yaml.knn.standardize),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any
    /// failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let yaml = YamlConfig::default();
        Self {
            convolution: yaml.convolution,
            log_epsilon: yaml.bayes.log_epsilon,
            default_k: yaml.knn.default_k,
            standardize: yaml.knn.standardize,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

// ============================================================================
// Lab — every widget, built from one config
// ============================================================================

/// The full set of widget state holders, each owned exclusively and
/// mounted from the same configuration.
pub struct Lab {
    pub slicing: SlicingLab,
    pub filter: FilterLab,
    pub fire_alarm: FireAlarmLab,
    pub disease: DiseaseLab,
    pub neighbors: NeighborLab,
    pub gradient: GradientLab,
}

impl Lab {
    /// Mount every widget with its defaults.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            slicing: SlicingLab::new(),
            filter: FilterLab::new(config.convolution.clone())?,
            fire_alarm: FireAlarmLab::new()?,
            disease: DiseaseLab::new(config.log_epsilon)?,
            neighbors: NeighborLab::new(config.default_k, config.standardize)?,
            gradient: GradientLab::new()?,
        })
    }

    /// One JSON object keyed by widget name — the page-level snapshot.
    pub fn snapshot(&self) -> Result<serde_json::Value> {
        let widgets: [&dyn LabWidget; 6] = [
            &self.slicing,
            &self.filter,
            &self.fire_alarm,
            &self.disease,
            &self.neighbors,
            &self.gradient,
        ];
        let mut map = serde_json::Map::new();
        for widget in widgets {
            map.insert(widget.name().to_string(), widget.snapshot()?);
        }
        Ok(serde_json::Value::Object(map))
    }
}

// ============================================================================
// Tests
// ============================================================================
