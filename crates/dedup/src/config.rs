//! Tunable weights, thresholds and execution options

use crate::types::DedupError;
use serde::{Deserialize, Serialize};

/// Score contributions and thresholds used by the pairwise matcher
///
/// Defaults reproduce the documented scoring rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    /// Added when normalized names are identical
    pub exact_name: f64,
    /// Name similarity must exceed this for the fuzzy-name rule
    pub fuzzy_name_threshold: f64,
    /// Multiplier applied to name similarity
    pub fuzzy_name: f64,
    /// Address similarity must exceed this for the address rule
    pub address_threshold: f64,
    /// Multiplier applied to address similarity
    pub address: f64,
    /// Added when phone numbers match
    pub phone: f64,
    /// Added when website hosts match
    pub website: f64,
    /// A pair becomes a candidate only above this score
    pub accept_threshold: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            exact_name: 0.4,
            fuzzy_name_threshold: 0.8,
            fuzzy_name: 0.3,
            address_threshold: 0.7,
            address: 0.3,
            phone: 0.3,
            website: 0.4,
            accept_threshold: 0.7,
        }
    }
}

impl MatchWeights {
    fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("exact_name", self.exact_name),
            ("fuzzy_name_threshold", self.fuzzy_name_threshold),
            ("fuzzy_name", self.fuzzy_name),
            ("address_threshold", self.address_threshold),
            ("address", self.address),
            ("phone", self.phone),
            ("website", self.website),
            ("accept_threshold", self.accept_threshold),
        ]
    }

    /// Every weight and threshold must lie in [0, 1]
    pub fn validate(&self) -> Result<(), DedupError> {
        for (name, value) in self.fields() {
            if !(0.0..=1.0).contains(&value) {
                return Err(DedupError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for a consolidation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Scoring weights and thresholds
    pub weights: MatchWeights,
    /// Generate candidates on the rayon thread pool
    pub parallel: bool,
    /// Only compare records whose normalized names share this many leading
    /// characters. `None` compares the full cross-product.
    pub blocking_prefix_len: Option<usize>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            parallel: true,
            blocking_prefix_len: None,
        }
    }
}

impl DedupConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, DedupError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set scoring weights
    pub fn with_weights(mut self, weights: MatchWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the candidate acceptance threshold
    pub fn with_accept_threshold(mut self, threshold: f64) -> Self {
        self.weights.accept_threshold = threshold;
        self
    }

    /// Enable or disable parallel candidate generation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable the name-prefix blocking pre-filter
    pub fn with_blocking_prefix(mut self, len: usize) -> Self {
        self.blocking_prefix_len = Some(len);
        self
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        self.weights.validate()?;

        if self.blocking_prefix_len == Some(0) {
            return Err(DedupError::InvalidConfig(
                "blocking_prefix_len must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
