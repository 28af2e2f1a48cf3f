//! Configuration shared by tests and planning operations.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONFIDENCE_LEVEL, DEFAULT_STATISTICAL_POWER, DEFAULT_TRAFFIC_SPLIT,
};
use crate::error::{InvalidParameter, Result};
use crate::validation;

/// Sidedness of a test.
///
/// Only changes which quantile supplies the critical value:
/// `1 - α` for one-tailed, `1 - α/2` for two-tailed. One-tailed tests ask
/// whether the variant is *greater* than the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TestType {
    /// H1: variant > control.
    #[serde(rename = "one-tailed")]
    OneTailed,

    /// H1: variant != control.
    #[default]
    #[serde(rename = "two-tailed")]
    TwoTailed,
}

impl TestType {
    /// Cumulative probability whose quantile is the critical value.
    pub fn critical_probability(self, alpha: f64) -> f64 {
        match self {
            TestType::OneTailed => 1.0 - alpha,
            TestType::TwoTailed => 1.0 - alpha / 2.0,
        }
    }

    /// Capitalized label used in assumption lists.
    pub fn label(self) -> &'static str {
        match self {
            TestType::OneTailed => "One-tailed",
            TestType::TwoTailed => "Two-tailed",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::OneTailed => write!(f, "one-tailed"),
            TestType::TwoTailed => write!(f, "two-tailed"),
        }
    }
}

impl FromStr for TestType {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self> {
        validation::sidedness(s)
    }
}

/// Options recognized by every test and planning operation.
///
/// Values are stored as given; [`Config::validate`] normalizes percentages
/// and checks ranges, and every operation calls it before computing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Confidence level `1 - α`.
    ///
    /// Accepts a fraction (0.95) or a percentage (95). Default: 0.95.
    pub confidence_level: f64,

    /// Target statistical power `1 - β` for planning operations.
    ///
    /// Accepts a fraction (0.8) or a percentage (80). Default: 0.80.
    pub statistical_power: f64,

    /// One- or two-tailed test. Default: two-tailed.
    pub test_type: TestType,

    /// Variant:control allocation ratio `k = n_variant / n_control`.
    ///
    /// Default: 1.0 (equal split).
    pub traffic_split: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            statistical_power: DEFAULT_STATISTICAL_POWER,
            test_type: TestType::default(),
            traffic_split: DEFAULT_TRAFFIC_SPLIT,
        }
    }
}

impl Config {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence level.
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Set the significance level α (sets confidence to `1 - α`).
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.confidence_level = 1.0 - alpha;
        self
    }

    /// Set the target statistical power.
    pub fn with_power(mut self, statistical_power: f64) -> Self {
        self.statistical_power = statistical_power;
        self
    }

    /// Set the test sidedness.
    pub fn with_test_type(mut self, test_type: TestType) -> Self {
        self.test_type = test_type;
        self
    }

    /// Use a one-tailed test.
    pub fn one_tailed(self) -> Self {
        self.with_test_type(TestType::OneTailed)
    }

    /// Set the variant:control allocation ratio.
    pub fn with_traffic_split(mut self, traffic_split: f64) -> Self {
        self.traffic_split = traffic_split;
        self
    }

    /// Validate every field and return a normalized copy.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Violation::Configuration`] when the confidence
    /// level or power leaves (0, 1) after percentage normalization, or the
    /// traffic split is not a positive finite number.
    pub fn validate(&self) -> Result<Config> {
        Ok(Config {
            confidence_level: validation::confidence_level(self.confidence_level)?,
            statistical_power: validation::power(self.statistical_power)?,
            test_type: self.test_type,
            traffic_split: validation::allocation_ratio(self.traffic_split)?,
        })
    }

    /// Significance level `α = 1 - confidence_level`.
    ///
    /// Only meaningful on a validated config.
    pub fn alpha(&self) -> f64 {
        1.0 - self.confidence_level
    }
}
