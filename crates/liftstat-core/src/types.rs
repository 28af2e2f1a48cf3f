//! Raw input records for one experiment arm.

use serde::{Deserialize, Serialize};

/// Conversion counts for one arm of an experiment.
///
/// The rate is `conversions / visitors`. Construction does not validate;
/// every operation that consumes a `Conversions` checks `visitors >= 1` and
/// `conversions <= visitors` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Conversions {
    /// Number of visitors that converted.
    pub conversions: u64,
    /// Number of visitors exposed.
    pub visitors: u64,
}

impl Conversions {
    /// Create a new arm from counts.
    pub fn new(conversions: u64, visitors: u64) -> Self {
        Self {
            conversions,
            visitors,
        }
    }

    /// Observed conversion rate. Returns 0 for an empty arm.
    pub fn rate(&self) -> f64 {
        if self.visitors == 0 {
            return 0.0;
        }
        self.conversions as f64 / self.visitors as f64
    }

    /// Number of visitors that did not convert (saturating).
    pub fn non_conversions(&self) -> u64 {
        self.visitors.saturating_sub(self.conversions)
    }
}

/// Summary statistics for one arm of a continuous metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanSample {
    /// Sample mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    /// Number of observations.
    pub n: u64,
}

impl MeanSample {
    /// Create a new sample summary.
    pub fn new(mean: f64, std: f64, n: u64) -> Self {
        Self { mean, std, n }
    }

    /// Sample variance (`std²`).
    pub fn variance(&self) -> f64 {
        self.std * self.std
    }
}
