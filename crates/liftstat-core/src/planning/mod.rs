//! Sample-size and power planning.
//!
//! Forward problems are closed form:
//!
//! - [`proportion_sample_size`] / [`mean_sample_size`]: visitors needed to
//!   detect a lift at the configured confidence and power
//! - [`proportion_power`] / [`mean_power`]: power achieved by a fixed
//!   per-arm sample size
//! - [`detectable_mean_difference`]: smallest mean difference detectable at
//!   a fixed sample size
//!
//! The inverse problem for proportions, [`minimum_detectable_effect`], has no
//! closed form and is solved by bracketed root finding on the power curve.
//!
//! The allocation ratio `k = n_variant / n_control` comes from
//! [`Config::traffic_split`](crate::Config::traffic_split); the variant arm
//! is always `ceil(k · n_control)`.

mod mde;
mod power;
mod sample_size;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

pub use mde::{detectable_mean_difference, minimum_detectable_effect, MdeEstimate, MdeSolve};
pub use power::{mean_power, proportion_power, PowerResult};
pub use sample_size::{mean_sample_size, proportion_sample_size, SampleSizeResult};

use crate::error::{InvalidParameter, Result};

/// How a minimum lift is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiftType {
    /// Fraction of the baseline: 0.10 means "10% better than control".
    #[default]
    Relative,
    /// Difference in the metric's own units (rate points, currency).
    Absolute,
}

impl LiftType {
    /// Convert a lift into an absolute effect on `baseline`.
    pub fn absolute_effect(self, baseline: f64, lift: f64) -> f64 {
        match self {
            LiftType::Relative => baseline * lift,
            LiftType::Absolute => lift,
        }
    }
}

impl fmt::Display for LiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiftType::Relative => write!(f, "relative"),
            LiftType::Absolute => write!(f, "absolute"),
        }
    }
}

impl FromStr for LiftType {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relative" => Ok(LiftType::Relative),
            "absolute" => Ok(LiftType::Absolute),
            other => Err(InvalidParameter::configuration(
                "lift_type",
                format!("must be `relative` or `absolute`, got `{other}`"),
            )),
        }
    }
}

/// The hypothesized metric a plan or power calculation is built around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum PlannedMetric {
    /// Conversion rates.
    Proportion {
        /// Baseline rate.
        control_rate: f64,
        /// Rate under the hypothesized lift.
        variant_rate: f64,
    },
    /// A continuous metric.
    Mean {
        /// Baseline mean.
        control_mean: f64,
        /// Mean under the hypothesized lift.
        variant_mean: f64,
        /// Common standard deviation.
        standard_deviation: f64,
    },
}

impl PlannedMetric {
    /// Baseline value (rate or mean).
    pub fn control_value(&self) -> f64 {
        match *self {
            PlannedMetric::Proportion { control_rate, .. } => control_rate,
            PlannedMetric::Mean { control_mean, .. } => control_mean,
        }
    }

    /// Value under the hypothesized lift.
    pub fn variant_value(&self) -> f64 {
        match *self {
            PlannedMetric::Proportion { variant_rate, .. } => variant_rate,
            PlannedMetric::Mean { variant_mean, .. } => variant_mean,
        }
    }

    /// `variant - control`.
    pub fn absolute_effect(&self) -> f64 {
        self.variant_value() - self.control_value()
    }
}

/// `ceil(k · n_control)`.
pub(crate) fn variant_arm_size(n_control: u64, traffic_split: f64) -> u64 {
    (traffic_split * n_control as f64).ceil() as u64
}
