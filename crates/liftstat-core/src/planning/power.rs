//! Achieved power at a fixed sample size.

use serde::{Deserialize, Serialize};

use super::{variant_arm_size, PlannedMetric};
use crate::config::{Config, TestType};
use crate::distributions::{normal_cdf, z_critical};
use crate::effect::{cohens_d, cohens_h, weighted_pooled_proportion};
use crate::error::{InvalidParameter, Result};
use crate::validation;

/// Power achieved by a fixed per-arm sample size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerResult {
    /// Probability of detecting the hypothesized effect.
    pub statistical_power: f64,
    /// Control arm size.
    pub control_visitors: u64,
    /// Variant arm size, `ceil(k · control_visitors)`.
    pub variant_visitors: u64,
    /// Hypothesized values.
    pub metric: PlannedMetric,
    /// `|h|` for proportions, `|d|` for means.
    pub effect_size: f64,
    /// Confidence level used.
    pub confidence_level: f64,
    /// Sidedness used.
    pub test_type: TestType,
    /// Variant:control allocation ratio.
    pub traffic_split: f64,
    /// Modelling assumptions behind the formula.
    pub assumptions: Vec<String>,
}

/// Unvalidated proportion power kernel.
///
/// `Φ((|p2 - p1| - z_α·se_null) / se_alt)` with
/// `se_null = √(p̄(1-p̄)(1/n1 + 1/n2))` and
/// `se_alt = √(p1(1-p1)/n1 + p2(1-p2)/n2)`. At zero `se_alt` the power is 1
/// if the rates differ, else 0.
pub(crate) fn proportion_power_kernel(p1: f64, p2: f64, n1: f64, n2: f64, z_alpha: f64) -> f64 {
    let p_pooled = weighted_pooled_proportion(p1, n1, p2, n2, 1.0);
    let se_null = (p_pooled * (1.0 - p_pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    let se_alt = (p1 * (1.0 - p1) / n1 + p2 * (1.0 - p2) / n2).sqrt();
    if se_alt == 0.0 {
        return if p1 != p2 { 1.0 } else { 0.0 };
    }
    normal_cdf(((p2 - p1).abs() - z_alpha * se_null) / se_alt)
}

/// Power of a two-proportion z-test.
///
/// `visitors_per_variant` is the control arm size; the variant arm gets
/// `ceil(k · n)`. Both rates must lie in (0, 1) and may be percentages.
pub fn proportion_power(
    control_rate: f64,
    variant_rate: f64,
    visitors_per_variant: u64,
    config: &Config,
) -> Result<PowerResult> {
    let config = config.validate()?;
    let p1 = validation::rate(control_rate, "control_rate")?;
    let p2 = validation::rate(variant_rate, "variant_rate")?;
    let n1 = validation::sample_size(visitors_per_variant, "visitors_per_variant")?;
    let n2 = variant_arm_size(n1, config.traffic_split);

    let z_alpha = z_critical(config.alpha(), config.test_type);
    let power = proportion_power_kernel(p1, p2, n1 as f64, n2 as f64, z_alpha);

    tracing::debug!(p1, p2, n1, n2, power, "proportion power");

    Ok(PowerResult {
        statistical_power: power,
        control_visitors: n1,
        variant_visitors: n2,
        metric: PlannedMetric::Proportion {
            control_rate: p1,
            variant_rate: p2,
        },
        effect_size: cohens_h(p1, p2).abs(),
        confidence_level: config.confidence_level,
        test_type: config.test_type,
        traffic_split: config.traffic_split,
        assumptions: vec![
            "Two-proportion Z-test (standard A/B test)".to_string(),
            "Users are randomly assigned to control/variant".to_string(),
            format!("{} test", config.test_type.label()),
        ],
    })
}

/// Power of a two-sample comparison of means with a common std.
///
/// `Φ(|m2 - m1| / (σ·√(1/n1 + 1/n2)) - z_α)`.
pub fn mean_power(
    control_mean: f64,
    variant_mean: f64,
    standard_deviation: f64,
    visitors_per_variant: u64,
    config: &Config,
) -> Result<PowerResult> {
    let config = config.validate()?;
    for (value, field) in [(control_mean, "control_mean"), (variant_mean, "variant_mean")] {
        if !value.is_finite() {
            return Err(InvalidParameter::domain(field, "must be finite"));
        }
    }
    let sigma = validation::positive(standard_deviation, "standard_deviation", false)?;
    let n1 = validation::sample_size(visitors_per_variant, "visitors_per_variant")?;
    let n2 = variant_arm_size(n1, config.traffic_split);

    let z_alpha = z_critical(config.alpha(), config.test_type);
    let effect = (variant_mean - control_mean).abs();
    let se = sigma * (1.0 / n1 as f64 + 1.0 / n2 as f64).sqrt();
    let power = if se == 0.0 {
        if effect > 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        normal_cdf(effect / se - z_alpha)
    };

    tracing::debug!(effect, se, n1, n2, power, "mean power");

    Ok(PowerResult {
        statistical_power: power,
        control_visitors: n1,
        variant_visitors: n2,
        metric: PlannedMetric::Mean {
            control_mean,
            variant_mean,
            standard_deviation: sigma,
        },
        effect_size: cohens_d(control_mean, variant_mean, sigma).abs(),
        confidence_level: config.confidence_level,
        test_type: config.test_type,
        traffic_split: config.traffic_split,
        assumptions: vec![
            "Two-sample comparison of means (normal approximation)".to_string(),
            "Users are randomly assigned to control/variant".to_string(),
            "Common standard deviation across groups".to_string(),
            format!("{} test", config.test_type.label()),
        ],
    })
}
