//! Forward sample-size formulas.

use serde::{Deserialize, Serialize};

use super::{variant_arm_size, LiftType, PlannedMetric};
use crate::config::{Config, TestType};
use crate::distributions::{normal_quantile, z_critical};
use crate::effect::weighted_pooled_proportion;
use crate::error::{InvalidParameter, Result};
use crate::validation;

/// Visitors required to detect a lift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeResult {
    /// Visitors needed in the control arm.
    pub control_visitors: u64,
    /// Visitors needed in the variant arm, `ceil(k · control_visitors)`.
    pub variant_visitors: u64,
    /// `control_visitors + variant_visitors`.
    pub total_visitors: u64,
    /// Baseline and hypothesized values.
    pub metric: PlannedMetric,
    /// Lift as supplied.
    pub minimum_lift: f64,
    /// How `minimum_lift` is expressed.
    pub lift_type: LiftType,
    /// Confidence level used.
    pub confidence_level: f64,
    /// Target power.
    pub statistical_power: f64,
    /// Sidedness used.
    pub test_type: TestType,
    /// Variant:control allocation ratio.
    pub traffic_split: f64,
    /// Modelling assumptions behind the formula.
    pub assumptions: Vec<String>,
}

impl SampleSizeResult {
    /// Per-arm size quoted for an equal split (the control arm).
    pub fn visitors_per_variant(&self) -> u64 {
        self.control_visitors
    }
}

fn zero_lift() -> InvalidParameter {
    InvalidParameter::consistency("minimum_lift", "minimum_lift cannot be zero")
}

fn z_alpha_beta(config: &Config) -> (f64, f64) {
    (
        z_critical(config.alpha(), config.test_type),
        normal_quantile(config.statistical_power),
    )
}

fn sample_too_large() -> InvalidParameter {
    InvalidParameter::consistency(
        "minimum_lift",
        "required sample size exceeds representable range",
    )
}

/// Round a raw per-arm size up and derive the variant and total sizes.
///
/// The control arm stays below `2^63` so doubling it never overflows.
fn arm_sizes(raw_control: f64, traffic_split: f64) -> Result<(u64, u64, u64)> {
    let control = raw_control.ceil();
    if !control.is_finite() || control >= (u64::MAX / 2) as f64 {
        return Err(sample_too_large());
    }
    let control = control as u64;
    let variant = variant_arm_size(control, traffic_split);
    let total = control.checked_add(variant).ok_or_else(sample_too_large)?;
    Ok((control, variant, total))
}

/// Sample size for a two-proportion z-test.
///
/// ```text
/// n_c = ceil{ [z_α·√((1 + 1/k)·p̄(1-p̄)) + z_β·√(p1(1-p1) + p2(1-p2)/k)]² / (p2 - p1)² }
/// p̄   = (p1 + k·p2) / (1 + k)
/// ```
///
/// # Errors
///
/// - `control_rate` outside (0, 1) (percentages accepted)
/// - a zero or non-finite lift
/// - a lift that moves the variant rate outside (0, 1)
/// - an invalid config
pub fn proportion_sample_size(
    control_rate: f64,
    minimum_lift: f64,
    lift_type: LiftType,
    config: &Config,
) -> Result<SampleSizeResult> {
    let config = config.validate()?;
    let p1 = validation::rate(control_rate, "control_rate")?;
    if !minimum_lift.is_finite() {
        return Err(InvalidParameter::domain("minimum_lift", "must be finite"));
    }

    let effect = lift_type.absolute_effect(p1, minimum_lift);
    if effect == 0.0 {
        return Err(zero_lift());
    }
    let p2 = p1 + effect;
    if p2 <= 0.0 || p2 >= 1.0 {
        return Err(InvalidParameter::consistency(
            "minimum_lift",
            format!(
                "expected variant rate ({p2}) must be between 0 and 1; \
                 check control_rate ({p1}) and minimum_lift ({minimum_lift})"
            ),
        ));
    }

    let k = config.traffic_split;
    let (z_alpha, z_beta) = z_alpha_beta(&config);
    let p_bar = weighted_pooled_proportion(p1, 1.0, p2, 1.0, k);

    let numerator = (z_alpha * ((1.0 + 1.0 / k) * p_bar * (1.0 - p_bar)).sqrt()
        + z_beta * (p1 * (1.0 - p1) + p2 * (1.0 - p2) / k).sqrt())
    .powi(2);
    let (control_visitors, variant_visitors, total_visitors) =
        arm_sizes(numerator / effect.powi(2), k)?;

    tracing::debug!(p1, p2, z_alpha, z_beta, control_visitors, variant_visitors, "proportion sample size");

    Ok(SampleSizeResult {
        control_visitors,
        variant_visitors,
        total_visitors,
        metric: PlannedMetric::Proportion {
            control_rate: p1,
            variant_rate: p2,
        },
        minimum_lift,
        lift_type,
        confidence_level: config.confidence_level,
        statistical_power: config.statistical_power,
        test_type: config.test_type,
        traffic_split: k,
        assumptions: vec![
            "Two-proportion Z-test (standard A/B test)".to_string(),
            "Users are randomly assigned to control/variant".to_string(),
            "Each user is independent (no network effects)".to_string(),
            format!("{} test", config.test_type.label()),
        ],
    })
}

/// Sample size for a two-sample comparison of means.
///
/// ```text
/// n_c = ceil{ (z_α + z_β)²·σ²·(1 + 1/k) / effect² }
/// ```
///
/// Uses the normal approximation with a common standard deviation.
pub fn mean_sample_size(
    control_mean: f64,
    standard_deviation: f64,
    minimum_lift: f64,
    lift_type: LiftType,
    config: &Config,
) -> Result<SampleSizeResult> {
    let config = config.validate()?;
    if !control_mean.is_finite() {
        return Err(InvalidParameter::domain("control_mean", "must be finite"));
    }
    let sigma = validation::positive(standard_deviation, "standard_deviation", false)?;
    if !minimum_lift.is_finite() {
        return Err(InvalidParameter::domain("minimum_lift", "must be finite"));
    }

    let effect = lift_type.absolute_effect(control_mean, minimum_lift);
    if effect == 0.0 {
        return Err(zero_lift());
    }

    let k = config.traffic_split;
    let (z_alpha, z_beta) = z_alpha_beta(&config);
    let numerator = (z_alpha + z_beta).powi(2) * sigma * sigma * (1.0 + 1.0 / k);
    let (control_visitors, variant_visitors, total_visitors) =
        arm_sizes(numerator / effect.powi(2), k)?;

    tracing::debug!(effect, sigma, control_visitors, variant_visitors, "mean sample size");

    Ok(SampleSizeResult {
        control_visitors,
        variant_visitors,
        total_visitors,
        metric: PlannedMetric::Mean {
            control_mean,
            variant_mean: control_mean + effect,
            standard_deviation: sigma,
        },
        minimum_lift,
        lift_type,
        confidence_level: config.confidence_level,
        statistical_power: config.statistical_power,
        test_type: config.test_type,
        traffic_split: k,
        assumptions: vec![
            "Two-sample t-test (normal approximation)".to_string(),
            "Users are randomly assigned to control/variant".to_string(),
            "Equal variances assumed across groups".to_string(),
            format!("{} test", config.test_type.label()),
        ],
    })
}
