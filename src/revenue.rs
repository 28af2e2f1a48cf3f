//! Continuous-metric experiments (revenue, order value).
//!
//! Same workflow as [`crate::conversion`], on means with standard
//! deviations: [`sample_size`] plans, [`analyze`] runs Welch's t-test and
//! [`confidence_interval`] gives a Student-t interval on one arm's mean.

use serde::{Deserialize, Serialize};

use liftstat_core::interval::mean_ci;
use liftstat_core::planning::mean_sample_size;
use liftstat_core::testing::welch_t_test;
use liftstat_core::{validation, Config, InvalidParameter, LiftType, MeanSample, Result, Winner};

use crate::decision::{duration_days, Recommendation};

/// Visitors needed for a test on a mean with an equal split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizePlan {
    /// Visitors needed in each arm.
    pub visitors_per_variant: u64,
    /// Visitors needed across both arms.
    pub total_visitors: u64,
    /// Baseline mean.
    pub current_mean: f64,
    /// Mean if the lift is real.
    pub expected_mean: f64,
    /// Standard deviation of the metric.
    pub standard_deviation: f64,
    /// Relative lift to detect, in percent.
    pub lift_percent: f64,
    /// Confidence level as a fraction.
    pub confidence_level: f64,
    /// Statistical power as a fraction.
    pub statistical_power: f64,
    /// Days to collect `total_visitors`, once daily traffic is known.
    pub test_duration_days: Option<u64>,
}

impl SampleSizePlan {
    /// Attach a test duration for `daily_visitors` visitors per day.
    pub fn with_daily_traffic(self, daily_visitors: u64) -> Result<Self> {
        let days = duration_days(self.total_visitors, daily_visitors)?;
        Ok(Self {
            test_duration_days: Some(days),
            ..self
        })
    }
}

/// Outcome of a test on a mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Control mean.
    pub control_mean: f64,
    /// Variant mean.
    pub variant_mean: f64,
    /// Relative lift in percent (0 when the control mean is 0).
    pub lift_percent: f64,
    /// `variant_mean - control_mean`.
    pub lift_absolute: f64,
    /// Whether the difference is significant.
    pub is_significant: bool,
    /// Confidence level as a fraction.
    pub confidence_level: f64,
    /// Two-tailed p-value.
    pub p_value: f64,
    /// Welch t statistic.
    pub t_statistic: f64,
    /// Welch-Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    /// Lower bound on the difference of means.
    pub confidence_interval_lower: f64,
    /// Upper bound on the difference of means.
    pub confidence_interval_upper: f64,
    /// Control arm summary.
    pub control: MeanSample,
    /// Variant arm summary.
    pub variant: MeanSample,
    /// Winning arm.
    pub winner: Winner,
    /// What to do next.
    pub recommendation: Recommendation,
}

impl TestResult {
    /// Visitors across both arms.
    pub fn total_visitors(&self) -> u64 {
        self.control.n + self.variant.n
    }
}

/// Student-t confidence interval on one arm's mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanInterval {
    /// Sample mean.
    pub mean: f64,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Confidence level as a fraction.
    pub confidence_level: f64,
    /// `t · std / √n`.
    pub margin_of_error: f64,
}

/// Visitors per arm needed to detect a relative lift in a mean.
///
/// `lift_percent` is relative (5 means a 5% higher mean). Two-tailed,
/// equal split, normal approximation.
///
/// # Errors
///
/// Fails on a zero lift (or a zero baseline mean), a non-positive std, or
/// confidence/power outside (0, 1).
pub fn sample_size(
    current_mean: f64,
    current_std: f64,
    lift_percent: f64,
    confidence: f64,
    power: f64,
) -> Result<SampleSizePlan> {
    if !lift_percent.is_finite() {
        return Err(InvalidParameter::domain("lift_percent", "must be finite"));
    }
    let effect = current_mean * lift_percent / 100.0;
    if effect == 0.0 {
        return Err(InvalidParameter::consistency("lift_percent", "lift_percent cannot be zero"));
    }

    let config = Config::new().with_confidence_level(confidence).with_power(power);
    let plan = mean_sample_size(
        current_mean,
        current_std,
        lift_percent / 100.0,
        LiftType::Relative,
        &config,
    )?;
    tracing::debug!(
        current_mean,
        current_std,
        visitors_per_variant = plan.control_visitors,
        "revenue sample size"
    );

    Ok(SampleSizePlan {
        visitors_per_variant: plan.control_visitors,
        total_visitors: plan.total_visitors,
        current_mean,
        expected_mean: plan.metric.variant_value(),
        standard_deviation: current_std,
        lift_percent,
        confidence_level: plan.confidence_level,
        statistical_power: plan.statistical_power,
        test_duration_days: None,
    })
}

/// Two-tailed Welch t-test of a revenue experiment.
///
/// # Errors
///
/// Fails when an arm has fewer than two observations, a negative std, or
/// the confidence level is outside (0, 1).
pub fn analyze(control: MeanSample, variant: MeanSample, confidence: f64) -> Result<TestResult> {
    let config = Config::new().with_confidence_level(confidence);
    let test = welch_t_test(control, variant, &config)?;
    let (lower, upper) = test.confidence_interval;
    let recommendation = Recommendation::from_winner(test.winner);
    tracing::debug!(?recommendation, p_value = test.p_value, "revenue analysis");

    Ok(TestResult {
        control_mean: test.control_mean,
        variant_mean: test.variant_mean,
        lift_percent: test.relative_lift().map_or(0.0, |r| r * 100.0),
        lift_absolute: test.mean_difference,
        is_significant: test.is_significant,
        confidence_level: test.confidence_level,
        p_value: test.p_value,
        t_statistic: test.statistic,
        degrees_of_freedom: test.degrees_of_freedom,
        confidence_interval_lower: lower,
        confidence_interval_upper: upper,
        control,
        variant,
        winner: test.winner,
        recommendation,
    })
}

/// Student-t interval on one arm's mean with `n - 1` df.
///
/// Needs more than one observation.
pub fn confidence_interval(sample: MeanSample, confidence: f64) -> Result<MeanInterval> {
    validation::sample_size_with_variance(sample.n, "visitors")?;
    let ci = mean_ci(sample, confidence, true)?;
    Ok(MeanInterval {
        mean: ci.point_estimate,
        lower: ci.lower_bound,
        upper: ci.upper_bound,
        confidence_level: ci.confidence_level,
        margin_of_error: ci.margin_of_error,
    })
}
