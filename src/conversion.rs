//! Conversion-rate experiments.
//!
//! Three steps of a typical A/B test on a conversion rate:
//!
//! 1. [`sample_size`] before launch
//! 2. [`analyze`] once data is in
//! 3. [`confidence_interval`] for a single arm's rate
//!
//! Rates and confidence/power levels accept either fractions (`0.05`,
//! `0.95`) or percentages (`5`, `95`). Lifts are always percentages.
//!
//! ```
//! use liftstat::conversion;
//! use liftstat::Conversions;
//!
//! let plan = conversion::sample_size(5.0, 10.0, 95.0, 80.0).unwrap();
//! assert_eq!(plan.visitors_per_variant, 31_234);
//!
//! let result = conversion::analyze(
//!     Conversions::new(500, 10_000),
//!     Conversions::new(600, 10_000),
//!     95.0,
//! )
//! .unwrap();
//! assert!(result.is_significant);
//! ```

use serde::{Deserialize, Serialize};

use liftstat_core::interval::proportion_ci;
use liftstat_core::planning::proportion_sample_size;
use liftstat_core::testing::two_proportion_z_test;
use liftstat_core::{
    validation, Config, Conversions, InvalidParameter, LiftType, ProportionMethod, Result, Winner,
};

use crate::decision::{duration_days, Recommendation};

/// Visitors needed for a conversion-rate test with an equal split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizePlan {
    /// Visitors needed in each arm.
    pub visitors_per_variant: u64,
    /// Visitors needed across both arms.
    pub total_visitors: u64,
    /// Baseline conversion rate.
    pub current_rate: f64,
    /// Conversion rate if the lift is real.
    pub expected_rate: f64,
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
    ///
    /// # Errors
    ///
    /// Fails when `daily_visitors` is 0.
    pub fn with_daily_traffic(self, daily_visitors: u64) -> Result<Self> {
        let days = duration_days(self.total_visitors, daily_visitors)?;
        Ok(Self {
            test_duration_days: Some(days),
            ..self
        })
    }
}

/// Outcome of a conversion-rate test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Control conversion rate.
    pub control_rate: f64,
    /// Variant conversion rate.
    pub variant_rate: f64,
    /// Relative lift in percent (0 when the control rate is 0).
    pub lift_percent: f64,
    /// `variant_rate - control_rate`.
    pub lift_absolute: f64,
    /// Whether the difference is significant.
    pub is_significant: bool,
    /// Confidence level as a fraction.
    pub confidence_level: f64,
    /// Two-tailed p-value.
    pub p_value: f64,
    /// z statistic (pooled standard error).
    pub z_statistic: f64,
    /// Lower bound on the absolute difference.
    pub confidence_interval_lower: f64,
    /// Upper bound on the absolute difference.
    pub confidence_interval_upper: f64,
    /// Control arm counts.
    pub control: Conversions,
    /// Variant arm counts.
    pub variant: Conversions,
    /// Winning arm.
    pub winner: Winner,
    /// What to do next.
    pub recommendation: Recommendation,
}

impl TestResult {
    /// Visitors across both arms.
    pub fn total_visitors(&self) -> u64 {
        self.control.visitors + self.variant.visitors
    }
}

/// Confidence interval on a single conversion rate (Wilson score).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateInterval {
    /// Observed rate.
    pub rate: f64,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Confidence level as a fraction.
    pub confidence_level: f64,
    /// Wilson margin.
    pub margin_of_error: f64,
}

/// Visitors per arm needed to detect a relative lift in a conversion rate.
///
/// `current_rate` may be a fraction or a percentage; `lift_percent` is a
/// relative lift in percent (10 means 5% → 5.5%). Two-tailed, equal split.
///
/// # Errors
///
/// - `current_rate` outside (0, 1)
/// - a zero lift, or a lift that moves the expected rate outside (0, 1)
/// - confidence or power outside (0, 1)
pub fn sample_size(
    current_rate: f64,
    lift_percent: f64,
    confidence: f64,
    power: f64,
) -> Result<SampleSizePlan> {
    let current_rate = validation::rate(current_rate, "current_rate")?;
    if !lift_percent.is_finite() {
        return Err(InvalidParameter::domain("lift_percent", "must be finite"));
    }
    if lift_percent == 0.0 {
        return Err(InvalidParameter::consistency("lift_percent", "lift_percent cannot be zero"));
    }
    let expected_rate = current_rate * (1.0 + lift_percent / 100.0);
    if expected_rate >= 1.0 {
        return Err(InvalidParameter::consistency(
            "lift_percent",
            format!(
                "expected rate ({:.1}%) reaches 100%; lower the lift",
                expected_rate * 100.0
            ),
        ));
    }
    if expected_rate <= 0.0 {
        return Err(InvalidParameter::consistency(
            "lift_percent",
            "expected rate must stay above 0; check the lift",
        ));
    }

    let config = Config::new().with_confidence_level(confidence).with_power(power);
    let plan = proportion_sample_size(current_rate, lift_percent / 100.0, LiftType::Relative, &config)?;
    tracing::debug!(
        current_rate,
        expected_rate,
        visitors_per_variant = plan.control_visitors,
        "conversion sample size"
    );

    Ok(SampleSizePlan {
        visitors_per_variant: plan.control_visitors,
        total_visitors: plan.total_visitors,
        current_rate,
        expected_rate,
        lift_percent,
        confidence_level: plan.confidence_level,
        statistical_power: plan.statistical_power,
        test_duration_days: None,
    })
}

/// Two-tailed significance test of a conversion-rate experiment.
///
/// # Errors
///
/// Fails when either arm has no visitors or more conversions than
/// visitors, or the confidence level is outside (0, 1).
pub fn analyze(control: Conversions, variant: Conversions, confidence: f64) -> Result<TestResult> {
    let config = Config::new().with_confidence_level(confidence);
    let test = two_proportion_z_test(control, variant, &config)?;
    let (lower, upper) = test.confidence_interval;
    let recommendation = Recommendation::from_winner(test.winner);
    tracing::debug!(?recommendation, p_value = test.p_value, "conversion analysis");

    Ok(TestResult {
        control_rate: test.control_rate,
        variant_rate: test.variant_rate,
        lift_percent: test.lift_percent(),
        lift_absolute: test.absolute_lift,
        is_significant: test.is_significant,
        confidence_level: test.confidence_level,
        p_value: test.p_value,
        z_statistic: test.statistic,
        confidence_interval_lower: lower,
        confidence_interval_upper: upper,
        control,
        variant,
        winner: test.winner,
        recommendation,
    })
}

/// Wilson confidence interval on one arm's conversion rate.
pub fn confidence_interval(arm: Conversions, confidence: f64) -> Result<RateInterval> {
    let ci = proportion_ci(arm, confidence, ProportionMethod::Wilson)?;
    Ok(RateInterval {
        rate: ci.point_estimate,
        lower: ci.lower_bound,
        upper: ci.upper_bound,
        confidence_level: ci.confidence_level,
        margin_of_error: ci.margin_of_error,
    })
}
