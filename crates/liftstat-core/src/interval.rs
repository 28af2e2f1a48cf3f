//! Confidence-interval estimators.
//!
//! Five interval families, each returning a [`ConfidenceIntervalResult`]:
//!
//! | Target                   | Function               | Methods                         |
//! |--------------------------|------------------------|---------------------------------|
//! | single proportion        | [`proportion_ci`]      | normal, wilson, agresti-coull   |
//! | difference of proportions| [`difference_ci`]      | normal, newcombe                |
//! | single mean              | [`mean_ci`]            | t-distribution or normal        |
//! | difference of means      | [`mean_difference_ci`] | welch                           |
//! | relative lift            | [`relative_lift_ci`]   | log-ratio                       |
//!
//! Single-proportion bounds are clamped to [0, 1]. Difference intervals are
//! reported as computed.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TestType;
use crate::distributions::{normal_quantile, t_critical, t_quantile, z_critical};
use crate::effect::welch_degrees_of_freedom;
use crate::error::{InvalidParameter, Result};
use crate::types::{Conversions, MeanSample};
use crate::validation;

// ============================================================================
// Method tags
// ============================================================================

/// Method that produced an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntervalMethod {
    /// Symmetric Wald interval from the normal approximation.
    Normal,
    /// Wilson score interval.
    Wilson,
    /// Agresti-Coull adjusted Wald interval.
    AgrestiCoull,
    /// Newcombe hybrid score interval for a difference.
    Newcombe,
    /// Student-t interval for a mean.
    TDistribution,
    /// Welch interval for a difference of means.
    Welch,
    /// Log risk-ratio interval for relative lift.
    LogRatio,
}

impl fmt::Display for IntervalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalMethod::Normal => "normal",
            IntervalMethod::Wilson => "wilson",
            IntervalMethod::AgrestiCoull => "agresti-coull",
            IntervalMethod::Newcombe => "newcombe",
            IntervalMethod::TDistribution => "t-distribution",
            IntervalMethod::Welch => "welch",
            IntervalMethod::LogRatio => "log-ratio",
        };
        f.write_str(name)
    }
}

impl FromStr for IntervalMethod {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "normal" | "wald" => Ok(IntervalMethod::Normal),
            "wilson" => Ok(IntervalMethod::Wilson),
            "agresti-coull" => Ok(IntervalMethod::AgrestiCoull),
            "newcombe" => Ok(IntervalMethod::Newcombe),
            "t" | "t-distribution" => Ok(IntervalMethod::TDistribution),
            "welch" => Ok(IntervalMethod::Welch),
            "log-ratio" => Ok(IntervalMethod::LogRatio),
            other => Err(InvalidParameter::configuration(
                "method",
                format!("unknown interval method `{other}`"),
            )),
        }
    }
}

/// Estimator for a single proportion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProportionMethod {
    /// Wald interval `p ± z·√(p(1-p)/n)`, clamped to [0, 1].
    Normal,
    /// Wilson score interval. Stays inside [0, 1] and behaves well at small
    /// n or extreme p.
    #[default]
    Wilson,
    /// Agresti-Coull: Wald interval around `(x + z²/2) / (n + z²)`.
    AgrestiCoull,
}

impl From<ProportionMethod> for IntervalMethod {
    fn from(method: ProportionMethod) -> Self {
        match method {
            ProportionMethod::Normal => IntervalMethod::Normal,
            ProportionMethod::Wilson => IntervalMethod::Wilson,
            ProportionMethod::AgrestiCoull => IntervalMethod::AgrestiCoull,
        }
    }
}

impl fmt::Display for ProportionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        IntervalMethod::from(*self).fmt(f)
    }
}

impl FromStr for ProportionMethod {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self> {
        match s.parse::<IntervalMethod>()? {
            IntervalMethod::Normal => Ok(ProportionMethod::Normal),
            IntervalMethod::Wilson => Ok(ProportionMethod::Wilson),
            IntervalMethod::AgrestiCoull => Ok(ProportionMethod::AgrestiCoull),
            other => Err(InvalidParameter::configuration(
                "method",
                format!("`{other}` is not a single-proportion method (normal, wilson, agresti-coull)"),
            )),
        }
    }
}

/// Estimator for a difference of two proportions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifferenceMethod {
    /// Wald interval with the unpooled standard error.
    #[default]
    Normal,
    /// Newcombe's method from per-arm Wilson intervals.
    Newcombe,
}

impl From<DifferenceMethod> for IntervalMethod {
    fn from(method: DifferenceMethod) -> Self {
        match method {
            DifferenceMethod::Normal => IntervalMethod::Normal,
            DifferenceMethod::Newcombe => IntervalMethod::Newcombe,
        }
    }
}

impl fmt::Display for DifferenceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        IntervalMethod::from(*self).fmt(f)
    }
}

impl FromStr for DifferenceMethod {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self> {
        match s.parse::<IntervalMethod>()? {
            IntervalMethod::Normal => Ok(DifferenceMethod::Normal),
            IntervalMethod::Newcombe => Ok(DifferenceMethod::Newcombe),
            other => Err(InvalidParameter::configuration(
                "method",
                format!("`{other}` is not a difference method (normal, newcombe)"),
            )),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// A confidence interval around a point estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceIntervalResult {
    /// Point estimate the interval is built around.
    pub point_estimate: f64,
    /// Lower bound.
    pub lower_bound: f64,
    /// Upper bound.
    pub upper_bound: f64,
    /// Confidence level as a fraction.
    pub confidence_level: f64,
    /// Half-width (or the estimator's own margin for asymmetric intervals).
    pub margin_of_error: f64,
    /// Estimator used.
    pub method: IntervalMethod,
}

impl ConfidenceIntervalResult {
    /// `upper_bound - lower_bound`.
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Whether `value` lies within the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }
}

// ============================================================================
// Single proportion
// ============================================================================

/// Wilson score center and margin for `x` successes out of `n`.
pub(crate) fn wilson_center_margin(x: u64, n: u64, z: f64) -> (f64, f64) {
    let n = n as f64;
    let p = x as f64 / n;
    let z2 = z * z;
    let denominator = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denominator;
    let margin = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt() / denominator;
    (center, margin)
}

/// Wilson bounds clamped to [0, 1] and to contain the observed rate.
pub(crate) fn wilson_bounds(x: u64, n: u64, z: f64) -> (f64, f64) {
    let p = x as f64 / n as f64;
    let (center, margin) = wilson_center_margin(x, n, z);
    let lower = (center - margin).max(0.0).min(p);
    let upper = (center + margin).min(1.0).max(p);
    (lower, upper)
}

/// Confidence interval for a single conversion rate.
///
/// # Errors
///
/// Fails when `visitors == 0`, `conversions > visitors`, or the confidence
/// level is outside (0, 1).
pub fn proportion_ci(
    arm: Conversions,
    confidence_level: f64,
    method: ProportionMethod,
) -> Result<ConfidenceIntervalResult> {
    let arm = validation::conversions(arm, "")?;
    let confidence_level = validation::confidence_level(confidence_level)?;
    let z = z_critical(1.0 - confidence_level, TestType::TwoTailed);

    let x = arm.conversions;
    let n = arm.visitors as f64;
    let rate = arm.rate();

    let (point_estimate, lower_bound, upper_bound, margin_of_error) = match method {
        ProportionMethod::Normal => {
            let margin = z * (rate * (1.0 - rate) / n).sqrt();
            (
                rate,
                (rate - margin).max(0.0),
                (rate + margin).min(1.0),
                margin,
            )
        }
        ProportionMethod::Wilson => {
            let (_, margin) = wilson_center_margin(x, arm.visitors, z);
            let (lower, upper) = wilson_bounds(x, arm.visitors, z);
            (rate, lower, upper, margin)
        }
        ProportionMethod::AgrestiCoull => {
            let z2 = z * z;
            let n_tilde = n + z2;
            let p_tilde = (x as f64 + z2 / 2.0) / n_tilde;
            let margin = z * (p_tilde * (1.0 - p_tilde) / n_tilde).sqrt();
            (
                p_tilde,
                (p_tilde - margin).max(0.0),
                (p_tilde + margin).min(1.0),
                margin,
            )
        }
    };

    tracing::debug!(
        method = %method,
        rate,
        lower = lower_bound,
        upper = upper_bound,
        "proportion interval"
    );

    Ok(ConfidenceIntervalResult {
        point_estimate,
        lower_bound,
        upper_bound,
        confidence_level,
        margin_of_error,
        method: method.into(),
    })
}

// ============================================================================
// Difference of proportions
// ============================================================================

/// Confidence interval for `p_variant - p_control`.
///
/// Newcombe's method combines each arm's Wilson bounds `L_i, U_i`:
///
/// ```text
/// lower = d - √((p1 - L1)² + (U2 - p2)²)
/// upper = d + √((U1 - p1)² + (p2 - L2)²)
/// ```
pub fn difference_ci(
    control: Conversions,
    variant: Conversions,
    confidence_level: f64,
    method: DifferenceMethod,
) -> Result<ConfidenceIntervalResult> {
    let control = validation::conversions(control, "control")?;
    let variant = validation::conversions(variant, "variant")?;
    let confidence_level = validation::confidence_level(confidence_level)?;
    let z = z_critical(1.0 - confidence_level, TestType::TwoTailed);

    let (p1, p2) = (control.rate(), variant.rate());
    let diff = p2 - p1;

    let (lower_bound, upper_bound, margin_of_error) = match method {
        DifferenceMethod::Normal => {
            let se = unpooled_se(control, variant);
            (diff - z * se, diff + z * se, z * se)
        }
        DifferenceMethod::Newcombe => {
            let (l1, u1) = wilson_bounds(control.conversions, control.visitors, z);
            let (l2, u2) = wilson_bounds(variant.conversions, variant.visitors, z);
            let lower = diff - ((p1 - l1).powi(2) + (u2 - p2).powi(2)).sqrt();
            let upper = diff + ((u1 - p1).powi(2) + (p2 - l2).powi(2)).sqrt();
            (lower, upper, (upper - lower) / 2.0)
        }
    };

    tracing::debug!(method = %method, diff, lower = lower_bound, upper = upper_bound, "difference interval");

    Ok(ConfidenceIntervalResult {
        point_estimate: diff,
        lower_bound,
        upper_bound,
        confidence_level,
        margin_of_error,
        method: method.into(),
    })
}

/// Unpooled standard error of `p2 - p1`: `√(p1(1-p1)/n1 + p2(1-p2)/n2)`.
pub(crate) fn unpooled_se(control: Conversions, variant: Conversions) -> f64 {
    let (p1, p2) = (control.rate(), variant.rate());
    (p1 * (1.0 - p1) / control.visitors as f64 + p2 * (1.0 - p2) / variant.visitors as f64).sqrt()
}

// ============================================================================
// Means
// ============================================================================

/// Confidence interval for a single mean.
///
/// Uses the Student-t critical value with `n - 1` df when `use_t` is set and
/// `n > 1`, otherwise the normal critical value. The std may be zero.
pub fn mean_ci(
    sample: MeanSample,
    confidence_level: f64,
    use_t: bool,
) -> Result<ConfidenceIntervalResult> {
    let sample = validation::mean_sample(sample, "", 1)?;
    let confidence_level = validation::confidence_level(confidence_level)?;
    let alpha = 1.0 - confidence_level;

    let se = sample.std / (sample.n as f64).sqrt();
    let (critical, method) = if use_t && sample.n > 1 {
        (
            t_critical(alpha, (sample.n - 1) as f64, TestType::TwoTailed)?,
            IntervalMethod::TDistribution,
        )
    } else {
        (z_critical(alpha, TestType::TwoTailed), IntervalMethod::Normal)
    };
    let margin = critical * se;

    tracing::debug!(mean = sample.mean, se, critical, "mean interval");

    Ok(ConfidenceIntervalResult {
        point_estimate: sample.mean,
        lower_bound: sample.mean - margin,
        upper_bound: sample.mean + margin,
        confidence_level,
        margin_of_error: margin,
        method,
    })
}

/// Welch confidence interval for `mean_variant - mean_control`.
///
/// Both arms need at least two observations.
pub fn mean_difference_ci(
    control: MeanSample,
    variant: MeanSample,
    confidence_level: f64,
) -> Result<ConfidenceIntervalResult> {
    let control = validation::mean_sample(control, "control", 2)?;
    let variant = validation::mean_sample(variant, "variant", 2)?;
    let confidence_level = validation::confidence_level(confidence_level)?;

    let diff = variant.mean - control.mean;
    let (var1, var2) = (control.variance(), variant.variance());
    let se = (var1 / control.n as f64 + var2 / variant.n as f64).sqrt();
    let df = welch_degrees_of_freedom(var1, control.n, var2, variant.n);
    let critical = t_quantile(1.0 - (1.0 - confidence_level) / 2.0, df)?;
    let margin = critical * se;

    tracing::debug!(diff, se, df, "welch interval");

    Ok(ConfidenceIntervalResult {
        point_estimate: diff,
        lower_bound: diff - margin,
        upper_bound: diff + margin,
        confidence_level,
        margin_of_error: margin,
        method: IntervalMethod::Welch,
    })
}

// ============================================================================
// Relative lift
// ============================================================================

/// Confidence interval for the relative lift `(p2 - p1) / p1`.
///
/// Built on the log risk ratio:
///
/// ```text
/// log(p2/p1) ± z·√((1-p1)/(n1·p1) + (1-p2)/(n2·p2))
/// ```
///
/// then exponentiated and shifted by -1. The interval is multiplicatively
/// symmetric and never drops below -100%.
///
/// # Errors
///
/// Fails with [`crate::Violation::Consistency`] when either rate is zero:
/// the relative lift is undefined for a zero control rate and the log ratio
/// diverges for a zero variant rate.
pub fn relative_lift_ci(
    control: Conversions,
    variant: Conversions,
    confidence_level: f64,
) -> Result<ConfidenceIntervalResult> {
    let control = validation::conversions(control, "control")?;
    let variant = validation::conversions(variant, "variant")?;
    let confidence_level = validation::confidence_level(confidence_level)?;

    let (p1, p2) = (control.rate(), variant.rate());
    if p1 == 0.0 {
        return Err(InvalidParameter::consistency(
            "control_conversions",
            "cannot compute relative lift when the control conversion rate is 0",
        ));
    }
    if p2 == 0.0 {
        return Err(InvalidParameter::consistency(
            "variant_conversions",
            "log-ratio interval is unbounded when the variant conversion rate is 0",
        ));
    }

    let z = normal_quantile(1.0 - (1.0 - confidence_level) / 2.0);
    let (n1, n2) = (control.visitors as f64, variant.visitors as f64);
    let se_log = ((1.0 - p1) / (n1 * p1) + (1.0 - p2) / (n2 * p2)).sqrt();
    let log_rr = (p2 / p1).ln();

    let lower_bound = (log_rr - z * se_log).exp() - 1.0;
    let upper_bound = (log_rr + z * se_log).exp() - 1.0;

    tracing::debug!(log_rr, se_log, lower = lower_bound, upper = upper_bound, "relative lift interval");

    Ok(ConfidenceIntervalResult {
        point_estimate: (p2 - p1) / p1,
        lower_bound,
        upper_bound,
        confidence_level,
        margin_of_error: (upper_bound - lower_bound) / 2.0,
        method: IntervalMethod::LogRatio,
    })
}
