//! Input validation.
//!
//! Every public operation passes its raw inputs through these guards before
//! any formula runs. Each validator returns the normalized value (a
//! percentage such as `5.0` becomes `0.05`) or an [`InvalidParameter`] that
//! names the field and the violated constraint.

use crate::config::TestType;
use crate::error::{InvalidParameter, Result};
use crate::types::{Conversions, MeanSample};

/// Read values above 1 as percentages.
fn from_percent(value: f64) -> f64 {
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

fn require_finite(value: f64, field: &str) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InvalidParameter::domain(field, format!("must be finite, got {value}")))
    }
}

/// Validate a rate in the open interval (0, 1).
///
/// Used for rates that end up in a denominator or a variance term
/// (baseline conversion rates, hypothesized rates).
pub fn rate(value: f64, field: &str) -> Result<f64> {
    require_finite(value, field)?;
    let value = from_percent(value);
    if value <= 0.0 || value >= 1.0 {
        return Err(InvalidParameter::domain(
            field,
            "must be between 0 and 1 (or 0% and 100%), exclusive",
        ));
    }
    Ok(value)
}

/// Validate a rate in the closed interval [0, 1].
///
/// Used where 0 and 1 are legal observations.
pub fn rate_inclusive(value: f64, field: &str) -> Result<f64> {
    require_finite(value, field)?;
    let value = from_percent(value);
    if !(0.0..=1.0).contains(&value) {
        return Err(InvalidParameter::domain(
            field,
            "must be between 0 and 1 (or 0% and 100%)",
        ));
    }
    Ok(value)
}

/// Validate a positive scale parameter such as a standard deviation.
///
/// `allow_zero` admits degenerate zero-variance inputs.
pub fn positive(value: f64, field: &str, allow_zero: bool) -> Result<f64> {
    require_finite(value, field)?;
    if allow_zero && value < 0.0 {
        return Err(InvalidParameter::domain(field, "cannot be negative"));
    }
    if !allow_zero && value <= 0.0 {
        return Err(InvalidParameter::domain(field, "must be positive"));
    }
    Ok(value)
}

/// Validate a significance level α in (0, 1).
pub fn alpha(value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(InvalidParameter::configuration(
            "alpha",
            format!("must be between 0 and 1, got {value}"),
        ));
    }
    Ok(value)
}

/// Validate a confidence level in (0, 1); accepts percentages.
pub fn confidence_level(value: f64) -> Result<f64> {
    let normalized = from_percent(value);
    if !normalized.is_finite() || normalized <= 0.0 || normalized >= 1.0 {
        return Err(InvalidParameter::configuration(
            "confidence_level",
            format!("must be between 0 and 1 (or 0% and 100%), got {value}"),
        ));
    }
    Ok(normalized)
}

/// Validate a statistical power in (0, 1); accepts percentages.
pub fn power(value: f64) -> Result<f64> {
    let normalized = from_percent(value);
    if !normalized.is_finite() || normalized <= 0.0 || normalized >= 1.0 {
        return Err(InvalidParameter::configuration(
            "statistical_power",
            format!("must be between 0 and 1 (or 0% and 100%), got {value}"),
        ));
    }
    Ok(normalized)
}

/// Validate a sample size of at least one.
pub fn sample_size(value: u64, field: &str) -> Result<u64> {
    if value < 1 {
        return Err(InvalidParameter::domain(field, "must be at least 1"));
    }
    Ok(value)
}

/// Validate a sample size large enough to estimate a variance (n >= 2).
pub fn sample_size_with_variance(value: u64, field: &str) -> Result<u64> {
    if value < 2 {
        return Err(InvalidParameter::domain(
            field,
            "must be at least 2 to estimate a variance",
        ));
    }
    Ok(value)
}

/// Validate a variant:control allocation ratio.
pub fn allocation_ratio(value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(InvalidParameter::configuration(
            "traffic_split",
            format!("must be a positive number, got {value}"),
        ));
    }
    Ok(value)
}

/// Parse a sidedness tag.
///
/// Accepts `one-sided`/`two-sided` and the `one-tailed`/`two-tailed`
/// aliases, case-insensitively.
pub fn sidedness(tag: &str) -> Result<TestType> {
    match tag.trim().to_ascii_lowercase().as_str() {
        "one-sided" | "one-tailed" => Ok(TestType::OneTailed),
        "two-sided" | "two-tailed" => Ok(TestType::TwoTailed),
        other => Err(InvalidParameter::configuration(
            "test_type",
            format!("must be one of one-sided, two-sided, one-tailed, two-tailed; got `{other}`"),
        )),
    }
}

fn field_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}_{name}")
    }
}

/// Validate the counts of one arm: `visitors >= 1`, `conversions <= visitors`.
///
/// `prefix` names the arm in error messages (`"control"` yields
/// `control_visitors`); pass `""` for a single-arm operation.
pub fn conversions(arm: Conversions, prefix: &str) -> Result<Conversions> {
    sample_size(arm.visitors, &field_name(prefix, "visitors"))?;
    if arm.conversions > arm.visitors {
        return Err(InvalidParameter::consistency(
            field_name(prefix, "conversions"),
            format!(
                "cannot exceed {} ({} > {})",
                field_name(prefix, "visitors"),
                arm.conversions,
                arm.visitors
            ),
        ));
    }
    Ok(arm)
}

/// Validate one arm of a continuous metric.
///
/// The mean must be finite, the std non-negative, and `n` at least
/// `min_n`.
pub fn mean_sample(sample: MeanSample, prefix: &str, min_n: u64) -> Result<MeanSample> {
    require_finite(sample.mean, &field_name(prefix, "mean"))?;
    positive(sample.std, &field_name(prefix, "std"), true)?;
    let n_field = field_name(prefix, "visitors");
    if min_n >= 2 {
        sample_size_with_variance(sample.n, &n_field)?;
    } else {
        sample_size(sample.n, &n_field)?;
    }
    Ok(sample)
}
