//! One-sided non-inferiority test on conversion rates.

use serde::{Deserialize, Serialize};

use super::{z_outcome, TestKind};
use crate::config::{Config, TestType};
use crate::distributions::z_critical;
use crate::error::Result;
use crate::interval::unpooled_se;
use crate::types::Conversions;
use crate::validation;

/// Outcome of a non-inferiority test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonInferiorityResult {
    /// `(diff + margin) / se`.
    pub statistic: f64,
    /// One-sided p-value for H1: `diff > -margin`.
    pub p_value: f64,
    /// `diff ± z_{1-α}·se`.
    pub confidence_interval: (f64, f64),
    /// `lower_bound > -margin`.
    pub is_non_inferior: bool,
    /// Largest acceptable degradation (absolute rate).
    pub margin: f64,
    /// Confidence level used.
    pub confidence_level: f64,
    /// `variant_rate - control_rate`.
    pub observed_difference: f64,
    /// One-sided lower confidence bound on the difference.
    pub lower_bound: f64,
    /// Always [`TestKind::NonInferiority`].
    pub kind: TestKind,
}

/// Test whether the variant is no worse than the control by more than
/// `margin`.
///
/// The decision is made on the one-sided lower confidence bound: the
/// variant is non-inferior when `diff - z_{1-α}·se > -margin`. The p-value
/// is reported alongside but does not drive the decision. The test is
/// one-sided by construction, so `config.test_type` is ignored.
///
/// `margin` is an absolute difference in rates and must be positive.
pub fn non_inferiority_test(
    control: Conversions,
    variant: Conversions,
    margin: f64,
    config: &Config,
) -> Result<NonInferiorityResult> {
    let config = config.validate()?;
    let control = validation::conversions(control, "control")?;
    let variant = validation::conversions(variant, "variant")?;
    let margin = validation::positive(margin, "non_inferiority_margin", false)?;
    let kind = TestKind::NonInferiority;

    let diff = variant.rate() - control.rate();
    let se = unpooled_se(control, variant);
    let (z, p_value) = z_outcome(diff + margin, se, TestType::OneTailed, kind);

    let half_width = z_critical(config.alpha(), TestType::OneTailed) * se;
    let lower_bound = diff - half_width;
    let is_non_inferior = lower_bound > -margin;

    tracing::debug!(z, p_value, diff, lower_bound, margin, is_non_inferior, "non-inferiority test");

    Ok(NonInferiorityResult {
        statistic: z,
        p_value,
        confidence_interval: (lower_bound, diff + half_width),
        is_non_inferior,
        margin,
        confidence_level: config.confidence_level,
        observed_difference: diff,
        lower_bound,
        kind,
    })
}
