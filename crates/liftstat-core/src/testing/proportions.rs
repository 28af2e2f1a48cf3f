//! Tests on conversion rates.

use nalgebra::{Matrix2, RowVector2, Vector2};
use serde::{Deserialize, Serialize};

use super::{sided_interval, z_outcome, TestKind, Winner};
use crate::config::{Config, TestType};
use crate::distributions::{chi_square_sf, z_critical};
use crate::effect::{cohens_h, lift, pooled_proportion};
use crate::error::Result;
use crate::interval::unpooled_se;
use crate::types::Conversions;
use crate::validation;

/// Outcome of a test on conversion rates.
///
/// For the one-sample test the "control" rate is the expected rate and the
/// "variant" rate is the observed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionTestResult {
    /// Test statistic: z for the z-tests, χ² for the chi-square test.
    pub statistic: f64,
    /// p-value.
    pub p_value: f64,
    /// Interval on `variant_rate - control_rate` (on the observed rate for
    /// the one-sample test). One-tailed tests report an open upper bound.
    pub confidence_interval: (f64, f64),
    /// `p_value < α`.
    pub is_significant: bool,
    /// Confidence level used.
    pub confidence_level: f64,
    /// Cohen's h.
    pub effect_size: f64,
    /// `(variant - control) / control`, `None` when the control rate is 0.
    pub relative_lift: Option<f64>,
    /// `variant - control`.
    pub absolute_lift: f64,
    /// Control (or expected) conversion rate.
    pub control_rate: f64,
    /// Variant (or observed) conversion rate.
    pub variant_rate: f64,
    /// Test that produced this result.
    pub kind: TestKind,
    /// Sidedness used.
    pub test_type: TestType,
    /// Winner derived from significance and the sign of the lift.
    pub winner: Winner,
}

impl ProportionTestResult {
    /// Relative lift in percent, 0 when undefined.
    pub fn lift_percent(&self) -> f64 {
        self.relative_lift.map_or(0.0, |r| r * 100.0)
    }
}

/// Two-proportion z-test.
///
/// The statistic uses the pooled standard error under H0: p1 = p2,
/// `√(p̄(1-p̄)(1/n1 + 1/n2))`. The reported interval uses the unpooled
/// standard error, which is valid under either hypothesis.
///
/// # Errors
///
/// Fails on an invalid config, an empty arm, or conversions exceeding
/// visitors.
pub fn two_proportion_z_test(
    control: Conversions,
    variant: Conversions,
    config: &Config,
) -> Result<ProportionTestResult> {
    let config = config.validate()?;
    let control = validation::conversions(control, "control")?;
    let variant = validation::conversions(variant, "variant")?;
    let alpha = config.alpha();
    let kind = TestKind::ConversionRate;

    let (p1, p2) = (control.rate(), variant.rate());
    let (n1, n2) = (control.visitors as f64, variant.visitors as f64);
    let diff = p2 - p1;

    let p_pooled = pooled_proportion(
        control.conversions,
        control.visitors,
        variant.conversions,
        variant.visitors,
    );
    let se_pooled = (p_pooled * (1.0 - p_pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    let (z, p_value) = z_outcome(diff, se_pooled, config.test_type, kind);

    let z_crit = z_critical(alpha, config.test_type);
    let confidence_interval =
        sided_interval(diff, z_crit * unpooled_se(control, variant), config.test_type);

    let is_significant = p_value < alpha;
    let lift = lift(p1, p2);

    tracing::debug!(z, p_value, p1, p2, is_significant, "two-proportion z-test");

    Ok(ProportionTestResult {
        statistic: z,
        p_value,
        confidence_interval,
        is_significant,
        confidence_level: config.confidence_level,
        effect_size: cohens_h(p1, p2),
        relative_lift: lift.relative,
        absolute_lift: lift.absolute,
        control_rate: p1,
        variant_rate: p2,
        kind,
        test_type: config.test_type,
        winner: Winner::from_outcome(is_significant, diff),
    })
}

/// One-sample z-test of an observed rate against `expected_rate`.
///
/// The null standard error uses the expected rate, `√(p0(1-p0)/n)`. The
/// interval is a Wald interval on the observed rate, clamped to [0, 1]; a
/// one-tailed test reports an upper bound of 1.
///
/// `expected_rate` must lie in (0, 1) and may be given as a percentage.
pub fn one_sample_z_test(
    observed: Conversions,
    expected_rate: f64,
    config: &Config,
) -> Result<ProportionTestResult> {
    let config = config.validate()?;
    let observed = validation::conversions(observed, "")?;
    let p0 = validation::rate(expected_rate, "expected_rate")?;
    let alpha = config.alpha();
    let kind = TestKind::OneSample;

    let rate = observed.rate();
    let n = observed.visitors as f64;

    let se_null = (p0 * (1.0 - p0) / n).sqrt();
    let (z, p_value) = z_outcome(rate - p0, se_null, config.test_type, kind);

    let margin = z_critical(alpha, config.test_type) * (rate * (1.0 - rate) / n).sqrt();
    let (lower, upper) = match config.test_type {
        TestType::TwoTailed => (rate - margin, rate + margin),
        TestType::OneTailed => (rate - margin, 1.0),
    };
    let confidence_interval = (lower.max(0.0), upper.min(1.0));

    let is_significant = p_value < alpha;
    let lift = lift(p0, rate);

    tracing::debug!(z, p_value, rate, expected = p0, is_significant, "one-sample z-test");

    Ok(ProportionTestResult {
        statistic: z,
        p_value,
        confidence_interval,
        is_significant,
        confidence_level: config.confidence_level,
        effect_size: cohens_h(p0, rate),
        relative_lift: lift.relative,
        absolute_lift: lift.absolute,
        control_rate: p0,
        variant_rate: rate,
        kind,
        test_type: config.test_type,
        winner: Winner::from_outcome(is_significant, lift.absolute),
    })
}

/// Chi-square test of independence on the 2x2 table
///
/// ```text
///             converted   not converted
/// control     x1          n1 - x1
/// variant     x2          n2 - x2
/// ```
///
/// Expected counts come from the row and column totals; cells with a zero
/// expected count are skipped. The statistic is compared against χ² with
/// 1 df, so the test is always two-tailed and `config.test_type` is
/// ignored.
///
/// The reported interval and effect size reuse the two-proportion formulas
/// (unpooled Wald interval, Cohen's h) so results read the same as the
/// z-test's.
pub fn chi_square_test(
    control: Conversions,
    variant: Conversions,
    config: &Config,
) -> Result<ProportionTestResult> {
    let config = config.validate()?;
    let control = validation::conversions(control, "control")?;
    let variant = validation::conversions(variant, "variant")?;
    let alpha = config.alpha();

    let observed = Matrix2::new(
        control.conversions as f64,
        control.non_conversions() as f64,
        variant.conversions as f64,
        variant.non_conversions() as f64,
    );
    let row_totals = Vector2::new(observed.row(0).sum(), observed.row(1).sum());
    let col_totals = RowVector2::new(observed.column(0).sum(), observed.column(1).sum());
    let grand_total = observed.sum();
    let expected: Matrix2<f64> = (row_totals * col_totals) / grand_total;

    let statistic: f64 = observed
        .iter()
        .zip(expected.iter())
        .filter(|&(_, &e)| e > 0.0)
        .map(|(&o, &e)| (o - e).powi(2) / e)
        .sum();
    let p_value = chi_square_sf(statistic, 1.0)?;

    let (p1, p2) = (control.rate(), variant.rate());
    let diff = p2 - p1;
    let z_crit = z_critical(alpha, TestType::TwoTailed);
    let confidence_interval =
        sided_interval(diff, z_crit * unpooled_se(control, variant), TestType::TwoTailed);

    let is_significant = p_value < alpha;
    let lift = lift(p1, p2);

    tracing::debug!(chi_square = statistic, p_value, p1, p2, is_significant, "chi-square test");

    Ok(ProportionTestResult {
        statistic,
        p_value,
        confidence_interval,
        is_significant,
        confidence_level: config.confidence_level,
        effect_size: cohens_h(p1, p2),
        relative_lift: lift.relative,
        absolute_lift: lift.absolute,
        control_rate: p1,
        variant_rate: p2,
        kind: TestKind::ChiSquare,
        test_type: TestType::TwoTailed,
        winner: Winner::from_outcome(is_significant, diff),
    })
}
