//! Welch two-sample t-test.

use serde::{Deserialize, Serialize};

use super::{sided_interval, TestKind, Winner};
use crate::config::{Config, TestType};
use crate::distributions::{t_critical, t_p_value};
use crate::effect::{cohens_d, pooled_std, welch_degrees_of_freedom};
use crate::error::Result;
use crate::types::MeanSample;
use crate::validation;

/// Outcome of a test on a continuous metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanTestResult {
    /// Welch t statistic.
    pub statistic: f64,
    /// p-value.
    pub p_value: f64,
    /// Interval on `variant_mean - control_mean`; open above when
    /// one-tailed.
    pub confidence_interval: (f64, f64),
    /// `p_value < α`.
    pub is_significant: bool,
    /// Confidence level used.
    pub confidence_level: f64,
    /// Cohen's d.
    pub effect_size: f64,
    /// Welch-Satterthwaite df (`n1 + n2 - 2` at zero SE).
    pub degrees_of_freedom: f64,
    /// `variant_mean - control_mean`.
    pub mean_difference: f64,
    /// Control mean.
    pub control_mean: f64,
    /// Variant mean.
    pub variant_mean: f64,
    /// Always [`TestKind::Revenue`].
    pub kind: TestKind,
    /// Sidedness used.
    pub test_type: TestType,
    /// Winner derived from significance and the sign of the difference.
    pub winner: Winner,
}

impl MeanTestResult {
    /// `mean_difference / control_mean`, `None` when the control mean is 0.
    pub fn relative_lift(&self) -> Option<f64> {
        if self.control_mean == 0.0 {
            None
        } else {
            Some(self.mean_difference / self.control_mean)
        }
    }
}

/// Welch's t-test for `variant_mean - control_mean`.
///
/// Unpooled standard error `√(s1²/n1 + s2²/n2)` with Welch-Satterthwaite
/// degrees of freedom; no equal-variance assumption. Standard deviations may
/// be zero, but each arm needs at least two observations.
///
/// # Errors
///
/// Fails on an invalid config, a negative std, a non-finite mean, or fewer
/// than two observations in an arm.
pub fn welch_t_test(
    control: MeanSample,
    variant: MeanSample,
    config: &Config,
) -> Result<MeanTestResult> {
    let config = config.validate()?;
    let control = validation::mean_sample(control, "control", 2)?;
    let variant = validation::mean_sample(variant, "variant", 2)?;
    let alpha = config.alpha();

    let (var1, var2) = (control.variance(), variant.variance());
    let (n1, n2) = (control.n as f64, variant.n as f64);
    let diff = variant.mean - control.mean;
    let se = (var1 / n1 + var2 / n2).sqrt();

    let (t, p_value, df) = if se == 0.0 {
        tracing::warn!(test = %TestKind::Revenue, "zero standard error; reporting statistic 0 and p-value 1");
        (0.0, 1.0, n1 + n2 - 2.0)
    } else {
        let df = welch_degrees_of_freedom(var1, control.n, var2, variant.n);
        let t = diff / se;
        (t, t_p_value(t, df, config.test_type)?, df)
    };

    let t_crit = t_critical(alpha, df, config.test_type)?;
    let confidence_interval = sided_interval(diff, t_crit * se, config.test_type);

    let is_significant = p_value < alpha;
    let pooled = pooled_std(control.std, control.n, variant.std, variant.n);

    tracing::debug!(t, df, p_value, diff, is_significant, "welch t-test");

    Ok(MeanTestResult {
        statistic: t,
        p_value,
        confidence_interval,
        is_significant,
        confidence_level: config.confidence_level,
        effect_size: cohens_d(control.mean, variant.mean, pooled),
        degrees_of_freedom: df,
        mean_difference: diff,
        control_mean: control.mean,
        variant_mean: variant.mean,
        kind: TestKind::Revenue,
        test_type: config.test_type,
        winner: Winner::from_outcome(is_significant, diff),
    })
}
