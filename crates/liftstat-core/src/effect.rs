//! Effect sizes and pooling.
//!
//! Shared by the testing and planning layers:
//!
//! - pooled proportion (equal-weight and allocation-weighted)
//! - pooled variance and standard deviation
//! - Cohen's h for proportions, Cohen's d for means
//! - Welch-Satterthwaite degrees of freedom
//! - absolute and relative lift

use serde::{Deserialize, Serialize};

/// Pooled proportion `(x1 + x2) / (n1 + n2)` under H0: p1 = p2.
pub fn pooled_proportion(x1: u64, n1: u64, x2: u64, n2: u64) -> f64 {
    let total = n1 + n2;
    if total == 0 {
        return 0.0;
    }
    (x1 + x2) as f64 / total as f64
}

/// Allocation-weighted pooled proportion `(p1·n1 + k·p2·n2) / (n1 + k·n2)`.
///
/// With `n1 = n2 = 1` this is the per-visitor average
/// `(p1 + k·p2) / (1 + k)` used by the sample-size formula.
pub fn weighted_pooled_proportion(p1: f64, n1: f64, p2: f64, n2: f64, k: f64) -> f64 {
    (p1 * n1 + k * p2 * n2) / (n1 + k * n2)
}

/// Two-sample pooled variance weighted by `n - 1` per arm.
///
/// Returns 0 when there are no degrees of freedom.
pub fn pooled_variance(std1: f64, n1: u64, std2: f64, n2: u64) -> f64 {
    let dof = (n1 + n2).saturating_sub(2);
    if dof == 0 {
        return 0.0;
    }
    let w1 = n1.saturating_sub(1) as f64;
    let w2 = n2.saturating_sub(1) as f64;
    (w1 * std1 * std1 + w2 * std2 * std2) / dof as f64
}

/// Square root of [`pooled_variance`].
pub fn pooled_std(std1: f64, n1: u64, std2: f64, n2: u64) -> f64 {
    pooled_variance(std1, n1, std2, n2).sqrt()
}

/// Cohen's h: `2·asin(√p2) - 2·asin(√p1)`.
///
/// Variance-stabilizing effect size for proportions; signed toward `p2`.
pub fn cohens_h(p1: f64, p2: f64) -> f64 {
    2.0 * p2.sqrt().asin() - 2.0 * p1.sqrt().asin()
}

/// Cohen's d: `(mean2 - mean1) / pooled_std`.
///
/// Returns 0 for a non-positive pooled std.
pub fn cohens_d(mean1: f64, mean2: f64, pooled_std: f64) -> f64 {
    if pooled_std <= 0.0 {
        return 0.0;
    }
    (mean2 - mean1) / pooled_std
}

/// Welch-Satterthwaite degrees of freedom.
///
/// ```text
/// df = (v1 + v2)² / (v1²/(n1-1) + v2²/(n2-1)),   v_i = s_i² / n_i
/// ```
///
/// Takes sample variances `s_i²`. Falls back to `n1 + n2 - 2` when both
/// variances are zero. Both arms need `n >= 2`; callers validate this.
pub fn welch_degrees_of_freedom(var1: f64, n1: u64, var2: f64, n2: u64) -> f64 {
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let v1 = var1 / n1f;
    let v2 = var2 / n2f;
    let denominator = v1 * v1 / (n1f - 1.0) + v2 * v2 / (n2f - 1.0);
    if denominator > 0.0 && denominator.is_finite() {
        (v1 + v2).powi(2) / denominator
    } else {
        n1f + n2f - 2.0
    }
}

/// Difference between two arms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lift {
    /// `variant - control`. Always defined.
    pub absolute: f64,
    /// `(variant - control) / control`. `None` when control is 0.
    pub relative: Option<f64>,
}

impl Lift {
    /// Relative lift as a percentage, or 0 when undefined.
    pub fn percent_or_zero(&self) -> f64 {
        self.relative.map_or(0.0, |r| r * 100.0)
    }
}

/// Absolute and relative lift of `variant` over `control`.
pub fn lift(control: f64, variant: f64) -> Lift {
    let absolute = variant - control;
    let relative = if control != 0.0 {
        Some(absolute / control)
    } else {
        None
    };
    Lift { absolute, relative }
}
