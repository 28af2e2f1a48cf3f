//! Minimum detectable effect.
//!
//! Achieved power is monotonically increasing in the effect size, so the
//! smallest detectable lift at a fixed sample size is the root of
//!
//! ```text
//! power(p, p + δ) - target = 0,   δ ∈ [ε, max_effect - ε]
//! max_effect = min(p, 1 - p)
//! ε = min(1e-4, max_effect / 4)
//! ```
//!
//! The search range keeps the variant rate inside (0, 1). When no root lies
//! inside it the nearest end of the range is returned and
//! [`MdeEstimate::solve`] says which end.

use serde::{Deserialize, Serialize};

use super::power::proportion_power_kernel;
use super::variant_arm_size;
use crate::config::Config;
use crate::constants::MDE_SEARCH_EPSILON;
use crate::distributions::{normal_quantile, z_critical};
use crate::error::Result;
use crate::root::{brent, RootError};
use crate::validation;

/// How a minimum detectable effect was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MdeSolve {
    /// Root found inside the search range.
    Converged,
    /// Target power is already met at the smallest searched effect; the
    /// estimate is that lower end.
    BelowSearchRange,
    /// Target power is out of reach while the variant rate stays in (0, 1);
    /// the estimate is `max_effect`.
    Unreachable,
}

/// Result from MDE estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdeEstimate {
    /// Smallest detectable increase in the conversion rate (rate points).
    pub absolute_effect: f64,
    /// `absolute_effect / control_rate`.
    pub relative_effect: f64,
    /// Baseline rate.
    pub control_rate: f64,
    /// `control_rate + absolute_effect`.
    pub variant_rate: f64,
    /// Control arm size the estimate is for.
    pub control_visitors: u64,
    /// Variant arm size, `ceil(k · control_visitors)`.
    pub variant_visitors: u64,
    /// Target power.
    pub statistical_power: f64,
    /// How the estimate was obtained.
    pub solve: MdeSolve,
    /// Root-finder iterations (0 when the search range was not bracketed).
    pub iterations: usize,
}

impl MdeEstimate {
    /// Whether the estimate is an exact solve rather than a range boundary.
    pub fn is_exact(&self) -> bool {
        self.solve == MdeSolve::Converged
    }
}

/// Smallest absolute lift in a conversion rate detectable with
/// `visitors_per_variant` visitors in the control arm.
///
/// Uses `config.statistical_power` as the target and
/// `config.traffic_split` for the variant arm.
///
/// # Errors
///
/// Fails on an invalid config, a `control_rate` outside (0, 1), or a zero
/// sample size. An unreachable target is not an error; see [`MdeSolve`].
pub fn minimum_detectable_effect(
    control_rate: f64,
    visitors_per_variant: u64,
    config: &Config,
) -> Result<MdeEstimate> {
    let config = config.validate()?;
    let p = validation::rate(control_rate, "control_rate")?;
    let n1 = validation::sample_size(visitors_per_variant, "visitors_per_variant")?;
    let n2 = variant_arm_size(n1, config.traffic_split);
    let target = config.statistical_power;

    let z_alpha = z_critical(config.alpha(), config.test_type);
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let power_gap = |effect: f64| {
        let variant = p + effect;
        if !(0.0..=1.0).contains(&variant) {
            return -target;
        }
        proportion_power_kernel(p, variant, n1f, n2f, z_alpha) - target
    };

    let max_effect = p.min(1.0 - p);
    let epsilon = MDE_SEARCH_EPSILON.min(max_effect / 4.0);
    let lo = epsilon;
    let hi = max_effect - epsilon;

    let (absolute_effect, solve, iterations) = match brent(power_gap, lo, hi) {
        Ok(root) => (root.x, MdeSolve::Converged, root.iterations),
        Err(err @ RootError::NotBracketed { f_lo, .. }) if f_lo > 0.0 => {
            tracing::warn!(%err, effect = lo, "target power met below search range");
            (lo, MdeSolve::BelowSearchRange, 0)
        }
        Err(err @ RootError::NotBracketed { .. }) => {
            tracing::warn!(%err, max_effect, "target power unreachable; returning max effect");
            (max_effect, MdeSolve::Unreachable, 0)
        }
        Err(RootError::MaxIterations { iterations, estimate }) => {
            tracing::warn!(iterations, estimate, "MDE solve hit iteration cap");
            (estimate, MdeSolve::Converged, iterations)
        }
    };

    tracing::debug!(p, n1, n2, absolute_effect, ?solve, iterations, "minimum detectable effect");

    Ok(MdeEstimate {
        absolute_effect,
        relative_effect: absolute_effect / p,
        control_rate: p,
        variant_rate: p + absolute_effect,
        control_visitors: n1,
        variant_visitors: n2,
        statistical_power: target,
        solve,
        iterations,
    })
}

/// Smallest mean difference detectable at a fixed sample size.
///
/// ```text
/// δ = (z_α + z_β)·σ·√(1/n1 + 1/n2)
/// ```
///
/// Closed-form inverse of [`mean_power`](super::mean_power).
pub fn detectable_mean_difference(
    standard_deviation: f64,
    visitors_per_variant: u64,
    config: &Config,
) -> Result<f64> {
    let config = config.validate()?;
    let sigma = validation::positive(standard_deviation, "standard_deviation", false)?;
    let n1 = validation::sample_size(visitors_per_variant, "visitors_per_variant")?;
    let n2 = variant_arm_size(n1, config.traffic_split);

    let z_alpha = z_critical(config.alpha(), config.test_type);
    let z_beta = normal_quantile(config.statistical_power);
    let delta = (z_alpha + z_beta) * sigma * (1.0 / n1 as f64 + 1.0 / n2 as f64).sqrt();

    tracing::debug!(sigma, n1, n2, delta, "detectable mean difference");
    Ok(delta)
}
