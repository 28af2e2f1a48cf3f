//! Hypothesis tests.
//!
//! - [`two_proportion_z_test`]: pooled SE for the statistic, unpooled SE for
//!   the interval
//! - [`one_sample_z_test`]: observed rate against a fixed expected rate
//! - [`welch_t_test`]: two means without an equal-variance assumption
//! - [`chi_square_test`]: 2x2 test of independence, 1 df
//! - [`non_inferiority_test`]: one-sided test against a margin
//!
//! Every test treats a zero standard error as "no detectable difference":
//! statistic 0 and p-value 1.

mod means;
mod non_inferiority;
mod proportions;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use means::{welch_t_test, MeanTestResult};
pub use non_inferiority::{non_inferiority_test, NonInferiorityResult};
pub use proportions::{chi_square_test, one_sample_z_test, two_proportion_z_test, ProportionTestResult};

use crate::config::TestType;
use crate::distributions::z_p_value;

// ============================================================================
// Winner
// ============================================================================

/// Which arm a test declares better.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// Significant and the variant is worse.
    Control,
    /// Significant and the variant is better.
    Variant,
    /// Not significant, or no difference.
    None,
}

impl Winner {
    /// Derive the winner from significance and the sign of
    /// `variant - control`.
    pub fn from_outcome(is_significant: bool, difference: f64) -> Self {
        if !is_significant {
            Winner::None
        } else if difference > 0.0 {
            Winner::Variant
        } else if difference < 0.0 {
            Winner::Control
        } else {
            Winner::None
        }
    }

    /// Whether a winner was declared.
    pub fn is_decided(self) -> bool {
        !matches!(self, Winner::None)
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Control => write!(f, "control"),
            Winner::Variant => write!(f, "variant"),
            Winner::None => write!(f, "none"),
        }
    }
}

// ============================================================================
// TestKind
// ============================================================================

/// Which test produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TestKind {
    /// Two-proportion z-test.
    #[serde(rename = "conversion_rate_test")]
    ConversionRate,
    /// One-sample z-test against an expected rate.
    #[serde(rename = "one_sample_test")]
    OneSample,
    /// Chi-square test of independence.
    #[serde(rename = "chi_square_test")]
    ChiSquare,
    /// Welch two-sample t-test.
    #[serde(rename = "revenue_test")]
    Revenue,
    /// One-sided non-inferiority z-test.
    #[serde(rename = "non_inferiority")]
    NonInferiority,
}

impl TestKind {
    /// Name of the statistic this test reports.
    pub fn statistic_name(self) -> &'static str {
        match self {
            TestKind::ConversionRate | TestKind::OneSample | TestKind::NonInferiority => "z",
            TestKind::ChiSquare => "chi-square",
            TestKind::Revenue => "t",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestKind::ConversionRate => "conversion_rate_test",
            TestKind::OneSample => "one_sample_test",
            TestKind::ChiSquare => "chi_square_test",
            TestKind::Revenue => "revenue_test",
            TestKind::NonInferiority => "non_inferiority",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// z statistic and p-value for `numerator / se`, with the zero-SE fallback.
pub(crate) fn z_outcome(numerator: f64, se: f64, test_type: TestType, kind: TestKind) -> (f64, f64) {
    if se == 0.0 {
        tracing::warn!(test = %kind, "zero standard error; reporting statistic 0 and p-value 1");
        return (0.0, 1.0);
    }
    let z = numerator / se;
    (z, z_p_value(z, test_type))
}

/// Interval around `estimate` with half-width `critical * se`, open above
/// for one-tailed tests.
pub(crate) fn sided_interval(estimate: f64, margin: f64, test_type: TestType) -> (f64, f64) {
    match test_type {
        TestType::TwoTailed => (estimate - margin, estimate + margin),
        TestType::OneTailed => (estimate - margin, f64::INFINITY),
    }
}
