//! Distribution functions used by the tests and planners.
//!
//! Thin wrappers over `statrs`. The standard normal goes through the
//! complementary error function directly, so it never needs a fallible
//! constructor; Student-t and chi-square are parameterized by degrees of
//! freedom and surface bad parameters as [`InvalidParameter`].

use core::f64::consts::SQRT_2;

use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};
use statrs::function::erf::{erfc, erfc_inv};

use crate::config::TestType;
use crate::error::{InvalidParameter, Result};

/// Standard normal CDF: Φ(x) = erfc(-x/√2) / 2.
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal survival function 1 - Φ(x), accurate in the upper tail.
#[inline]
pub fn normal_sf(x: f64) -> f64 {
    0.5 * erfc(x / SQRT_2)
}

/// Standard normal quantile Φ⁻¹(p).
///
/// Returns ∓∞ at p = 0 and p = 1.
#[inline]
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Critical z-value for a test at level `alpha`.
pub fn z_critical(alpha: f64, test_type: TestType) -> f64 {
    normal_quantile(test_type.critical_probability(alpha))
}

/// p-value of a z statistic.
///
/// Two-tailed: `2·(1 - Φ(|z|))`. One-tailed (H1: greater): `1 - Φ(z)`.
pub fn z_p_value(z: f64, test_type: TestType) -> f64 {
    match test_type {
        TestType::TwoTailed => (2.0 * normal_sf(z.abs())).min(1.0),
        TestType::OneTailed => normal_sf(z),
    }
}

fn students_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|e| {
        InvalidParameter::domain("degrees_of_freedom", format!("{e} (df = {df})"))
    })
}

/// Student-t CDF with `df` degrees of freedom.
pub fn t_cdf(x: f64, df: f64) -> Result<f64> {
    Ok(students_t(df)?.cdf(x))
}

/// Student-t quantile with `df` degrees of freedom.
pub fn t_quantile(p: f64, df: f64) -> Result<f64> {
    Ok(students_t(df)?.inverse_cdf(p))
}

/// Critical t-value for a test at level `alpha`.
pub fn t_critical(alpha: f64, df: f64, test_type: TestType) -> Result<f64> {
    t_quantile(test_type.critical_probability(alpha), df)
}

/// p-value of a t statistic, sided as [`z_p_value`].
pub fn t_p_value(t: f64, df: f64, test_type: TestType) -> Result<f64> {
    let dist = students_t(df)?;
    let p = match test_type {
        TestType::TwoTailed => 2.0 * dist.sf(t.abs()),
        TestType::OneTailed => dist.sf(t),
    };
    Ok(p.clamp(0.0, 1.0))
}

/// Chi-square upper-tail probability P(X ≥ x).
pub fn chi_square_sf(x: f64, df: f64) -> Result<f64> {
    let dist = ChiSquared::new(df).map_err(|e| {
        InvalidParameter::domain("degrees_of_freedom", format!("{e} (df = {df})"))
    })?;
    Ok(dist.sf(x).clamp(0.0, 1.0))
}
