//! Tests for the revenue workflow.

use liftstat::{revenue, MeanSample, Recommendation, Winner};

#[test]
fn planning_reference_size() {
    let plan = revenue::sample_size(50.0, 15.0, 5.0, 95.0, 80.0).unwrap();
    assert_eq!(plan.visitors_per_variant, 566);
    assert_eq!(plan.standard_deviation, 15.0);
    assert_eq!(plan.confidence_level, 0.95);
    assert_eq!(plan.statistical_power, 0.80);
}

#[test]
fn planning_scales_with_variance() {
    let low = revenue::sample_size(50.0, 10.0, 10.0, 95.0, 80.0).unwrap();
    let high = revenue::sample_size(50.0, 20.0, 10.0, 95.0, 80.0).unwrap();
    assert_eq!(high.visitors_per_variant, 252);
    // Doubling sigma roughly quadruples n
    let ratio = high.visitors_per_variant as f64 / low.visitors_per_variant as f64;
    assert!((ratio - 4.0).abs() < 0.05, "ratio {ratio}");
}

#[test]
fn planning_duration() {
    let plan = revenue::sample_size(50.0, 15.0, 5.0, 95.0, 80.0)
        .unwrap()
        .with_daily_traffic(100)
        .unwrap();
    assert_eq!(plan.test_duration_days, Some(12));
}

#[test]
fn analysis_reference_values() {
    let result = revenue::analyze(
        MeanSample::new(50.0, 15.0, 500),
        MeanSample::new(52.0, 15.0, 500),
        95.0,
    )
    .unwrap();
    assert!((result.t_statistic - 2.1081851067789197).abs() < 1e-9);
    assert!((result.p_value - 0.0352638).abs() < 1e-5);
    assert!((result.degrees_of_freedom - 998.0).abs() < 1e-9);
    assert!((result.lift_absolute - 2.0).abs() < 1e-12);
    assert!(result.confidence_interval_lower > 0.0);
    assert_eq!(result.recommendation, Recommendation::ImplementVariant);
}

#[test]
fn analysis_not_significant_with_small_samples() {
    let result = revenue::analyze(
        MeanSample::new(50.0, 15.0, 40),
        MeanSample::new(52.0, 15.0, 40),
        95.0,
    )
    .unwrap();
    assert!(!result.is_significant);
    assert_eq!(result.winner, Winner::None);
    assert!(result.confidence_interval_lower < 0.0 && result.confidence_interval_upper > 0.0);
}

#[test]
fn analysis_zero_variance_is_not_significant() {
    let result = revenue::analyze(
        MeanSample::new(50.0, 0.0, 100),
        MeanSample::new(60.0, 0.0, 100),
        95.0,
    )
    .unwrap();
    assert_eq!(result.t_statistic, 0.0);
    assert_eq!(result.p_value, 1.0);
    assert_eq!(result.winner, Winner::None);
}

#[test]
fn interval_uses_student_t() {
    let ci = revenue::confidence_interval(MeanSample::new(10.0, 2.0, 25), 95.0).unwrap();
    // t_{0.975, 24} = 2.0638985616
    assert!((ci.margin_of_error - 2.0638985616 * 0.4).abs() < 1e-6);
    assert!((ci.lower - (10.0 - ci.margin_of_error)).abs() < 1e-12);
    assert!((ci.upper - (10.0 + ci.margin_of_error)).abs() < 1e-12);
}
