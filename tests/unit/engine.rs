//! Tests for the engine functions re-exported by `liftstat`.

use liftstat::interval::{difference_ci, mean_difference_ci, proportion_ci, relative_lift_ci};
use liftstat::planning::{
    detectable_mean_difference, minimum_detectable_effect, proportion_power,
    proportion_sample_size,
};
use liftstat::testing::{
    chi_square_test, non_inferiority_test, one_sample_z_test, two_proportion_z_test,
};
use liftstat::{
    presets, Config, Conversions, DifferenceMethod, IntervalMethod, LiftType, MeanSample,
    ProportionMethod, TestKind, TestType, Violation, Winner,
};

fn arm(conversions: u64, visitors: u64) -> Conversions {
    Conversions::new(conversions, visitors)
}

// =============================================================================
// HYPOTHESIS TESTS
// =============================================================================

#[test]
fn chi_square_matches_squared_z() {
    let config = Config::default();
    let z = two_proportion_z_test(arm(500, 10_000), arm(600, 10_000), &config).unwrap();
    let chi = chi_square_test(arm(500, 10_000), arm(600, 10_000), &config).unwrap();
    assert!((chi.statistic - 9.62000962000961).abs() < 1e-9);
    assert!((chi.statistic - z.statistic.powi(2)).abs() < 1e-9);
    assert!((chi.p_value - z.p_value).abs() < 1e-8);
    assert_eq!(chi.kind, TestKind::ChiSquare);
    assert_eq!(chi.winner, Winner::Variant);
}

#[test]
fn one_tailed_halves_p_value() {
    let two = two_proportion_z_test(arm(500, 10_000), arm(600, 10_000), &Config::default())
        .unwrap();
    let one = two_proportion_z_test(
        arm(500, 10_000),
        arm(600, 10_000),
        &Config::default().one_tailed(),
    )
    .unwrap();
    assert!((one.p_value - 0.000962343625481088).abs() < 1e-12);
    assert!((two.p_value - 2.0 * one.p_value).abs() < 1e-12);
    assert_eq!(one.test_type, TestType::OneTailed);
    assert!(one.confidence_interval.1.is_infinite());
}

#[test]
fn one_sample_reference_values() {
    let result = one_sample_z_test(arm(60, 1_000), 0.05, &Config::default()).unwrap();
    assert!((result.statistic - 1.4509525002200225).abs() < 1e-9);
    assert!((result.p_value - 0.1467930873085712).abs() < 1e-9);
    assert!(!result.is_significant);
    assert_eq!(result.kind, TestKind::OneSample);
    assert_eq!(result.winner, Winner::None);
}

#[test]
fn one_sample_rejects_boundary_expected_rate() {
    let err = one_sample_z_test(arm(60, 1_000), 0.0, &Config::default()).unwrap_err();
    assert_eq!(err.field, "expected_rate");
}

#[test]
fn non_inferiority_small_drop_passes() {
    let result =
        non_inferiority_test(arm(500, 10_000), arm(490, 10_000), 0.01, &Config::default())
            .unwrap();
    assert!(result.is_non_inferior);
    assert!((result.statistic - 2.9339317393514395).abs() < 1e-9);
    assert!((result.lower_bound - -0.006045680662575904).abs() < 1e-9);
}

#[test]
fn non_inferiority_requires_positive_margin() {
    let err = non_inferiority_test(arm(500, 10_000), arm(490, 10_000), 0.0, &Config::default())
        .unwrap_err();
    assert_eq!(err.field, "non_inferiority_margin");
    assert_eq!(err.violation, Violation::Domain);
}

// =============================================================================
// CONFIDENCE INTERVALS
// =============================================================================

#[test]
fn interval_methods_parse() {
    assert_eq!("wald".parse::<IntervalMethod>().unwrap(), IntervalMethod::Normal);
    assert_eq!(
        "agresti_coull".parse::<IntervalMethod>().unwrap(),
        IntervalMethod::AgrestiCoull
    );
    assert_eq!("newcombe".parse::<DifferenceMethod>().unwrap(), DifferenceMethod::Newcombe);
    let err = "bootstrap".parse::<ProportionMethod>().unwrap_err();
    assert_eq!(err.violation, Violation::Configuration);
}

#[test]
fn proportion_methods_agree_for_large_samples() {
    let arm = arm(5_000, 100_000);
    let normal = proportion_ci(arm, 0.95, ProportionMethod::Normal).unwrap();
    let wilson = proportion_ci(arm, 0.95, ProportionMethod::Wilson).unwrap();
    let ac = proportion_ci(arm, 0.95, ProportionMethod::AgrestiCoull).unwrap();
    assert!((normal.lower_bound - wilson.lower_bound).abs() < 1e-4);
    assert!((normal.upper_bound - ac.upper_bound).abs() < 1e-4);
    assert_eq!(wilson.method, IntervalMethod::Wilson);
}

#[test]
fn newcombe_is_close_to_normal_difference() {
    let normal = difference_ci(arm(500, 10_000), arm(600, 10_000), 0.95, DifferenceMethod::Normal)
        .unwrap();
    let newcombe =
        difference_ci(arm(500, 10_000), arm(600, 10_000), 0.95, DifferenceMethod::Newcombe)
            .unwrap();
    assert_eq!(normal.point_estimate, newcombe.point_estimate);
    assert!((normal.width() - newcombe.width()).abs() < 5e-4);
}

#[test]
fn relative_lift_needs_conversions_in_both_arms() {
    let err = relative_lift_ci(arm(0, 1_000), arm(10, 1_000), 0.95).unwrap_err();
    assert_eq!(err.field, "control_conversions");
    let err = relative_lift_ci(arm(10, 1_000), arm(0, 1_000), 0.95).unwrap_err();
    assert_eq!(err.field, "variant_conversions");

    let ci = relative_lift_ci(arm(500, 10_000), arm(600, 10_000), 0.95).unwrap();
    assert!((ci.point_estimate - 0.2).abs() < 1e-9);
    assert!(ci.lower_bound > 0.0);
}

#[test]
fn mean_difference_interval_matches_welch() {
    let ci = mean_difference_ci(
        MeanSample::new(50.0, 15.0, 500),
        MeanSample::new(52.0, 15.0, 500),
        0.95,
    )
    .unwrap();
    assert_eq!(ci.method, IntervalMethod::Welch);
    assert!(ci.contains(2.0));
    assert!(ci.lower_bound > 0.0);
}

// =============================================================================
// PLANNING
// =============================================================================

#[test]
fn sample_size_variants() {
    let base = presets::standard();
    let rel = proportion_sample_size(0.05, 0.10, LiftType::Relative, &base).unwrap();
    assert_eq!(rel.control_visitors, 31_234);

    let one = proportion_sample_size(0.05, 0.10, LiftType::Relative, &base.clone().one_tailed())
        .unwrap();
    assert_eq!(one.control_visitors, 24_603);

    let split = proportion_sample_size(
        0.05,
        0.10,
        LiftType::Relative,
        &base.clone().with_traffic_split(2.0),
    )
    .unwrap();
    assert_eq!(split.control_visitors, 23_564);
    assert_eq!(split.variant_visitors, 47_128);

    let abs = proportion_sample_size(0.10, 0.02, LiftType::Absolute, &base).unwrap();
    assert_eq!(abs.control_visitors, 3_841);
    assert_eq!(abs.assumptions[0], "Two-proportion Z-test (standard A/B test)");
}

#[test]
fn zero_lift_rejected() {
    let err = proportion_sample_size(0.05, 0.0, LiftType::Relative, &Config::default())
        .unwrap_err();
    assert_eq!(err.violation, Violation::Consistency);
    assert!(err.message.contains("cannot be zero"));
}

#[test]
fn power_and_mde_reference_values() {
    let config = Config::default();
    let power = proportion_power(0.05, 0.06, 10_000, &config).unwrap();
    assert!((power.statistical_power - 0.873257343055969).abs() < 1e-9);

    let mde = minimum_detectable_effect(0.05, 10_000, &config).unwrap();
    assert!((mde.absolute_effect - 0.008993097319155385).abs() < 1e-8);
    assert!(mde.is_exact());

    let delta = detectable_mean_difference(15.0, 1_000, &config).unwrap();
    assert!((delta - 1.8793604977377514).abs() < 1e-9);
}

// =============================================================================
// THREAD SAFETY
// =============================================================================

#[test]
fn result_types_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<liftstat::ProportionTestResult>();
    assert_send_sync::<liftstat::MeanTestResult>();
    assert_send_sync::<liftstat::NonInferiorityResult>();
    assert_send_sync::<liftstat::ConfidenceIntervalResult>();
    assert_send_sync::<liftstat::SampleSizeResult>();
    assert_send_sync::<liftstat::PowerResult>();
    assert_send_sync::<liftstat::MdeEstimate>();
    assert_send_sync::<liftstat::InvalidParameter>();
    assert_send_sync::<liftstat::conversion::TestResult>();
    assert_send_sync::<liftstat::revenue::SampleSizePlan>();
}
