//! Tests for the conversion-rate workflow.

use liftstat::{conversion, Conversions, Recommendation, Violation, Winner};

#[test]
fn planning_matches_reference_sizes() {
    let cases = [
        // (rate %, lift %, per-arm visitors)
        (5.0, 10.0, 31_234),
        (5.0, 20.0, 8_158),
    ];
    for (rate, lift, expected) in cases {
        let plan = conversion::sample_size(rate, lift, 95.0, 80.0).unwrap();
        assert_eq!(plan.visitors_per_variant, expected, "rate={rate} lift={lift}");
    }
}

#[test]
fn planning_negative_lift_is_allowed() {
    let up = conversion::sample_size(5.0, 10.0, 95.0, 80.0).unwrap();
    let down = conversion::sample_size(5.0, -10.0, 95.0, 80.0).unwrap();
    assert!((down.expected_rate - 0.045).abs() < 1e-12);
    // Smaller variance at the lower rate
    assert!(down.visitors_per_variant < up.visitors_per_variant);
}

#[test]
fn planning_vanishing_lift_is_rejected() {
    let err = conversion::sample_size(5.0, 1e-7, 95.0, 80.0).unwrap_err();
    assert_eq!(err.violation, Violation::Consistency);
    assert_eq!(err.field, "minimum_lift");
}

#[test]
fn planning_with_daily_traffic_keeps_sizes() {
    let plan = conversion::sample_size(5.0, 10.0, 95.0, 80.0).unwrap();
    let with_days = plan.clone().with_daily_traffic(5_000).unwrap();
    assert_eq!(with_days.visitors_per_variant, plan.visitors_per_variant);
    assert_eq!(with_days.test_duration_days, Some(13));
    assert!(plan.with_daily_traffic(0).is_err());
}

#[test]
fn analysis_reference_values() {
    let result =
        conversion::analyze(Conversions::new(500, 10_000), Conversions::new(600, 10_000), 95.0)
            .unwrap();
    assert!((result.z_statistic - 3.101614034661568).abs() < 1e-9);
    assert!((result.p_value - 0.001924687250962176).abs() < 1e-9);
    assert!((result.lift_percent - 20.0).abs() < 1e-9);
    assert!((result.lift_absolute - 0.01).abs() < 1e-12);
    assert!(result.confidence_interval_lower > 0.0);
    assert!(result.confidence_interval_lower < 0.01 && 0.01 < result.confidence_interval_upper);
    assert_eq!(result.winner, Winner::Variant);
}

#[test]
fn analysis_control_wins_when_variant_is_worse() {
    let result =
        conversion::analyze(Conversions::new(600, 10_000), Conversions::new(500, 10_000), 95.0)
            .unwrap();
    assert!(result.is_significant);
    assert_eq!(result.winner, Winner::Control);
    assert_eq!(result.recommendation, Recommendation::KeepControl);
    assert!(result.lift_percent < 0.0);
}

#[test]
fn analysis_identical_arms_have_no_winner() {
    let arm = Conversions::new(500, 10_000);
    let result = conversion::analyze(arm, arm, 95.0).unwrap();
    assert_eq!(result.z_statistic, 0.0);
    assert!((result.p_value - 1.0).abs() < 1e-12);
    assert_eq!(result.winner, Winner::None);
    assert_eq!(result.recommendation, Recommendation::ContinueTest);
}

#[test]
fn analysis_all_zero_arms_do_not_fail() {
    let result =
        conversion::analyze(Conversions::new(0, 1_000), Conversions::new(0, 1_000), 95.0).unwrap();
    assert_eq!(result.p_value, 1.0);
    assert_eq!(result.lift_percent, 0.0);
    assert!(!result.is_significant);
}

#[test]
fn analysis_zero_control_rate_reports_zero_lift_percent() {
    let result =
        conversion::analyze(Conversions::new(0, 1_000), Conversions::new(30, 1_000), 95.0).unwrap();
    assert_eq!(result.lift_percent, 0.0);
    assert!(result.is_significant);
}

#[test]
fn higher_confidence_is_harder_to_pass() {
    let control = Conversions::new(500, 10_000);
    let variant = Conversions::new(570, 10_000);
    let loose = conversion::analyze(control, variant, 90.0).unwrap();
    let strict = conversion::analyze(control, variant, 99.0).unwrap();
    assert_eq!(loose.p_value, strict.p_value);
    assert!(loose.is_significant);
    assert!(!strict.is_significant);
}

#[test]
fn interval_reference_values() {
    let ci = conversion::confidence_interval(Conversions::new(50, 1_000), 95.0).unwrap();
    assert!((ci.lower - 0.0381303).abs() < 1e-6);
    assert!((ci.upper - 0.0653138).abs() < 1e-6);
    assert_eq!(ci.confidence_level, 0.95);
}

#[test]
fn interval_at_boundaries_stays_in_unit_range() {
    let none = conversion::confidence_interval(Conversions::new(0, 40), 95.0).unwrap();
    assert_eq!(none.lower, 0.0);
    assert!(none.upper > 0.0 && none.upper < 0.15);

    let all = conversion::confidence_interval(Conversions::new(40, 40), 95.0).unwrap();
    assert_eq!(all.upper, 1.0);
    assert!(all.lower < 1.0);
}

mod properties {
    use liftstat::{conversion, Conversions, Recommendation};
    use proptest::prelude::*;

    fn arm() -> impl Strategy<Value = Conversions> {
        (1u64..20_000).prop_flat_map(|n| (0..=n).prop_map(move |x| Conversions::new(x, n)))
    }

    proptest! {
        /// The recommendation always follows the winner
        #[test]
        fn recommendation_follows_winner(control in arm(), variant in arm()) {
            let result = conversion::analyze(control, variant, 95.0).unwrap();
            prop_assert_eq!(result.recommendation, Recommendation::from_winner(result.winner));
            prop_assert!((0.0..=1.0).contains(&result.p_value));
        }

        /// Durations cover the whole sample
        #[test]
        fn duration_covers_total(rate in 1.5f64..40.0, lift in 5.0f64..50.0, daily in 1u64..100_000) {
            let plan = conversion::sample_size(rate, lift, 95.0, 80.0)
                .unwrap()
                .with_daily_traffic(daily)
                .unwrap();
            prop_assert_eq!(plan.total_visitors, 2 * plan.visitors_per_variant);
            let days = plan.test_duration_days.unwrap();
            prop_assert!(days * daily >= plan.total_visitors);
            prop_assert!(days == 0 || (days - 1) * daily < plan.total_visitors);
        }
    }
}
