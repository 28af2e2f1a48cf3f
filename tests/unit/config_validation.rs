//! Tests for input and configuration validation.
//!
//! Invalid inputs must fail with an `InvalidParameter` naming the field and
//! the class of violation; nothing panics.

use liftstat::testing::{two_proportion_z_test, welch_t_test};
use liftstat::{conversion, presets, revenue, Config, Conversions, MeanSample, TestType, Violation};

// =============================================================================
// CONFIDENCE AND POWER
// =============================================================================

#[test]
fn confidence_zero_rejected() {
    let err = conversion::sample_size(5.0, 10.0, 0.0, 80.0).unwrap_err();
    assert_eq!(err.field, "confidence_level");
    assert_eq!(err.violation, Violation::Configuration);
}

#[test]
fn confidence_hundred_percent_rejected() {
    let err = conversion::sample_size(5.0, 10.0, 100.0, 80.0).unwrap_err();
    assert_eq!(err.field, "confidence_level");
}

#[test]
fn power_out_of_range_rejected() {
    let err = conversion::sample_size(5.0, 10.0, 95.0, 150.0).unwrap_err();
    assert_eq!(err.field, "statistical_power");
    assert_eq!(err.violation, Violation::Configuration);
}

#[test]
fn percent_and_fraction_configs_agree() {
    let control = Conversions::new(480, 10_000);
    let variant = Conversions::new(560, 10_000);
    let a = two_proportion_z_test(control, variant, &Config::new().with_confidence_level(95.0));
    let b = two_proportion_z_test(control, variant, &Config::new().with_confidence_level(0.95));
    assert_eq!(a.unwrap(), b.unwrap());
}

#[test]
fn traffic_split_must_be_positive() {
    for split in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = presets::standard().with_traffic_split(split).validate().unwrap_err();
        assert_eq!(err.field, "traffic_split");
    }
}

#[test]
fn sidedness_tags_parse() {
    assert_eq!("two-sided".parse::<TestType>().unwrap(), TestType::TwoTailed);
    assert_eq!("One-Tailed".parse::<TestType>().unwrap(), TestType::OneTailed);
    let err = "sideways".parse::<TestType>().unwrap_err();
    assert_eq!(err.violation, Violation::Configuration);
}

// =============================================================================
// ARM COUNTS
// =============================================================================

#[test]
fn conversions_exceeding_visitors_rejected() {
    let err = conversion::analyze(Conversions::new(101, 100), Conversions::new(10, 100), 95.0)
        .unwrap_err();
    assert_eq!(err.field, "control_conversions");
    assert_eq!(err.violation, Violation::Consistency);
}

#[test]
fn zero_visitors_rejected() {
    let err = conversion::analyze(Conversions::new(0, 100), Conversions::new(0, 0), 95.0)
        .unwrap_err();
    assert_eq!(err.field, "variant_visitors");
    assert_eq!(err.violation, Violation::Domain);
}

#[test]
fn negative_std_rejected() {
    let err = welch_t_test(
        MeanSample::new(10.0, -1.0, 50),
        MeanSample::new(10.0, 1.0, 50),
        &Config::default(),
    )
    .unwrap_err();
    assert_eq!(err.field, "control_std");
}

#[test]
fn single_observation_rejected_for_welch() {
    let err = revenue::analyze(MeanSample::new(10.0, 1.0, 50), MeanSample::new(10.0, 1.0, 1), 95.0)
        .unwrap_err();
    assert_eq!(err.field, "variant_visitors");
}

#[test]
fn errors_display_field_and_message() {
    let err = conversion::sample_size(0.0, 10.0, 95.0, 80.0).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("current_rate"), "{text}");
    assert!(text.contains("between 0 and 1"), "{text}");
}
