//! Tests for JSON and terminal output.

use liftstat::output::{self, MetricLabels};
use liftstat::{conversion, revenue, Conversions, MeanSample};

#[test]
fn plan_json_has_flat_fields() {
    let plan = conversion::sample_size(5.0, 10.0, 95.0, 80.0).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&output::to_json(&plan).unwrap()).unwrap();
    assert_eq!(value["visitors_per_variant"], 31_234);
    assert_eq!(value["total_visitors"], 62_468);
    assert!(value["test_duration_days"].is_null());
}

#[test]
fn result_json_round_trips() {
    let result =
        conversion::analyze(Conversions::new(500, 10_000), Conversions::new(600, 10_000), 95.0)
            .unwrap();
    let json = output::to_json_pretty(&result).unwrap();
    let back: conversion::TestResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.winner, result.winner);
    assert_eq!(back.recommendation, result.recommendation);
    assert_eq!(back.control, result.control);
    assert!((back.p_value - result.p_value).abs() < 1e-15);
}

#[test]
fn terminal_summaries_mention_key_numbers() {
    let result = revenue::analyze(
        MeanSample::new(50.0, 15.0, 500),
        MeanSample::new(52.0, 15.0, 500),
        95.0,
    )
    .unwrap();
    let text = output::format_revenue_result(&result, &MetricLabels::default());
    assert!(text.contains("REVENUE TEST RESULTS SUMMARY"));
    assert!(text.contains("P-value: 0.0353"));

    let plan = revenue::sample_size(50.0, 15.0, 5.0, 95.0, 80.0).unwrap();
    let text = output::format_revenue_plan(&plan, &MetricLabels::new("Revenue", "$"));
    assert!(text.contains("566 visitors"));
    assert!(text.contains("1,132 visitors"));
}
