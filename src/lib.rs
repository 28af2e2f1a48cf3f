//! # liftstat
//!
//! Sample sizes, significance tests and confidence intervals for A/B
//! experiments.
//!
//! The statistical engine lives in [`liftstat_core`] and is re-exported
//! here. This crate adds a workflow layer for the two common experiment
//! shapes:
//!
//! - [`conversion`]: binary outcomes (signed up or not, bought or not)
//! - [`revenue`]: continuous outcomes (order value, revenue per visitor)
//!
//! plus [`presets`] for common confidence/power settings and [`output`]
//! for JSON and terminal reports.
//!
//! ## Quick Start
//!
//! ```
//! use liftstat::{conversion, output, Conversions};
//!
//! // Before launch: how many visitors?
//! let plan = conversion::sample_size(5.0, 10.0, 95.0, 80.0)
//!     .unwrap()
//!     .with_daily_traffic(2_000)
//!     .unwrap();
//! assert_eq!(plan.test_duration_days, Some(32));
//!
//! // After the test: is the variant better?
//! let result = conversion::analyze(
//!     Conversions::new(1_550, 31_234),
//!     Conversions::new(1_760, 31_234),
//!     95.0,
//! )
//! .unwrap();
//! println!("{}", output::format_conversion_result(&result, "Checkout Button"));
//! ```
//!
//! ## Lower-level API
//!
//! The engine functions take a [`Config`] and fractional inputs:
//!
//! ```
//! use liftstat::planning::minimum_detectable_effect;
//! use liftstat::presets;
//!
//! let mde = minimum_detectable_effect(0.05, 10_000, &presets::standard()).unwrap();
//! assert!(mde.absolute_effect < 0.01);
//! ```
//!
//! Logging goes through `tracing`; install a subscriber to see the
//! per-operation `debug!` events.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conversion;
pub mod decision;
pub mod output;
pub mod presets;
pub mod revenue;

// Engine modules
pub use liftstat_core::{distributions, effect, interval, planning, testing, validation};

// Re-export commonly used items at crate root
pub use decision::Recommendation;
pub use liftstat_core::{
    ConfidenceIntervalResult, Config, Conversions, DifferenceMethod, InvalidParameter,
    IntervalMethod, LiftType, MdeEstimate, MdeSolve, MeanSample, MeanTestResult,
    NonInferiorityResult, PlannedMetric, PowerResult, ProportionMethod, ProportionTestResult,
    Result, SampleSizeResult, TestKind, TestType, Violation, Winner,
};
