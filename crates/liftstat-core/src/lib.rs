//! Core statistical engine for A/B experiments.
//!
//! This crate holds the numeric side of `liftstat`: input validation,
//! distribution functions, effect sizes, confidence intervals, hypothesis
//! tests and sample-size / power planning. Every operation is a pure function
//! of its inputs and returns an immutable result record or an
//! [`InvalidParameter`] error.
//!
//! # Layers
//!
//! - [`validation`]: guards every public entry point
//! - [`distributions`] and [`root`]: normal / Student-t / chi-square functions
//!   and a bracketed root finder
//! - [`effect`]: pooling, Cohen's h and d, Welch-Satterthwaite df, lift
//! - [`interval`]: confidence-interval estimators
//! - [`testing`]: z-tests, Welch t-test, chi-square and non-inferiority tests
//! - [`planning`]: sample size, achieved power and minimum detectable effect
//!
//! # Usage
//!
//! This crate is typically used through the main `liftstat` crate, which adds
//! marketer-facing helpers and report formatting. It can be used directly:
//!
//! ```
//! use liftstat_core::{testing, Config, Conversions};
//!
//! let control = Conversions::new(500, 10_000);
//! let variant = Conversions::new(600, 10_000);
//! let result = testing::two_proportion_z_test(control, variant, &Config::default()).unwrap();
//! assert!(result.is_significant);
//! ```

pub mod config;
pub mod constants;
pub mod distributions;
pub mod effect;
pub mod error;
pub mod interval;
pub mod planning;
pub mod root;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use config::{Config, TestType};
pub use error::{InvalidParameter, Result, Violation};
pub use interval::{ConfidenceIntervalResult, DifferenceMethod, IntervalMethod, ProportionMethod};
pub use planning::{LiftType, MdeEstimate, MdeSolve, PlannedMetric, PowerResult, SampleSizeResult};
pub use testing::{
    MeanTestResult, NonInferiorityResult, ProportionTestResult, TestKind, Winner,
};
pub use types::{Conversions, MeanSample};
