//! Output formatting for plans and test results.
//!
//! - Terminal: human-readable summaries with colors and box drawing
//! - JSON: machine-readable serialization

pub mod json;
pub mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{
    format_conversion_plan, format_conversion_result, format_revenue_plan, format_revenue_result,
    MetricLabels,
};
