//! JSON serialization for plans and test results.

use serde::Serialize;

/// Serialize a plan or result to a compact JSON string.
///
/// Infinite interval bounds (one-tailed tests) serialize as `null`.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for the
/// result types in this crate).
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Serialize a plan or result to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for the
/// result types in this crate).
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
