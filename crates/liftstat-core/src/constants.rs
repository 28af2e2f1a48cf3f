//! Numeric constants and defaults used throughout the crate.

// =============================================================================
// Default configuration constants
// =============================================================================

/// Default confidence level (1 - alpha).
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Default target statistical power (1 - beta).
pub const DEFAULT_STATISTICAL_POWER: f64 = 0.80;

/// Default variant:control allocation ratio (equal split).
pub const DEFAULT_TRAFFIC_SPLIT: f64 = 1.0;

// =============================================================================
// Root finding
// =============================================================================

/// Absolute tolerance on the bracket width for the root finder.
pub const ROOT_TOLERANCE: f64 = 2e-12;

/// Iteration cap for the root finder.
///
/// Brent's method converges in well under 100 iterations for the smooth
/// monotonic power curves it is used on.
pub const ROOT_MAX_ITERATIONS: usize = 100;

/// Offset from the ends of the MDE search interval.
///
/// Keeps the variant rate strictly inside (0, 1) at both bracket ends.
/// Capped at a quarter of the largest effect for rates near 0 or 1.
pub const MDE_SEARCH_EPSILON: f64 = 1e-4;
