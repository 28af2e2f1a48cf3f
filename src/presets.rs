//! Ready-made configurations.
//!
//! Each preset is a two-tailed, equal-split [`Config`]; adjust with the
//! `with_*` builders.
//!
//! ```
//! use liftstat::presets;
//!
//! let config = presets::conservative().with_traffic_split(2.0);
//! assert_eq!(config.confidence_level, 0.99);
//! ```

use liftstat_core::Config;

/// Create an exploratory configuration for early, low-stakes tests.
///
/// - 90% confidence
/// - 80% power
pub fn exploratory() -> Config {
    Config {
        confidence_level: 0.90,
        statistical_power: 0.80,
        ..Default::default()
    }
}

/// Create the standard configuration, same as `Config::default()`.
///
/// - 95% confidence
/// - 80% power
pub fn standard() -> Config {
    Config::default()
}

/// Create a conservative configuration for high-stakes launches.
///
/// - 99% confidence
/// - 90% power
pub fn conservative() -> Config {
    Config {
        confidence_level: 0.99,
        statistical_power: 0.90,
        ..Default::default()
    }
}
