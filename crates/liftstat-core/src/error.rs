//! Error types for the statistical engine.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of constraint an input violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Violation {
    /// A value lies outside its mathematical domain.
    ///
    /// Rates outside (0, 1) or [0, 1], negative standard deviations,
    /// sample sizes below the minimum a formula needs.
    Domain,

    /// A configuration knob is out of range or unrecognized.
    ///
    /// Confidence, power or alpha outside (0, 1), unknown method or
    /// sidedness tags, non-positive allocation ratios.
    Configuration,

    /// Individually valid inputs that contradict each other.
    ///
    /// Conversions exceeding visitors, a lift that pushes the expected rate
    /// out of (0, 1), a zero lift, relative lift with a zero control rate.
    Consistency,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Domain => write!(f, "domain"),
            Violation::Configuration => write!(f, "configuration"),
            Violation::Consistency => write!(f, "consistency"),
        }
    }
}

/// The single error every engine operation can return.
///
/// Carries the offending field name, the class of violation and a
/// human-readable message. Validation fails fast at the point of detection
/// and the error reaches the caller unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("invalid parameter `{field}`: {message}")]
pub struct InvalidParameter {
    /// Name of the input that failed validation.
    pub field: String,
    /// Constraint class that was violated.
    pub violation: Violation,
    /// What went wrong, suitable for showing to the caller.
    pub message: String,
}

impl InvalidParameter {
    /// Create an error with an explicit violation class.
    pub fn new(field: impl Into<String>, violation: Violation, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            violation,
            message: message.into(),
        }
    }

    /// Value outside its mathematical domain.
    pub fn domain(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, Violation::Domain, message)
    }

    /// Configuration value out of range or unknown.
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, Violation::Configuration, message)
    }

    /// Inputs that are inconsistent with each other.
    pub fn consistency(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, Violation::Consistency, message)
    }
}

/// Result alias used across the engine.
pub type Result<T> = core::result::Result<T, InvalidParameter>;
