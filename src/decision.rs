//! Plain-language verdicts derived from a test's winner.

use core::fmt;

use serde::{Deserialize, Serialize};

use liftstat_core::{InvalidParameter, Result, Winner};

/// What to do with an experiment given its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// The variant is significantly better.
    ImplementVariant,
    /// The variant is significantly worse.
    KeepControl,
    /// No significant difference yet.
    ContinueTest,
}

impl Recommendation {
    /// Recommendation for a winner.
    pub fn from_winner(winner: Winner) -> Self {
        match winner {
            Winner::Variant => Recommendation::ImplementVariant,
            Winner::Control => Recommendation::KeepControl,
            Winner::None => Recommendation::ContinueTest,
        }
    }

    /// One-sentence advice.
    pub fn message(self) -> &'static str {
        match self {
            Recommendation::ImplementVariant => {
                "Implement the variant - it performs significantly better."
            }
            Recommendation::KeepControl => {
                "Keep the control - the variant performs significantly worse."
            }
            Recommendation::ContinueTest => "Continue the test - results are not yet conclusive.",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Days needed to collect `total_visitors` at `daily_visitors` per day.
pub(crate) fn duration_days(total_visitors: u64, daily_visitors: u64) -> Result<u64> {
    if daily_visitors == 0 {
        return Err(InvalidParameter::domain("daily_visitors", "must be at least 1"));
    }
    Ok(total_visitors.div_ceil(daily_visitors))
}
