//! Write-only diagnostic state for the admin surface.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Record of a failed scheduled refresh.
///
/// Written by the engine when every source fails during a scheduled
/// run; read only by the diagnostics surface, never by resolution
/// logic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshFailure {
    /// Caracas calendar date of the attempt.
    pub date: NaiveDate,
    /// Caracas time of day of the attempt.
    pub time: NaiveTime,
    /// Human-readable failure description.
    pub error: String,
}
