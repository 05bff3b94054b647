//! The cached rate record.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The rate that applies for a given calendar date.
///
/// Exactly one record is retained at a time; each successful fetch
/// overwrites it (last-write-wins, no history). A record whose
/// `effective_date` does not match the currently active target date is
/// stale and subject to the staleness-recovery procedure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRecord {
    /// The USD/VES rate. Validated against the sanity range before it
    /// is ever persisted.
    pub rate: Decimal,
    /// The Caracas calendar date this rate is authoritative for.
    pub effective_date: NaiveDate,
    /// When the rate was fetched.
    pub recorded_at: DateTime<Utc>,
}

impl RateRecord {
    pub fn new(rate: Decimal, effective_date: NaiveDate, recorded_at: DateTime<Utc>) -> Self {
        Self {
            rate,
            effective_date,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn serializes_round_trip() {
        let record = RateRecord::new(
            dec!(110.25),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            "2024-06-09T21:00:00Z".parse().unwrap(),
        );
        let json = serde_json::to_string(&record).unwrap();
        let parsed: RateRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
