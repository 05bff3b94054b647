//! Persistence of the single retained rate record.

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::errors::{RateError, Result};
use crate::models::RateRecord;
use crate::store::{keys, OptionStore};

/// Date-keyed access to the cached "current rate" record.
///
/// `set_current` always overwrites the one retained record; there is
/// no history. `get_current` is a pure read.
#[derive(Clone)]
pub struct RateCache {
    store: Arc<dyn OptionStore>,
}

impl RateCache {
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self { store }
    }

    /// The current record, or `None` when nothing has been cached yet.
    ///
    /// A corrupt stored payload reads as `None` so that resolution can
    /// proceed to its fallback states instead of failing the request.
    pub fn get_current(&self) -> Result<Option<RateRecord>> {
        let Some(raw) = self.store.get(keys::RATE_RECORD)? else {
            return Ok(None);
        };
        match serde_json::from_str::<RateRecord>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("Discarding corrupt cached rate record: {}", e);
                Ok(None)
            }
        }
    }

    /// Overwrites the retained record (last-write-wins).
    pub fn set_current(
        &self,
        rate: Decimal,
        effective_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<RateRecord> {
        let record = RateRecord::new(rate, effective_date, now);
        let json =
            serde_json::to_string(&record).map_err(|e| RateError::Store(e.to_string()))?;
        self.store.set(keys::RATE_RECORD, &json)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryOptionStore;
    use rust_decimal_macros::dec;

    fn cache() -> RateCache {
        RateCache::new(Arc::new(MemoryOptionStore::new()))
    }

    #[test]
    fn empty_cache_reads_as_none() {
        assert_eq!(cache().get_current().unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let cache = cache();
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let now: DateTime<Utc> = "2024-06-09T21:00:00Z".parse().unwrap();

        let written = cache.set_current(dec!(110.25), date, now).unwrap();
        let read = cache.get_current().unwrap().unwrap();
        assert_eq!(read, written);
        assert_eq!(read.rate, dec!(110.25));
        assert_eq!(read.effective_date, date);
    }

    #[test]
    fn second_write_wins() {
        let cache = cache();
        let now: DateTime<Utc> = "2024-06-09T21:00:00Z".parse().unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();

        cache.set_current(dec!(110.25), monday, now).unwrap();
        cache.set_current(dec!(111.40), tuesday, now).unwrap();

        let read = cache.get_current().unwrap().unwrap();
        assert_eq!(read.rate, dec!(111.40));
        assert_eq!(read.effective_date, tuesday);
    }

    #[test]
    fn corrupt_record_reads_as_none() {
        let store = Arc::new(MemoryOptionStore::new());
        store.set(keys::RATE_RECORD, "{not json").unwrap();
        let cache = RateCache::new(store);
        assert_eq!(cache.get_current().unwrap(), None);
    }
}
