//! Fetch orchestration across the source fallback chain.

use chrono::{DateTime, Utc};
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::is_within_bounds;
use crate::errors::{RateError, Result};
use crate::source::RateSource;
use crate::store::{keys, OptionStore};

/// A validated rate together with its provenance.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchedRate {
    pub rate: Decimal,
    /// Identifier of the source that produced the value.
    pub source: &'static str,
    pub fetched_at: DateTime<Utc>,
}

/// Tries sources in fixed priority order and accepts the first value
/// that passes the sanity-range check.
///
/// On success the source identifier and timestamp are persisted for
/// diagnostics; these writes are observability only and are never
/// consulted by resolution logic, so a failure to record them is
/// logged and swallowed.
pub struct FetchOrchestrator {
    sources: Vec<Arc<dyn RateSource>>,
    store: Arc<dyn OptionStore>,
}

impl FetchOrchestrator {
    pub fn new(mut sources: Vec<Arc<dyn RateSource>>, store: Arc<dyn OptionStore>) -> Self {
        sources.sort_by_key(|s| s.priority());
        Self { sources, store }
    }

    /// Returns the first in-range rate from the source chain, or
    /// [`RateError::AllSourcesFailed`] when every source fails.
    pub async fn fetch_best_rate(&self, now: DateTime<Utc>) -> Result<FetchedRate> {
        self.record(keys::LAST_FETCH_ATTEMPT, &now.to_rfc3339());

        for source in &self.sources {
            match source.fetch_rate().await {
                Ok(rate) if is_within_bounds(rate) => {
                    info!("Fetched rate {} from source '{}'", rate, source.id());
                    self.record(keys::LAST_SUCCESSFUL_SOURCE, source.id());
                    return Ok(FetchedRate {
                        rate,
                        source: source.id(),
                        fetched_at: now,
                    });
                }
                // Sources validate their own payloads; this guards
                // against an implementation that forgets to.
                Ok(rate) => {
                    warn!(
                        "Source '{}' returned out-of-range rate {}, trying next",
                        source.id(),
                        rate
                    );
                }
                Err(e) => {
                    warn!("Source '{}' unavailable: {}, trying next", source.id(), e);
                }
            }
        }

        Err(RateError::AllSourcesFailed)
    }

    fn record(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!("Failed to record diagnostic '{}': {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceError;
    use crate::store::MemoryOptionStore;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        id: &'static str,
        priority: u8,
        result: std::result::Result<Decimal, ()>,
        call_count: AtomicUsize,
    }

    impl StubSource {
        fn ok(id: &'static str, priority: u8, rate: Decimal) -> Arc<Self> {
            Arc::new(Self {
                id,
                priority,
                result: Ok(rate),
                call_count: AtomicUsize::new(0),
            })
        }

        fn failing(id: &'static str, priority: u8) -> Arc<Self> {
            Arc::new(Self {
                id,
                priority,
                result: Err(()),
                call_count: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for StubSource {
        fn id(&self) -> &'static str {
            self.id
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        async fn fetch_rate(&self) -> std::result::Result<Decimal, SourceError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(rate) => Ok(*rate),
                Err(()) => Err(SourceError::InvalidPayload("stub failure".to_string())),
            }
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-06-10T21:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn first_successful_source_wins() {
        let primary = StubSource::ok("PRIMARY", 1, dec!(110.25));
        let secondary = StubSource::ok("SECONDARY", 2, dec!(111.00));
        let store = Arc::new(MemoryOptionStore::new());
        let orchestrator =
            FetchOrchestrator::new(vec![primary.clone(), secondary.clone()], store);

        let fetched = orchestrator.fetch_best_rate(now()).await.unwrap();
        assert_eq!(fetched.rate, dec!(110.25));
        assert_eq!(fetched.source, "PRIMARY");
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn priority_order_beats_registration_order() {
        let secondary = StubSource::ok("SECONDARY", 2, dec!(111.00));
        let primary = StubSource::ok("PRIMARY", 1, dec!(110.25));
        let store = Arc::new(MemoryOptionStore::new());
        // Registered out of order on purpose.
        let orchestrator = FetchOrchestrator::new(vec![secondary, primary], store);

        let fetched = orchestrator.fetch_best_rate(now()).await.unwrap();
        assert_eq!(fetched.source, "PRIMARY");
    }

    #[tokio::test]
    async fn failed_primary_falls_back_to_secondary() {
        let primary = StubSource::failing("PRIMARY", 1);
        let secondary = StubSource::ok("SECONDARY", 2, dec!(111.00));
        let store = Arc::new(MemoryOptionStore::new());
        let orchestrator = FetchOrchestrator::new(vec![primary.clone(), secondary], store);

        let fetched = orchestrator.fetch_best_rate(now()).await.unwrap();
        assert_eq!(fetched.rate, dec!(111.00));
        assert_eq!(fetched.source, "SECONDARY");
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn out_of_range_rate_is_not_accepted() {
        let bogus = StubSource::ok("BOGUS", 1, dec!(55.5));
        let sane = StubSource::ok("SANE", 2, dec!(126.35));
        let store = Arc::new(MemoryOptionStore::new());
        let orchestrator = FetchOrchestrator::new(vec![bogus, sane], store);

        let fetched = orchestrator.fetch_best_rate(now()).await.unwrap();
        assert_eq!(fetched.rate, dec!(126.35));
        assert_eq!(fetched.source, "SANE");
    }

    #[tokio::test]
    async fn all_failures_report_all_sources_failed() {
        let primary = StubSource::failing("PRIMARY", 1);
        let secondary = StubSource::failing("SECONDARY", 2);
        let store = Arc::new(MemoryOptionStore::new());
        let orchestrator = FetchOrchestrator::new(vec![primary, secondary], store);

        let err = orchestrator.fetch_best_rate(now()).await.unwrap_err();
        assert!(matches!(err, RateError::AllSourcesFailed));
    }

    #[tokio::test]
    async fn records_provenance_on_success() {
        let primary = StubSource::ok("PRIMARY", 1, dec!(110.25));
        let store = Arc::new(MemoryOptionStore::new());
        let orchestrator = FetchOrchestrator::new(vec![primary], store.clone());

        orchestrator.fetch_best_rate(now()).await.unwrap();

        assert_eq!(
            store.get(keys::LAST_SUCCESSFUL_SOURCE).unwrap().as_deref(),
            Some("PRIMARY")
        );
        assert!(store.get(keys::LAST_FETCH_ATTEMPT).unwrap().is_some());
    }

    #[tokio::test]
    async fn records_attempt_even_when_all_fail() {
        let primary = StubSource::failing("PRIMARY", 1);
        let store = Arc::new(MemoryOptionStore::new());
        let orchestrator = FetchOrchestrator::new(vec![primary], store.clone());

        let _ = orchestrator.fetch_best_rate(now()).await;

        assert!(store.get(keys::LAST_FETCH_ATTEMPT).unwrap().is_some());
        assert_eq!(store.get(keys::LAST_SUCCESSFUL_SOURCE).unwrap(), None);
    }
}
