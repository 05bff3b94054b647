//! The rate-resolution engine.
//!
//! Decides, for an injected "now" in Caracas time, which rate the
//! storefront should charge. Operating-mode precedence, in strict
//! order: manual fixed rate, rest-day override, fresh cached rate,
//! staleness-triggered re-fetch, stale cached rate, configured
//! fallback. Every terminal path yields either an administrator-
//! trusted override or a previously validated in-range rate, so
//! storefront callers never see a fetch error.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono_tz::Tz;

use crate::cache::RateCache;
use crate::errors::{RateError, Result};
use crate::models::{ConverterSettings, OperatingMode, RateRecord, RefreshFailure};
use crate::orchestrator::FetchOrchestrator;
use crate::store::{keys, OptionStore};
use crate::temporal::{active_target_date, business_days_between, is_rest_day, scan_target_date};

/// Which precedence state produced a resolved rate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateOrigin {
    Manual,
    RestDayOverride,
    FreshCache,
    /// A staleness-triggered re-fetch succeeded.
    Refetched,
    StaleCache,
    Fallback,
}

/// A resolved rate plus its provenance, for diagnostics and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedRate {
    pub rate: Decimal,
    pub origin: RateOrigin,
}

impl ResolvedRate {
    fn new(rate: Decimal, origin: RateOrigin) -> Self {
        Self { rate, origin }
    }
}

/// Why a scheduled refresh did not fetch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    /// Operating mode is not automatic.
    ManualMode,
    /// Rest day with the rest-day override enabled.
    RestDay,
    /// Another fetch is already in flight in this process.
    FetchInFlight,
}

/// Outcome of a scheduled refresh run.
#[derive(Clone, Debug, PartialEq)]
pub enum RefreshOutcome {
    Updated(RateRecord),
    Skipped(SkipReason),
    /// Every source failed; a diagnostic failure record was written.
    Failed,
}

/// The top-level decision procedure.
///
/// Constructed once per process; the re-entrancy guard is explicit
/// instance state (process-local, not cross-process-synchronized:
/// duplicate fetches across processes are a benign inefficiency since
/// the orchestrator is idempotent and the cache is last-write-wins).
pub struct RateResolver {
    store: Arc<dyn OptionStore>,
    cache: RateCache,
    orchestrator: FetchOrchestrator,
    fetching: AtomicBool,
}

impl RateResolver {
    pub fn new(store: Arc<dyn OptionStore>, orchestrator: FetchOrchestrator) -> Self {
        Self {
            cache: RateCache::new(store.clone()),
            store,
            orchestrator,
            fetching: AtomicBool::new(false),
        }
    }

    /// Resolves the rate to charge at `now`.
    ///
    /// Only store failures surface as errors; source failures degrade
    /// through the precedence chain.
    pub async fn resolve(&self, now: DateTime<Tz>) -> Result<ResolvedRate> {
        let settings = ConverterSettings::load(self.store.as_ref())?;

        // Re-entrancy guard: a resolution triggered while a fetch is
        // already in flight must not start another one.
        if self.fetching.load(Ordering::SeqCst) {
            debug!("Fetch in flight, resolving to fallback rate");
            return Ok(ResolvedRate::new(settings.fallback_rate, RateOrigin::Fallback));
        }

        // 1. Manual mode bypasses fetch and cache entirely. An unset
        //    or non-positive manual rate is an invalid configuration
        //    and silently resolves to the fallback.
        if settings.operating_mode == OperatingMode::Manual {
            return match settings.manual_rate.filter(|r| *r > Decimal::ZERO) {
                Some(rate) => Ok(ResolvedRate::new(rate, RateOrigin::Manual)),
                None => {
                    warn!("Manual mode selected without a positive manual rate");
                    Ok(ResolvedRate::new(settings.fallback_rate, RateOrigin::Fallback))
                }
            };
        }

        // 2. Rest-day override.
        let today = now.date_naive();
        if is_rest_day(today) {
            if let Some(rate) = settings.rest_day.effective_rate() {
                return Ok(ResolvedRate::new(rate, RateOrigin::RestDayOverride));
            }
        }

        // 3. Fresh cache.
        let target = active_target_date(now, &settings.schedule);
        let record = self.cache.get_current()?;
        if let Some(record) = &record {
            if record.effective_date == target {
                return Ok(ResolvedRate::new(record.rate, RateOrigin::FreshCache));
            }
        }

        // 4. Staleness recovery: an unscheduled re-fetch once the
        //    cached rate has fallen at least one business day behind.
        if let Some(record) = &record {
            if business_days_between(record.effective_date, target) >= 1 && !is_rest_day(today) {
                if let Some(fetched) = self.guarded_fetch(now.with_timezone(&Utc)).await {
                    let stored = self.cache.set_current(fetched.rate, target, fetched.fetched_at)?;
                    info!(
                        "Staleness recovery fetched {} for {}",
                        stored.rate, stored.effective_date
                    );
                    return Ok(ResolvedRate::new(stored.rate, RateOrigin::Refetched));
                }
            }
        }

        // 5. Stale cache as last resort, then the fallback rate.
        match record {
            Some(record) => Ok(ResolvedRate::new(record.rate, RateOrigin::StaleCache)),
            None => Ok(ResolvedRate::new(settings.fallback_rate, RateOrigin::Fallback)),
        }
    }

    /// Entry point for the external scheduler. Idempotent and safe to
    /// invoke redundantly or out of schedule.
    pub async fn run_scheduled_refresh(&self, now: DateTime<Tz>) -> Result<RefreshOutcome> {
        let settings = ConverterSettings::load(self.store.as_ref())?;

        if settings.operating_mode != OperatingMode::Automatic {
            debug!("Scheduled refresh skipped: manual mode");
            return Ok(RefreshOutcome::Skipped(SkipReason::ManualMode));
        }

        let today = now.date_naive();
        if is_rest_day(today) && settings.rest_day.enabled {
            debug!("Scheduled refresh skipped: rest day override active");
            return Ok(RefreshOutcome::Skipped(SkipReason::RestDay));
        }

        // Scan now, apply later: the fetched rate is stored for the
        // date whose active window opens at the next apply instant.
        let target = scan_target_date(now, &settings.schedule);

        if self.fetching.swap(true, Ordering::SeqCst) {
            debug!("Scheduled refresh skipped: fetch already in flight");
            return Ok(RefreshOutcome::Skipped(SkipReason::FetchInFlight));
        }
        let fetched = self
            .orchestrator
            .fetch_best_rate(now.with_timezone(&Utc))
            .await;
        self.fetching.store(false, Ordering::SeqCst);

        match fetched {
            Ok(fetched) => {
                let record = self.cache.set_current(fetched.rate, target, fetched.fetched_at)?;
                info!(
                    "Scheduled refresh stored {} from '{}' for {}",
                    record.rate, fetched.source, record.effective_date
                );
                Ok(RefreshOutcome::Updated(record))
            }
            Err(RateError::AllSourcesFailed) => {
                self.record_refresh_failure(now)?;
                Ok(RefreshOutcome::Failed)
            }
            Err(e) => Err(e),
        }
    }

    /// Synchronous administrator-initiated refresh. Always fetches,
    /// regardless of staleness or schedule.
    ///
    /// The guard is only cleared by the call that set it, so a
    /// concurrent fetch's guard survives this one completing.
    pub async fn force_refresh(&self, now: DateTime<Tz>) -> Result<RateRecord> {
        let settings = ConverterSettings::load(self.store.as_ref())?;
        let target = scan_target_date(now, &settings.schedule);

        let already_fetching = self.fetching.swap(true, Ordering::SeqCst);
        let fetched = self
            .orchestrator
            .fetch_best_rate(now.with_timezone(&Utc))
            .await;
        if !already_fetching {
            self.fetching.store(false, Ordering::SeqCst);
        }

        let fetched = fetched?;
        self.cache.set_current(fetched.rate, target, fetched.fetched_at)
    }

    async fn guarded_fetch(&self, now: DateTime<Utc>) -> Option<crate::orchestrator::FetchedRate> {
        if self.fetching.swap(true, Ordering::SeqCst) {
            return None;
        }
        let fetched = self.orchestrator.fetch_best_rate(now).await;
        self.fetching.store(false, Ordering::SeqCst);

        match fetched {
            Ok(fetched) => Some(fetched),
            Err(e) => {
                warn!("Staleness recovery fetch failed: {}", e);
                None
            }
        }
    }

    fn record_refresh_failure(&self, now: DateTime<Tz>) -> Result<()> {
        let failure = RefreshFailure {
            date: now.date_naive(),
            time: now.time(),
            error: RateError::AllSourcesFailed.to_string(),
        };
        let json =
            serde_json::to_string(&failure).map_err(|e| RateError::Store(e.to_string()))?;
        self.store.set(keys::LAST_REFRESH_FAILURE, &json)
    }
}
