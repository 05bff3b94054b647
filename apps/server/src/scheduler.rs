//! Background trigger for the nightly rate refresh.
//!
//! Ticks every minute, re-reading the configured scan time on each
//! iteration so a changed schedule takes effect immediately instead
//! of waiting out the old one. The refresh itself is idempotent, so
//! the trigger only has to be approximately on time, never exact.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::main_lib::AppState;
use vesrate_core::models::ConverterSettings;
use vesrate_core::temporal::now_in_caracas;
use vesrate_core::RefreshOutcome;

const TICK_SECS: u64 = 60;

/// Initial delay before the first tick, to let the server fully start.
const INITIAL_DELAY_SECS: u64 = 10;

pub fn start_refresh_scheduler(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Refresh scheduler started (1-minute tick)");

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut tick = interval(Duration::from_secs(TICK_SECS));
        let mut last_run: Option<NaiveDate> = None;

        loop {
            tick.tick().await;
            run_tick(&state, &mut last_run, now_in_caracas(Utc::now())).await;
        }
    });
}

/// Fires the refresh once per Caracas calendar date, at or after the
/// configured scan time. A failed refresh leaves the latch unset so
/// the next tick retries; a skip latches, since retrying a skip would
/// be busy work.
async fn run_tick(state: &Arc<AppState>, last_run: &mut Option<NaiveDate>, now: DateTime<Tz>) {
    let settings = match ConverterSettings::load(state.store.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Scheduler could not load settings: {}", e);
            return;
        }
    };

    let today = now.date_naive();

    if now.time() < settings.schedule.scan_time || *last_run == Some(today) {
        return;
    }

    info!("Running scheduled rate refresh");
    match state.resolver.run_scheduled_refresh(now).await {
        Ok(RefreshOutcome::Updated(record)) => {
            *last_run = Some(today);
            info!(
                "Scheduled refresh stored {} effective {}",
                record.rate, record.effective_date
            );
        }
        Ok(RefreshOutcome::Skipped(reason)) => {
            *last_run = Some(today);
            info!("Scheduled refresh skipped: {:?}", reason);
        }
        Ok(RefreshOutcome::Failed) => {
            warn!("Scheduled refresh failed, will retry on next tick");
        }
        Err(e) => {
            warn!("Scheduled refresh errored: {}", e);
        }
    }
}
