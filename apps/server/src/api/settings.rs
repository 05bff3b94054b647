use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use vesrate_core::models::ConverterSettings;
use vesrate_core::store::keys;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsView {
    operating_mode: String,
    manual_rate: Option<Decimal>,
    fallback_rate: Decimal,
    rest_day_enabled: bool,
    rest_day_rate: Option<Decimal>,
    scan_time: String,
    apply_time: String,
    display_mode: Option<String>,
}

async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<SettingsView>> {
    let settings = ConverterSettings::load(state.store.as_ref())?;
    let display_mode = state.store.get(keys::DISPLAY_MODE)?;

    Ok(Json(SettingsView {
        operating_mode: settings.operating_mode.as_str().to_string(),
        manual_rate: settings.manual_rate,
        fallback_rate: settings.fallback_rate,
        rest_day_enabled: settings.rest_day.enabled,
        rest_day_rate: settings.rest_day.rate,
        scan_time: settings.schedule.scan_time.format("%H:%M").to_string(),
        apply_time: settings.schedule.apply_time.format("%H:%M").to_string(),
        display_mode,
    }))
}

/// Partial update: only the provided fields are written.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsUpdate {
    operating_mode: Option<String>,
    manual_rate: Option<Decimal>,
    fallback_rate: Option<Decimal>,
    rest_day_enabled: Option<bool>,
    rest_day_rate: Option<Decimal>,
    scan_time: Option<String>,
    apply_time: Option<String>,
    display_mode: Option<String>,
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<SettingsView>> {
    if let Some(mode) = &update.operating_mode {
        if mode != "manual" && mode != "automatic" {
            return Err(ApiError::BadRequest(format!(
                "unknown operating mode '{}'",
                mode
            )));
        }
        state.store.set(keys::OPERATING_MODE, mode)?;
    }
    if let Some(rate) = update.manual_rate {
        require_positive("manualRate", rate)?;
        state.store.set(keys::MANUAL_RATE, &rate.to_string())?;
    }
    if let Some(rate) = update.fallback_rate {
        require_positive("fallbackRate", rate)?;
        state.store.set(keys::FALLBACK_RATE, &rate.to_string())?;
    }
    if let Some(enabled) = update.rest_day_enabled {
        state
            .store
            .set(keys::REST_DAY_ENABLED, if enabled { "true" } else { "false" })?;
    }
    if let Some(rate) = update.rest_day_rate {
        require_positive("restDayRate", rate)?;
        state.store.set(keys::REST_DAY_RATE, &rate.to_string())?;
    }
    if let Some(time) = &update.scan_time {
        require_time("scanTime", time)?;
        state.store.set(keys::SCAN_TIME, time)?;
    }
    if let Some(time) = &update.apply_time {
        require_time("applyTime", time)?;
        state.store.set(keys::APPLY_TIME, time)?;
    }
    if let Some(mode) = &update.display_mode {
        state.store.set(keys::DISPLAY_MODE, mode)?;
    }

    get_settings(State(state)).await
}

fn require_positive(field: &str, rate: Decimal) -> Result<(), ApiError> {
    if rate <= Decimal::ZERO {
        return Err(ApiError::BadRequest(format!(
            "{} must be positive, got {}",
            field, rate
        )));
    }
    Ok(())
}

fn require_time(field: &str, value: &str) -> Result<(), ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ApiError::BadRequest(format!("{} must be HH:MM, got '{}'", field, value)))?;
    Ok(())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}
