use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use vesrate_core::models::{RateRecord, RefreshFailure};
use vesrate_core::store::keys;
use vesrate_core::temporal::now_in_caracas;
use vesrate_core::{convert_usd_to_ves, format_ves, RateOrigin};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateResponse {
    rate: Decimal,
    origin: RateOrigin,
    formatted: String,
}

/// Storefront endpoint: always yields a rate, never a fetch error.
async fn get_rate(State(state): State<Arc<AppState>>) -> ApiResult<Json<RateResponse>> {
    let resolved = state.resolver.resolve(now_in_caracas(Utc::now())).await?;
    Ok(Json(RateResponse {
        rate: resolved.rate,
        origin: resolved.origin,
        formatted: format_ves(resolved.rate),
    }))
}

#[derive(Deserialize)]
struct ConvertParams {
    amount: Decimal,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertResponse {
    amount: Decimal,
    rate: Decimal,
    converted: Decimal,
    formatted: String,
}

async fn convert(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConvertParams>,
) -> ApiResult<Json<ConvertResponse>> {
    let resolved = state.resolver.resolve(now_in_caracas(Utc::now())).await?;
    let converted = convert_usd_to_ves(params.amount, resolved.rate);
    Ok(Json(ConvertResponse {
        amount: params.amount,
        rate: resolved.rate,
        converted,
        formatted: format_ves(converted),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    rate: Decimal,
    formatted: String,
    effective_date: chrono::NaiveDate,
    fetched_at: chrono::DateTime<Utc>,
}

/// Admin endpoint: synchronous fetch regardless of schedule. Requires
/// the configured admin token; with no token configured the endpoint
/// is disabled.
async fn force_refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let expected = state.admin_token.as_deref().ok_or(ApiError::Unauthorized)?;
    let presented = headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    if presented != expected {
        return Err(ApiError::Unauthorized);
    }

    let record = state
        .resolver
        .force_refresh(now_in_caracas(Utc::now()))
        .await?;
    Ok(Json(RefreshResponse {
        rate: record.rate,
        formatted: format_ves(record.rate),
        effective_date: record.effective_date,
        fetched_at: record.recorded_at,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticsResponse {
    current_record: Option<RateRecord>,
    last_successful_source: Option<String>,
    last_fetch_attempt: Option<String>,
    last_refresh_failure: Option<RefreshFailure>,
}

async fn diagnostics(State(state): State<Arc<AppState>>) -> ApiResult<Json<DiagnosticsResponse>> {
    let current_record = state
        .store
        .get(keys::RATE_RECORD)?
        .and_then(|raw| serde_json::from_str(&raw).ok());
    let last_refresh_failure = state
        .store
        .get(keys::LAST_REFRESH_FAILURE)?
        .and_then(|raw| serde_json::from_str(&raw).ok());

    Ok(Json(DiagnosticsResponse {
        current_record,
        last_successful_source: state.store.get(keys::LAST_SUCCESSFUL_SOURCE)?,
        last_fetch_attempt: state.store.get(keys::LAST_FETCH_ATTEMPT)?,
        last_refresh_failure,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rate", get(get_rate))
        .route("/rate/convert", get(convert))
        .route("/rate/refresh", post(force_refresh))
        .route("/rate/diagnostics", get(diagnostics))
}
