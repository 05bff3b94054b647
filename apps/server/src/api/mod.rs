use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;

mod rates;
mod settings;

async fn health() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(rates::router())
        .merge(settings::router())
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
