use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use vesrate_core::store::OptionStore;
use vesrate_core::{BcvWebSource, DolarApiSource, FetchOrchestrator, RateResolver, RateSource};
use vesrate_storage_sqlite::{create_pool, SqliteOptionStore};

pub struct AppState {
    pub resolver: Arc<RateResolver>,
    pub store: Arc<dyn OptionStore>,
    pub admin_token: Option<String>,
}

pub fn init_tracing() {
    let log_format = std::env::var("VESRATE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let pool = create_pool(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let store: Arc<dyn OptionStore> = Arc::new(SqliteOptionStore::new(Arc::new(pool)));

    let sources: Vec<Arc<dyn RateSource>> = vec![
        Arc::new(DolarApiSource::new()),
        Arc::new(BcvWebSource::new()),
    ];
    let orchestrator = FetchOrchestrator::new(sources, store.clone());
    let resolver = Arc::new(RateResolver::new(store.clone(), orchestrator));

    Ok(Arc::new(AppState {
        resolver,
        store,
        admin_token: config.admin_token.clone(),
    }))
}
