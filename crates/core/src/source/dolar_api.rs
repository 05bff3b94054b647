//! Primary rate source: the DolarApi JSON endpoint.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use crate::constants::is_within_bounds;
use crate::errors::SourceError;
use crate::source::RateSource;

const SOURCE_ID: &str = "DOLAR_API";

const ENDPOINT: &str = "https://ve.dolarapi.com/v1/dolares/oficial";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("vesrate/", env!("CARGO_PKG_VERSION"));

/// Response shape of the official-dollar endpoint.
///
/// The provider has exposed the rate under different field names over
/// time; the first populated field wins, in this priority order.
#[derive(Debug, Deserialize)]
struct OfficialDollarPayload {
    promedio: Option<Decimal>,
    precio: Option<Decimal>,
    compra: Option<Decimal>,
}

impl OfficialDollarPayload {
    fn rate(&self) -> Option<Decimal> {
        self.promedio
            .or(self.precio)
            .or(self.compra)
            .filter(|r| *r > Decimal::ZERO)
    }
}

/// Primary source: official USD/VES reference rate via DolarApi.
pub struct DolarApiSource {
    client: Client,
}

impl DolarApiSource {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl Default for DolarApiSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for DolarApiSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    async fn fetch_rate(&self) -> Result<Decimal, SourceError> {
        // Timeout and agent are repeated per request so the bound
        // holds even if the configured builder was unavailable and
        // construction fell back to a default client.
        let payload: OfficialDollarPayload = self
            .client
            .get(ENDPOINT)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let rate = payload
            .rate()
            .ok_or_else(|| SourceError::InvalidPayload("no rate field in response".to_string()))?;

        if !is_within_bounds(rate) {
            return Err(SourceError::OutOfRange(rate));
        }

        Ok(rate)
    }
}
