//! Secondary rate source: scraping the BCV reference-rate page.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::is_within_bounds;
use crate::errors::SourceError;
use crate::source::RateSource;

const SOURCE_ID: &str = "BCV_WEB";

const ENDPOINT: &str = "https://www.bcv.org.ve/estadisticas/tipo-cambio-de-referencia-smc";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// The page serves different markup to non-browser agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

lazy_static! {
    /// Currency-amount tokens near recognizable currency markers,
    /// tried in order. The page publishes the rate next to a "USD"
    /// label; older revisions spelled out "dólar".
    static ref RATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)USD[^\d]*(\d{2,4}[,.]?\d{0,8})").unwrap(),
        Regex::new(r"(?i)dólar[^\d]*(\d{2,4}[,.]?\d{0,8})").unwrap(),
    ];
}

/// Extracts the first in-range rate from the page body.
///
/// The page uses a decimal comma, so the captured token is normalized
/// before parsing. A pattern whose match parses out of range does not
/// win; the next pattern is tried.
fn extract_rate(body: &str) -> Option<Decimal> {
    for pattern in RATE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(body) {
            let token = captures.get(1)?.as_str().replace(',', ".");
            if let Ok(rate) = Decimal::from_str(&token) {
                if is_within_bounds(rate) {
                    return Some(rate);
                }
            }
        }
    }
    None
}

/// Secondary source: pattern extraction from the BCV statistics page.
pub struct BcvWebSource {
    client: Client,
}

impl BcvWebSource {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl Default for BcvWebSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for BcvWebSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    async fn fetch_rate(&self) -> Result<Decimal, SourceError> {
        // Repeated per request so the timeout bound and the browser
        // agent survive a fallback to a default client.
        let body = self
            .client
            .get(ENDPOINT)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_rate(&body)
            .ok_or_else(|| SourceError::InvalidPayload("no rate found in page".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn extracts_rate_next_to_usd_marker() {
        let body = r#"<div class="field-content"><span> USD </span><strong> 113,95120000 </strong></div>"#;
        assert_eq!(extract_rate(body), Some(dec!(113.95120000)));
    }

    #[test]
    fn extracts_rate_with_decimal_point() {
        let body = "Tipo de Cambio de Referencia USD = 126.35";
        assert_eq!(extract_rate(body), Some(dec!(126.35)));
    }

    #[test]
    fn falls_back_to_dolar_marker() {
        let body = "tasa oficial del dólar: 245,10 Bs.";
        assert_eq!(extract_rate(body), Some(dec!(245.10)));
    }

    #[test]
    fn rejects_out_of_range_matches() {
        // A year number near a USD marker must not be mistaken for a rate.
        let body = "USD statistics for 2024";
        assert_eq!(extract_rate(body), None);
    }

    #[test]
    fn no_marker_yields_none() {
        let body = "<html><body>Sin datos disponibles</body></html>";
        assert_eq!(extract_rate(body), None);
    }

    #[test]
    fn source_identity() {
        let source = BcvWebSource::new();
        assert_eq!(source.id(), "BCV_WEB");
        assert_eq!(source.priority(), 2);
    }
}
