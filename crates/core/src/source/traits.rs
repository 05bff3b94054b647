//! The rate source trait.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::SourceError;

/// A single external USD/VES rate provider.
///
/// Implementations perform one bounded network call, parse a rate out
/// of the provider-specific payload shape, and validate it against the
/// sanity range before returning. All failure causes surface as a
/// uniform [`SourceError`]; the orchestrator does not distinguish them
/// beyond logging.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Stable identifier used for provenance and logging.
    fn id(&self) -> &'static str;

    /// Fixed ordering within the fallback chain. Lower values are
    /// tried first.
    fn priority(&self) -> u8 {
        10
    }

    /// Fetch and validate the current rate.
    async fn fetch_rate(&self) -> Result<Decimal, SourceError>;
}
