//! Error types for rate resolution.
//!
//! Two layers mirror the two failure boundaries of the system:
//! [`SourceError`] for a single rate source (recovered locally by trying
//! the next source, never surfaced to storefront callers) and
//! [`RateError`] for operations on the engine and its backing store.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our RateError type.
pub type Result<T> = std::result::Result<T, RateError>;

/// Errors from engine-level operations.
#[derive(Error, Debug)]
pub enum RateError {
    /// The backing option store failed. Storage-specific errors are
    /// carried in string form to keep this type storage-agnostic.
    #[error("Option store operation failed: {0}")]
    Store(String),

    /// Every configured rate source failed or returned an out-of-range
    /// value. The resolution engine recovers from this by falling back
    /// to the stale cache or the configured fallback rate.
    #[error("All rate sources failed")]
    AllSourcesFailed,
}

/// Failure of a single rate source.
///
/// The orchestrator treats all variants uniformly as "source
/// unavailable"; the distinction exists only for logging.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unparseable payload: {0}")]
    InvalidPayload(String),

    #[error("Rate {0} outside accepted range")]
    OutOfRange(Decimal),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn source_error_display() {
        let err = SourceError::InvalidPayload("no matching field".to_string());
        assert_eq!(format!("{}", err), "Unparseable payload: no matching field");

        let err = SourceError::OutOfRange(dec!(55.5));
        assert_eq!(format!("{}", err), "Rate 55.5 outside accepted range");
    }

    #[test]
    fn rate_error_display() {
        assert_eq!(
            format!("{}", RateError::AllSourcesFailed),
            "All rate sources failed"
        );
        assert_eq!(
            format!("{}", RateError::Store("disk full".to_string())),
            "Option store operation failed: disk full"
        );
    }
}
