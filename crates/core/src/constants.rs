//! Domain constants shared across the crate.

use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// The fixed operating timezone. Every calendar decision (rest days,
/// effective dates, scan/apply cut-overs) is made in Caracas time,
/// never in server-local time.
pub const VENEZUELA_TZ: Tz = chrono_tz::America::Caracas;

/// Lower sanity bound for an accepted USD/VES rate.
pub const MIN_VALID_RATE: Decimal = dec!(80);

/// Upper sanity bound for an accepted USD/VES rate.
pub const MAX_VALID_RATE: Decimal = dec!(300);

/// Rate used when no source, cache, or override yields a value.
/// Administrator-trusted, not range-checked.
pub const DEFAULT_FALLBACK_RATE: Decimal = dec!(126);

/// Returns true when `rate` lies inside the accepted sanity range.
pub fn is_within_bounds(rate: Decimal) -> bool {
    rate >= MIN_VALID_RATE && rate <= MAX_VALID_RATE
}
