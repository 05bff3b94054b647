//! Abstract key/value option storage.
//!
//! The engine persists its cached rate and reads its configuration
//! through this trait. Concrete backends live outside this crate
//! (the `storage-sqlite` crate provides the production one); the
//! in-memory implementation here backs tests.

mod memory;

pub use memory::MemoryOptionStore;

use crate::errors::Result;

/// Well-known option keys.
///
/// Administrator-owned configuration is read-only to the core and
/// mutated only through the admin surface; derived state is owned by
/// the core and read by the diagnostics surface.
pub mod keys {
    // Administrator-owned configuration
    pub const OPERATING_MODE: &str = "bcv_operating_mode";
    pub const MANUAL_RATE: &str = "bcv_manual_rate";
    pub const FALLBACK_RATE: &str = "bcv_fallback_rate";
    pub const REST_DAY_ENABLED: &str = "bcv_rest_day_enabled";
    pub const REST_DAY_RATE: &str = "bcv_rest_day_rate";
    pub const SCAN_TIME: &str = "bcv_scan_time";
    pub const APPLY_TIME: &str = "bcv_apply_time";
    /// Storefront display preference. Carried for the admin surface,
    /// never consulted by the resolution engine.
    pub const DISPLAY_MODE: &str = "bcv_display_mode";

    // Core-owned derived state
    pub const RATE_RECORD: &str = "bcv_rate_record";
    pub const LAST_SUCCESSFUL_SOURCE: &str = "bcv_last_successful_source";
    pub const LAST_FETCH_ATTEMPT: &str = "bcv_last_fetch_attempt";
    pub const LAST_REFRESH_FAILURE: &str = "bcv_last_refresh_failure";
}

/// Get/set-by-key storage over named string values.
///
/// Writes are last-write-wins with eventual-consistency semantics
/// across concurrent readers; the refresh cadence is at most daily,
/// so divergence windows are negligible.
pub trait OptionStore: Send + Sync {
    /// Read a value. Returns `None` when the key has never been set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
