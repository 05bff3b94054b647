//! Administrator-owned configuration.
//!
//! The engine re-reads this snapshot from the option store on every
//! resolution call, so admin edits take effect immediately. Parsing is
//! deliberately lenient: an unparsable stored value logs a warning and
//! falls back to the default rather than failing a storefront request.

use chrono::NaiveTime;
use log::warn;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::DEFAULT_FALLBACK_RATE;
use crate::errors::Result;
use crate::store::{keys, OptionStore};

/// How the current rate is decided.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperatingMode {
    /// A single administrator-configured rate; fetch and cache are
    /// bypassed entirely.
    Manual,
    /// The full resolution engine: scheduled fetches, cache, staleness
    /// recovery.
    Automatic,
}

impl OperatingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Manual => "manual",
            OperatingMode::Automatic => "automatic",
        }
    }

    /// Unknown strings parse as `Automatic`, the safe default.
    pub fn parse(value: &str) -> Self {
        match value {
            "manual" => OperatingMode::Manual,
            _ => OperatingMode::Automatic,
        }
    }
}

/// A separate fixed rate applied on designated rest days
/// (Saturday/Sunday in Caracas) while in automatic mode.
#[derive(Clone, Debug, PartialEq)]
pub struct RestDayOverride {
    pub enabled: bool,
    pub rate: Option<Decimal>,
}

impl RestDayOverride {
    /// The override only takes effect with a positive configured rate.
    pub fn effective_rate(&self) -> Option<Decimal> {
        if !self.enabled {
            return None;
        }
        self.rate.filter(|r| *r > Decimal::ZERO)
    }
}

/// When to scan for a new rate and when a scanned rate becomes active.
///
/// A rate scanned in the evening is published for the following
/// calendar day but only takes effect after the apply cut-over (e.g.
/// scanned 21:00, active from 00:30 the next day).
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleConfig {
    pub scan_time: NaiveTime,
    pub apply_time: NaiveTime,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            scan_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            apply_time: NaiveTime::from_hms_opt(0, 30, 0).unwrap(),
        }
    }
}

/// Snapshot of all administrator-owned configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ConverterSettings {
    pub operating_mode: OperatingMode,
    pub manual_rate: Option<Decimal>,
    pub fallback_rate: Decimal,
    pub rest_day: RestDayOverride,
    pub schedule: ScheduleConfig,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            operating_mode: OperatingMode::Automatic,
            manual_rate: None,
            fallback_rate: DEFAULT_FALLBACK_RATE,
            rest_day: RestDayOverride {
                enabled: false,
                rate: None,
            },
            schedule: ScheduleConfig::default(),
        }
    }
}

impl ConverterSettings {
    /// Loads the settings snapshot from the option store.
    ///
    /// Only store failures propagate; missing or malformed values fall
    /// back to defaults.
    pub fn load(store: &dyn OptionStore) -> Result<Self> {
        let defaults = ConverterSettings::default();

        let operating_mode = store
            .get(keys::OPERATING_MODE)?
            .map(|v| OperatingMode::parse(&v))
            .unwrap_or(defaults.operating_mode);

        let manual_rate = parse_decimal(store.get(keys::MANUAL_RATE)?, keys::MANUAL_RATE);

        let fallback_rate = parse_decimal(store.get(keys::FALLBACK_RATE)?, keys::FALLBACK_RATE)
            .unwrap_or(defaults.fallback_rate);

        let rest_day = RestDayOverride {
            enabled: store
                .get(keys::REST_DAY_ENABLED)?
                .map(|v| v == "true" || v == "yes" || v == "1")
                .unwrap_or(false),
            rate: parse_decimal(store.get(keys::REST_DAY_RATE)?, keys::REST_DAY_RATE),
        };

        let schedule = ScheduleConfig {
            scan_time: parse_time(store.get(keys::SCAN_TIME)?, keys::SCAN_TIME)
                .unwrap_or(defaults.schedule.scan_time),
            apply_time: parse_time(store.get(keys::APPLY_TIME)?, keys::APPLY_TIME)
                .unwrap_or(defaults.schedule.apply_time),
        };

        Ok(ConverterSettings {
            operating_mode,
            manual_rate,
            fallback_rate,
            rest_day,
            schedule,
        })
    }
}

fn parse_decimal(value: Option<String>, key: &str) -> Option<Decimal> {
    let raw = value?;
    if raw.is_empty() {
        return None;
    }
    match Decimal::from_str(&raw) {
        Ok(d) => Some(d),
        Err(e) => {
            warn!("Ignoring unparsable value '{}' for '{}': {}", raw, key, e);
            None
        }
    }
}

fn parse_time(value: Option<String>, key: &str) -> Option<NaiveTime> {
    let raw = value?;
    match NaiveTime::parse_from_str(&raw, "%H:%M") {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("Ignoring unparsable time '{}' for '{}': {}", raw, key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryOptionStore;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_when_store_is_empty() {
        let store = MemoryOptionStore::new();
        let settings = ConverterSettings::load(&store).unwrap();

        assert_eq!(settings.operating_mode, OperatingMode::Automatic);
        assert_eq!(settings.manual_rate, None);
        assert_eq!(settings.fallback_rate, dec!(126));
        assert!(!settings.rest_day.enabled);
        assert_eq!(
            settings.schedule.scan_time,
            NaiveTime::from_hms_opt(21, 0, 0).unwrap()
        );
        assert_eq!(
            settings.schedule.apply_time,
            NaiveTime::from_hms_opt(0, 30, 0).unwrap()
        );
    }

    #[test]
    fn loads_configured_values() {
        let store = MemoryOptionStore::new();
        store.set(keys::OPERATING_MODE, "manual").unwrap();
        store.set(keys::MANUAL_RATE, "45.50").unwrap();
        store.set(keys::FALLBACK_RATE, "130").unwrap();
        store.set(keys::REST_DAY_ENABLED, "true").unwrap();
        store.set(keys::REST_DAY_RATE, "50.00").unwrap();
        store.set(keys::SCAN_TIME, "20:30").unwrap();
        store.set(keys::APPLY_TIME, "01:00").unwrap();

        let settings = ConverterSettings::load(&store).unwrap();
        assert_eq!(settings.operating_mode, OperatingMode::Manual);
        assert_eq!(settings.manual_rate, Some(dec!(45.50)));
        assert_eq!(settings.fallback_rate, dec!(130));
        assert_eq!(settings.rest_day.effective_rate(), Some(dec!(50.00)));
        assert_eq!(
            settings.schedule.scan_time,
            NaiveTime::from_hms_opt(20, 30, 0).unwrap()
        );
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let store = MemoryOptionStore::new();
        store.set(keys::MANUAL_RATE, "not-a-number").unwrap();
        store.set(keys::FALLBACK_RATE, "??").unwrap();
        store.set(keys::SCAN_TIME, "25:99").unwrap();

        let settings = ConverterSettings::load(&store).unwrap();
        assert_eq!(settings.manual_rate, None);
        assert_eq!(settings.fallback_rate, dec!(126));
        assert_eq!(
            settings.schedule.scan_time,
            NaiveTime::from_hms_opt(21, 0, 0).unwrap()
        );
    }

    #[test]
    fn disabled_rest_day_has_no_effective_rate() {
        let override_ = RestDayOverride {
            enabled: false,
            rate: Some(dec!(50)),
        };
        assert_eq!(override_.effective_rate(), None);

        let override_ = RestDayOverride {
            enabled: true,
            rate: Some(dec!(0)),
        };
        assert_eq!(override_.effective_rate(), None);
    }

    #[test]
    fn unknown_mode_parses_as_automatic() {
        assert_eq!(OperatingMode::parse("weird"), OperatingMode::Automatic);
        assert_eq!(OperatingMode::parse("manual"), OperatingMode::Manual);
    }
}
