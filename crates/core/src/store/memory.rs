//! In-memory option store used by tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use super::OptionStore;
use crate::errors::{RateError, Result};

/// A process-local option store backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryOptionStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionStore for MemoryOptionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| RateError::Store(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| RateError::Store(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_none_for_unset_key() {
        let store = MemoryOptionStore::new();
        assert_eq!(store.get("bcv_rate_record").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = MemoryOptionStore::new();
        store.set("bcv_fallback_rate", "126").unwrap();
        store.set("bcv_fallback_rate", "130.50").unwrap();
        assert_eq!(
            store.get("bcv_fallback_rate").unwrap().as_deref(),
            Some("130.50")
        );
    }
}
