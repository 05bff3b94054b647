use diesel::prelude::*;
use std::sync::Arc;

use super::model::PluginOptionDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::plugin_options::dsl::*;
use vesrate_core::store::OptionStore;
use vesrate_core::Result;

/// `OptionStore` backed by the `plugin_options` table.
///
/// Writes are single-key upserts with last-write-wins semantics, so a
/// plain pooled connection suffices; no serialized writer is needed.
pub struct SqliteOptionStore {
    pool: Arc<DbPool>,
}

impl SqliteOptionStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SqliteOptionStore { pool }
    }
}

impl OptionStore for SqliteOptionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;

        let result = plugin_options
            .filter(option_key.eq(key))
            .select(option_value)
            .first::<String>(&mut conn);

        match result {
            Ok(value) => Ok(Some(value)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        diesel::replace_into(plugin_options)
            .values(&PluginOptionDB {
                option_key: key.to_string(),
                option_value: value.to_string(),
            })
            .execute(&mut conn)
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use tempfile::TempDir;
    use vesrate_core::store::keys;

    fn test_store() -> (TempDir, SqliteOptionStore) {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("options.db");
        let pool = create_pool(db_path.to_str().unwrap()).unwrap();
        (dir, SqliteOptionStore::new(Arc::new(pool)))
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (_dir, store) = test_store();
        assert_eq!(store.get(keys::MANUAL_RATE).unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let (_dir, store) = test_store();
        store.set(keys::MANUAL_RATE, "45.50").unwrap();
        assert_eq!(
            store.get(keys::MANUAL_RATE).unwrap().as_deref(),
            Some("45.50")
        );
    }

    #[test]
    fn set_overwrites_existing_value() {
        let (_dir, store) = test_store();
        store.set(keys::OPERATING_MODE, "automatic").unwrap();
        store.set(keys::OPERATING_MODE, "manual").unwrap();
        assert_eq!(
            store.get(keys::OPERATING_MODE).unwrap().as_deref(),
            Some("manual")
        );
    }

    #[test]
    fn keys_are_independent() {
        let (_dir, store) = test_store();
        store.set(keys::FALLBACK_RATE, "126").unwrap();
        store.set(keys::REST_DAY_RATE, "118").unwrap();
        assert_eq!(
            store.get(keys::FALLBACK_RATE).unwrap().as_deref(),
            Some("126")
        );
        assert_eq!(
            store.get(keys::REST_DAY_RATE).unwrap().as_deref(),
            Some("118")
        );
    }

    #[test]
    fn values_survive_reconnection() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("options.db");
        {
            let pool = create_pool(db_path.to_str().unwrap()).unwrap();
            let store = SqliteOptionStore::new(Arc::new(pool));
            store.set(keys::RATE_RECORD, r#"{"rate":"110.25"}"#).unwrap();
        }

        let pool = create_pool(db_path.to_str().unwrap()).unwrap();
        let store = SqliteOptionStore::new(Arc::new(pool));
        assert_eq!(
            store.get(keys::RATE_RECORD).unwrap().as_deref(),
            Some(r#"{"rate":"110.25"}"#)
        );
    }
}
