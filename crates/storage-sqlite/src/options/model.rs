//! Database model for plugin options.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for option key-value pairs.
#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::plugin_options)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptionDB {
    pub option_key: String,
    pub option_value: String,
}
