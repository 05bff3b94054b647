//! Key-value option persistence.

mod model;
mod repository;

pub use model::PluginOptionDB;
pub use repository::SqliteOptionStore;
