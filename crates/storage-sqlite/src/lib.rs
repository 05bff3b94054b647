//! SQLite storage implementation for the vesrate engine.
//!
//! This crate is the only place in the application where Diesel
//! dependencies exist. Everything else works against the
//! `vesrate_core::OptionStore` trait.
//!
//! ```text
//!   core (domain)
//!        │
//!        ▼
//!   storage-sqlite (this crate)
//!        │
//!        ▼
//!     SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod options;
pub mod schema;

pub use db::{create_pool, get_connection, run_migrations, DbConnection, DbPool};
pub use errors::StorageError;
pub use options::SqliteOptionStore;
