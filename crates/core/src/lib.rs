//! Vesrate Core - USD to VES rate resolution.
//!
//! This crate contains the rate-resolution engine for a storefront that
//! charges in Venezuelan bolivars at the official reference rate. It is
//! storage-agnostic: persistence happens through the [`store::OptionStore`]
//! trait, implemented by the `storage-sqlite` crate.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   RateResolver   |  (mode precedence, staleness recovery)
//! +------------------+
//!     |           |
//!     v           v
//! +---------+ +-------------------+
//! | RateCache| | FetchOrchestrator |  (priority fallback chain)
//! +---------+ +-------------------+
//!     |           |
//!     v           v
//! +-----------+ +------------+
//! | OptionStore| | RateSource |  (DolarApi, BcvWeb)
//! +-----------+ +------------+
//! ```
//!
//! All date arithmetic happens in the fixed America/Caracas timezone;
//! "now" is always injected so the temporal policy and the engine stay
//! deterministic and testable.

pub mod cache;
pub mod constants;
pub mod convert;
pub mod engine;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod source;
pub mod store;
pub mod temporal;

// Re-export the common types
pub use cache::RateCache;
pub use convert::{convert_usd_to_ves, format_ves};
pub use engine::{RateOrigin, RateResolver, RefreshOutcome, ResolvedRate, SkipReason};
pub use errors::{RateError, Result, SourceError};
pub use models::{
    ConverterSettings, OperatingMode, RateRecord, RefreshFailure, RestDayOverride, ScheduleConfig,
};
pub use orchestrator::{FetchOrchestrator, FetchedRate};
pub use source::{BcvWebSource, DolarApiSource, RateSource};
pub use store::{MemoryOptionStore, OptionStore};
