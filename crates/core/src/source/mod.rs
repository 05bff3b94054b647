//! Rate source abstractions and implementations.
//!
//! This module contains:
//! - The `RateSource` trait that all sources implement
//! - `DolarApiSource`: the primary JSON API source
//! - `BcvWebSource`: the secondary HTML-scraping source
//!
//! Sources validate their own payloads against the sanity range, so a
//! value that reaches the orchestrator is already plausible. Payload
//! extraction is factored out of the HTTP calls so it can be tested
//! against captured fixtures without a network.

mod bcv_web;
mod dolar_api;
mod traits;

pub use bcv_web::BcvWebSource;
pub use dolar_api::DolarApiSource;
pub use traits::RateSource;
