//! # journal-core
//!
//! Core types, traits, and filter logic for the stock trading journal.
//!
//! This crate provides the data model shared by the server and the client,
//! the date normalization rules, the listing predicate, and the repository
//! traits that the storage backends implement.

pub mod dates;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use dates::{normalize_date, today_string, DateRange};
pub use error::{Error, Result};
pub use filter::{ChartFilterParams, ChartPredicate};
pub use models::*;
pub use traits::*;

/// Generate a time-ordered UUIDv7.
pub fn new_v7() -> uuid::Uuid {
    uuid::Uuid::now_v7()
}
