//! SQLite backend for the Marquee user store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Upsert-by-key is expressed with
//! `INSERT … ON CONFLICT DO UPDATE`, which gives the reconciler its
//! idempotence guarantee.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
