//! Core types and trait definitions for the Marquee user-sync service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod event;
pub mod reconcile;
pub mod store;
pub mod user;

pub use error::{Error, Result};
