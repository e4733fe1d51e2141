//! Core types and shared functionality for inkwell.
//!
//! This crate provides:
//! - Category and post models with list filters
//! - Partitioned list cache with coarse invalidation
//! - Session-scoped notification queue
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
mod lock;
pub mod model;
pub mod notify;

pub use cache::{FilterKey, Invalidator, ListCache, Mutation};
pub use config::{AppConfig, FetchPolicy};
pub use error::Error;
pub use notify::{Notification, NotificationQueue, Severity};
