//! Client code for inkwell.
//!
//! This crate provides the remote content API contract, its GraphQL-over-HTTP
//! implementation, and the query orchestrator that serves list reads through the
//! partitioned cache.

pub mod api;
pub mod graphql;
pub mod orchestrator;

pub use api::{RemoteApi, Resource};
pub use graphql::{GraphQlClient, GraphQlConfig};
pub use orchestrator::{Store, ViewScope};
