//! Remote content API contract.
//!
//! The orchestrator only talks to this trait; [`crate::GraphQlClient`] is the
//! HTTP implementation.

use async_trait::async_trait;
use futures::future::BoxFuture;
use inkwell_core::Error;
use inkwell_core::cache::Cached;
use inkwell_core::model::{
    Category, CategoryFilter, CreateCategory, CreatePost, Post, PostFilter, UpdateCategory, UpdatePost,
};

/// Query and mutation operations exposed by the content API.
///
/// Single-item lookups return `Ok(None)` when the target does not exist.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn list_categories(&self, filter: Option<&CategoryFilter>) -> Result<Vec<Category>, Error>;
    async fn get_category(&self, id: &str) -> Result<Option<Category>, Error>;
    async fn create_category(&self, data: &CreateCategory) -> Result<Category, Error>;
    async fn update_category(&self, id: &str, data: &UpdateCategory) -> Result<Category, Error>;
    async fn delete_category(&self, id: &str) -> Result<bool, Error>;

    async fn list_posts(&self, filter: Option<&PostFilter>) -> Result<Vec<Post>, Error>;
    async fn get_post(&self, id: &str) -> Result<Option<Post>, Error>;
    async fn create_post(&self, data: &CreatePost) -> Result<Post, Error>;
    async fn update_post(&self, id: &str, data: &UpdatePost) -> Result<Post, Error>;
    async fn delete_post(&self, id: &str) -> Result<bool, Error>;

    /// Liveness check.
    async fn ping(&self) -> Result<String, Error>;
}

/// Cached entities with a list operation on [`RemoteApi`].
pub trait Resource: Cached {
    fn validate_filter(filter: &Self::Filter) -> Result<(), Error>;

    fn list<'a>(api: &'a dyn RemoteApi, filter: Option<&'a Self::Filter>) -> BoxFuture<'a, Result<Vec<Self>, Error>>;
}

impl Resource for Category {
    fn validate_filter(filter: &CategoryFilter) -> Result<(), Error> {
        filter.validate()
    }

    fn list<'a>(api: &'a dyn RemoteApi, filter: Option<&'a CategoryFilter>) -> BoxFuture<'a, Result<Vec<Self>, Error>> {
        api.list_categories(filter)
    }
}

impl Resource for Post {
    fn validate_filter(filter: &PostFilter) -> Result<(), Error> {
        filter.validate()
    }

    fn list<'a>(api: &'a dyn RemoteApi, filter: Option<&'a PostFilter>) -> BoxFuture<'a, Result<Vec<Self>, Error>> {
        api.list_posts(filter)
    }
}
