//! Query orchestration over the partitioned list cache.
//!
//! List reads follow a [`FetchPolicy`]. Every successful list fetch is written
//! through under its own filter key, unless the initiating [`ViewScope`] was closed
//! or the entity kind was invalidated while the fetch was in flight. Failures never
//! touch the cache. Single-item reads always go to the network.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use inkwell_core::cache::{CacheEvent, FilterKey, Invalidator, ListCache, Mutation};
use inkwell_core::model::{
    Category, CategoryFilter, CreateCategory, CreatePost, EntityKind, Post, PostFilter, UpdateCategory, UpdatePost,
};
use inkwell_core::{Error, FetchPolicy};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::api::{RemoteApi, Resource};

/// Liveness flag of the view that initiated a fetch.
///
/// Clones share the flag. Once closed, pending write-throughs for that view are skipped.
#[derive(Debug, Clone)]
pub struct ViewScope {
    alive: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self { alive: Arc::new(AtomicBool::new(true)) }
    }

    /// Mark the view as torn down.
    pub fn close(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Entry point for views: cached list reads, uncached lookups and invalidating mutations.
#[derive(Clone)]
pub struct Store {
    api: Arc<dyn RemoteApi>,
    cache: Arc<ListCache>,
    invalidator: Invalidator,
    default_policy: FetchPolicy,
}

impl Store {
    pub fn new(api: Arc<dyn RemoteApi>, cache: Arc<ListCache>, default_policy: FetchPolicy) -> Self {
        let invalidator = Invalidator::new(Arc::clone(&cache));
        Self { api, cache, invalidator, default_policy }
    }

    pub fn cache(&self) -> &Arc<ListCache> {
        &self.cache
    }

    pub fn default_policy(&self) -> FetchPolicy {
        self.default_policy
    }

    /// Cache writes and evictions, including those made by background refreshes.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.cache.subscribe()
    }

    /// Fetch a list of `T` matching `filter` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for malformed filters and the remote API's error
    /// otherwise. The cached partition is left as it was on failure.
    pub async fn fetch_list<T: Resource>(
        &self, filter: Option<T::Filter>, policy: FetchPolicy, scope: &ViewScope,
    ) -> Result<Vec<T>, Error> {
        if let Some(filter) = &filter {
            T::validate_filter(filter)?;
        }
        let key = FilterKey::encode(filter.as_ref())?;

        match policy {
            FetchPolicy::CacheFirst => {
                if let Some(partition) = self.cache.read::<T>(&key) {
                    debug!(kind = %T::KIND, key_digest = %key.digest(), version = partition.version, "cache hit");
                    return Ok(partition.items.to_vec());
                }
            }
            FetchPolicy::CacheAndNetwork => {
                if let Some(partition) = self.cache.read::<T>(&key) {
                    debug!(
                        kind = %T::KIND,
                        key_digest = %key.digest(),
                        version = partition.version,
                        "cache hit; refreshing"
                    );
                    self.spawn_refresh::<T>(key, filter, scope.clone());
                    return Ok(partition.items.to_vec());
                }
            }
            FetchPolicy::NetworkOnly => {}
        }

        debug!(kind = %T::KIND, key = %key, key_digest = %key.digest(), policy = %policy, "fetching from network");
        fetch_through::<T>(Arc::clone(&self.api), Arc::clone(&self.cache), key, filter, scope.clone()).await
    }

    pub async fn list_categories(&self, filter: Option<CategoryFilter>) -> Result<Vec<Category>, Error> {
        self.fetch_list(filter, self.default_policy, &ViewScope::new()).await
    }

    pub async fn list_posts(&self, filter: Option<PostFilter>) -> Result<Vec<Post>, Error> {
        self.fetch_list(filter, self.default_policy, &ViewScope::new()).await
    }

    /// Look up one category. Never cached.
    pub async fn get_category(&self, id: &str) -> Result<Option<Category>, Error> {
        require_id(id)?;
        self.api.get_category(id).await
    }

    /// Look up one post. Never cached.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, Error> {
        require_id(id)?;
        self.api.get_post(id).await
    }

    pub async fn create_category(&self, data: &CreateCategory) -> Result<Category, Error> {
        data.validate()?;
        let category = self.api.create_category(data).await?;
        self.invalidator.after_mutation(EntityKind::Category, Mutation::Create);
        Ok(category)
    }

    pub async fn update_category(&self, id: &str, data: &UpdateCategory) -> Result<Category, Error> {
        require_id(id)?;
        if data.is_empty() {
            return Err(Error::InvalidInput("update has no fields".to_string()));
        }
        let category = self.api.update_category(id, data).await?;
        self.invalidator.after_mutation(EntityKind::Category, Mutation::Update);
        Ok(category)
    }

    pub async fn delete_category(&self, id: &str) -> Result<bool, Error> {
        require_id(id)?;
        let deleted = self.api.delete_category(id).await?;
        self.invalidator.after_mutation(EntityKind::Category, Mutation::Delete);
        Ok(deleted)
    }

    pub async fn create_post(&self, data: &CreatePost) -> Result<Post, Error> {
        data.validate()?;
        let post = self.api.create_post(data).await?;
        self.invalidator.after_mutation(EntityKind::Post, Mutation::Create);
        Ok(post)
    }

    pub async fn update_post(&self, id: &str, data: &UpdatePost) -> Result<Post, Error> {
        require_id(id)?;
        if data.is_empty() {
            return Err(Error::InvalidInput("update has no fields".to_string()));
        }
        let post = self.api.update_post(id, data).await?;
        self.invalidator.after_mutation(EntityKind::Post, Mutation::Update);
        Ok(post)
    }

    pub async fn delete_post(&self, id: &str) -> Result<bool, Error> {
        require_id(id)?;
        let deleted = self.api.delete_post(id).await?;
        self.invalidator.after_mutation(EntityKind::Post, Mutation::Delete);
        Ok(deleted)
    }

    /// Liveness check against the remote API.
    pub async fn ping(&self) -> Result<String, Error> {
        self.api.ping().await
    }

    fn spawn_refresh<T: Resource>(&self, key: FilterKey, filter: Option<T::Filter>, scope: ViewScope) {
        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            if let Err(e) = fetch_through::<T>(api, cache, key.clone(), filter, scope).await {
                warn!(
                    kind = %T::KIND,
                    key_digest = %key.digest(),
                    code = e.code(),
                    error = %e,
                    "background refresh failed"
                );
            }
        });
    }
}

fn require_id(id: &str) -> Result<(), Error> {
    if id.is_empty() {
        return Err(Error::InvalidInput("id cannot be empty".to_string()));
    }
    Ok(())
}

/// Fetch and write through, honoring the scope and the kind's eviction generation.
async fn fetch_through<T: Resource>(
    api: Arc<dyn RemoteApi>, cache: Arc<ListCache>, key: FilterKey, filter: Option<T::Filter>, scope: ViewScope,
) -> Result<Vec<T>, Error> {
    let generation = cache.generation(T::KIND);

    let items = T::list(api.as_ref(), filter.as_ref()).await.inspect_err(|e| {
        debug!(kind = %T::KIND, key_digest = %key.digest(), code = e.code(), "list fetch failed; cache untouched");
    })?;

    if !scope.is_alive() {
        warn!(kind = %T::KIND, key_digest = %key.digest(), "view closed; write-through suppressed");
        return Ok(items);
    }

    if cache.write_if_current(key.clone(), items.clone(), generation).is_none() {
        warn!(kind = %T::KIND, key_digest = %key.digest(), "kind invalidated during fetch; write-through suppressed");
    }

    Ok(items)
}
