//! GraphQL-over-HTTP client for the content API.
//!
//! ### Specification
//!
//! - **Endpoint**: `POST {api_url}` with a JSON body `{ "query", "variables" }`.
//! - **Response**: the envelope `{ "data", "errors" }`. A non-empty `errors` array is
//!   a remote-reported rejection and surfaces as `Error::Validation`.
//! - **Transport**: connection failures, timeouts and 5xx responses surface as
//!   `Error::Network`. Nothing is retried here.
//! - **Not found**: single-item lookups whose only errors say "not found" return `Ok(None)`.

pub mod documents;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use inkwell_core::model::{
    Category, CategoryFilter, CreateCategory, CreatePost, Post, PostFilter, UpdateCategory, UpdatePost,
};
use inkwell_core::{AppConfig, Error};
use reqwest::header;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::api::RemoteApi;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "inkwell/0.1";

/// GraphQL client configuration.
#[derive(Debug, Clone)]
pub struct GraphQlConfig {
    /// Full endpoint URL, e.g. `http://localhost:8080/query`.
    pub endpoint: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: inkwell/0.x).
    pub user_agent: String,
}

impl Default for GraphQlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/query".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for GraphQlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.api_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<RemoteError>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    message: String,
}

/// Content API client speaking GraphQL over HTTP.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    config: GraphQlConfig,
}

impl GraphQlClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GraphQlConfig) -> Result<Self, Error> {
        if config.endpoint.is_empty() {
            return Err(Error::InvalidInput("endpoint cannot be empty".to_string()));
        }
        let endpoint = reqwest::Url::parse(&config.endpoint)
            .map_err(|e| Error::InvalidInput(format!("invalid endpoint {}: {e}", config.endpoint)))?;
        if endpoint.host_str().is_none_or(str::is_empty) {
            return Err(Error::InvalidInput(format!("endpoint {} has no host", config.endpoint)));
        }

        // Local setup failure (TLS backend, bad header value); retrying cannot help.
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::InvalidInput(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(GraphQlConfig::from(config))
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Run one operation and return the raw `data` object.
    async fn execute(&self, operation: &'static str, query: String, variables: Value) -> Result<Value, Error> {
        let start = Instant::now();
        tracing::debug!(operation, "sending GraphQL request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        tracing::debug!(operation, status, elapsed = ?start.elapsed(), "GraphQL response received");

        decode_envelope(status, &body)
    }

    async fn query_field<T: DeserializeOwned>(
        &self, operation: &'static str, field: &str, query: String, variables: Value,
    ) -> Result<T, Error> {
        let data = self.execute(operation, query, variables).await?;
        take_field(data, field)
    }

    /// Like [`GraphQlClient::query_field`], but maps "not found" rejections to `None`.
    async fn lookup<T: DeserializeOwned>(
        &self, operation: &'static str, field: &str, query: String, id: &str,
    ) -> Result<Option<T>, Error> {
        match self.query_field(operation, field, query, json!({ "id": id })).await {
            Err(Error::Validation(messages)) if is_not_found(&messages) => Ok(None),
            other => other,
        }
    }

    async fn mutate<T: DeserializeOwned>(
        &self, operation: &'static str, field: &str, query: String, variables: Value,
    ) -> Result<T, Error> {
        let result: Option<T> = self.query_field(operation, field, query, variables).await?;
        result.ok_or_else(|| Error::Decode(format!("{field} returned null")))
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() { Error::Network(format!("request timed out: {err}")) } else { Error::Network(err.to_string()) }
}

fn variables<T: serde::Serialize>(name: &str, value: &T) -> Result<Value, Error> {
    let value = serde_json::to_value(value).map_err(|e| Error::InvalidInput(e.to_string()))?;
    Ok(json!({ name: value }))
}

/// Interpret an HTTP response carrying a GraphQL envelope.
fn decode_envelope(status: u16, body: &[u8]) -> Result<Value, Error> {
    let envelope: Envelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) if status >= 400 => return Err(Error::Network(format!("HTTP {status}"))),
        Err(e) => return Err(Error::Decode(e.to_string())),
    };

    if !envelope.errors.is_empty() {
        return Err(Error::Validation(envelope.errors.into_iter().map(|e| e.message).collect()));
    }

    if status >= 400 {
        return Err(Error::Network(format!("HTTP {status}")));
    }

    envelope.data.ok_or_else(|| Error::Decode("response has no data".to_string()))
}

fn take_field<T: DeserializeOwned>(mut data: Value, field: &str) -> Result<T, Error> {
    let value = data.get_mut(field).map(Value::take).unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| Error::Decode(format!("{field}: {e}")))
}

fn is_not_found(messages: &[String]) -> bool {
    !messages.is_empty() && messages.iter().all(|m| m.to_ascii_lowercase().contains("not found"))
}

#[async_trait]
impl RemoteApi for GraphQlClient {
    async fn list_categories(&self, filter: Option<&CategoryFilter>) -> Result<Vec<Category>, Error> {
        let vars = variables("where", &filter)?;
        self.query_field("ListCategories", "listCategories", documents::list_categories(), vars)
            .await
    }

    async fn get_category(&self, id: &str) -> Result<Option<Category>, Error> {
        self.lookup("GetCategory", "getCategory", documents::get_category(), id)
            .await
    }

    async fn create_category(&self, data: &CreateCategory) -> Result<Category, Error> {
        let vars = variables("data", data)?;
        self.mutate("CreateCategory", "createCategory", documents::create_category(), vars)
            .await
    }

    async fn update_category(&self, id: &str, data: &UpdateCategory) -> Result<Category, Error> {
        let vars = json!({ "id": id, "data": serde_json::to_value(data)? });
        self.mutate("UpdateCategory", "updateCategory", documents::update_category(), vars)
            .await
    }

    async fn delete_category(&self, id: &str) -> Result<bool, Error> {
        let deleted: Option<bool> = self
            .query_field("DeleteCategory", "deleteCategory", documents::delete_category(), json!({ "id": id }))
            .await?;
        Ok(deleted.unwrap_or(false))
    }

    async fn list_posts(&self, filter: Option<&PostFilter>) -> Result<Vec<Post>, Error> {
        let vars = variables("where", &filter)?;
        self.query_field("ListPosts", "listPosts", documents::list_posts(), vars)
            .await
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>, Error> {
        self.lookup("GetPost", "getPost", documents::get_post(), id).await
    }

    async fn create_post(&self, data: &CreatePost) -> Result<Post, Error> {
        let vars = variables("data", data)?;
        self.mutate("CreatePost", "createPost", documents::create_post(), vars)
            .await
    }

    async fn update_post(&self, id: &str, data: &UpdatePost) -> Result<Post, Error> {
        let vars = json!({ "id": id, "data": serde_json::to_value(data)? });
        self.mutate("UpdatePost", "updatePost", documents::update_post(), vars)
            .await
    }

    async fn delete_post(&self, id: &str) -> Result<bool, Error> {
        let deleted: Option<bool> = self
            .query_field("DeletePost", "deletePost", documents::delete_post(), json!({ "id": id }))
            .await?;
        Ok(deleted.unwrap_or(false))
    }

    async fn ping(&self) -> Result<String, Error> {
        self.query_field("Ping", "ping", documents::ping(), json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new_empty_endpoint() {
        let config = GraphQlConfig { endpoint: String::new(), ..Default::default() };
        assert!(matches!(GraphQlClient::new(config), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_client_new_unusable_endpoint_not_retryable() {
        for endpoint in ["http://", "https://exa mple.com/query", "not a url"] {
            let config = GraphQlConfig { endpoint: endpoint.into(), ..Default::default() };
            let err = GraphQlClient::new(config).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{endpoint}");
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_client_new_bad_user_agent_not_retryable() {
        let config = GraphQlConfig { user_agent: "inkwell\n0.1".into(), ..Default::default() };
        let err = GraphQlClient::new(config).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.starts_with("cannot build HTTP client")));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_config_from_app_config_trims_slash() {
        let app = AppConfig { api_url: "https://cms.example.com/query/".into(), ..Default::default() };
        let config = GraphQlConfig::from(&app);
        assert_eq!(config.endpoint, "https://cms.example.com/query");
        assert_eq!(config.timeout, app.timeout());
    }

    #[test]
    fn test_decode_data() {
        let body = br#"{"data":{"ping":"pong"}}"#;
        let data = decode_envelope(200, body).unwrap();
        let pong: String = take_field(data, "ping").unwrap();
        assert_eq!(pong, "pong");
    }

    #[test]
    fn test_decode_errors_are_validation() {
        let body = br#"{"data":null,"errors":[{"message":"name is required","path":["createCategory"]}]}"#;
        let err = decode_envelope(200, body).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == &["name is required".to_string()]));

        // Some servers pair GraphQL errors with a 4xx status.
        let err = decode_envelope(422, body).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_decode_server_failure_is_network() {
        let err = decode_envelope(502, b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Network(ref m) if m == "HTTP 502"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = decode_envelope(200, b"not json").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_missing_data() {
        let err = decode_envelope(200, b"{}").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_take_list_field() {
        let data = json!({ "listCategories": [{
            "id": "c1", "name": "News", "slug": "news", "status": "ACTIVE",
            "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"
        }]});
        let categories: Vec<Category> = take_field(data, "listCategories").unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "News");
    }

    #[test]
    fn test_take_null_single_item() {
        let post: Option<Post> = take_field(json!({ "getPost": null }), "getPost").unwrap();
        assert!(post.is_none());
    }

    #[test]
    fn test_take_wrong_shape() {
        let result: Result<Vec<Post>, _> = take_field(json!({ "listPosts": 3 }), "listPosts");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_not_found_detection() {
        assert!(is_not_found(&["category is not found".to_string()]));
        assert!(is_not_found(&["Post Not Found".to_string()]));
        assert!(!is_not_found(&["category is not found".to_string(), "permission denied".to_string()]));
        assert!(!is_not_found(&[]));
    }

    #[test]
    fn test_where_variable_omits_nulls() {
        let filter = PostFilter::default().page(10, 0);
        let vars = variables("where", &Some(&filter)).unwrap();
        assert_eq!(vars, json!({ "where": { "pagination": { "limit": 10 } } }));

        let vars = variables::<Option<&PostFilter>>("where", &None).unwrap();
        assert_eq!(vars, json!({ "where": null }));
    }
}
