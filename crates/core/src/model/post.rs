use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryRef, Entity, EntityKind, EntityStatus, PostFilter};

/// A post as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: Option<String>,
    pub status: EntityStatus,
    pub category: CategoryRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Post {
    const KIND: EntityKind = EntityKind::Post;
    type Filter = PostFilter;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for `createPost`. `category` is the id of an existing category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePost {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub status: EntityStatus,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Input for `updatePost`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl CreatePost {
    pub fn new(title: impl Into<String>, category: impl Into<String>, status: EntityStatus) -> Self {
        Self { title: title.into(), slug: None, status, category: category.into(), content: None }
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.title.trim().is_empty() {
            return Err(crate::Error::InvalidInput("post title cannot be empty".to_string()));
        }
        if self.category.is_empty() {
            return Err(crate::Error::InvalidInput("post category cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl UpdatePost {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_post() {
        let json = r#"{
            "id": "p1",
            "title": "Hello",
            "slug": "hello",
            "status": "PENDING",
            "content": null,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "category": { "id": "c1", "name": "News", "slug": "news", "status": "ACTIVE" }
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id(), "p1");
        assert_eq!(post.category.id, "c1");
        assert_eq!(post.status, EntityStatus::Pending);
    }

    #[test]
    fn test_create_validation() {
        assert!(CreatePost::new("Hello", "c1", EntityStatus::Active).validate().is_ok());
        assert!(CreatePost::new("", "c1", EntityStatus::Active).validate().is_err());
        assert!(CreatePost::new("Hello", "", EntityStatus::Active).validate().is_err());
    }

    #[test]
    fn test_update_serializes_only_changes() {
        let input = UpdatePost { category: Some("c2".into()), ..Default::default() };
        assert_eq!(serde_json::to_string(&input).unwrap(), r#"{"category":"c2"}"#);
        assert!(!input.is_empty());
    }
}
