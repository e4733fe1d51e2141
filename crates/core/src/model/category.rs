use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryFilter, Entity, EntityKind, EntityStatus};

/// A category as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;
    type Filter = CategoryFilter;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Denormalized category snapshot embedded in a post.
///
/// Resolved by the server at read time; may go stale until the next refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub status: EntityStatus,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            slug: category.slug.clone(),
            status: category.status,
        }
    }
}

/// Input for `createCategory`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

/// Input for `updateCategory`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

impl CreateCategory {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.trim().is_empty() {
            return Err(crate::Error::InvalidInput("category name cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl UpdateCategory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_category() {
        let json = r#"{
            "id": "c1",
            "name": "News",
            "slug": null,
            "status": "ACTIVE",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00+02:00"
        }"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.id(), "c1");
        assert!(category.slug.is_none());
        assert_eq!(category.updated_at.to_rfc3339(), "2024-05-02T08:00:00+00:00");
    }

    #[test]
    fn test_create_omits_absent_fields() {
        let input = CreateCategory { name: "News".into(), ..Default::default() };
        assert_eq!(serde_json::to_string(&input).unwrap(), r#"{"name":"News"}"#);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let input = CreateCategory { name: "  ".into(), ..Default::default() };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateCategory::default().is_empty());
        assert!(!UpdateCategory { status: Some(EntityStatus::Archived), ..Default::default() }.is_empty());
    }
}
