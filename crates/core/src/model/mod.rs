//! Entities, mutation inputs and list filters exchanged with the remote API.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod category;
pub mod filter;
pub mod post;

pub use category::{Category, CategoryRef, CreateCategory, UpdateCategory};
pub use filter::{CategoryFilter, IdFilter, PaginationFilter, PostFilter, SortFilter, SortOrder, StringFilter};
pub use post::{CreatePost, Post, UpdatePost};

/// Publication status shared by categories and posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    Active,
    Pending,
    Archived,
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityStatus::Active => "ACTIVE",
            EntityStatus::Pending => "PENDING",
            EntityStatus::Archived => "ARCHIVED",
        })
    }
}

impl std::str::FromStr for EntityStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(EntityStatus::Active),
            "PENDING" => Ok(EntityStatus::Pending),
            "ARCHIVED" => Ok(EntityStatus::Archived),
            other => Err(crate::Error::InvalidInput(format!("unknown status: {other}"))),
        }
    }
}

/// The entity collections this layer caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Category,
    Post,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Category, EntityKind::Post];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::Post => "post",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remotely-owned record with an immutable identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Filter shape accepted by the list operation for this entity.
    type Filter: Serialize + Clone + Send + Sync + 'static;

    fn id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&EntityStatus::Archived).unwrap(), r#""ARCHIVED""#);
        let status: EntityStatus = serde_json::from_str(r#""PENDING""#).unwrap();
        assert_eq!(status, EntityStatus::Pending);
    }

    #[test]
    fn test_status_from_str_case_insensitive() {
        assert_eq!("active".parse::<EntityStatus>().unwrap(), EntityStatus::Active);
        assert!("deleted".parse::<EntityStatus>().is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(EntityKind::Post.to_string(), "post");
        assert_eq!(EntityKind::Category.as_str(), "category");
    }
}
