//! List filter arguments (`where` on the wire).
//!
//! Absent members are omitted when serialized. Cache keys are derived from these
//! types by [`crate::cache::key::FilterKey`].

use serde::{Deserialize, Serialize};

use super::EntityStatus;

/// String equality / pattern predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl StringFilter {
    pub fn eq(value: impl Into<String>) -> Self {
        Self { eq: Some(value.into()), regex: None }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self { eq: None, regex: Some(pattern.into()) }
    }
}

/// Identifier equality / membership predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<String>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<String>>,
}

impl IdFilter {
    pub fn eq(id: impl Into<String>) -> Self {
        Self { eq: Some(id.into()), any_of: None }
    }

    pub fn any_of<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { eq: None, any_of: Some(ids.into_iter().map(Into::into).collect()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Pagination window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

/// `where` argument of `listCategories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<StringFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<StringFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationFilter>,
}

/// `where` argument of `listPosts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<StringFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<StringFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<IdFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationFilter>,
}

fn sort(field: impl Into<String>, order: SortOrder) -> SortFilter {
    SortFilter { sort_by: Some(field.into()), sort_order: Some(order) }
}

fn page(limit: u32, skip: u32) -> PaginationFilter {
    PaginationFilter { limit: Some(limit), skip: Some(skip) }
}

fn validate_pagination(pagination: Option<&PaginationFilter>) -> Result<(), crate::Error> {
    if let Some(PaginationFilter { limit: Some(0), .. }) = pagination {
        return Err(crate::Error::InvalidInput("pagination limit must be greater than 0".to_string()));
    }
    Ok(())
}

impl CategoryFilter {
    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(sort(field, order));
        self
    }

    /// Limit to `limit` rows after skipping `skip`.
    pub fn page(mut self, limit: u32, skip: u32) -> Self {
        self.pagination = Some(page(limit, skip));
        self
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_pagination(self.pagination.as_ref())
    }
}

impl PostFilter {
    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category = Some(IdFilter::eq(category_id));
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(sort(field, order));
        self
    }

    /// Limit to `limit` rows after skipping `skip`.
    pub fn page(mut self, limit: u32, skip: u32) -> Self {
        self.pagination = Some(page(limit, skip));
        self
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        if let Some(IdFilter { any_of: Some(ids), .. }) = &self.category
            && ids.iter().any(String::is_empty)
        {
            return Err(crate::Error::InvalidInput("category ids cannot be empty".to_string()));
        }
        validate_pagination(self.pagination.as_ref())
    }
}
