//! Partition key derivation for list requests.
//!
//! The key is the canonical JSON text of the filter: null members and members left
//! empty are dropped, object members are sorted by name and `in` membership lists
//! are sorted and de-duplicated. A pagination `skip` of zero is the server's default
//! offset and is dropped. An absent filter encodes as `{}`.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::Error;

/// Name of the membership member whose element order carries no meaning.
const MEMBERSHIP_FIELD: &str = "in";

const PAGINATION_FIELD: &str = "pagination";
const SKIP_FIELD: &str = "skip";

/// Canonical encoding of a list filter; identifies one cache partition within a kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterKey(String);

impl FilterKey {
    /// The partition holding unfiltered, default-sorted, default-paginated results.
    pub fn unfiltered() -> Self {
        Self("{}".to_string())
    }

    /// Encode an optional filter into its partition key.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the filter cannot be represented as JSON.
    pub fn encode<F: Serialize>(filter: Option<&F>) -> Result<Self, Error> {
        let Some(filter) = filter else {
            return Ok(Self::unfiltered());
        };

        let value = serde_json::to_value(filter).map_err(|e| Error::InvalidInput(format!("unencodable filter: {e}")))?;

        match canonicalize(value, None) {
            Some(value @ Value::Object(_)) => Ok(Self(value.to_string())),
            Some(other) => Err(Error::InvalidInput(format!("filter must encode to an object, got {other}"))),
            None => Ok(Self::unfiltered()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unfiltered(&self) -> bool {
        self.0 == "{}"
    }

    /// SHA-256 hex digest of the key, for compact log fields.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `pagination.skip = 0` is the server's default offset.
fn is_default_skip(parent: Option<&str>, name: &str, value: &Value) -> bool {
    parent == Some(PAGINATION_FIELD) && name == SKIP_FIELD && value.as_u64() == Some(0)
}

/// Returns `None` when the value carries no constraint.
fn canonicalize(value: Value, field: Option<&str>) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let mut members: Vec<(String, Value)> = map
                .into_iter()
                .filter(|(name, v)| !is_default_skip(field, name, v))
                .filter_map(|(name, v)| canonicalize(v, Some(name.as_str())).map(|v| (name, v)))
                .collect();
            if members.is_empty() {
                return None;
            }
            members.sort_by(|a, b| a.0.cmp(&b.0));
            Some(Value::Object(members.into_iter().collect::<Map<_, _>>()))
        }
        Value::Array(items) => {
            let mut items: Vec<Value> = items.into_iter().map(|v| canonicalize(v, None).unwrap_or(Value::Null)).collect();
            if field == Some(MEMBERSHIP_FIELD) {
                items.sort_by_key(|v| v.to_string());
                items.dedup();
            }
            Some(Value::Array(items))
        }
        scalar => Some(scalar),
    }
}
