//! Cache keys for resource lists and items.
use pagination::ListQuery;

use crate::domain::{ResourceId, ResourceKind};

const LIST_SEGMENT: &str = "list";
const ITEM_SEGMENT: &str = "item";

/// Key under which one query result is cached.
///
/// Keys are colon-separated: `users:list:search=ada&page=2` for lists and
/// `users:item:42` for single records. Any key can be matched against a
/// [`CachePrefix`] for invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key of a list query for `kind`.
    #[must_use]
    pub fn list(kind: ResourceKind, query: &ListQuery) -> Self {
        Self(format!(
            "{}:{LIST_SEGMENT}:{}",
            kind.as_str(),
            query.to_query_string()
        ))
    }

    /// Key of a single record of `kind`.
    #[must_use]
    pub fn item(kind: ResourceKind, id: &ResourceId) -> Self {
        Self(format!("{}:{ITEM_SEGMENT}:{id}", kind.as_str()))
    }

    /// Borrow the underlying key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether this key falls under `prefix`.
    #[must_use]
    pub fn matches(&self, prefix: &CachePrefix) -> bool {
        self.0.starts_with(prefix.as_str())
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group of cache keys addressed together by invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CachePrefix(String);

impl CachePrefix {
    /// Every list and item of `kind`.
    #[must_use]
    pub fn resource(kind: ResourceKind) -> Self {
        Self(format!("{}:", kind.as_str()))
    }

    /// Borrow the prefix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CachePrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
