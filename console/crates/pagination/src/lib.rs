//! Page-number pagination primitives shared by admin console list queries.
//!
//! The console backend pages collections by one-based page number and filters
//! them with a free-text search string. Responses arrive either as a bare JSON
//! array or wrapped in a paginator envelope carrying page metadata; [`Page`]
//! accepts both shapes and keeps the server's item order untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::form_urlencoded;

/// Query parameter carrying the search string.
pub const SEARCH_PARAM: &str = "search";
/// Query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";

/// Errors raised when constructing a [`PageNumber`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageNumberError {
    /// Page numbers are one-based.
    #[error("page number must be at least 1")]
    Zero,
    /// The raw value is not an unsigned integer.
    #[error("page number must be a positive integer, got '{value}'")]
    Invalid {
        /// Raw value supplied by the caller.
        value: String,
    },
}

/// One-based page number.
///
/// # Examples
/// ```
/// use pagination::PageNumber;
///
/// let page = PageNumber::new(3).expect("non-zero page");
/// assert_eq!(page.get(), 3);
/// assert!(PageNumber::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(1);

    /// Validate and construct a page number.
    ///
    /// # Errors
    ///
    /// Returns [`PageNumberError::Zero`] for `0`.
    pub const fn new(value: u32) -> Result<Self, PageNumberError> {
        if value == 0 {
            return Err(PageNumberError::Zero);
        }
        Ok(Self(value))
    }

    /// Raw one-based value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The following page, saturating at `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The preceding page, or `None` on the first page.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        if self.0 > 1 { Some(Self(self.0 - 1)) } else { None }
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PageNumberError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageNumber> for u32 {
    fn from(value: PageNumber) -> Self {
        value.0
    }
}

impl FromStr for PageNumber {
    type Err = PageNumberError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| PageNumberError::Invalid {
                value: raw.to_owned(),
            })?;
        Self::new(value)
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Search and page filter applied to a collection request.
///
/// ## Invariants
/// - `search` is trimmed; an empty string means "no filter".
///
/// # Examples
/// ```
/// use pagination::{ListQuery, PageNumber};
///
/// let query = ListQuery::new("  ada ", PageNumber::FIRST);
/// assert_eq!(query.search(), "ada");
/// assert_eq!(query.to_query_string(), "search=ada&page=1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ListQuery {
    search: String,
    page: PageNumber,
}

impl ListQuery {
    /// Build a query from a raw search string and page.
    #[must_use]
    pub fn new(search: impl AsRef<str>, page: PageNumber) -> Self {
        Self {
            search: search.as_ref().trim().to_owned(),
            page,
        }
    }

    /// Search filter, possibly empty.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.as_str()
    }

    /// Requested page.
    #[must_use]
    pub const fn page(&self) -> PageNumber {
        self.page
    }

    /// Copy of this query pointing at another page.
    #[must_use]
    pub fn with_page(&self, page: PageNumber) -> Self {
        Self {
            search: self.search.clone(),
            page,
        }
    }

    /// Query parameters in wire order. The search parameter is always sent,
    /// even when empty.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            (SEARCH_PARAM.to_owned(), self.search.clone()),
            (PAGE_PARAM.to_owned(), self.page.to_string()),
        ]
    }

    /// URL-encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}

/// Paginator metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page the items belong to.
    pub current_page: u32,
    /// Last available page.
    pub last_page: u32,
    /// Page size used by the server.
    pub per_page: u32,
    /// Total number of matching records.
    pub total: u64,
}

impl PageMeta {
    /// Whether the server reports a page after the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

#[derive(Deserialize)]
struct PaginatedDto<T> {
    data: Vec<T>,
    current_page: u32,
    last_page: u32,
    per_page: u32,
    total: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PagePayload<T> {
    Bare(Vec<T>),
    Paginated(PaginatedDto<T>),
}

/// Items of one collection page in server order.
///
/// # Examples
/// ```
/// use pagination::Page;
///
/// let bare: Page<u32> = serde_json::from_str("[3, 1, 2]").expect("bare array");
/// assert_eq!(bare.items(), &[3, 1, 2]);
/// assert!(bare.meta().is_none());
///
/// let wrapped: Page<u32> = serde_json::from_str(
///     r#"{"data":[7],"current_page":2,"last_page":2,"per_page":10,"total":11}"#,
/// )
/// .expect("paginated envelope");
/// assert_eq!(wrapped.meta().map(|meta| meta.current_page), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    meta: Option<PageMeta>,
}

impl<T> Page<T> {
    /// Build a page from items and optional metadata.
    #[must_use]
    pub const fn new(items: Vec<T>, meta: Option<PageMeta>) -> Self {
        Self { items, meta }
    }

    /// Items in the order the server returned them.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consume the page, yielding its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Paginator metadata, when the server sent an envelope.
    #[must_use]
    pub const fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> From<PagePayload<T>> for Page<T> {
    fn from(value: PagePayload<T>) -> Self {
        match value {
            PagePayload::Bare(items) => Self::new(items, None),
            PagePayload::Paginated(dto) => Self::new(
                dto.data,
                Some(PageMeta {
                    current_page: dto.current_page,
                    last_page: dto.last_page,
                    per_page: dto.per_page,
                    total: dto.total,
                }),
            ),
        }
    }
}

impl<'de, T> Deserialize<'de> for Page<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        PagePayload::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
