//! Per-field validation messages rendered beneath form inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from form field name to its ordered validation messages.
///
/// ## Invariants
/// - A set is built per failed submission and replaced wholesale on the next
///   attempt; sets are never merged.
/// - Fields never map to an empty message list.
///
/// # Examples
/// ```
/// use admin_console::domain::FieldErrorSet;
///
/// let mut errors = FieldErrorSet::single("email", "taken");
/// errors.insert("name", ["required"]);
/// assert!(errors.clear_field("name"));
/// assert_eq!(errors.first("email"), Some("taken"));
/// assert!(errors.messages("name").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrorSet(BTreeMap<String, Vec<String>>);

impl FieldErrorSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding one message for one field.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.insert(field, [message.into()]);
        set
    }

    /// Record messages for a field, replacing any earlier entry. Empty message
    /// lists are ignored.
    pub fn insert<I, M>(&mut self, field: impl Into<String>, messages: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            return;
        }
        self.0.insert(field.into(), messages);
    }

    /// Messages recorded for `field`, empty when the field has none.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// First message for `field`, which is what inline renderers display.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.messages(field).first().map(String::as_str)
    }

    /// Drop the entry for `field`. Returns whether anything was removed.
    pub fn clear_field(&mut self, field: &str) -> bool {
        self.0.remove(field).is_some()
    }

    /// Whether `field` carries any message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Field names with messages, in name order.
    #[must_use]
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Every message across all fields, field by field.
    #[must_use]
    pub fn all_messages(&self) -> impl Iterator<Item = &str> {
        self.0.values().flatten().map(String::as_str)
    }

    /// Iterate over `(field, messages)` pairs.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Number of fields with messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field carries a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldErrorSet
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (field, messages) in iter {
            set.insert(field, messages);
        }
        set
    }
}
