use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Deserialize;

/// Identifies one catalog: a namespace (`messages`, `validation`, ...) in a locale (`en`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogId {
    pub namespace: String,
    pub locale: String,
}

impl CatalogId {
    pub fn new(namespace: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            locale: locale.into(),
        }
    }

    /// Returns `true` when both components are safe to use as path segments.
    pub fn is_well_formed(&self) -> bool {
        is_identifier(&self.namespace) && is_identifier(&self.locale)
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.locale)
    }
}

/// Namespace and locale identifiers: ASCII alphanumerics, `_` and `-`.
///
/// `domus_i18n_util::config` validates configured locales with the same rule.
pub fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A catalog value: either a message template or a named group of further entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Leaf(String),
    Group(BTreeMap<String, Entry>),
}

impl Entry {
    /// Returns the template when the entry is a leaf.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(template) => Some(template),
            Self::Group(_) => None,
        }
    }

    /// Returns the children when the entry is a group.
    pub fn as_group(&self) -> Option<&BTreeMap<String, Entry>> {
        match self {
            Self::Leaf(_) => None,
            Self::Group(children) => Some(children),
        }
    }
}

/// Named values substituted into `{name}` placeholders.
///
/// Values are stored in their `Display` form, so numbers and other scalar
/// types can be passed directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Params::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name` to the string form of `value`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
