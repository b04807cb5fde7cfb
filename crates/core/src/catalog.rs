use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{CatalogId, Entry};

/// Errors raised while loading catalogs or looking up keys.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog defined for namespace '{namespace}' and locale '{locale}'")]
    CatalogNotFound { namespace: String, locale: String },
    #[error("key '{key}' not found in {namespace}/{locale}")]
    KeyNotFound {
        namespace: String,
        locale: String,
        key: String,
    },
    #[error("key '{key}' in {namespace}/{locale} addresses a group, not a message")]
    NotALeaf {
        namespace: String,
        locale: String,
        key: String,
    },
    #[error("failed to read catalog source at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog {namespace}/{locale}: {source}")]
    Parse {
        namespace: String,
        locale: String,
        source: serde_json::Error,
    },
}

impl CatalogError {
    pub(crate) fn catalog_not_found(id: &CatalogId) -> Self {
        Self::CatalogNotFound {
            namespace: id.namespace.clone(),
            locale: id.locale.clone(),
        }
    }
}

/// Immutable key → entry mapping for one namespace and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    id: CatalogId,
    entries: BTreeMap<String, Entry>,
}

impl Catalog {
    pub fn new(id: CatalogId, entries: BTreeMap<String, Entry>) -> Self {
        Self { id, entries }
    }

    /// Parses a JSON object whose values are strings or nested objects of strings.
    pub fn from_json(id: CatalogId, document: &str) -> Result<Self, CatalogError> {
        let entries = serde_json::from_str(document).map_err(|source| CatalogError::Parse {
            namespace: id.namespace.clone(),
            locale: id.locale.clone(),
            source,
        })?;
        Ok(Self::new(id, entries))
    }

    pub fn id(&self) -> &CatalogId {
        &self.id
    }

    pub fn namespace(&self) -> &str {
        &self.id.namespace
    }

    pub fn locale(&self) -> &str {
        &self.id.locale
    }

    /// Top-level entries of the catalog.
    pub fn entries(&self) -> &BTreeMap<String, Entry> {
        &self.entries
    }

    /// Looks up `key`, traversing groups on each `.`-separated segment.
    ///
    /// Returns the group itself when the key stops at a group.
    pub fn resolve(&self, key: &str) -> Result<&Entry, CatalogError> {
        let mut segments = key.split('.');
        let first = segments.next().unwrap_or_default();
        let mut current = self
            .entries
            .get(first)
            .ok_or_else(|| self.key_not_found(key))?;

        for segment in segments {
            current = match current {
                Entry::Group(children) => children
                    .get(segment)
                    .ok_or_else(|| self.key_not_found(key))?,
                Entry::Leaf(_) => return Err(self.key_not_found(key)),
            };
        }

        Ok(current)
    }

    /// Resolves `key` and requires it to address a message template.
    pub fn template(&self, key: &str) -> Result<&str, CatalogError> {
        match self.resolve(key)? {
            Entry::Leaf(template) => Ok(template),
            Entry::Group(_) => Err(CatalogError::NotALeaf {
                namespace: self.id.namespace.clone(),
                locale: self.id.locale.clone(),
                key: key.to_string(),
            }),
        }
    }

    /// Every dotted leaf key, sorted.
    pub fn leaf_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaf_keys(&self.entries, None, &mut keys);
        keys
    }

    /// Number of leaf templates.
    pub fn len(&self) -> usize {
        count_leaves(&self.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key_not_found(&self, key: &str) -> CatalogError {
        CatalogError::KeyNotFound {
            namespace: self.id.namespace.clone(),
            locale: self.id.locale.clone(),
            key: key.to_string(),
        }
    }
}

fn collect_leaf_keys(
    entries: &BTreeMap<String, Entry>,
    prefix: Option<&str>,
    out: &mut Vec<String>,
) {
    for (name, entry) in entries {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.clone(),
        };
        match entry {
            Entry::Leaf(_) => out.push(key),
            Entry::Group(children) => collect_leaf_keys(children, Some(&key), out),
        }
    }
}

fn count_leaves(entries: &BTreeMap<String, Entry>) -> usize {
    entries
        .values()
        .map(|entry| match entry {
            Entry::Leaf(_) => 1,
            Entry::Group(children) => count_leaves(children),
        })
        .sum()
}
