use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError};
use crate::format::format;
use crate::source::CatalogSource;
use crate::types::{CatalogId, Params};

type Slot = Arc<OnceCell<Arc<Catalog>>>;

/// Lazily populated cache of catalogs over a [`CatalogSource`].
///
/// The registry is owned by the host's startup sequence and handed to
/// whoever needs translations. Each namespace/locale pair is loaded at most
/// once, even when several threads ask for it at the same time; after that,
/// lookups only take a shared read lock to find the cached catalog.
/// A failed load is not cached, so the next access asks the source again.
pub struct CatalogRegistry {
    source: Box<dyn CatalogSource>,
    slots: RwLock<HashMap<CatalogId, Slot>>,
}

impl CatalogRegistry {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the catalog for `namespace`/`locale`, loading it on first access.
    pub fn load(&self, namespace: &str, locale: &str) -> Result<Arc<Catalog>, CatalogError> {
        let id = CatalogId::new(namespace, locale);
        let slot = self.slot(&id);

        let loaded = slot.get_or_try_init(|| {
            let catalog = self
                .source
                .fetch(&id)?
                .ok_or_else(|| CatalogError::catalog_not_found(&id))?;
            debug!(
                stage = "registry",
                namespace,
                locale,
                source = self.source.name(),
                entries = catalog.len(),
                "catalog loaded"
            );
            Ok::<_, CatalogError>(Arc::new(catalog))
        });

        match loaded {
            Ok(catalog) => Ok(Arc::clone(catalog)),
            Err(err) => {
                self.discard_empty_slot(&id, &slot);
                Err(err)
            }
        }
    }

    /// Loads the catalog, resolves `key` to a template and substitutes `params`.
    pub fn translate(
        &self,
        namespace: &str,
        locale: &str,
        key: &str,
        params: &Params,
    ) -> Result<String, CatalogError> {
        let catalog = self.load(namespace, locale)?;
        let template = catalog.template(key)?;
        Ok(format(template, params))
    }

    /// Loads every namespace × locale combination, stopping at the first failure.
    ///
    /// Returns the number of catalogs now cached for the requested pairs.
    pub fn preload<N, L>(&self, namespaces: &[N], locales: &[L]) -> Result<usize, CatalogError>
    where
        N: AsRef<str>,
        L: AsRef<str>,
    {
        let mut loaded = 0;
        for namespace in namespaces {
            for locale in locales {
                self.load(namespace.as_ref(), locale.as_ref())?;
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Returns `true` when the pair has been loaded successfully.
    pub fn is_cached(&self, namespace: &str, locale: &str) -> bool {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .get(&CatalogId::new(namespace, locale))
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Ids of every cached catalog, sorted.
    pub fn cached(&self) -> Vec<CatalogId> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<CatalogId> = slots
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Drops one cached catalog; the next access reloads it from the source.
    ///
    /// Callers still holding the old `Arc<Catalog>` keep using it unchanged.
    pub fn evict(&self, namespace: &str, locale: &str) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let removed = slots
            .remove(&CatalogId::new(namespace, locale))
            .is_some_and(|slot| slot.get().is_some());
        if removed {
            debug!(stage = "registry", namespace, locale, "catalog evicted");
        }
        removed
    }

    /// Drops every cached catalog.
    pub fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let count = slots.len();
        slots.clear();
        debug!(stage = "registry", count, "catalog cache cleared");
    }

    fn slot(&self, id: &CatalogId) -> Slot {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id.clone()).or_default())
    }

    /// Removes `slot` after a failed load unless another caller replaced or filled it.
    fn discard_empty_slot(&self, id: &CatalogId, slot: &Slot) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let stale = slots
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && current.get().is_none());
        if stale {
            slots.remove(id);
        }
    }
}

impl std::fmt::Debug for CatalogRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogRegistry")
            .field("source", &self.source.name())
            .field("cached", &self.cached())
            .finish()
    }
}
