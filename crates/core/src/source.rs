use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, CatalogError};
use crate::types::CatalogId;

/// Backing provider of catalog definitions.
///
/// `fetch` returns `Ok(None)` when the source has no definition for the
/// pair; I/O and parse failures are reported as errors.
pub trait CatalogSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn fetch(&self, id: &CatalogId) -> Result<Option<Catalog>, CatalogError>;

    /// Every pair this source can provide, sorted.
    fn available(&self) -> Result<Vec<CatalogId>, CatalogError>;
}

const EMBEDDED_CATALOGS: &[(&str, &str, &str)] = &[
    ("messages", "en", include_str!("../locales/en/messages.json")),
    (
        "translations",
        "en",
        include_str!("../locales/en/translations.json"),
    ),
    ("validation", "en", include_str!("../locales/en/validation.json")),
];

/// The English tables compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedSource;

impl EmbeddedSource {
    pub fn new() -> Self {
        Self
    }
}

impl CatalogSource for EmbeddedSource {
    fn name(&self) -> &str {
        "embedded"
    }

    fn fetch(&self, id: &CatalogId) -> Result<Option<Catalog>, CatalogError> {
        EMBEDDED_CATALOGS
            .iter()
            .find(|(namespace, locale, _)| *namespace == id.namespace && *locale == id.locale)
            .map(|(_, _, document)| Catalog::from_json(id.clone(), document))
            .transpose()
    }

    fn available(&self) -> Result<Vec<CatalogId>, CatalogError> {
        let mut ids: Vec<CatalogId> = EMBEDDED_CATALOGS
            .iter()
            .map(|(namespace, locale, _)| CatalogId::new(*namespace, *locale))
            .collect();
        ids.sort();
        Ok(ids)
    }
}

/// Catalog files laid out as `<root>/<locale>/<namespace>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn catalog_path(&self, id: &CatalogId) -> PathBuf {
        self.root
            .join(&id.locale)
            .join(format!("{}.json", id.namespace))
    }
}

impl CatalogSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    fn fetch(&self, id: &CatalogId) -> Result<Option<Catalog>, CatalogError> {
        if !id.is_well_formed() {
            return Ok(None);
        }

        let path = self.catalog_path(id);
        let document = match fs::read_to_string(&path) {
            Ok(document) => document,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CatalogError::Io { path, source }),
        };

        Catalog::from_json(id.clone(), &document).map(Some)
    }

    fn available(&self) -> Result<Vec<CatalogId>, CatalogError> {
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| CatalogError::Io { path, source }
        };

        let mut ids = Vec::new();
        for locale_dir in fs::read_dir(&self.root).map_err(io_error(&self.root))? {
            let locale_dir = locale_dir.map_err(io_error(&self.root))?;
            let locale_path = locale_dir.path();
            if !locale_path.is_dir() {
                continue;
            }
            let Some(locale) = locale_path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            for file in fs::read_dir(&locale_path).map_err(io_error(&locale_path))? {
                let file_path = file.map_err(io_error(&locale_path))?.path();
                if file_path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                    continue;
                }
                if let Some(namespace) = file_path.file_stem().and_then(|stem| stem.to_str()) {
                    let id = CatalogId::new(namespace, locale);
                    if id.is_well_formed() {
                        ids.push(id);
                    }
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// JSON documents held in memory, keyed by catalog id.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    documents: HashMap<CatalogId, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        namespace: impl Into<String>,
        locale: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        self.documents
            .insert(CatalogId::new(namespace, locale), document.into());
        self
    }
}

impl CatalogSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, id: &CatalogId) -> Result<Option<Catalog>, CatalogError> {
        self.documents
            .get(id)
            .map(|document| Catalog::from_json(id.clone(), document))
            .transpose()
    }

    fn available(&self) -> Result<Vec<CatalogId>, CatalogError> {
        let mut ids: Vec<CatalogId> = self.documents.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Tries each layer in order; the first layer defining a pair provides the
/// whole catalog for it. Catalogs are not merged key by key.
#[derive(Default)]
pub struct LayeredSource {
    layers: Vec<Box<dyn CatalogSource>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer with lower precedence than the ones already added.
    pub fn with_layer(mut self, layer: impl CatalogSource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl CatalogSource for LayeredSource {
    fn name(&self) -> &str {
        "layered"
    }

    fn fetch(&self, id: &CatalogId) -> Result<Option<Catalog>, CatalogError> {
        for layer in &self.layers {
            if let Some(catalog) = layer.fetch(id)? {
                tracing::trace!(stage = "source", layer = layer.name(), catalog = %id, "catalog provided by layer");
                return Ok(Some(catalog));
            }
        }
        Ok(None)
    }

    fn available(&self) -> Result<Vec<CatalogId>, CatalogError> {
        let mut ids = BTreeSet::new();
        for layer in &self.layers {
            ids.extend(layer.available()?);
        }
        Ok(ids.into_iter().collect())
    }
}
