//! Localization catalogs for the domestic-workers management application.
//!
//! Catalogs are loaded per namespace and locale from a [`CatalogSource`],
//! cached by a [`CatalogRegistry`], and rendered with [`format`].
//!
//! ```
//! use domus_i18n_core::{CatalogRegistry, EmbeddedSource, Params};
//!
//! let registry = CatalogRegistry::new(EmbeddedSource::new());
//! let text = registry
//!     .translate("validation", "en", "required", &Params::new().with("field", "Email"))
//!     .unwrap();
//! assert_eq!(text, "The Email field is required");
//! ```

pub mod audit;
pub mod catalog;
pub mod format;
pub mod registry;
pub mod source;
pub mod types;

pub use audit::{audit, AuditReport, Finding};
pub use catalog::{Catalog, CatalogError};
pub use format::{format, placeholders};
pub use registry::CatalogRegistry;
pub use source::{CatalogSource, DirectorySource, EmbeddedSource, LayeredSource, MemorySource};
pub use types::{CatalogId, Entry, Params};

