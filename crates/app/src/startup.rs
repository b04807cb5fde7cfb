use thiserror::Error;
use tracing::{debug, info, warn};

use domus_i18n_core::{
    audit, AuditReport, CatalogError, CatalogRegistry, CatalogSource, DirectorySource,
    EmbeddedSource, LayeredSource,
};
use domus_i18n_util::AppConfig;

/// Builds the registry the rest of the process shares.
///
/// Catalogs in `I18N_LOCALES_DIR` take precedence over the embedded tables
/// for the same namespace and locale.
pub fn build_registry(config: &AppConfig) -> CatalogRegistry {
    let mut source = LayeredSource::new();
    if let Some(dir) = &config.locales_dir {
        source = source.with_layer(DirectorySource::new(dir));
    }
    source = source.with_layer(EmbeddedSource::new());

    match source.available() {
        Ok(ids) => debug!(
            stage = "startup",
            available = ?ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "catalog sources scanned"
        ),
        Err(err) => warn!(stage = "startup", error = %err, "failed to list available catalogs"),
    }
    CatalogRegistry::new(source)
}

#[derive(Debug)]
pub struct StartupSummary {
    pub catalogs_loaded: usize,
    pub report: AuditReport,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load catalogs: {0}")]
    Catalog(#[from] CatalogError),
    #[error("catalog audit against '{reference}' reported {count} finding(s)")]
    Audit { reference: String, count: usize },
}

/// Preloads every configured catalog and audits them against the reference locale.
pub fn warm_up(registry: &CatalogRegistry, config: &AppConfig) -> Result<StartupSummary, StartupError> {
    let catalogs_loaded = registry.preload(&config.namespaces, &config.locales)?;
    info!(
        stage = "startup",
        catalogs = catalogs_loaded,
        namespaces = ?config.namespaces,
        locales = ?config.locales,
        "catalogs preloaded"
    );

    let report = audit(
        registry,
        &config.namespaces,
        &config.locales,
        &config.reference_locale,
    )?;
    if !report.is_clean() {
        warn!(
            stage = "startup",
            findings = report.findings.len(),
            reference = %report.reference_locale,
            "catalog audit failed"
        );
        return Err(StartupError::Audit {
            reference: report.reference_locale,
            count: report.findings.len(),
        });
    }

    Ok(StartupSummary {
        catalogs_loaded,
        report,
    })
}
