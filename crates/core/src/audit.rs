//! Content checks over loaded catalogs.
//!
//! Every locale of a namespace must define the same keys as the reference
//! locale, with the same placeholders, and every listed key must resolve to
//! a template. Findings are collected rather than returned as errors so a
//! host can report all of them at once.

use std::collections::BTreeSet;
use std::fmt;

use tracing::warn;

use crate::catalog::{Catalog, CatalogError};
use crate::format::placeholders;
use crate::registry::CatalogRegistry;

/// A single content defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// The reference locale defines a key this locale lacks.
    MissingKey {
        namespace: String,
        locale: String,
        key: String,
    },
    /// This locale defines a key the reference locale lacks.
    ExtraKey {
        namespace: String,
        locale: String,
        key: String,
    },
    /// The key's placeholders differ from the reference locale's.
    PlaceholderMismatch {
        namespace: String,
        locale: String,
        key: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// A listed key does not resolve, e.g. a JSON key containing a `.`.
    UnresolvableKey {
        namespace: String,
        locale: String,
        key: String,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey {
                namespace,
                locale,
                key,
            } => write!(f, "{namespace}/{locale}: missing key '{key}'"),
            Self::ExtraKey {
                namespace,
                locale,
                key,
            } => write!(f, "{namespace}/{locale}: key '{key}' is not in the reference locale"),
            Self::PlaceholderMismatch {
                namespace,
                locale,
                key,
                expected,
                found,
            } => write!(
                f,
                "{namespace}/{locale}: key '{key}' uses placeholders [{}], expected [{}]",
                found.join(", "),
                expected.join(", ")
            ),
            Self::UnresolvableKey {
                namespace,
                locale,
                key,
            } => write!(f, "{namespace}/{locale}: key '{key}' does not resolve to a message"),
        }
    }
}

/// Result of auditing one or more namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub reference_locale: String,
    pub catalogs_checked: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Audits `namespaces` across `locales` against `reference_locale`.
///
/// The reference locale is always checked for self-consistency, whether or
/// not it is listed in `locales`. Missing catalogs are errors, not findings.
pub fn audit<N, L>(
    registry: &CatalogRegistry,
    namespaces: &[N],
    locales: &[L],
    reference_locale: &str,
) -> Result<AuditReport, CatalogError>
where
    N: AsRef<str>,
    L: AsRef<str>,
{
    let mut findings = Vec::new();
    let mut catalogs_checked = 0;

    for namespace in namespaces {
        let namespace = namespace.as_ref();
        let reference = registry.load(namespace, reference_locale)?;
        findings.extend(check_resolvable(&reference));
        catalogs_checked += 1;

        for locale in locales {
            let locale = locale.as_ref();
            if locale == reference_locale {
                continue;
            }
            let candidate = registry.load(namespace, locale)?;
            findings.extend(check_resolvable(&candidate));
            findings.extend(compare(&reference, &candidate));
            catalogs_checked += 1;
        }
    }

    for finding in &findings {
        warn!(stage = "audit", %finding, "catalog content finding");
    }

    Ok(AuditReport {
        reference_locale: reference_locale.to_string(),
        catalogs_checked,
        findings,
    })
}

/// Compares a catalog's keys and placeholders with the reference catalog.
pub fn compare(reference: &Catalog, candidate: &Catalog) -> Vec<Finding> {
    let namespace = candidate.namespace().to_string();
    let locale = candidate.locale().to_string();
    let expected: BTreeSet<String> = reference.leaf_keys().into_iter().collect();
    let actual: BTreeSet<String> = candidate.leaf_keys().into_iter().collect();

    let mut findings: Vec<Finding> = expected
        .difference(&actual)
        .map(|key| Finding::MissingKey {
            namespace: namespace.clone(),
            locale: locale.clone(),
            key: key.clone(),
        })
        .collect();

    findings.extend(actual.difference(&expected).map(|key| Finding::ExtraKey {
        namespace: namespace.clone(),
        locale: locale.clone(),
        key: key.clone(),
    }));

    for key in expected.intersection(&actual) {
        let (Ok(reference_template), Ok(candidate_template)) =
            (reference.template(key), candidate.template(key))
        else {
            continue;
        };
        let wanted = sorted_placeholders(reference_template);
        let found = sorted_placeholders(candidate_template);
        if wanted != found {
            findings.push(Finding::PlaceholderMismatch {
                namespace: namespace.clone(),
                locale: locale.clone(),
                key: key.clone(),
                expected: wanted,
                found,
            });
        }
    }

    findings
}

fn check_resolvable(catalog: &Catalog) -> Vec<Finding> {
    catalog
        .leaf_keys()
        .into_iter()
        .filter(|key| catalog.template(key).is_err())
        .map(|key| Finding::UnresolvableKey {
            namespace: catalog.namespace().to_string(),
            locale: catalog.locale().to_string(),
            key,
        })
        .collect()
}

fn sorted_placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = placeholders(template).into_iter().map(String::from).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{EmbeddedSource, LayeredSource, MemorySource};
    use crate::types::CatalogId;

    const NAMESPACES: [&str; 3] = ["messages", "translations", "validation"];

    #[test]
    fn embedded_content_is_self_consistent() {
        let registry = CatalogRegistry::new(EmbeddedSource::new());
        let report = audit(&registry, &NAMESPACES, &["en"], "en").expect("audit embedded tables");
        assert!(report.is_clean(), "unexpected findings: {:?}", report.findings);
        assert_eq!(report.catalogs_checked, 3);
    }

    #[test]
    fn every_embedded_leaf_resolves_to_a_template() {
        let registry = CatalogRegistry::new(EmbeddedSource::new());
        for namespace in NAMESPACES {
            let catalog = registry.load(namespace, "en").expect("load");
            for key in catalog.leaf_keys() {
                assert!(
                    catalog.template(&key).is_ok(),
                    "{namespace}/en key '{key}' should resolve"
                );
            }
        }
    }

    #[test]
    fn reports_key_and_placeholder_drift() {
        let source = MemorySource::new()
            .with(
                "validation",
                "fr",
                r#"{
                    "required": "Le champ {field} est obligatoire",
                    "between": "Le champ {champ} doit être entre {min} et {max}",
                    "contract_form": { "client_required": "Le client doit être sélectionné" },
                    "legacy": "Ancien message"
                }"#,
            )
            .with(
                "validation",
                "en",
                r#"{
                    "required": "The {field} field is required",
                    "between": "The {field} field must be between {min} and {max}",
                    "contract_form": {
                        "client_required": "Client must be selected",
                        "worker_required": "Worker must be selected"
                    }
                }"#,
            );
        let registry = CatalogRegistry::new(source);

        let report = audit(&registry, &["validation"], &["en", "fr"], "en").expect("audit");
        assert_eq!(report.catalogs_checked, 2);
        assert_eq!(
            report.findings,
            vec![
                Finding::MissingKey {
                    namespace: "validation".into(),
                    locale: "fr".into(),
                    key: "contract_form.worker_required".into(),
                },
                Finding::ExtraKey {
                    namespace: "validation".into(),
                    locale: "fr".into(),
                    key: "legacy".into(),
                },
                Finding::PlaceholderMismatch {
                    namespace: "validation".into(),
                    locale: "fr".into(),
                    key: "between".into(),
                    expected: vec!["field".into(), "max".into(), "min".into()],
                    found: vec!["champ".into(), "max".into(), "min".into()],
                },
            ]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn dotted_json_keys_are_unresolvable() {
        let source = MemorySource::new().with("messages", "en", r#"{"worker.saved": "Saved"}"#);
        let registry = CatalogRegistry::new(source);
        let report = audit(&registry, &["messages"], &["en"], "en").expect("audit");
        assert_eq!(
            report.findings,
            vec![Finding::UnresolvableKey {
                namespace: "messages".into(),
                locale: "en".into(),
                key: "worker.saved".into(),
            }]
        );
    }

    #[test]
    fn missing_locale_is_an_error() {
        let registry = CatalogRegistry::new(LayeredSource::new().with_layer(EmbeddedSource::new()));
        let err = audit(&registry, &["messages"], &["en", "ar"], "en").expect_err("ar is missing");
        assert!(matches!(err, CatalogError::CatalogNotFound { ref locale, .. } if locale == "ar"));
        assert!(registry.is_cached("messages", "en"));
        assert_eq!(registry.cached(), vec![CatalogId::new("messages", "en")]);
    }

    #[test]
    fn findings_render_readably() {
        let finding = Finding::MissingKey {
            namespace: "messages".into(),
            locale: "fr".into(),
            key: "welcome".into(),
        };
        assert_eq!(finding.to_string(), "messages/fr: missing key 'welcome'");
    }
}
