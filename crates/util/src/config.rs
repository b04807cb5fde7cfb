use std::{env, fmt, path::PathBuf};

use super::{list_from_env, DEFAULT_LOCALES, DEFAULT_NAMESPACES};

/// Application runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }

    /// Returns the canonical name used for logging labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    /// Directory of `<locale>/<namespace>.json` files layered over the embedded tables.
    pub locales_dir: Option<PathBuf>,
    pub reference_locale: String,
    pub locales: Vec<String>,
    pub namespaces: Vec<String>,
}

impl AppConfig {
    /// Constructs the configuration by reading and validating environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_value = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let environment = Environment::from_str(&env_value)?;

        let locales_dir = match env::var("I18N_LOCALES_DIR") {
            Ok(value) if !value.trim().is_empty() => {
                let path = PathBuf::from(value.trim());
                if !path.is_dir() {
                    return Err(ConfigError::LocalesDir(path));
                }
                Some(path)
            }
            _ => None,
        };

        let reference_locale =
            env::var("I18N_REFERENCE_LOCALE").unwrap_or_else(|_| DEFAULT_LOCALES.to_string());
        let reference_locale = reference_locale.trim().to_string();
        validate_identifier("I18N_REFERENCE_LOCALE", &reference_locale)?;

        let locales = list_from_env("I18N_LOCALES", DEFAULT_LOCALES);
        validate_list("I18N_LOCALES", &locales)?;

        let namespaces = list_from_env("I18N_NAMESPACES", DEFAULT_NAMESPACES);
        validate_list("I18N_NAMESPACES", &namespaces)?;

        Ok(Self {
            environment,
            locales_dir,
            reference_locale,
            locales,
            namespaces,
        })
    }
}

fn validate_list(variable: &'static str, items: &[String]) -> Result<(), ConfigError> {
    if items.is_empty() {
        return Err(ConfigError::EmptyList(variable));
    }
    items
        .iter()
        .try_for_each(|item| validate_identifier(variable, item))
}

// Same character rule as `domus_i18n_core::types::is_identifier`; the two must agree
// or `DirectorySource` will treat configured locales as absent.
fn validate_identifier(variable: &'static str, value: &str) -> Result<(), ConfigError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            variable,
            value: value.to_string(),
        })
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    LocalesDir(PathBuf),
    EmptyList(&'static str),
    InvalidIdentifier {
        variable: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnvironment(value) => write!(
                f,
                "APP_ENV must be one of 'development', 'production', or 'test' (got {value})"
            ),
            Self::LocalesDir(path) => write!(
                f,
                "I18N_LOCALES_DIR must point to an existing directory (got {})",
                path.display()
            ),
            Self::EmptyList(variable) => write!(f, "{variable} must list at least one value"),
            Self::InvalidIdentifier { variable, value } => write!(
                f,
                "{variable} entries may only contain ASCII letters, digits, '_' or '-' (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{LazyLock, Mutex};

    static ENV_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    const VARIABLES: [&str; 5] = [
        "APP_ENV",
        "I18N_LOCALES_DIR",
        "I18N_REFERENCE_LOCALE",
        "I18N_LOCALES",
        "I18N_NAMESPACES",
    ];

    fn reset_env() {
        for variable in VARIABLES {
            env::remove_var(variable);
        }
    }

    #[test]
    fn loads_defaults_in_development() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        reset_env();

        let config = AppConfig::from_env().expect("config should load with defaults");
        assert_eq!(config.environment, Environment::Development);
        assert!(config.locales_dir.is_none());
        assert_eq!(config.reference_locale, "en");
        assert_eq!(config.locales, vec!["en"]);
        assert_eq!(config.namespaces, vec!["messages", "translations", "validation"]);
    }

    #[test]
    fn rejects_invalid_environment() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        reset_env();
        env::set_var("APP_ENV", "invalid");

        let err = AppConfig::from_env().expect_err("invalid env should error");
        assert!(matches!(err, ConfigError::InvalidEnvironment(value) if value == "invalid"));

        reset_env();
    }

    #[test]
    fn parses_production_environment_with_content_dir() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        reset_env();
        let dir = tempfile::tempdir().expect("tempdir");
        env::set_var("APP_ENV", "production");
        env::set_var("I18N_LOCALES_DIR", dir.path());
        env::set_var("I18N_LOCALES", "en,fr");
        env::set_var("I18N_NAMESPACES", "validation");

        let config = AppConfig::from_env().expect("config should load");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.locales_dir.as_deref(), Some(dir.path()));
        assert_eq!(config.locales, vec!["en", "fr"]);
        assert_eq!(config.namespaces, vec!["validation"]);

        reset_env();
    }

    #[test]
    fn rejects_missing_locales_dir() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        reset_env();
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent");
        env::set_var("I18N_LOCALES_DIR", &missing);

        let err = AppConfig::from_env().expect_err("missing dir should error");
        assert!(matches!(err, ConfigError::LocalesDir(path) if path == missing));

        reset_env();
    }

    #[test]
    fn rejects_path_like_locales() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        reset_env();
        env::set_var("I18N_LOCALES", "en,../etc");

        let err = AppConfig::from_env().expect_err("path segments are not locales");
        assert!(matches!(
            err,
            ConfigError::InvalidIdentifier { variable: "I18N_LOCALES", ref value } if value == "../etc"
        ));

        reset_env();
    }

    #[test]
    fn identifier_rule_accepts_locale_tags_and_rejects_paths() {
        assert!(validate_identifier("I18N_LOCALES", "pt-BR").is_ok());
        assert!(validate_identifier("I18N_NAMESPACES", "business_rules").is_ok());
        for value in ["", "..", "en/../etc", "en.US"] {
            assert!(
                validate_identifier("I18N_LOCALES", value).is_err(),
                "'{value}' should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_namespace_list() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        reset_env();
        env::set_var("I18N_NAMESPACES", " , ");

        let err = AppConfig::from_env().expect_err("empty list should error");
        assert!(matches!(err, ConfigError::EmptyList("I18N_NAMESPACES")));

        reset_env();
    }
}
