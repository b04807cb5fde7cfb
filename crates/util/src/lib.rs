pub mod config;

use std::env;

pub use config::{AppConfig, ConfigError, Environment};

pub const DEFAULT_LOCALES: &str = "en";
pub const DEFAULT_NAMESPACES: &str = "messages,translations,validation";

/// Loads environment variables from `.env` when available.
///
/// Missing files are ignored so the function is safe in production builds
/// where dotenv files are not deployed.
pub fn load_env_file() {
    let _ = dotenvy::dotenv();
}

/// Reads a comma-separated list from `name`, falling back to `default`.
///
/// Items are trimmed and empty items are dropped, so `"en, fr,"` yields
/// `["en", "fr"]`.
pub fn list_from_env(name: &str, default: &str) -> Vec<String> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    split_list(&value)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
