mod startup;
mod telemetry;

use domus_i18n_util::{load_env_file, AppConfig};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;

    let registry = startup::build_registry(&config);
    info!(
        stage = "app",
        env = %config.environment.as_str(),
        locales_dir = ?config.locales_dir,
        reference_locale = %config.reference_locale,
        "starting catalog warm-up"
    );

    let summary = startup::warm_up(&registry, &config)?;
    info!(
        stage = "app",
        catalogs = summary.catalogs_loaded,
        audited = summary.report.catalogs_checked,
        "catalogs ready"
    );
    Ok(())
}
