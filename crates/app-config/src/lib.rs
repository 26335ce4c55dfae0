// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::Settings;

/// Loads the application settings from the `config/` directory.
///
/// The environment name comes from `APP_ENVIRONMENT` and defaults to "development".
pub fn load_settings() -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new("config"), &environment)
}

/// Loads the application settings from `dir`.
///
/// This function orchestrates the layered configuration loading:
/// 1. Starts from built-in defaults.
/// 2. Merges a `base.toml` file, if present.
/// 3. Merges an environment-specific file (e.g., `development.toml`), if present.
/// 4. Merges environment variables (e.g., `APP_PRICE_PROVIDER__API_KEY=...`).
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        .set_default("app.environment", environment)?
        .set_default("app.log_level", "info")?
        .set_default("price_provider.api_key", "")?
        .set_default("price_provider.base_url", "https://financialmodelingprep.com")?
        .set_default("price_provider.timeout_secs", 30)?
        .set_default("artifacts.dir", "models/artifacts")?
        .set_default("signals.threshold", 0.01)?
        .set_default("signals.window_size", 14)?
        .set_default("signals.lookback_days", 90)?
        .set_default("signals.training_days", 365)?
        .add_source(File::with_name(&dir.join("base").to_string_lossy()).required(false))
        .add_source(File::with_name(&dir.join(environment).to_string_lossy()).required(false))
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").prefix_separator("_").separator("__"))
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_apply_without_any_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), "test").unwrap();

        assert_eq!(settings.app.environment, "test");
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.signals.window_size, 14);
        assert_eq!(settings.signals.threshold, 0.01);
        assert_eq!(settings.price_provider.timeout_secs, 30);
    }

    #[test]
    fn environment_file_overrides_base_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            "[price_provider]\napi_key = \"base-key\"\n\n[signals]\nlookback_days = 120\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("production.toml"),
            "[app]\nlog_level = \"warn\"\n\n[signals]\nlookback_days = 200\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), "production").unwrap();
        assert_eq!(settings.price_provider.api_key, "base-key");
        assert_eq!(settings.app.log_level, "warn");
        assert_eq!(settings.signals.lookback_days, 200);
        assert_eq!(settings.signals.training_days, 365);
    }

    #[test]
    fn malformed_values_are_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[signals]\nwindow_size = \"wide\"\n").unwrap();

        assert!(matches!(
            load_settings_from(dir.path(), "development"),
            Err(Error::LoadError(_))
        ));
    }
}
