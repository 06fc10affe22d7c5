//! Configuration loader and data directory resolution for SkillSwap.
//!
//! Reads `config.toml` (from `--config`, or the data directory by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use skillswap_types::config::AppConfig;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `SKILLSWAP_DATA_DIR` environment variable
/// 2. `~/.skillswap`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SKILLSWAP_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".skillswap");
    }

    // Last resort: current directory
    PathBuf::from(".skillswap")
}

/// Path of the config file inside a data directory.
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// The database URL to open: the configured one, or `skillswap.db` in the
/// data directory.
pub fn resolve_database_url(config: &AppConfig, data_dir: &Path) -> String {
    match &config.database.url {
        Some(url) => url.clone(),
        None => format!("sqlite://{}?mode=rwc", data_dir.join("skillswap.db").display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).await;
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.feed.default_limit, 10);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = default_config_path(tmp.path());
        tokio::fs::write(
            &path,
            r#"
[server]
port = 8080

[feed]
max_limit = 25

[logging]
json = true
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.feed.max_limit, 25);
        assert_eq!(config.feed.default_limit, 10);
        assert!(config.logging.json);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = default_config_path(tmp.path());
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn resolve_database_url_prefers_configured() {
        let mut config = AppConfig::default();
        config.database.url = Some("sqlite://elsewhere.db".to_string());
        assert_eq!(
            resolve_database_url(&config, Path::new("/data")),
            "sqlite://elsewhere.db"
        );
    }

    #[test]
    fn resolve_database_url_falls_back_to_data_dir() {
        let url = resolve_database_url(&AppConfig::default(), Path::new("/data"));
        assert_eq!(url, "sqlite:///data/skillswap.db?mode=rwc");
    }
}
