use crate::subtitle::SubtitleFormat;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = "subtitle-desk";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REFRESH_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_EXPORT_FORMAT: &str = "srt";
pub const API_URL_ENV: &str = "SUBTITLE_DESK_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub refresh_timeout_ms: u64,
    pub export_dir: Option<String>,
    pub export_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            refresh_timeout_ms: DEFAULT_REFRESH_TIMEOUT_MS,
            export_dir: None,
            export_format: DEFAULT_EXPORT_FORMAT.to_string(),
        }
    }
}

impl AppConfig {
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    pub fn subtitle_format(&self) -> SubtitleFormat {
        SubtitleFormat::parse(&self.export_format).unwrap_or_default()
    }

    /// Where exported files land; the working directory unless configured.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            trimmed.to_string()
        }
        _ => {
            tracing::warn!("Invalid service URL '{}', using {}", input, DEFAULT_API_BASE_URL);
            DEFAULT_API_BASE_URL.to_string()
        }
    }
}

pub fn normalize_export_format(input: &str) -> String {
    SubtitleFormat::parse(input)
        .map(|format| format.extension().to_string())
        .unwrap_or_else(|| DEFAULT_EXPORT_FORMAT.to_string())
}

pub fn config_path() -> Result<PathBuf, String> {
    let dir = dirs::config_dir()
        .ok_or_else(|| "Failed to resolve config dir".to_string())?
        .join(CONFIG_DIR);
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
    Ok(dir.join(CONFIG_FILE))
}

/// Reads the config, writing defaults when missing. An unreadable file is
/// kept as `config.json.bak` and replaced with defaults.
pub fn load_or_create(path: &Path) -> Result<AppConfig, String> {
    if !path.exists() {
        let config = AppConfig::default();
        save(path, &config)?;
        return Ok(config);
    }

    let raw = fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;
    match serde_json::from_str::<AppConfig>(&raw) {
        Ok(mut config) => {
            normalize_config(&mut config);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!("Config at {} is invalid ({}), resetting", path.display(), e);
            let backup = path.with_extension("json.bak");
            let _ = fs::copy(path, backup);
            let config = AppConfig::default();
            save(path, &config)?;
            Ok(config)
        }
    }
}

pub fn save(path: &Path, config: &AppConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Failed to save config: {}", e))
}

/// Applies `SUBTITLE_DESK_API_URL` for this process only.
pub fn apply_env_overrides(config: &mut AppConfig) {
    apply_api_url_override(config, std::env::var(API_URL_ENV).ok());
}

fn apply_api_url_override(config: &mut AppConfig, value: Option<String>) {
    if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
        config.api_base_url = normalize_base_url(&url);
        tracing::info!("Service URL overridden from {}: {}", API_URL_ENV, config.api_base_url);
    }
}

fn normalize_config(config: &mut AppConfig) {
    config.api_base_url = normalize_base_url(&config.api_base_url);
    config.export_format = normalize_export_format(&config.export_format);
    if config.refresh_timeout_ms == 0 {
        config.refresh_timeout_ms = DEFAULT_REFRESH_TIMEOUT_MS;
    }
    config.export_dir = config
        .export_dir
        .take()
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = load_or_create(&path).unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
        assert_eq!(config.refresh_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_invalid_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let config = load_or_create(&path).unwrap();

        assert_eq!(config, AppConfig::default());
        let backup = dir.path().join("config.json.bak");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
    }

    #[test]
    fn test_values_are_normalized_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{"api_base_url": "https://subs.example.com/", "refresh_timeout_ms": 0,
                "export_dir": "  ", "export_format": "WebVTT"}"#,
        )
        .unwrap();

        let config = load_or_create(&path).unwrap();

        assert_eq!(config.api_base_url, "https://subs.example.com");
        assert_eq!(config.refresh_timeout_ms, DEFAULT_REFRESH_TIMEOUT_MS);
        assert_eq!(config.export_dir, None);
        assert_eq!(config.subtitle_format(), SubtitleFormat::Vtt);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"export_dir": "/tmp/subs"}"#).unwrap();

        let config = load_or_create(&path).unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/subs"));
    }

    #[test]
    fn test_bad_url_falls_back_to_default() {
        assert_eq!(normalize_base_url("localhost:8080"), DEFAULT_API_BASE_URL);
        assert_eq!(normalize_base_url("ftp://host"), DEFAULT_API_BASE_URL);
        assert_eq!(normalize_base_url(" http://10.0.0.2:9000/ "), "http://10.0.0.2:9000");
    }

    #[test]
    fn test_env_override() {
        let mut config = AppConfig::default();
        apply_api_url_override(&mut config, Some("http://remote:8080/".to_string()));
        assert_eq!(config.api_base_url, "http://remote:8080");

        apply_api_url_override(&mut config, Some("  ".to_string()));
        assert_eq!(config.api_base_url, "http://remote:8080");
    }
}
