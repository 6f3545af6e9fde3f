/// Application settings loaded from the environment
///
/// Values come from process environment variables, optionally seeded from
/// a `.env` file in the working directory or in the user's config directory:
/// - Linux: ~/.config/face-gallery/.env
/// - macOS: ~/Library/Application Support/face-gallery/.env
/// - Windows: %APPDATA%\face-gallery\.env
///
/// Variables already present in the environment win over `.env` entries.

use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const API_URL: &str = "FACE_GALLERY_API_URL";
const REQUEST_TIMEOUT: &str = "FACE_GALLERY_REQUEST_TIMEOUT_SECS";
const STALE_SECS: &str = "FACE_GALLERY_STALE_SECS";
const TOAST_SECS: &str = "FACE_GALLERY_TOAST_SECS";
const LOG_FILTER: &str = "FACE_GALLERY_LOG";

const DEFAULT_API_URL: &str = "http://localhost:8000/api/";
const DEFAULT_TOAST_SECS: u64 = 5;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the gallery API, always ending in `/`
    pub api_url: Url,
    /// Request timeout; `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
    /// How long a fetched image list counts as fresh
    pub stale_time: Duration,
    /// How long a notification stays on screen
    pub toast_lifetime: Duration,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl Settings {
    /// Load settings from `.env` files and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        if let Some(path) = Self::user_env_path() {
            dotenvy::from_path(path).ok();
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup(API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_base_url(&raw_url)?;

        let request_timeout = parse_seconds(REQUEST_TIMEOUT, lookup(REQUEST_TIMEOUT))?;
        let stale_time = parse_seconds(STALE_SECS, lookup(STALE_SECS))?.unwrap_or(Duration::ZERO);
        let toast_lifetime = parse_seconds(TOAST_SECS, lookup(TOAST_SECS))?
            .unwrap_or(Duration::from_secs(DEFAULT_TOAST_SECS));

        let log_filter = lookup(LOG_FILTER)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Settings {
            api_url,
            request_timeout,
            stale_time,
            toast_lifetime,
            log_filter,
        })
    }

    fn user_env_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("face-gallery");
        path.push(".env");
        path.exists().then_some(path)
    }
}

/// Parse the base URL, appending a trailing slash so relative joins
/// (`images`, `images/`) land under the configured path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl {
        key: API_URL,
        reason: e.to_string(),
    })
}

fn parse_seconds(key: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidSeconds { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.api_url.as_str(), "http://localhost:8000/api/");
        assert_eq!(settings.request_timeout, None);
        assert_eq!(settings.stale_time, Duration::ZERO);
        assert_eq!(settings.toast_lifetime, Duration::from_secs(5));
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_trailing_slash_is_added() {
        let settings = settings_from(&[(API_URL, "http://10.0.0.5:9000/api")]).unwrap();
        assert_eq!(settings.api_url.as_str(), "http://10.0.0.5:9000/api/");
        assert_eq!(
            settings.api_url.join("images/").unwrap().as_str(),
            "http://10.0.0.5:9000/api/images/"
        );
    }

    #[test]
    fn test_seconds_are_parsed() {
        let settings = settings_from(&[
            (REQUEST_TIMEOUT, "30"),
            (STALE_SECS, "60"),
            (TOAST_SECS, " 8 "),
        ])
        .unwrap();
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.stale_time, Duration::from_secs(60));
        assert_eq!(settings.toast_lifetime, Duration::from_secs(8));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert_eq!(
            settings_from(&[(TOAST_SECS, "soon")]),
            Err(ConfigError::InvalidSeconds {
                key: TOAST_SECS,
                value: "soon".to_string()
            })
        );
        assert!(matches!(
            settings_from(&[(API_URL, "not a url")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
