//! Environment-driven configuration, read once per cold start.
//!
//! Variables:
//! - `PURGE_CATEGORY` (required): `docs`, `media`, `frontend-release`,
//!   `storybook-release`, `frontend-sandbox` or `storybook-sandbox`
//! - `PURGE_BASE_URL` (default: the category's public URL)
//! - `PURGE_TIMEOUT_SECS` (default: 30)
//! - `STORAGE_ENDPOINT_URL` (default: the regional AWS endpoint)

use cache_purge_core::category::ArtifactCategory;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("PURGE_CATEGORY must be configured")]
    MissingCategory,

    #[error("PURGE_CATEGORY is invalid: {0}")]
    UnknownCategory(String),

    #[error("{var} is not an absolute http(s) URL: {value}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("PURGE_TIMEOUT_SECS must be a positive integer, got {0}")]
    InvalidTimeout(String),
}

/// Binding of one worker instance to its artifact category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub category: ArtifactCategory,
    pub base_url: String,
}

impl WorkerConfig {
    pub fn for_category(category: ArtifactCategory) -> Self {
        Self {
            category,
            base_url: category.default_base_url().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker: WorkerConfig,
    pub timeout_secs: u64,
    pub storage_endpoint_url: Option<String>,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let category = lookup("PURGE_CATEGORY")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingCategory)?
            .parse::<ArtifactCategory>()
            .map_err(|error| ConfigError::UnknownCategory(error.to_string()))?;

        let mut worker = WorkerConfig::for_category(category);
        if let Some(base_url) = non_empty(lookup("PURGE_BASE_URL")) {
            worker.base_url = validated_url("PURGE_BASE_URL", base_url)?;
        }

        let timeout_secs = match non_empty(lookup("PURGE_TIMEOUT_SECS")) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let storage_endpoint_url = non_empty(lookup("STORAGE_ENDPOINT_URL"))
            .map(|value| validated_url("STORAGE_ENDPOINT_URL", value))
            .transpose()?;

        Ok(Self {
            worker,
            timeout_secs,
            storage_endpoint_url,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn validated_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    match Url::parse(value.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Ok(value.trim().to_string())
        }
        _ => Err(ConfigError::InvalidUrl { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn category_alone_uses_defaults() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[("PURGE_CATEGORY", "media")]))
            .expect("config should load");
        assert_eq!(config.worker.category, ArtifactCategory::Media);
        assert_eq!(config.worker.base_url, "https://media.jicloud.org");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.storage_endpoint_url, None);
    }

    #[test]
    fn missing_category_is_rejected() {
        let error = RuntimeConfig::from_lookup(lookup_from(&[])).expect_err("category required");
        assert_eq!(error, ConfigError::MissingCategory);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let error = RuntimeConfig::from_lookup(lookup_from(&[("PURGE_CATEGORY", "assets")]))
            .expect_err("unknown category");
        assert!(error.to_string().contains("unknown artifact category `assets`"));
    }

    #[test]
    fn base_url_override_is_validated() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            ("PURGE_CATEGORY", "docs"),
            ("PURGE_BASE_URL", "https://static.example.com/"),
            ("PURGE_TIMEOUT_SECS", "5"),
            ("STORAGE_ENDPOINT_URL", "https://storage.googleapis.com"),
        ]))
        .expect("config should load");
        assert_eq!(config.worker.base_url, "https://static.example.com/");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(
            config.storage_endpoint_url.as_deref(),
            Some("https://storage.googleapis.com")
        );

        let error = RuntimeConfig::from_lookup(lookup_from(&[
            ("PURGE_CATEGORY", "docs"),
            ("PURGE_BASE_URL", "static.example.com"),
        ]))
        .expect_err("relative url should fail");
        assert!(matches!(error, ConfigError::InvalidUrl { var: "PURGE_BASE_URL", .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let error = RuntimeConfig::from_lookup(lookup_from(&[
            ("PURGE_CATEGORY", "docs"),
            ("PURGE_TIMEOUT_SECS", "0"),
        ]))
        .expect_err("zero timeout");
        assert_eq!(error, ConfigError::InvalidTimeout("0".to_string()));
    }

    #[test]
    fn every_category_builds_a_worker_config() {
        for category in ArtifactCategory::ALL {
            let config = WorkerConfig::for_category(category);
            assert_eq!(config.base_url, category.default_base_url());
        }
    }
}
