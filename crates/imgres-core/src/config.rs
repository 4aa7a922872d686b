use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::pacing::DelayRange;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per page load (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/imgres/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgresConfig {
    /// Image search endpoint; the query string is appended to it.
    pub search_endpoint: String,
    /// User agent sent with result page requests.
    pub user_agent: String,
    /// Whole-request timeout for a results page fetch, in seconds.
    pub page_timeout_secs: u64,
    /// Timeout for a reachability HEAD check, in seconds.
    pub validate_timeout_secs: u64,
    /// Randomized delay after every provider query, in seconds.
    pub query_delay_secs: DelayRange,
    /// Randomized delay between categories, in seconds.
    pub category_delay_secs: DelayRange,
    /// Hosts blocked in addition to the built-in social media list.
    #[serde(default)]
    pub extra_blocked_hosts: Vec<String>,
    /// Directory (relative to the working directory) receiving output artifacts.
    pub output_dir: PathBuf,
    /// Optional catalog file; the embedded catalog is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Optional retry policy for page loads; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for ImgresConfig {
    fn default() -> Self {
        Self {
            search_endpoint: "https://www.bing.com/images/search".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            page_timeout_secs: 30,
            validate_timeout_secs: 5,
            query_delay_secs: DelayRange::new(0.8, 1.5),
            category_delay_secs: DelayRange::new(1.0, 2.0),
            extra_blocked_hosts: Vec::new(),
            output_dir: PathBuf::from("generated"),
            catalog_path: None,
            retry: None,
        }
    }
}

impl ImgresConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn validate_timeout(&self) -> Duration {
        Duration::from_secs(self.validate_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgres")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgresConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgresConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ImgresConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ImgresConfig::default();
        assert_eq!(cfg.validate_timeout_secs, 5);
        assert_eq!(cfg.page_timeout_secs, 30);
        assert_eq!(cfg.output_dir, PathBuf::from("generated"));
        assert!(cfg.catalog_path.is_none());
        assert!(cfg.query_delay_secs.min_secs <= cfg.query_delay_secs.max_secs);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ImgresConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ImgresConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.search_endpoint, cfg.search_endpoint);
        assert_eq!(parsed.page_timeout_secs, cfg.page_timeout_secs);
        assert_eq!(parsed.category_delay_secs, cfg.category_delay_secs);
    }

    #[test]
    fn config_toml_custom_values_and_retry() {
        let toml = r#"
            search_endpoint = "http://127.0.0.1:8080/images/search"
            user_agent = "test-agent"
            page_timeout_secs = 5
            validate_timeout_secs = 1
            query_delay_secs = { min_secs = 0.0, max_secs = 0.0 }
            category_delay_secs = { min_secs = 0.5, max_secs = 1.0 }
            extra_blocked_hosts = ["x.com"]
            output_dir = "out"

            [retry]
            max_attempts = 2
            base_delay_secs = 0.25
            max_delay_secs = 4
        "#;
        let cfg: ImgresConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.extra_blocked_hosts, vec!["x.com".to_string()]);
        assert_eq!(cfg.validate_timeout(), Duration::from_secs(1));
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_secs(4));
    }

    #[test]
    fn missing_retry_section_uses_defaults() {
        let cfg = ImgresConfig::default();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, RetryConfig::default().max_attempts);
    }
}
