use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::core::tabs::Tab;

pub const CONFIG_FILE: &str = "config.toml";
pub const API_URL_ENV: &str = "NANODASH_API_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Periodic refresh of the active tab. 0 disables it.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_reply_delay")]
    pub reply_delay_ms: u64,

    #[serde(default = "default_placeholder_reply")]
    pub placeholder_reply: String,

    #[serde(default = "default_tab")]
    pub default_tab: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    "http://127.0.0.1:18790/dashboard/api".to_string()
}
fn default_request_timeout() -> u64 {
    10
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_reply_delay() -> u64 {
    1000
}
fn default_placeholder_reply() -> String {
    "Message received. The agent will answer from its own runtime.".to_string()
}
fn default_tab() -> String {
    Tab::Gateway.id().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            refresh_interval_secs: default_refresh_interval(),
            reply_delay_ms: default_reply_delay(),
            placeholder_reply: default_placeholder_reply(),
            default_tab: default_tab(),
            log_level: default_log_level(),
        }
    }
}

impl DashboardConfig {
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Read `path`, falling back to defaults when the file does not exist.
    /// `NANODASH_API_URL` overrides the file. Not validated yet: callers
    /// apply their own overrides first.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load_file(path).await?;
        config.override_api_url(std::env::var(API_URL_ENV).ok().as_deref());
        Ok(config)
    }

    pub async fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No {} found, using default dashboard config.", path.display());
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let config: DashboardConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        info!(
            "Loaded dashboard config: api_url={}, timeout={}s, refresh={}s",
            config.api_url, config.request_timeout_secs, config.refresh_interval_secs
        );
        Ok(config)
    }

    /// Blank values are ignored.
    pub fn override_api_url(&mut self, url: Option<&str>) {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            self.api_url = url.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api_url)
            .with_context(|| format!("invalid api_url '{}'", self.api_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("api_url must use http or https, got '{}'", parsed.scheme());
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }
        self.initial_tab()?;
        Ok(())
    }

    pub fn initial_tab(&self) -> Result<Tab> {
        self.default_tab
            .parse::<Tab>()
            .map_err(|e| anyhow::anyhow!("default_tab: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_file(DashboardConfig::default_path(dir.path()))
            .await
            .unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.initial_tab().unwrap(), Tab::Gateway);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "api_url = \"http://10.0.0.5:18790/dashboard/api\"\nrefresh_interval_secs = 0\ndefault_tab = \"chat\"\n",
        )
        .unwrap();

        let config = DashboardConfig::load_file(&path).await.unwrap();
        assert_eq!(config.api_url, "http://10.0.0.5:18790/dashboard/api");
        assert_eq!(config.refresh_interval(), None);
        assert_eq!(config.initial_tab().unwrap(), Tab::Chat);
        assert_eq!(config.reply_delay_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "request_timeout_secs = \"ten\"").unwrap();
        assert!(DashboardConfig::load_file(&path).await.is_err());
    }

    #[test]
    fn override_ignores_blank_values() {
        let mut config = DashboardConfig::default();
        config.override_api_url(Some("   "));
        assert_eq!(config.api_url, default_api_url());
        config.override_api_url(Some("https://dash.example/api"));
        assert_eq!(config.api_url, "https://dash.example/api");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = DashboardConfig {
            api_url: "ftp://host/api".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.api_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api_url = default_api_url();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 5;
        config.default_tab = "settings".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_tab"));
    }
}
