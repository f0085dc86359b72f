use crate::browser::BrowserConfig;
use crate::error::ConfigError;
use crate::fetch::RetryPolicy;
use crate::query::{SellerType, DEFAULT_SITE};
use crate::table::FailurePolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub browser: BrowserSection,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrapeConfig {
    /// craigslist sub-site, e.g. `sfbay`
    #[serde(default = "default_site")]
    pub site: String,

    #[serde(default = "default_seller_type")]
    pub seller_type: SellerType,

    /// CSV file the table is written to
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// What failed listings turn into
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserSection {
    /// Chrome/Chromium binary; auto-detected when absent
    #[serde(default)]
    pub executable_path: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Per-page navigation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Disable images in browser (faster loading)
    #[serde(default = "default_true")]
    pub disable_images: bool,

    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// Extra attempts for a page that failed with a retryable error
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial retry delay in milliseconds
    #[serde(default = "default_initial_retry_delay")]
    pub initial_retry_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    #[serde(default = "default_max_retry_delay")]
    pub max_retry_delay_ms: u64,
}

fn default_true() -> bool { true }
fn default_site() -> String { DEFAULT_SITE.to_string() }
fn default_seller_type() -> SellerType { SellerType::All }
fn default_output() -> PathBuf { PathBuf::from("listings.csv") }
fn default_window_width() -> u32 { 1920 }
fn default_window_height() -> u32 { 1080 }
fn default_timeout() -> u64 { 30 }
fn default_max_retries() -> usize { 2 }
fn default_initial_retry_delay() -> u64 { 500 }
fn default_max_retry_delay() -> u64 { 8000 }

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            site: default_site(),
            seller_type: default_seller_type(),
            output: default_output(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            executable_path: None,
            headless: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            timeout_secs: default_timeout(),
            disable_images: true,
            user_agent: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_retry_delay_ms: default_initial_retry_delay(),
            max_retry_delay_ms: default_max_retry_delay(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    pub fn load() -> Self {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            match Self::load_from(path) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("{}; using defaults", e),
            }
        }
        Self::default()
    }

    /// Load an explicitly named config file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Invalid {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Browser settings for a [`crate::browser::BrowserSession`]
    pub fn browser_config(&self) -> BrowserConfig {
        let section = &self.browser;
        let defaults = BrowserConfig::default();
        BrowserConfig {
            executable_path: section.executable_path.clone(),
            headless: section.headless,
            window_size: (section.window_width, section.window_height),
            user_agent: section.user_agent.clone().or(defaults.user_agent),
            timeout_seconds: section.timeout_secs,
            disable_images: section.disable_images,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            initial_delay_ms: self.retry.initial_retry_delay_ms,
            max_delay_ms: self.retry.max_retry_delay_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.scrape.site, "sfbay");
        assert_eq!(cfg.scrape.seller_type, SellerType::All);
        assert_eq!(cfg.scrape.output, PathBuf::from("listings.csv"));
        assert_eq!(cfg.scrape.failure_policy, FailurePolicy::NullRow);
        assert!(cfg.browser.headless);
        assert_eq!(cfg.retry.max_retries, 2);
    }

    #[test]
    fn test_full_config() {
        let cfg = Config::from_toml(
            r#"
            [scrape]
            site = "seattle"
            seller_type = "owner"
            output = "out/cars.csv"
            failure_policy = "exclude"

            [browser]
            executable_path = "/usr/bin/chromium"
            headless = false
            timeout_secs = 45

            [retry]
            max_retries = 4
            initial_retry_delay_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(cfg.scrape.site, "seattle");
        assert_eq!(cfg.scrape.seller_type, SellerType::Owner);
        assert_eq!(cfg.scrape.failure_policy, FailurePolicy::Exclude);

        let browser = cfg.browser_config();
        assert_eq!(browser.executable_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(!browser.headless);
        assert_eq!(browser.timeout_seconds, 45);
        assert_eq!(browser.window_size, (1920, 1080));
        assert!(browser.user_agent.is_some());

        let retry = cfg.retry_policy();
        assert_eq!(retry.max_retries, 4);
        assert_eq!(retry.initial_delay_ms, 250);
        assert_eq!(retry.max_delay_ms, 8000);
    }

    #[test]
    fn test_bad_seller_type_rejected() {
        assert!(Config::from_toml("[scrape]\nseller_type = \"private\"").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Config::load_from("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
