use super::config::BrowserConfig;
use crate::fetch::FetchError;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;

/// Owns one Chrome process and hands out tabs
pub struct BrowserManager {
    browser: Arc<Browser>,
}

impl BrowserManager {
    /// Launch a browser with the given configuration
    pub fn new(config: BrowserConfig) -> Result<Self, BrowserError> {
        let args = config.chrome_args();
        let launch_options = Self::build_launch_options(&config, &args)?;

        log::debug!(
            "Launching browser (path: {:?}, headless: {})",
            config.executable_path,
            config.headless
        );
        let browser = Browser::new(launch_options)
            .map_err(|e| BrowserError::InitializationError(e.to_string()))?;

        Ok(Self {
            browser: Arc::new(browser),
        })
    }

    /// Build Chrome launch options from our config
    fn build_launch_options<'a>(
        config: &BrowserConfig,
        args: &'a [String],
    ) -> Result<LaunchOptions<'a>, BrowserError> {
        let os_args: Vec<&'a OsStr> = args.iter().map(OsStr::new).collect();

        LaunchOptions::default_builder()
            .path(config.executable_path.clone())
            .headless(config.headless)
            .window_size(Some((config.window_size.0, config.window_size.1)))
            .args(os_args)
            .build()
            .map_err(|e| BrowserError::ConfigurationError(e.to_string()))
    }

    /// Create a new tab for scraping
    pub fn new_tab(&self) -> Result<Arc<Tab>, BrowserError> {
        self.browser
            .new_tab()
            .map_err(|e| BrowserError::TabCreationError(e.to_string()))
    }
}

/// Errors that can occur during browser operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    #[error("Browser configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tab creation failed: {0}")]
    TabCreationError(String),

    #[error("Navigation error: {0}")]
    NavigationError(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("HTML extraction error: {0}")]
    HtmlExtractionError(String),
}

impl BrowserError {
    /// Whether trying the same page again could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BrowserError::NavigationError(_)
                | BrowserError::Timeout(_)
                | BrowserError::HtmlExtractionError(_)
        )
    }
}

impl From<BrowserError> for FetchError {
    fn from(e: BrowserError) -> Self {
        if e.is_retryable() {
            FetchError::Retryable(e.to_string())
        } else {
            FetchError::Terminal(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_launch_options_build() {
        let config = BrowserConfig::with_executable("/opt/chrome/chrome");
        let args = config.chrome_args();
        let options = BrowserManager::build_launch_options(&config, &args).unwrap();

        assert_eq!(options.path, Some(PathBuf::from("/opt/chrome/chrome")));
        assert!(options.headless);
        assert!(options
            .args
            .iter()
            .any(|arg| arg.to_string_lossy().contains("imagesEnabled=false")));
    }

    #[test]
    fn test_error_classification() {
        assert!(BrowserError::Timeout("body".into()).is_retryable());
        assert!(BrowserError::NavigationError("reset".into()).is_retryable());
        assert!(!BrowserError::InitializationError("no chrome".into()).is_retryable());
        assert!(!BrowserError::TabCreationError("closed".into()).is_retryable());

        let fetch: FetchError = BrowserError::ConfigurationError("bad".into()).into();
        assert!(!fetch.is_retryable());
        let fetch: FetchError = BrowserError::HtmlExtractionError("empty".into()).into();
        assert!(fetch.is_retryable());
    }

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn test_browser_manager_creation() {
        let manager = BrowserManager::new(BrowserConfig::default()).unwrap();
        assert!(manager.new_tab().is_ok());
    }
}
