use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Chrome instance driving a scrape
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Chrome/Chromium executable; auto-detected when `None`
    pub executable_path: Option<PathBuf>,

    /// Run browser in headless mode
    pub headless: bool,

    /// Browser window size
    pub window_size: (u32, u32),

    /// Custom user agent
    pub user_agent: Option<String>,

    /// Navigation timeout in seconds
    pub timeout_seconds: u64,

    /// Disable image loading for performance
    pub disable_images: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable_path: None,
            headless: true,
            window_size: (1920, 1080),
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            timeout_seconds: 30,
            disable_images: true,
        }
    }
}

impl BrowserConfig {
    /// Default configuration pointed at a specific browser binary
    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            executable_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Extra command line flags passed to Chrome
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec!["--disable-dev-shm-usage".to_string()];
        if self.disable_images {
            args.push("--blink-settings=imagesEnabled=false".to_string());
        }
        if let Some(ua) = &self.user_agent {
            args.push(format!("--user-agent={}", ua));
        }
        args
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.window_size, (1920, 1080));
        assert!(config.user_agent.is_some());
        assert!(config.executable_path.is_none());
    }

    #[test]
    fn test_with_executable() {
        let config = BrowserConfig::with_executable("/usr/bin/chromium");
        assert_eq!(config.executable_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(config.headless);
    }

    #[test]
    fn test_chrome_args() {
        let config = BrowserConfig {
            user_agent: Some("test-agent".to_string()),
            ..BrowserConfig::default()
        };
        let args = config.chrome_args();
        assert!(args.iter().any(|a| a == "--blink-settings=imagesEnabled=false"));
        assert!(args.iter().any(|a| a == "--user-agent=test-agent"));

        let plain = BrowserConfig {
            user_agent: None,
            disable_images: false,
            ..BrowserConfig::default()
        };
        assert_eq!(plain.chrome_args(), vec!["--disable-dev-shm-usage".to_string()]);
    }

    #[test]
    fn test_timeout() {
        assert_eq!(BrowserConfig::default().timeout(), Duration::from_secs(30));
    }
}
