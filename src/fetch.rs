use rand::Rng;
use std::time::Duration;

/// Failure to retrieve the rendered source of a page
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Worth another attempt (navigation hiccup, timeout, empty capture)
    #[error("Retryable fetch error: {0}")]
    Retryable(String),

    /// Will fail again no matter how often it is tried
    #[error("Fetch error: {0}")]
    Terminal(String),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Retryable(_))
    }
}

/// Anything that can turn a URL into fully rendered page source
pub trait PageSource {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_html(url)
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_html(url)
    }
}

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: usize,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 500,
            max_delay_ms: 8000,
        }
    }
}

impl RetryPolicy {
    /// Policy that gives up after the first failure
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based), before jitter
    pub fn base_delay(&self, attempt: usize) -> Duration {
        let factor = 2u64.saturating_pow(attempt as u32);
        let delay_ms = self.initial_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }

    /// Backoff with +/-25% jitter
    pub fn delay(&self, attempt: usize) -> Duration {
        let base = self.base_delay(attempt).as_millis() as f64;
        let jitter = rand::thread_rng().gen_range(0.75..=1.25);
        Duration::from_millis((base * jitter) as u64)
    }
}

/// Wraps a [`PageSource`] and retries retryable failures
pub struct RetryingSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: PageSource> RetryingSource<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: PageSource> PageSource for RetryingSource<S> {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch_html(url) {
                Ok(html) => return Ok(html),
                Err(e) if e.is_retryable() && attempt < self.policy.max_retries => {
                    log::warn!(
                        "Fetch failed for {}, attempt {}/{}: {}",
                        url,
                        attempt + 1,
                        self.policy.max_retries + 1,
                        e
                    );
                    std::thread::sleep(self.policy.delay(attempt));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
