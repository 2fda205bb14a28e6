//! HTTP fetching with configured headers, rate limiting and linear-backoff retries.
//!
//! The [`Fetcher`] is the only place requests leave the crate, which makes its
//! [`RateLimiter`] the single enforcement point for pacing.

use crate::{
  config::RetryPolicy,
  rate_limit::{RateLimitConfig, RateLimiter},
};

use super::*;

/// Rate-limited HTTP client.
///
/// # Examples
///
/// ```no_run
/// use examai::{config::ScraperConfig, fetch::Fetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = Fetcher::new(&ScraperConfig::default())?;
/// let html = fetcher.fetch_with_retry("https://example.com/past-papers", 5).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Fetcher {
  client:  reqwest::Client,
  headers: BTreeMap<String, String>,
  limiter: RateLimiter,
  retry:   RetryPolicy,
}

impl Fetcher {
  /// Builds a fetcher from the `[scraper]` configuration.
  pub fn new(config: &ScraperConfig) -> Result<Self> {
    let client = reqwest::Client::builder().build()?;
    Ok(Self {
      client,
      headers: config.headers.clone(),
      limiter: RateLimiter::new(config.rate_limit),
      retry: config.retry,
    })
  }

  /// A fetcher with no pacing and no backoff, for local servers and tests.
  pub fn unthrottled(headers: BTreeMap<String, String>, attempts: u32) -> Result<Self> {
    Self::new(&ScraperConfig {
      headers,
      rate_limit: RateLimitConfig::unlimited(),
      retry: RetryPolicy { attempts, backoff_ms: 0 },
    })
  }

  /// The retry policy applied by [`Fetcher::fetch`].
  pub fn retry_policy(&self) -> RetryPolicy { self.retry }

  /// Fetches `url` using the configured number of attempts.
  pub async fn fetch(&self, url: &str) -> Result<String> {
    self.fetch_with_retry(url, self.retry.attempts).await
  }

  /// Fetches `url`, making at most `retries` attempts in total (at least one).
  ///
  /// Each attempt waits for a rate-limiter permit first. Transport errors and non-success
  /// statuses are retried after `backoff_ms * attempt` milliseconds; the last error is returned.
  pub async fn fetch_with_retry(&self, url: &str, retries: u32) -> Result<String> {
    let attempts = retries.max(1);
    let mut attempt = 1;
    loop {
      match self.get(url).await {
        Ok(body) => return Ok(body),
        Err(e) if attempt >= attempts => {
          debug!("Giving up on {} after {} attempts: {}", url, attempt, e);
          return Err(e);
        },
        Err(e) => {
          let wait = self.retry.backoff(attempt);
          warn!("Attempt {}/{} for {} failed: {}; retrying in {:?}", attempt, attempts, url, e, wait);
          tokio::time::sleep(wait).await;
          attempt += 1;
        },
      }
    }
  }

  /// One paced GET request.
  async fn get(&self, url: &str) -> Result<String> {
    self.limiter.acquire().await;
    debug!("GET {}", url);

    let mut request = self.client.get(url);
    for (key, value) in &self.headers {
      request = request.header(key, value);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(ExamaiError::Status { url: url.to_string(), status: status.as_u16() });
    }

    let body = response.text().await?;
    trace!("{} responded with {} bytes", url, body.len());
    Ok(body)
  }
}
