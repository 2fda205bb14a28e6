//! Token bucket pacing for outbound requests.
//!
//! Every request issued by a [`Fetcher`](crate::fetch::Fetcher) first takes a permit from its
//! [`RateLimiter`]. The bucket holds at most `burst` permits and refills at
//! `requests_per_minute / 60` permits per second, so once the burst is spent requests are spaced
//! `60 / requests_per_minute` seconds apart.

use tokio::{sync::Mutex, time::Instant};

use super::*;

/// Rate limit settings, as found under `[scraper.rate_limit]` in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
  /// Sustained request rate. `0` disables limiting.
  pub requests_per_minute: u32,
  /// Number of requests that may be issued back to back. Values below 1 are treated as 1.
  pub burst:               u32,
}

impl Default for RateLimitConfig {
  fn default() -> Self { Self { requests_per_minute: 30, burst: 1 } }
}

impl RateLimitConfig {
  /// No limiting at all.
  pub fn unlimited() -> Self { Self { requests_per_minute: 0, burst: 1 } }
}

/// Mutable bucket state.
#[derive(Debug)]
struct Bucket {
  tokens:      f64,
  last_refill: Instant,
}

impl Bucket {
  fn refill(&mut self, per_second: f64, capacity: f64) {
    let now = Instant::now();
    let elapsed = now.duration_since(self.last_refill).as_secs_f64();
    self.tokens = (self.tokens + elapsed * per_second).min(capacity);
    self.last_refill = now;
  }
}

/// Async token bucket.
///
/// # Examples
///
/// ```no_run
/// use examai::rate_limit::{RateLimitConfig, RateLimiter};
///
/// # async fn example() {
/// let limiter = RateLimiter::new(RateLimitConfig { requests_per_minute: 30, burst: 1 });
/// limiter.acquire().await; // immediate
/// limiter.acquire().await; // roughly two seconds later
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
  /// `None` when limiting is disabled
  bucket:     Option<Mutex<Bucket>>,
  per_second: f64,
  capacity:   f64,
}

impl RateLimiter {
  /// Creates a limiter with a full bucket.
  pub fn new(config: RateLimitConfig) -> Self {
    let capacity = f64::from(config.burst.max(1));
    let per_second = f64::from(config.requests_per_minute) / 60.0;
    let bucket = (config.requests_per_minute > 0)
      .then(|| Mutex::new(Bucket { tokens: capacity, last_refill: Instant::now() }));
    Self { bucket, per_second, capacity }
  }

  /// Whether this limiter ever waits.
  pub fn is_enabled(&self) -> bool { self.bucket.is_some() }

  /// Minimum spacing between requests once the burst is used up.
  pub fn interval(&self) -> Option<Duration> {
    self.is_enabled().then(|| Duration::from_secs_f64(1.0 / self.per_second))
  }

  /// Waits until a permit is available and takes it.
  ///
  /// Waiters are served one at a time because the bucket lock is held while sleeping.
  pub async fn acquire(&self) {
    let Some(bucket) = &self.bucket else { return };
    let mut bucket = bucket.lock().await;

    bucket.refill(self.per_second, self.capacity);
    if bucket.tokens < 1.0 {
      let wait = Duration::from_secs_f64((1.0 - bucket.tokens) / self.per_second);
      trace!("Rate limiter waiting {:?} for a permit", wait);
      tokio::time::sleep(wait).await;
      bucket.refill(self.per_second, self.capacity);
    }
    bucket.tokens = (bucket.tokens - 1.0).max(0.0);
  }
}
