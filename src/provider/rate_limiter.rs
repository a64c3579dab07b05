//! @ai:module:intent Token-bucket rate limiting for provider calls
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter
//! @ai:module:stateless false

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Token bucket limiting requests per minute across providers
pub struct RateLimiter {
    state: Mutex<BucketState>,
    requests_per_minute: u32,
}

struct BucketState {
    tokens: f64,
    refilled_at: Instant,
}

impl RateLimiter {
    /// @ai:intent Create a limiter with a full bucket
    /// @ai:pre requests_per_minute > 0
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            state: Mutex::new(BucketState {
                tokens: requests_per_minute as f64,
                refilled_at: Instant::now(),
            }),
            requests_per_minute,
        }
    }

    /// @ai:intent Tokens accrued per second
    /// @ai:effects pure
    fn refill_rate(&self) -> f64 {
        self.requests_per_minute as f64 / 60.0
    }

    /// @ai:intent Block until a request token is available
    /// @ai:effects state:write, time
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;

                let now = Instant::now();
                let elapsed = now.duration_since(state.refilled_at);
                state.tokens = (state.tokens + elapsed.as_secs_f64() * self.refill_rate())
                    .min(self.requests_per_minute as f64);
                state.refilled_at = now;

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }

                Duration::from_secs_f64((1.0 - state.tokens) / self.refill_rate())
            };

            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_requests_pass_immediately() {
        let limiter = RateLimiter::new(60);

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_exhausted_bucket_throttles() {
        let limiter = RateLimiter::new(60);

        for _ in 0..60 {
            limiter.acquire().await;
        }

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(900));
    }
}
