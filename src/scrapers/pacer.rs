//! Inter-request pacing.
//!
//! Every network call sleeps first, either a fixed delay or a uniform
//! sample from a window, to stay within the target site's informal rate
//! tolerance.

use std::time::Duration;

use rand::Rng;

use crate::config::DelayConfig;

#[derive(Debug, Clone)]
pub struct RequestPacer {
    delay: DelayConfig,
}

impl RequestPacer {
    pub fn new(delay: &DelayConfig) -> Self {
        Self {
            delay: delay.clone(),
        }
    }

    fn next_delay(&self) -> Duration {
        match self.delay {
            DelayConfig::Fixed { secs } => Duration::from_secs_f64(secs.max(0.0)),
            DelayConfig::Window { min_secs, max_secs } => {
                let lo = min_secs.max(0.0);
                let hi = max_secs.max(lo);
                Duration::from_secs_f64(rand::rng().random_range(lo..=hi))
            }
        }
    }

    /// Sleep for the configured delay before the next request.
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
