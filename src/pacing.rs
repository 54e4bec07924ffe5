//! Pacing between row lookups.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::info;

/// Waits between consecutive rows.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps a uniformly random whole number of seconds in `[min_secs, max_secs]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDelay {
    min_secs: u64,
    max_secs: u64,
}

impl RandomDelay {
    pub fn new(min_secs: u64, max_secs: u64) -> Result<Self> {
        if min_secs > max_secs {
            anyhow::bail!("Invalid delay range: {}s..{}s", min_secs, max_secs);
        }
        Ok(Self { min_secs, max_secs })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.delay_min_secs, config.delay_max_secs)
    }

    /// Draws the next delay.
    pub fn next_delay(&self) -> Duration {
        let secs = rand::rng().random_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }
}

#[async_trait]
impl Pacer for RandomDelay {
    async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }

        info!("Sleeping for {} seconds to avoid detection as a bot", delay.as_secs());
        tokio::time::sleep(delay).await;
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_from_config() {
        let delay = RandomDelay::from_config(&Config::default()).unwrap();
        assert_eq!(delay, RandomDelay::new(1, 6).unwrap());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = RandomDelay::new(5, 2).unwrap_err().to_string();
        assert!(err.contains("Invalid delay range"));
    }

    #[test]
    fn test_next_delay_within_bounds() {
        let delay = RandomDelay::new(1, 6).unwrap();
        for _ in 0..500 {
            let secs = delay.next_delay().as_secs();
            assert!((1..=6).contains(&secs), "delay {} out of range", secs);
        }
    }

    #[test]
    fn test_fixed_range() {
        let delay = RandomDelay::new(3, 3).unwrap();
        assert_eq!(delay.next_delay(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_sleeps_between_one_and_six_seconds() {
        let delay = RandomDelay::new(1, 6).unwrap();

        let start = tokio::time::Instant::now();
        delay.pause().await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed <= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_does_not_sleep() {
        let delay = RandomDelay::new(0, 0).unwrap();

        let start = tokio::time::Instant::now();
        delay.pause().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_no_delay_returns_immediately() {
        let start = std::time::Instant::now();
        tokio_test::block_on(NoDelay.pause());
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
