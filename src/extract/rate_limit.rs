//! Per-host politeness policy for outbound page fetches.
//!
//! Remote hosts see at most one request per configured interval. The
//! limiter is consulted explicitly before every request; there are no
//! ad-hoc sleeps scattered through the extraction code.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum interval between requests to the same host.
///
/// Shared by all extraction workers of a run; hosts are tracked
/// independently, so throttling one host never delays another.
pub struct HostRateLimiter {
    interval: Duration,
    next_allowed: Mutex<HashMap<String, Instant>>,
}

impl HostRateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until a request to `host` is permitted, then reserve the next
    /// slot for it.
    pub async fn acquire(&self, host: &str) {
        if self.interval.is_zero() {
            return;
        }

        let wait_until = {
            let mut slots = self.next_allowed.lock();
            let now = Instant::now();
            let reserved = match slots.get(host) {
                Some(&slot) if slot > now => slot,
                _ => now,
            };
            slots.insert(host.to_string(), reserved + self.interval);
            reserved
        };

        let now = Instant::now();
        if wait_until > now {
            tracing::trace!(host, wait_ms = (wait_until - now).as_millis() as u64, "rate limit wait");
            tokio::time::sleep_until(wait_until).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn first_request_is_immediate() {
        let limiter = HostRateLimiter::new(Duration::from_millis(200));
        let start = Instant::now();
        limiter.acquire("example.com").await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn same_host_requests_are_spaced() {
        tokio::time::pause();
        let limiter = HostRateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.acquire("example.com").await;
        limiter.acquire("example.com").await;
        limiter.acquire("example.com").await;
        // Third request waits two full intervals.
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn different_hosts_do_not_block_each_other() {
        tokio::time::pause();
        let limiter = HostRateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.acquire("a.example.com").await;
        limiter.acquire("b.example.com").await;
        limiter.acquire("c.example.com").await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn zero_interval_disables_throttling() {
        let limiter = HostRateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            limiter.acquire("example.com").await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn concurrent_acquires_serialise_per_host() {
        tokio::time::pause();
        let limiter = Arc::new(HostRateLimiter::new(Duration::from_millis(300)));
        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..3 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire("example.com").await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert!(start.elapsed() >= Duration::from_millis(600));
    }
}
