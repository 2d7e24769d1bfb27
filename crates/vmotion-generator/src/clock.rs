//! Injectable waiting between poll ticks.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current task for a duration.
///
/// Production code uses [`TokioSleeper`]; tests substitute an
/// implementation that returns immediately and records the requested waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_advances_virtual_time() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(600)).await;
        assert!(start.elapsed() >= Duration::from_secs(600));
    }
}
