//! services/api/src/adapters/latency.rs
//!
//! Sleeps for each operation's simulated round-trip time so the front end can be
//! exercised against realistic loading states.

use async_trait::async_trait;
use recall_core::ports::{Latency, Operation};

#[derive(Clone, Copy, Debug)]
pub struct SimulatedLatency {
    /// Multiplies every delay; `0.0` disables sleeping.
    scale: f64,
}

impl SimulatedLatency {
    pub fn new() -> Self {
        Self { scale: 1.0 }
    }

    pub fn scaled(scale: f64) -> Self {
        Self {
            scale: scale.max(0.0),
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Latency for SimulatedLatency {
    async fn pause(&self, operation: Operation) {
        let delay = operation.simulated_delay().mul_f64(self.scale);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_operation_delay() {
        let start = Instant::now();
        SimulatedLatency::new().pause(Operation::ProcessPdf).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1500), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1510), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn scale_shrinks_the_delay() {
        let start = Instant::now();
        SimulatedLatency::scaled(0.5).pause(Operation::Login).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(260), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_scale_does_not_sleep() {
        let start = Instant::now();
        SimulatedLatency::scaled(0.0).pause(Operation::Register).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
