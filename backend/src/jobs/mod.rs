//! # Background Jobs
//!
//! A [`Job`] is one unit of periodic work. [`PeriodicalJobHost`] runs a job
//! forever at a fixed period, logging failures without propagating them,
//! until a [`Shutdown`] is requested.

use async_trait::async_trait;
use tokio::sync::watch;

pub mod host;
pub mod money_flow_job;

pub use host::PeriodicalJobHost;
pub use money_flow_job::MoneyFlowJob;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Clean stop on shutdown; not a failure
    #[error("Job cancelled")]
    Cancelled,
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

#[async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &str;

    /// Run one tick. Work already started is finished even if shutdown is
    /// requested meanwhile.
    async fn execute(&self, shutdown: &Shutdown) -> Result<(), JobError>;
}

/// Receiving half of the cooperative shutdown signal
#[derive(Debug, Clone)]
pub struct Shutdown {
    receiver: watch::Receiver<bool>,
}

/// Sending half of the shutdown signal. Dropping it also requests shutdown.
#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownTrigger { sender }, Shutdown { receiver })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl Shutdown {
    pub fn is_requested(&self) -> bool {
        *self.receiver.borrow() || self.receiver.has_changed().is_err()
    }

    /// Resolves once shutdown has been requested
    pub async fn requested(&self) {
        let mut receiver = self.receiver.clone();
        // an error means the trigger is gone, which counts as a request
        let _ = receiver.wait_for(|requested| *requested).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_requests_shutdown() {
        let (trigger, shutdown) = shutdown_channel();
        assert!(!shutdown.is_requested());

        trigger.trigger();
        assert!(shutdown.is_requested());
        tokio::time::timeout(Duration::from_secs(1), shutdown.requested())
            .await
            .expect("requested() should resolve after trigger");
    }

    #[tokio::test]
    async fn test_dropped_trigger_requests_shutdown() {
        let (trigger, shutdown) = shutdown_channel();
        drop(trigger);

        assert!(shutdown.is_requested());
        tokio::time::timeout(Duration::from_secs(1), shutdown.requested())
            .await
            .expect("requested() should resolve once the trigger is dropped");
    }

    #[tokio::test]
    async fn test_clones_observe_the_same_signal() {
        let (trigger, shutdown) = shutdown_channel();
        let clone = shutdown.clone();

        trigger.trigger();
        assert!(clone.is_requested());
        assert!(shutdown.is_requested());
    }
}
