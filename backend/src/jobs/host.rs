use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::{Job, JobError, Shutdown};

/// Default time between two runs of a hosted job
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Runs a job, then waits for the period, until shutdown is requested.
///
/// Failures are logged and the next run happens as scheduled. Shutdown is
/// observed between runs and while waiting, never in the middle of a run.
pub struct PeriodicalJobHost {
    job: Arc<dyn Job>,
    period: Duration,
}

impl PeriodicalJobHost {
    pub fn new(job: Arc<dyn Job>, period: Duration) -> Self {
        Self { job, period }
    }

    pub async fn run(&self, shutdown: Shutdown) {
        let name = self.job.name().to_string();
        info!("Starting job {} with period {:?}", name, self.period);

        while !shutdown.is_requested() {
            match self.job.execute(&shutdown).await {
                Ok(()) => debug!("Job {} finished a run", name),
                Err(JobError::Cancelled) => {
                    info!("Job {} cancelled", name);
                    break;
                }
                Err(JobError::Failed(err)) => error!("Job {} failed: {:#}", name, err),
            }

            debug!("Job {} sleeping for {:?}", name, self.period);
            tokio::select! {
                _ = tokio::time::sleep(self.period) => {}
                _ = shutdown.requested() => break,
            }
        }

        info!("Job {} stopped", name);
    }

    pub fn spawn(self, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}
