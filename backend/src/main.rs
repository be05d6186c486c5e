use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use budget_tracker_backend::clock::{Clock, SystemClock};
use budget_tracker_backend::config::{Cli, Command, SchedulerArgs};
use budget_tracker_backend::jobs::{shutdown_channel, MoneyFlowJob, PeriodicalJobHost, Shutdown};
use budget_tracker_backend::storage::TransactionalExecutor;
use budget_tracker_backend::{create_router, initialize_backend, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let executor = initialize_backend(&cli.database_url, cli.retry_policy()).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (trigger, shutdown) = shutdown_channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
        trigger.trigger();
    });

    match cli.command {
        Command::Serve {
            bind,
            with_scheduler,
            scheduler,
        } => {
            let scheduler_task = with_scheduler
                .then(|| spawn_scheduler(&executor, &clock, &scheduler, shutdown.clone()));

            let app = create_router(AppState::new(executor, clock));

            info!("Starting server on {}", bind);
            let listener = tokio::net::TcpListener::bind(bind).await?;
            info!("Listening on {}", bind);

            let server_shutdown = shutdown.clone();
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { server_shutdown.requested().await })
                .await?;

            if let Some(task) = scheduler_task {
                task.await?;
            }
        }
        Command::Worker { scheduler } => {
            spawn_scheduler(&executor, &clock, &scheduler, shutdown).await?;
        }
    }

    info!("Shut down cleanly");
    Ok(())
}

fn spawn_scheduler(
    executor: &TransactionalExecutor,
    clock: &Arc<dyn Clock>,
    args: &SchedulerArgs,
    shutdown: Shutdown,
) -> tokio::task::JoinHandle<()> {
    let job = Arc::new(MoneyFlowJob::new(executor.clone(), clock.clone()));
    PeriodicalJobHost::new(job, args.poll_interval()).spawn(shutdown)
}
