//! Command line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;

use crate::storage::{RetryPolicy, DEFAULT_RETRY_ATTEMPTS};

#[derive(Debug, Parser)]
#[command(
    name = "budget-tracker",
    version,
    about = "Budget tracker backend with recurring money flows",
    long_about = "Serves the budget tracker REST API and materializes ledger \
                  entries from recurring money flows on a fixed poll interval."
)]
pub struct Cli {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:budget.db", global = true)]
    pub database_url: String,

    /// Attempts made for a transaction that keeps conflicting
    #[arg(long, env = "RETRY_ATTEMPTS", default_value_t = DEFAULT_RETRY_ATTEMPTS, global = true)]
    pub retry_attempts: u32,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the REST API
    Serve {
        /// Address to listen on
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Also run the money flow scheduler in this process
        #[arg(long)]
        with_scheduler: bool,

        #[command(flatten)]
        scheduler: SchedulerArgs,
    },

    /// Run only the money flow scheduler
    Worker {
        #[command(flatten)]
        scheduler: SchedulerArgs,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SchedulerArgs {
    /// Seconds between two scheduler runs
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 60)]
    pub poll_interval_secs: u64,
}

impl SchedulerArgs {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Cli {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts)
    }
}
