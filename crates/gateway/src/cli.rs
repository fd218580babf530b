//! One binary, `#[derive(Parser)]` over a `Subcommand` enum. Oncall has
//! three long-running processes (gateway server, scheduler, notifier)
//! realized here as subcommands of one binary rather than three.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use oncall_domain::config::Config;

#[derive(Debug, Parser)]
#[command(name = "oncall", version, about = "Team on-call calendar service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the YAML config file (overrides `ONCALL_CONFIG`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP API server (default when no subcommand is given).
    Serve,
    /// Run the scheduler loop that materializes schedules into events.
    Scheduler,
    /// Run the notifier loop (poller, sender pool, reminders, user validator).
    Notifier,
}

/// Read the config path from `--config`, else `ONCALL_CONFIG`, else
/// `config.yaml` in the working directory, falling back to
/// [`Config::default`] if nothing is present there — mirrors
/// `sa_gateway::cli::load_config`'s env-var-or-default shape.
pub fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<(Config, PathBuf)> {
    let path = explicit
        .or_else(|| std::env::var("ONCALL_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let config = Config::load(&path)?;
    Ok((config, path))
}

/// Build a `tracing` subscriber. When `log_file_env` names a set
/// environment variable (`GATEWAY_LOG_FILE` / `SCHEDULER_LOG_FILE` /
/// `NOTIFIER_LOG_FILE`), output is routed to a rolling file there;
/// otherwise it goes to stdout. Returns the appender guard, which must
/// be kept alive for the life of the process.
pub fn init_tracing(log_file_env: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::EnvFilter;

    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,oncall_gateway=debug"))
    };

    match std::env::var(log_file_env) {
        Ok(path) if !path.is_empty() => {
            let path = Path::new(&path);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path.file_name().unwrap_or_default();
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .json()
                .with_writer(non_blocking)
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter()).json().init();
            None
        }
    }
}
