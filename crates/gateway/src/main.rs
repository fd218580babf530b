mod api;
mod cli;
mod error;
mod ingress_auth;
mod state;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use oncall_domain::config::ConfigSeverity;
use oncall_notifier::{BlackholeMessenger, Messenger, NotifierConfig};
use oncall_store::Store;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use cli::{Cli, Command};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => {
            let _guard = cli::init_tracing("GATEWAY_LOG_FILE");
            let (config, _path) = cli::load_config(cli.config)?;
            run_server(Arc::new(config)).await
        }
        Some(Command::Scheduler) => {
            let _guard = cli::init_tracing("SCHEDULER_LOG_FILE");
            let (config, _path) = cli::load_config(cli.config)?;
            run_scheduler(Arc::new(config)).await
        }
        Some(Command::Notifier) => {
            let _guard = cli::init_tracing("NOTIFIER_LOG_FILE");
            let (config, _path) = cli::load_config(cli.config)?;
            run_notifier(Arc::new(config)).await
        }
    }
}

fn open_store(config: &oncall_domain::config::Config) -> Arc<Store> {
    let state_dir = Path::new(&config.db.conn_str);
    if let Some(parent) = state_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::create_dir_all(state_dir);
    Arc::new(Store::open(state_dir))
}

fn validate_or_bail(config: &oncall_domain::config::Config) -> anyhow::Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues.iter().filter(|i| i.severity == ConfigSeverity::Error).count()
        );
    }
    Ok(())
}

async fn run_server(config: Arc<oncall_domain::config::Config>) -> anyhow::Result<()> {
    tracing::info!("oncall gateway starting");
    validate_or_bail(&config)?;

    let store = open_store(&config);
    let messenger: Arc<dyn Messenger> = Arc::new(BlackholeMessenger);

    let state = AppState { store, config: config.clone(), messenger };

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    tracing::info!(addr = %addr, "oncall gateway listening");
    axum::serve(listener, app).await.context("axum server error")?;
    Ok(())
}

async fn run_scheduler(config: Arc<oncall_domain::config::Config>) -> anyhow::Result<()> {
    tracing::info!("oncall scheduler starting");
    validate_or_bail(&config)?;

    let store = open_store(&config);
    oncall_scheduler::run_loop(&store, config.scheduler_cycle_time).await;
    Ok(())
}

async fn run_notifier(config: Arc<oncall_domain::config::Config>) -> anyhow::Result<()> {
    tracing::info!("oncall notifier starting");
    validate_or_bail(&config)?;

    let store = open_store(&config);
    let messenger: Arc<dyn Messenger> = if config.notifier.skipsend {
        Arc::new(BlackholeMessenger)
    } else {
        tracing::warn!("no non-blackhole messenger configured, falling back to blackhole");
        Arc::new(BlackholeMessenger)
    };

    let notifier_config = NotifierConfig {
        poll_interval_seconds: config.notifier.poll_interval_seconds,
        sender_count: config.notifier.sender_count,
        channel_capacity: config.notifier.channel_capacity,
        reminder_activated: config.reminder.activated,
        reminder_interval_seconds: config.reminder.interval_seconds,
        reminder_lookahead_seconds: config.reminder.lookahead_seconds,
        user_validator_activated: config.user_validator.activated,
        user_validator_interval_seconds: config.user_validator.interval_seconds,
        user_validator_subject: config.user_validator.subject.clone(),
        user_validator_body: config.user_validator.body.clone(),
    };

    oncall_notifier::run(store, messenger, notifier_config).await;
    Ok(())
}
