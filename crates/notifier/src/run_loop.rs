//! Ties the poller, sender pool, reminder sweeper, and user validator
//! into one notifier process, grounded on `bin/notifier.py`'s `main`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use oncall_store::Store;
use tokio::sync::mpsc;

use crate::messenger::Messenger;
use crate::{poller, reminder, sender_pool, user_validator};

pub struct NotifierConfig {
    pub poll_interval_seconds: u64,
    pub sender_count: usize,
    pub channel_capacity: usize,
    pub reminder_activated: bool,
    pub reminder_interval_seconds: u64,
    pub reminder_lookahead_seconds: i64,
    pub user_validator_activated: bool,
    pub user_validator_interval_seconds: u64,
    pub user_validator_subject: String,
    pub user_validator_body: String,
}

pub async fn run(store: Arc<Store>, messenger: Arc<dyn Messenger>, config: NotifierConfig) {
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    tokio::spawn(sender_pool::run_senders(
        store.clone(),
        messenger.clone(),
        rx,
        config.sender_count,
    ));

    if config.reminder_activated {
        tokio::spawn(reminder::run_loop(
            store.clone(),
            config.reminder_interval_seconds,
            config.reminder_lookahead_seconds,
        ));
    }
    if config.user_validator_activated {
        tokio::spawn(user_validator::run_loop(
            store.clone(),
            messenger.clone(),
            config.user_validator_interval_seconds,
            config.user_validator_subject.clone(),
            config.user_validator_body.clone(),
        ));
    }

    tracing::info!("notifier bootstrapped");
    loop {
        let start = Instant::now();
        poller::poll_once(&store, &tx).await;
        let elapsed = start.elapsed();
        let interval = Duration::from_secs(config.poll_interval_seconds.max(1));
        if elapsed < interval {
            tokio::time::sleep(interval - elapsed).await;
        } else {
            tracing::warn!(elapsed_secs = elapsed.as_secs_f64(), "notifier loop took longer than its interval");
        }
    }
}
