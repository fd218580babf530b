//! User validator: periodically
//! messages users who have a future shift but no `call` contact on file.

use std::sync::Arc;
use std::time::Duration;

use oncall_domain::time;
use oncall_store::Store;

use crate::messenger::{Message, Messenger};

pub async fn run_loop(
    store: Arc<Store>,
    messenger: Arc<dyn Messenger>,
    interval_seconds: u64,
    subject: String,
    body: String,
) {
    loop {
        let now = time::now();
        let offenders = store.read(move |t| t.users_missing_call_contact(now)).await;
        for user_id in offenders {
            let user_name = store.read(move |t| t.users.get(&user_id).map(|u| u.name.clone())).await;
            if let Some(name) = user_name {
                let msg = Message {
                    queue_id: 0,
                    user_name: name,
                    mode: "email".to_string(),
                    subject: subject.clone(),
                    body: body.clone(),
                };
                if let Err(e) = messenger.send(&msg).await {
                    tracing::warn!(error = %e, "user validator message failed");
                }
            }
        }
        tokio::time::sleep(Duration::from_secs(interval_seconds.max(1))).await;
    }
}
