//! A pool of senders draining the shared channel. Each send's success/failure update is
//! its own independent transaction keyed by queue id.

use std::sync::Arc;

use oncall_store::Store;
use tokio::sync::{mpsc, Mutex};

use crate::messenger::{Message, Messenger};

pub async fn run_senders(
    store: Arc<Store>,
    messenger: Arc<dyn Messenger>,
    receiver: mpsc::Receiver<Message>,
    worker_count: usize,
) {
    let receiver = Arc::new(Mutex::new(receiver));
    let mut handles = Vec::with_capacity(worker_count);
    for _ in 0..worker_count.max(1) {
        let receiver = receiver.clone();
        let store = store.clone();
        let messenger = messenger.clone();
        handles.push(tokio::spawn(async move {
            loop {
                let msg = {
                    let mut guard = receiver.lock().await;
                    guard.recv().await
                };
                let Some(msg) = msg else {
                    break;
                };
                dispatch(&store, messenger.as_ref(), msg).await;
            }
        }));
    }
    for handle in handles {
        let _ = handle.await;
    }
}

async fn dispatch(store: &Store, messenger: &dyn Messenger, msg: Message) {
    let queue_id = msg.queue_id;
    match messenger.send(&msg).await {
        Ok(()) => {
            let _ = store
                .transact(move |t| -> oncall_domain::Result<()> {
                    t.mark_notification_sent(queue_id);
                    Ok(())
                })
                .await;
        }
        Err(e) => {
            // Terminal failure: no retry.
            tracing::error!(queue_id, error = %e, "failed to send message, marking terminal");
            let _ = store
                .transact(move |t| -> oncall_domain::Result<()> {
                    t.deactivate_notification(queue_id);
                    Ok(())
                })
                .await;
        }
    }
}
