//! Drains due notification-queue rows into the send channel, grounded
//! on `bin/notifier.py::poll`.

use oncall_domain::time;
use oncall_store::Store;
use tokio::sync::mpsc;

use crate::messenger::Message;
use crate::template::render;

pub async fn poll_once(store: &Store, sender: &mpsc::Sender<Message>) {
    let now = time::now();
    let due = store.read(|t| t.due_notifications(now)).await;
    for id in due {
        let msg = store
            .read(move |t| -> Option<Message> {
                let entry = t.notification_queue.get(&id)?;
                let user = t.users.get(&entry.user_id)?;
                let nt = t.notification_types.get(&entry.type_name)?;
                Some(Message {
                    queue_id: entry.id,
                    user_name: user.name.clone(),
                    mode: entry.mode.as_str().to_string(),
                    subject: render(&nt.subject_template, &entry.context),
                    body: render(&nt.body_template, &entry.context),
                })
            })
            .await;
        match msg {
            Some(msg) => {
                if sender.send(msg).await.is_err() {
                    tracing::warn!("send queue closed, dropping notification");
                }
            }
            None => {
                tracing::warn!(id, "queue entry references a missing user or type, deactivating");
                let _ = store
                    .transact(move |t| -> oncall_domain::Result<()> {
                        t.deactivate_notification(id);
                        Ok(())
                    })
                    .await;
            }
        }
    }
}
