//! The outbound message abstraction. A real deployment plugs in email/SMS/chat
//! backends; the `skipsend` config option swaps in [`BlackholeMessenger`].

#[derive(Debug, Clone)]
pub struct Message {
    pub queue_id: i64,
    pub user_name: String,
    pub mode: String,
    pub subject: String,
    pub body: String,
}

#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, message: &Message) -> Result<(), String>;
}

/// `notifier.skipsend = true` — log instead of dispatching.
pub struct BlackholeMessenger;

#[async_trait::async_trait]
impl Messenger for BlackholeMessenger {
    async fn send(&self, message: &Message) -> Result<(), String> {
        tracing::info!(
            queue_id = message.queue_id,
            user = %message.user_name,
            mode = %message.mode,
            "sent message (blackhole)"
        );
        Ok(())
    }
}
