use std::sync::Arc;

use oncall_domain::config::Config;
use oncall_notifier::Messenger;
use oncall_store::Store;

/// Shared application state passed to every handler, grouped by concern.
#[derive(Clone)]
pub struct AppState {
    // ── Core services ────────────────────────────────────────────────
    pub store: Arc<Store>,
    pub config: Arc<Config>,

    // ── Outbound ─────────────────────────────────────────────────────
    pub messenger: Arc<dyn Messenger>,
}
