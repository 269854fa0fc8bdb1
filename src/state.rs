use std::sync::Arc;

use crate::config::AppConfig;

/// Shared, read-only application state. Requests are independent: there is no
/// cross-request mutable state, so no locking discipline is needed here.
pub struct AppState {
    pub config: Arc<AppConfig>,
}
