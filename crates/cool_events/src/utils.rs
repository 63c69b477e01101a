use crate::system::EventSystem;
use std::sync::Arc;

/// Seconds since the Unix epoch, or 0 if the clock is before it.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Creates a shared event system for a host.
pub fn create_event_system() -> Arc<EventSystem> {
    Arc::new(EventSystem::new())
}
