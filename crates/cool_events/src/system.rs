//! Event routing between the host and its plugins.
//!
//! Payloads cross the host/plugin boundary as JSON. An emission encodes the
//! event once and every listener decodes its own copy, which keeps handlers
//! from seeing each other's changes.
//!
//! Listeners are keyed `core:<name>` for server lifecycle events and
//! `client:<namespace>:<name>` for things players do.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, trace};

/// Anything that can travel through the [`EventSystem`].
///
/// There is nothing to implement by hand: every serde-capable `Debug` type
/// qualifies.
///
/// ```rust
/// #[derive(Debug, serde::Serialize, serde::Deserialize)]
/// struct LeverPulled {
///     powered: bool,
/// }
/// // LeverPulled can now be emitted and listened for.
/// ```
pub trait Event: Send + Sync + Any + std::fmt::Debug {
    /// Rust type name, used to label listeners in logs.
    fn type_name() -> &'static str
    where
        Self: Sized;

    fn to_payload(&self) -> Result<Vec<u8>, EventError>;

    fn from_payload(payload: &[u8]) -> Result<Self, EventError>
    where
        Self: Sized;
}

impl<T> Event for T
where
    T: Serialize + DeserializeOwned + Send + Sync + Any + std::fmt::Debug + 'static,
{
    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }

    fn to_payload(&self) -> Result<Vec<u8>, EventError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn from_payload(payload: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(payload).map_err(EventError::Decode)
    }
}

/// A listener as the event system stores it: bytes in, result out.
///
/// Closures registered through [`EventSystem::on_core`] or
/// [`EventSystem::on_client`] are wrapped in a [`TypedEventHandler`].
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, payload: &[u8]) -> Result<(), EventError>;

    /// Event type the listener decodes into.
    fn event_type(&self) -> TypeId;

    fn handler_name(&self) -> &str;
}

/// A closure over one concrete event type.
pub struct TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    callback: F,
    label: String,
    _event: std::marker::PhantomData<fn(T)>,
}

impl<T, F> TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    pub fn new(label: String, callback: F) -> Self {
        Self {
            callback,
            label,
            _event: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T, F> EventHandler for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    async fn handle(&self, payload: &[u8]) -> Result<(), EventError> {
        (self.callback)(T::from_payload(payload)?)
    }

    fn event_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn handler_name(&self) -> &str {
        &self.label
    }
}

fn core_key(name: &str) -> String {
    format!("core:{}", name)
}

fn client_key(namespace: &str, name: &str) -> String {
    format!("client:{}:{}", namespace, name)
}

/// The host's event bus.
///
/// Listeners on one key run one after another in the order they were
/// registered. An erroring listener is counted and logged; the others on the
/// same key still run.
///
/// ```rust
/// use cool_events::{EventSystem, ServerTickEvent};
///
/// # async fn example() -> Result<(), cool_events::EventError> {
/// let events = EventSystem::new();
/// events.on_core("server_tick", |event: ServerTickEvent| {
///     println!("tick {}", event.tick);
///     Ok(())
/// }).await?;
/// events.emit_core("server_tick", &ServerTickEvent { tick: 1 }).await?;
/// # Ok(())
/// # }
/// ```
pub struct EventSystem {
    listeners: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    stats: RwLock<EventSystemStats>,
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem").finish_non_exhaustive()
    }
}

impl EventSystem {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            stats: RwLock::new(EventSystemStats::default()),
        }
    }

    /// Listens for a server lifecycle event such as `player_joined`.
    pub async fn on_core<T, F>(&self, event_name: &str, handler: F) -> Result<(), EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.listen(core_key(event_name), handler).await
    }

    /// Listens for a player action, e.g. `("world", "block_break")`.
    pub async fn on_client<T, F>(
        &self,
        namespace: &str,
        event_name: &str,
        handler: F,
    ) -> Result<(), EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.listen(client_key(namespace, event_name), handler).await
    }

    async fn listen<T, F>(&self, key: String, handler: F) -> Result<(), EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        let label = format!("{}::{}", key, T::type_name());
        let listener: Arc<dyn EventHandler> = Arc::new(TypedEventHandler::new(label, handler));

        self.listeners
            .write()
            .await
            .entry(key.clone())
            .or_default()
            .push(listener);
        self.stats.write().await.total_handlers += 1;

        info!("📝 Listening on {}", key);
        Ok(())
    }

    /// Delivers a lifecycle event. Fails only if the event cannot be encoded.
    pub async fn emit_core<T>(&self, event_name: &str, event: &T) -> Result<(), EventError>
    where
        T: Event,
    {
        self.dispatch(&core_key(event_name), event).await
    }

    /// Delivers a player action under `namespace`.
    pub async fn emit_client<T>(
        &self,
        namespace: &str,
        event_name: &str,
        event: &T,
    ) -> Result<(), EventError>
    where
        T: Event,
    {
        self.dispatch(&client_key(namespace, event_name), event)
            .await
    }

    async fn dispatch<T>(&self, key: &str, event: &T) -> Result<(), EventError>
    where
        T: Event,
    {
        let payload = event.to_payload()?;
        let listeners = self.listeners.read().await;

        let Some(listeners) = listeners.get(key) else {
            trace!("Nobody listens on {}", key);
            return Ok(());
        };

        debug!("📤 {} -> {} listeners", key, listeners.len());

        let mut failed = 0u64;
        for listener in listeners {
            if let Err(e) = listener.handle(&payload).await {
                failed += 1;
                error!("❌ {} returned an error: {}", listener.handler_name(), e);
            }
        }

        let mut stats = self.stats.write().await;
        stats.events_emitted += 1;
        stats.handler_failures += failed;
        Ok(())
    }

    pub async fn get_stats(&self) -> EventSystemStats {
        self.stats.read().await.clone()
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Running totals, reported by the server at shutdown.
#[derive(Debug, Default, Clone)]
pub struct EventSystemStats {
    pub total_handlers: usize,
    /// Emissions that had at least one listener
    pub events_emitted: u64,
    pub handler_failures: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("could not encode event: {0}")]
    Encode(#[from] serde_json::Error),
    /// The payload did not match the listener's event type
    #[error("could not decode event: {0}")]
    Decode(serde_json::Error),
    /// A listener reported a failure of its own
    #[error("handler failed: {0}")]
    HandlerExecution(String),
}
