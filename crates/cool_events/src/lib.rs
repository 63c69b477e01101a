//! # Cool Events
//!
//! The host ABI shared by the cool server and its plugins.
//!
//! - **Types**: [`PlayerId`], [`Position`], [`ItemKind`]
//! - **Events**: join/quit/tick core events and player-driven client events
//! - **Routing**: [`EventSystem`] with typed `on_core`/`on_client` handlers
//! - **Host services**: the [`ServerContext`] trait
//! - **Plugins**: [`SimplePlugin`], [`Plugin`] and
//!   [`create_simple_plugin!`](crate::create_simple_plugin)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cool_events::*;
//!
//! #[derive(Default)]
//! struct GreeterPlugin;
//!
//! #[async_trait]
//! impl SimplePlugin for GreeterPlugin {
//!     fn name(&self) -> &str { "greeter" }
//!     fn version(&self) -> &str { "1.0.0" }
//!
//!     async fn register_handlers(
//!         &mut self,
//!         events: Arc<EventSystem>,
//!         context: Arc<dyn ServerContext>,
//!     ) -> Result<(), PluginError> {
//!         events.on_core("player_joined", move |event: PlayerJoinedEvent| {
//!             let _ = context.send_message(event.player_id, "Hello!");
//!             Ok(())
//!         }).await.map_err(|e| PluginError::InitializationFailed(e.to_string()))
//!     }
//! }
//!
//! create_simple_plugin!(GreeterPlugin);
//! ```

pub mod context;
pub mod events;
pub mod plugin;
pub mod system;
pub mod text;
pub mod types;
pub mod utils;

pub use async_trait::async_trait;
pub use context::{LogLevel, Particle, ServerContext, ServerError, Sound, Viewers};
pub use events::*;
pub use plugin::{Plugin, PluginError, SimplePlugin};
pub use system::{Event, EventError, EventHandler, EventSystem, EventSystemStats, TypedEventHandler};
pub use text::TextFormat;
pub use types::{DisconnectReason, ItemKind, PlayerId, Position};
pub use utils::{create_event_system, current_timestamp};

pub use std::sync::Arc;

/// Items used by [`create_simple_plugin!`](crate::create_simple_plugin).
/// Not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::plugin::panic_to_error;
    pub use futures;
}
