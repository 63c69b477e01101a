//! # Server Context Interface
//!
//! The narrow surface through which plugins reach into the host: player
//! lookup, messaging, relocation, cosmetic effects and a few player toggles.
//! The host owns the world; plugins only ask it to do things.
//!
//! All methods are synchronous. The host delivers every event and tick from a
//! single logical thread, and handlers call back into the context while the
//! event is being processed.

use crate::system::EventSystem;
use crate::types::{PlayerId, Position};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Services the host exposes to plugins.
///
/// # Examples
///
/// ```rust,ignore
/// async fn on_init(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
///     context.log(LogLevel::Info, "Combat plugin initialized");
///     context.register_command("duel", "/duel <player>");
///     Ok(())
/// }
/// ```
pub trait ServerContext: Send + Sync {
    /// The event system the host dispatches through.
    fn events(&self) -> Arc<EventSystem>;

    /// Logs through the host's logging pipeline.
    fn log(&self, level: LogLevel, message: &str);

    /// Current server tick. Advances by one per host loop iteration.
    fn current_tick(&self) -> u64;

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    /// Display name of an online player.
    fn player_name(&self, player_id: PlayerId) -> Option<String>;

    /// Finds an online player whose name equals `query` or starts with it,
    /// ignoring case. When several names share the prefix the shortest wins.
    fn find_player_by_prefix(&self, query: &str) -> Option<PlayerId>;

    /// Finds an online player by exact name, ignoring case.
    fn find_player_exact(&self, name: &str) -> Option<PlayerId>;

    fn online_players(&self) -> Vec<PlayerId>;

    fn player_position(&self, player_id: PlayerId) -> Option<Position>;

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Delivers a chat line to one player.
    fn send_message(&self, player_id: PlayerId, message: &str) -> Result<(), ServerError>;

    /// Prints a line on the server console.
    fn send_console_message(&self, message: &str);

    /// Replaces the line broadcast for the chat message currently being
    /// handled from `player_id`.
    fn set_chat_format(&self, player_id: PlayerId, line: String);

    /// Cancels the default outcome of the interaction currently being handled.
    fn cancel_interaction(&self, player_id: PlayerId);

    // ------------------------------------------------------------------
    // World and player state
    // ------------------------------------------------------------------

    /// Moves a player immediately.
    fn teleport(&self, player_id: PlayerId, to: Position) -> Result<(), ServerError>;

    fn spawn_particle(&self, at: Position, particle: Particle, viewers: Viewers);

    fn play_sound(&self, at: Position, sound: Sound);

    fn allows_flight(&self, player_id: PlayerId) -> bool;

    fn set_allow_flight(&self, player_id: PlayerId, allow: bool);

    fn set_flying(&self, player_id: PlayerId, flying: bool);

    /// Restores health and food to their maximums.
    fn heal(&self, player_id: PlayerId);

    fn set_movement_speed(&self, player_id: PlayerId, speed: f32);

    // ------------------------------------------------------------------
    // Plugin plumbing
    // ------------------------------------------------------------------

    /// Makes `/name` deliverable as a `command:issued` event.
    fn register_command(&self, name: &str, usage: &str);

    /// Plugin-specific configuration as loaded by the host, if any.
    fn plugin_config(&self, plugin_name: &str) -> Option<serde_json::Value>;
}

/// Particle kinds a plugin may spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Particle {
    Flame,
}

/// Sounds a plugin may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Pop,
}

/// Who gets to see a spawned particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Viewers {
    /// Every player near the position
    Everyone,
    /// Only the given player
    Only(PlayerId),
}

/// Log levels for [`ServerContext::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Errors the host reports back for plugin requests.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The player is not (or no longer) online
    #[error("Player not online: {0}")]
    PlayerOffline(PlayerId),
    /// The requested position is not usable
    #[error("Invalid position: {0}")]
    InvalidPosition(Position),
    #[error("Internal error: {0}")]
    Internal(String),
}
