//! # Host Event Types
//!
//! Every event the host delivers to plugins. Core events describe server
//! infrastructure (joins, quits, ticks); client events describe something a
//! player did and are keyed by `namespace:event_name`.
//!
//! | Key | Type |
//! |---|---|
//! | `core:player_joined` | [`PlayerJoinedEvent`] |
//! | `core:player_quit` | [`PlayerQuitEvent`] |
//! | `core:server_tick` | [`ServerTickEvent`] |
//! | `client:chat:message` | [`PlayerChatEvent`] |
//! | `client:movement:player_moved` | [`PlayerMoveEvent`] |
//! | `client:interaction:use_item` | [`PlayerInteractEvent`] |
//! | `client:world:block_break` | [`BlockBreakEvent`] |
//! | `client:world:block_place` | [`BlockPlaceEvent`] |
//! | `client:command:issued` | [`CommandEvent`] |

use crate::types::{DisconnectReason, ItemKind, PlayerId, Position};
use serde::{Deserialize, Serialize};

/// Event emitted when a player joins the server.
///
/// Handlers typically initialize per-player state and greet the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerJoinedEvent {
    /// Unique identifier for the player
    pub player_id: PlayerId,
    /// Display name the player logged in with
    pub name: String,
    /// Where the player spawned
    pub position: Position,
    /// Unix timestamp of the join
    pub timestamp: u64,
}

/// Event emitted when a player leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerQuitEvent {
    pub player_id: PlayerId,
    pub name: String,
    pub reason: DisconnectReason,
    pub timestamp: u64,
}

/// Event emitted once per server tick, after the tick counter advanced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerTickEvent {
    /// The tick that just started
    pub tick: u64,
}

/// A chat line typed by a player, before it is broadcast.
///
/// Handlers may replace the broadcast line through
/// [`ServerContext::set_chat_format`](crate::ServerContext::set_chat_format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerChatEvent {
    pub player_id: PlayerId,
    pub message: String,
    pub timestamp: u64,
}

/// A player moved from one position to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMoveEvent {
    pub player_id: PlayerId,
    pub from: Position,
    pub to: Position,
    /// Whether the player was sprinting during the move
    pub sprinting: bool,
}

/// A player used an item on a block.
///
/// Handlers may cancel the default interaction through
/// [`ServerContext::cancel_interaction`](crate::ServerContext::cancel_interaction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInteractEvent {
    pub player_id: PlayerId,
    pub item: ItemKind,
    /// Position of the block that was clicked
    pub block: Position,
}

/// A player broke a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockBreakEvent {
    pub player_id: PlayerId,
    pub block: Position,
}

/// A player placed a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockPlaceEvent {
    pub player_id: PlayerId,
    pub block: Position,
}

/// Who issued a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandSender {
    /// An in-game player
    Player(PlayerId),
    /// The server console
    Console,
}

impl CommandSender {
    /// Returns the player behind this sender, if any.
    pub fn as_player(&self) -> Option<PlayerId> {
        match self {
            CommandSender::Player(id) => Some(*id),
            CommandSender::Console => None,
        }
    }
}

/// A registered command was issued.
///
/// Only commands a plugin registered through
/// [`ServerContext::register_command`](crate::ServerContext::register_command)
/// are delivered; the host answers unknown ones itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEvent {
    pub sender: CommandSender,
    /// Command name without the leading slash, lowercased
    pub command: String,
    pub args: Vec<String>,
}

impl CommandEvent {
    /// Parses a raw command line such as `/tpa bob`.
    ///
    /// Returns `None` for an empty line.
    pub fn parse(sender: CommandSender, line: &str) -> Option<Self> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let mut parts = line.split_whitespace();
        let command = parts.next()?.to_lowercase();
        Some(Self {
            sender,
            command,
            args: parts.map(str::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_event_parse() {
        let player = PlayerId::new();
        let event = CommandEvent::parse(CommandSender::Player(player), "/TPA bob").unwrap();
        assert_eq!(event.command, "tpa");
        assert_eq!(event.args, vec!["bob".to_string()]);
        assert_eq!(event.sender.as_player(), Some(player));

        let event = CommandEvent::parse(CommandSender::Console, "  cool   speed 3 ").unwrap();
        assert_eq!(event.command, "cool");
        assert_eq!(event.args, vec!["speed".to_string(), "3".to_string()]);
        assert_eq!(event.sender.as_player(), None);

        assert!(CommandEvent::parse(CommandSender::Console, "   ").is_none());
        assert!(CommandEvent::parse(CommandSender::Console, "/").is_none());
    }
}
