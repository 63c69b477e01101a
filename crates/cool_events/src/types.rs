//! # Core Type Definitions
//!
//! Identifiers and spatial types shared by the host and every plugin.
//!
//! - [`PlayerId`] - Stable identifier for a connected player
//! - [`Position`] - 3D world position with double precision
//! - [`ItemKind`] - Item held by a player when interacting
//! - [`DisconnectReason`] - Why a player left

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player in the game world.
///
/// Wraps a UUID so player ids cannot be confused with other identifiers.
///
/// # Examples
///
/// ```rust
/// use cool_events::PlayerId;
///
/// let player_id = PlayerId::new();
/// let parsed = PlayerId::from_str(&player_id.to_string()).unwrap();
/// assert_eq!(player_id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a player ID from its hyphenated UUID form.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in the game world.
///
/// Block coordinates and entity positions both use this type; blocks simply
/// sit on integral coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (east-west axis)
    pub x: f64,
    /// Y coordinate (vertical axis)
    pub y: f64,
    /// Z coordinate (north-south axis)
    pub z: f64,
}

impl Position {
    /// Creates a new position with the specified coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Returns this position shifted by the given amounts.
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Position {
        Position::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Item a player is holding during an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Diamond,
    /// Anything the plugins do not special-case, by its item name
    Other(String),
}

impl ItemKind {
    /// Maps an item name as typed by an operator to a kind.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "diamond" => ItemKind::Diamond,
            other => ItemKind::Other(other.to_string()),
        }
    }
}

/// Enumeration of possible disconnection reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisconnectReason {
    /// Player initiated disconnection (normal logout)
    ClientDisconnect,
    /// Connection timed out
    Timeout,
    /// Server is shutting down
    ServerShutdown,
    /// Removed by an operator
    Kicked(String),
}
