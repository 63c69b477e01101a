//! Per-player counters, kept only while the player is online.

use cool_events::{PlayerId, Position};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub blocks_broken: u32,
    pub blocks_placed: u32,
    pub distance_traveled: f64,
    pub last_position: Position,
}

impl PlayerStats {
    pub fn new(spawn: Position) -> Self {
        Self {
            blocks_broken: 0,
            blocks_placed: 0,
            distance_traveled: 0.0,
            last_position: spawn,
        }
    }

    /// Distance rounded to two decimals for display.
    pub fn rounded_distance(&self) -> f64 {
        (self.distance_traveled * 100.0).round() / 100.0
    }
}

/// Stats of every tracked player. Players that never joined are ignored by
/// all `record_*` calls.
#[derive(Debug, Default)]
pub struct StatsBook {
    players: HashMap<PlayerId, PlayerStats>,
}

impl StatsBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts fresh counters for a player, replacing any old ones.
    pub fn reset(&mut self, player_id: PlayerId, spawn: Position) {
        self.players.insert(player_id, PlayerStats::new(spawn));
    }

    pub fn remove(&mut self, player_id: PlayerId) -> Option<PlayerStats> {
        self.players.remove(&player_id)
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&PlayerStats> {
        self.players.get(&player_id)
    }

    /// Counts a broken block. Returns the new total when it lands on a
    /// multiple of `milestone_interval`.
    pub fn record_break(&mut self, player_id: PlayerId, milestone_interval: u32) -> Option<u32> {
        let stats = self.players.get_mut(&player_id)?;
        stats.blocks_broken += 1;
        (milestone_interval > 0 && stats.blocks_broken % milestone_interval == 0)
            .then_some(stats.blocks_broken)
    }

    pub fn record_place(&mut self, player_id: PlayerId) {
        if let Some(stats) = self.players.get_mut(&player_id) {
            stats.blocks_placed += 1;
        }
    }

    /// Adds the length of a move. Returns the distance moved, or `None` for
    /// untracked players.
    pub fn record_move(&mut self, player_id: PlayerId, from: Position, to: Position) -> Option<f64> {
        let stats = self.players.get_mut(&player_id)?;
        let distance = from.distance(&to);
        stats.distance_traveled += distance;
        stats.last_position = to;
        Some(distance)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}
