//! In-memory world implementing the plugin-facing `ServerContext`.
//!
//! Players exist only as names, positions and a few toggles. Everything a
//! plugin sends to players or the console is collected as transcript lines
//! that the session prints after each step.

use cool_events::{
    EventSystem, LogLevel, Particle, PlayerId, Position, ServerContext, ServerError, Sound,
    TextFormat, Viewers,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, trace, warn};

pub const MAX_HEALTH: f32 = 20.0;
pub const MAX_FOOD: f32 = 20.0;
pub const DEFAULT_MOVEMENT_SPEED: f32 = 0.1;

/// A connected simulated player.
#[derive(Debug, Clone, PartialEq)]
pub struct SimPlayer {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub allow_flight: bool,
    pub flying: bool,
    pub health: f32,
    pub food: f32,
    pub movement_speed: f32,
}

impl SimPlayer {
    fn new(name: &str, position: Position) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.to_string(),
            position,
            allow_flight: false,
            flying: false,
            health: MAX_HEALTH,
            food: MAX_FOOD,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HostError {
    #[error("A player named {0} is already online")]
    NameTaken(String),
    #[error("No player named {0} is online")]
    UnknownPlayer(String),
}

#[derive(Debug, Default)]
struct HostWorld {
    players: HashMap<PlayerId, SimPlayer>,
    /// Registered command name -> usage
    commands: BTreeMap<String, String>,
    chat_overrides: HashMap<PlayerId, String>,
    cancelled: HashMap<PlayerId, bool>,
    transcript: Vec<String>,
    particles_spawned: u64,
    sounds_played: u64,
}

pub struct SimulatedHost {
    events: Arc<EventSystem>,
    tick: AtomicU64,
    world: Mutex<HostWorld>,
    plugin_configs: HashMap<String, serde_json::Value>,
}

impl SimulatedHost {
    pub fn new(
        events: Arc<EventSystem>,
        plugin_configs: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            events,
            tick: AtomicU64::new(0),
            world: Mutex::new(HostWorld::default()),
            plugin_configs,
        }
    }

    fn world(&self) -> MutexGuard<'_, HostWorld> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.world.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Advances the clock by one tick and returns the new tick.
    pub fn advance_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn add_player(&self, name: &str, position: Position) -> Result<PlayerId, HostError> {
        let mut world = self.world();
        if world
            .players
            .values()
            .any(|p| p.name.eq_ignore_ascii_case(name))
        {
            return Err(HostError::NameTaken(name.to_string()));
        }

        let player = SimPlayer::new(name, position);
        let id = player.id;
        world.players.insert(id, player);
        Ok(id)
    }

    pub fn remove_player(&self, player_id: PlayerId) -> Option<SimPlayer> {
        let mut world = self.world();
        world.chat_overrides.remove(&player_id);
        world.cancelled.remove(&player_id);
        world.players.remove(&player_id)
    }

    /// Looks a player up by exact name, ignoring case.
    pub fn player_by_name(&self, name: &str) -> Result<SimPlayer, HostError> {
        self.world()
            .players
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| HostError::UnknownPlayer(name.to_string()))
    }

    pub fn player(&self, player_id: PlayerId) -> Option<SimPlayer> {
        self.world().players.get(&player_id).cloned()
    }

    /// All online players, sorted by name.
    pub fn players(&self) -> Vec<SimPlayer> {
        let mut players: Vec<SimPlayer> = self.world().players.values().cloned().collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        players
    }

    pub fn set_position(&self, player_id: PlayerId, position: Position) -> Result<(), ServerError> {
        match self.world().players.get_mut(&player_id) {
            Some(player) => {
                player.position = position;
                Ok(())
            }
            None => Err(ServerError::PlayerOffline(player_id)),
        }
    }

    /// Lowers health and food, as if the player took damage.
    pub fn hurt(&self, player_id: PlayerId, amount: f32) {
        if let Some(player) = self.world().players.get_mut(&player_id) {
            player.health = (player.health - amount).max(0.0);
            player.food = (player.food - amount).max(0.0);
        }
    }

    pub fn is_command_registered(&self, name: &str) -> bool {
        self.world().commands.contains_key(name)
    }

    /// Registered commands and their usage lines, sorted by name.
    pub fn registered_commands(&self) -> Vec<(String, String)> {
        self.world()
            .commands
            .iter()
            .map(|(name, usage)| (name.clone(), usage.clone()))
            .collect()
    }

    /// Takes the chat line a plugin set while a message from `player_id` was
    /// being handled.
    pub fn take_chat_override(&self, player_id: PlayerId) -> Option<String> {
        self.world().chat_overrides.remove(&player_id)
    }

    /// Whether a plugin cancelled the interaction being handled.
    pub fn take_cancelled(&self, player_id: PlayerId) -> bool {
        self.world().cancelled.remove(&player_id).unwrap_or(false)
    }

    /// Adds a line to the transcript.
    pub fn announce(&self, line: impl Into<String>) {
        self.world().transcript.push(line.into());
    }

    /// Drains the transcript collected since the last call.
    pub fn take_transcript(&self) -> Vec<String> {
        std::mem::take(&mut self.world().transcript)
    }

    pub fn particles_spawned(&self) -> u64 {
        self.world().particles_spawned
    }

    pub fn sounds_played(&self) -> u64 {
        self.world().sounds_played
    }
}

impl ServerContext for SimulatedHost {
    fn events(&self) -> Arc<EventSystem> {
        self.events.clone()
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!("{}", message),
            LogLevel::Warn => warn!("{}", message),
            LogLevel::Info => info!("{}", message),
            LogLevel::Debug => debug!("{}", message),
            LogLevel::Trace => trace!("{}", message),
        }
    }

    fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }

    fn player_name(&self, player_id: PlayerId) -> Option<String> {
        self.world().players.get(&player_id).map(|p| p.name.clone())
    }

    fn find_player_by_prefix(&self, query: &str) -> Option<PlayerId> {
        let query = query.to_lowercase();
        self.world()
            .players
            .values()
            .filter(|p| p.name.to_lowercase().starts_with(&query))
            .min_by(|a, b| a.name.len().cmp(&b.name.len()).then_with(|| a.name.cmp(&b.name)))
            .map(|p| p.id)
    }

    fn find_player_exact(&self, name: &str) -> Option<PlayerId> {
        self.player_by_name(name).ok().map(|p| p.id)
    }

    fn online_players(&self) -> Vec<PlayerId> {
        self.players().into_iter().map(|p| p.id).collect()
    }

    fn player_position(&self, player_id: PlayerId) -> Option<Position> {
        self.world().players.get(&player_id).map(|p| p.position)
    }

    fn send_message(&self, player_id: PlayerId, message: &str) -> Result<(), ServerError> {
        let mut world = self.world();
        let name = world
            .players
            .get(&player_id)
            .map(|p| p.name.clone())
            .ok_or(ServerError::PlayerOffline(player_id))?;
        world
            .transcript
            .push(format!("[{}] {}", name, TextFormat::clean(message)));
        Ok(())
    }

    fn send_console_message(&self, message: &str) {
        self.announce(format!("[console] {}", TextFormat::clean(message)));
    }

    fn set_chat_format(&self, player_id: PlayerId, line: String) {
        self.world().chat_overrides.insert(player_id, line);
    }

    fn cancel_interaction(&self, player_id: PlayerId) {
        self.world().cancelled.insert(player_id, true);
    }

    fn teleport(&self, player_id: PlayerId, to: Position) -> Result<(), ServerError> {
        self.set_position(player_id, to)?;
        debug!("🚀 Teleported {} to {}", player_id, to);
        Ok(())
    }

    fn spawn_particle(&self, at: Position, particle: Particle, viewers: Viewers) {
        trace!("{:?} particle at {} for {:?}", particle, at, viewers);
        self.world().particles_spawned += 1;
    }

    fn play_sound(&self, at: Position, sound: Sound) {
        trace!("{:?} sound at {}", sound, at);
        self.world().sounds_played += 1;
    }

    fn allows_flight(&self, player_id: PlayerId) -> bool {
        self.world()
            .players
            .get(&player_id)
            .map(|p| p.allow_flight)
            .unwrap_or(false)
    }

    fn set_allow_flight(&self, player_id: PlayerId, allow: bool) {
        if let Some(player) = self.world().players.get_mut(&player_id) {
            player.allow_flight = allow;
        }
    }

    fn set_flying(&self, player_id: PlayerId, flying: bool) {
        if let Some(player) = self.world().players.get_mut(&player_id) {
            player.flying = flying;
        }
    }

    fn heal(&self, player_id: PlayerId) {
        if let Some(player) = self.world().players.get_mut(&player_id) {
            player.health = MAX_HEALTH;
            player.food = MAX_FOOD;
        }
    }

    fn set_movement_speed(&self, player_id: PlayerId, speed: f32) {
        if let Some(player) = self.world().players.get_mut(&player_id) {
            player.movement_speed = speed;
        }
    }

    fn register_command(&self, name: &str, usage: &str) {
        info!("⌨️ Registered command /{}", name);
        self.world()
            .commands
            .insert(name.to_lowercase(), usage.to_string());
    }

    fn plugin_config(&self, plugin_name: &str) -> Option<serde_json::Value> {
        self.plugin_configs.get(plugin_name).cloned()
    }
}
