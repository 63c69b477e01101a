//! In-memory `ServerContext` that records everything a plugin asks for.

#![allow(dead_code)]

use cool_events::{
    EventSystem, LogLevel, Particle, PlayerId, Position, ServerContext, ServerError, Sound,
    TextFormat, Viewers,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct MockPlayer {
    pub name: String,
    pub position: Position,
    pub online: bool,
    pub allow_flight: bool,
    pub flying: bool,
    pub speed: f32,
    pub heals: u32,
}

#[derive(Debug, Default)]
pub struct World {
    pub players: HashMap<PlayerId, MockPlayer>,
    pub messages: Vec<(PlayerId, String)>,
    pub console: Vec<String>,
    pub particles: Vec<(Position, Viewers)>,
    pub sounds: Vec<Position>,
    pub chat_formats: Vec<(PlayerId, String)>,
    pub cancelled: Vec<PlayerId>,
    pub commands: Vec<String>,
    pub logs: Vec<String>,
}

pub struct MockContext {
    pub events: Arc<EventSystem>,
    pub tick: AtomicU64,
    pub world: Mutex<World>,
    pub config: Option<serde_json::Value>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::with_config(None)
    }

    pub fn with_config(config: Option<serde_json::Value>) -> Self {
        Self {
            events: Arc::new(EventSystem::new()),
            tick: AtomicU64::new(0),
            world: Mutex::new(World::default()),
            config,
        }
    }

    pub fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().expect("mock world poisoned")
    }

    pub fn add_player(&self, name: &str, position: Position) -> PlayerId {
        let id = PlayerId::new();
        self.world().players.insert(
            id,
            MockPlayer {
                name: name.to_string(),
                position,
                online: true,
                allow_flight: false,
                flying: false,
                speed: 0.1,
                heals: 0,
            },
        );
        id
    }

    pub fn player(&self, id: PlayerId) -> MockPlayer {
        self.world().players[&id].clone()
    }

    pub fn set_online(&self, id: PlayerId, online: bool) {
        if let Some(player) = self.world().players.get_mut(&id) {
            player.online = online;
        }
    }

    pub fn set_tick(&self, tick: u64) {
        self.tick.store(tick, Ordering::SeqCst);
    }

    /// Messages received by `id`, with formatting codes stripped.
    pub fn messages_for(&self, id: PlayerId) -> Vec<String> {
        self.world()
            .messages
            .iter()
            .filter(|(to, _)| *to == id)
            .map(|(_, line)| TextFormat::clean(line))
            .collect()
    }

    pub fn last_message_for(&self, id: PlayerId) -> Option<String> {
        self.messages_for(id).pop()
    }

    pub fn clear_messages(&self) {
        self.world().messages.clear();
    }

    pub fn particle_count(&self) -> usize {
        self.world().particles.len()
    }

    fn online(&self, id: PlayerId) -> Option<MockPlayer> {
        self.world()
            .players
            .get(&id)
            .filter(|p| p.online)
            .cloned()
    }
}

impl ServerContext for MockContext {
    fn events(&self) -> Arc<EventSystem> {
        self.events.clone()
    }

    fn log(&self, _level: LogLevel, message: &str) {
        self.world().logs.push(message.to_string());
    }

    fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }

    fn player_name(&self, player_id: PlayerId) -> Option<String> {
        self.online(player_id).map(|p| p.name)
    }

    fn find_player_by_prefix(&self, query: &str) -> Option<PlayerId> {
        let query = query.to_lowercase();
        self.world()
            .players
            .iter()
            .filter(|(_, p)| p.online && p.name.to_lowercase().starts_with(&query))
            .min_by_key(|(_, p)| p.name.len())
            .map(|(id, _)| *id)
    }

    fn find_player_exact(&self, name: &str) -> Option<PlayerId> {
        self.world()
            .players
            .iter()
            .find(|(_, p)| p.online && p.name.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
    }

    fn online_players(&self) -> Vec<PlayerId> {
        self.world()
            .players
            .iter()
            .filter(|(_, p)| p.online)
            .map(|(id, _)| *id)
            .collect()
    }

    fn player_position(&self, player_id: PlayerId) -> Option<Position> {
        self.online(player_id).map(|p| p.position)
    }

    fn send_message(&self, player_id: PlayerId, message: &str) -> Result<(), ServerError> {
        if self.online(player_id).is_none() {
            return Err(ServerError::PlayerOffline(player_id));
        }
        self.world().messages.push((player_id, message.to_string()));
        Ok(())
    }

    fn send_console_message(&self, message: &str) {
        self.world().console.push(TextFormat::clean(message));
    }

    fn set_chat_format(&self, player_id: PlayerId, line: String) {
        self.world().chat_formats.push((player_id, line));
    }

    fn cancel_interaction(&self, player_id: PlayerId) {
        self.world().cancelled.push(player_id);
    }

    fn teleport(&self, player_id: PlayerId, to: Position) -> Result<(), ServerError> {
        let mut world = self.world();
        match world.players.get_mut(&player_id).filter(|p| p.online) {
            Some(player) => {
                player.position = to;
                Ok(())
            }
            None => Err(ServerError::PlayerOffline(player_id)),
        }
    }

    fn spawn_particle(&self, at: Position, _particle: Particle, viewers: Viewers) {
        self.world().particles.push((at, viewers));
    }

    fn play_sound(&self, at: Position, _sound: Sound) {
        self.world().sounds.push(at);
    }

    fn allows_flight(&self, player_id: PlayerId) -> bool {
        self.online(player_id).map(|p| p.allow_flight).unwrap_or(false)
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
            player.heals += 1;
        }
    }

    fn set_movement_speed(&self, player_id: PlayerId, speed: f32) {
        if let Some(player) = self.world().players.get_mut(&player_id) {
            player.speed = speed;
        }
    }

    fn register_command(&self, name: &str, _usage: &str) {
        self.world().commands.push(name.to_string());
    }

    fn plugin_config(&self, _plugin_name: &str) -> Option<serde_json::Value> {
        self.config.clone()
    }
}
