//! # Cool Plugin
//!
//! Greets players, styles chat lines that mention "cool", tracks per-player
//! block and distance counters, sprinkles flame particles around, and lets
//! players ask to teleport to each other with `/tpa` and `/tpaccept`.
//!
//! All mutable state lives in one [`CoolState`] behind a mutex. The host
//! delivers events serially, so the lock is never contended; it exists
//! because handlers must be `Send + Sync`.

use async_trait::async_trait;
use cool_events::{
    create_simple_plugin, BlockBreakEvent, BlockPlaceEvent, CommandEvent, EventError,
    EventSystem, LogLevel, PlayerChatEvent, PlayerInteractEvent, PlayerJoinedEvent,
    PlayerMoveEvent, PlayerQuitEvent, PluginError, ServerContext, ServerTickEvent, SimplePlugin,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

pub mod chat;
pub mod commands;
pub mod config;
pub mod effects;
pub mod state;
pub mod stats;
pub mod teleport;

pub use config::CoolConfig;
pub use state::CoolState;
pub use stats::{PlayerStats, StatsBook};

/// Name of the plugin and of its config section.
pub const PLUGIN_NAME: &str = "cool";

pub struct CoolPlugin {
    state: Arc<Mutex<CoolState>>,
}

impl CoolPlugin {
    pub fn new() -> Self {
        Self::with_state(CoolState::default())
    }

    pub fn with_state(state: CoolState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Shared handle to the plugin state.
    pub fn state(&self) -> Arc<Mutex<CoolState>> {
        self.state.clone()
    }
}

impl Default for CoolPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(state: &Mutex<CoolState>) -> Result<MutexGuard<'_, CoolState>, EventError> {
    state
        .lock()
        .map_err(|_| EventError::HandlerExecution("cool plugin state poisoned".to_string()))
}

fn registration_failed(e: EventError) -> PluginError {
    PluginError::InitializationFailed(e.to_string())
}

#[async_trait]
impl SimplePlugin for CoolPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    async fn register_handlers(
        &mut self,
        events: Arc<EventSystem>,
        context: Arc<dyn ServerContext>,
    ) -> Result<(), PluginError> {
        info!("❄️ CoolPlugin: Registering event handlers...");

        let (state, ctx) = (self.state.clone(), context.clone());
        events
            .on_core("player_joined", move |event: PlayerJoinedEvent| {
                lock(&state)?.on_join(ctx.as_ref(), &event);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        let state = self.state.clone();
        events
            .on_core("player_quit", move |event: PlayerQuitEvent| {
                lock(&state)?.on_quit(&event);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        let (state, ctx) = (self.state.clone(), context.clone());
        events
            .on_core("server_tick", move |event: ServerTickEvent| {
                lock(&state)?.on_tick(ctx.as_ref(), event.tick);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        let (state, ctx) = (self.state.clone(), context.clone());
        events
            .on_client("chat", "message", move |event: PlayerChatEvent| {
                lock(&state)?.on_chat(ctx.as_ref(), &event);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        let (state, ctx) = (self.state.clone(), context.clone());
        events
            .on_client("movement", "player_moved", move |event: PlayerMoveEvent| {
                lock(&state)?.on_move(ctx.as_ref(), &event);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        let (state, ctx) = (self.state.clone(), context.clone());
        events
            .on_client("interaction", "use_item", move |event: PlayerInteractEvent| {
                lock(&state)?.on_interact(ctx.as_ref(), &event);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        let (state, ctx) = (self.state.clone(), context.clone());
        events
            .on_client("world", "block_break", move |event: BlockBreakEvent| {
                lock(&state)?.on_block_break(ctx.as_ref(), &event);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        let state = self.state.clone();
        events
            .on_client("world", "block_place", move |event: BlockPlaceEvent| {
                lock(&state)?.on_block_place(&event);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        let (state, ctx) = (self.state.clone(), context);
        events
            .on_client("command", "issued", move |event: CommandEvent| {
                lock(&state)?.on_command(ctx.as_ref(), &event);
                Ok(())
            })
            .await
            .map_err(registration_failed)?;

        info!("❄️ CoolPlugin: ✅ All handlers registered successfully!");
        Ok(())
    }

    async fn on_init(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        let config = match context.plugin_config(PLUGIN_NAME) {
            Some(value) => CoolConfig::from_value(value)?,
            None => CoolConfig::default(),
        };

        {
            let mut state = self
                .state
                .lock()
                .map_err(|_| PluginError::Runtime("cool plugin state poisoned".to_string()))?;
            state.apply_config(config);
        }

        for (name, usage) in commands::COMMANDS {
            context.register_command(name, usage);
        }

        context.log(LogLevel::Info, "CoolPlugin has been enabled!");
        Ok(())
    }

    async fn on_shutdown(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| PluginError::Runtime("cool plugin state poisoned".to_string()))?;
        let pending = state.teleports.pending_count();
        state.reset();
        drop(state);

        info!("❄️ CoolPlugin: Dropped {} pending teleport requests", pending);
        context.log(LogLevel::Info, "CoolPlugin has been disabled!");
        Ok(())
    }
}

create_simple_plugin!(CoolPlugin);
