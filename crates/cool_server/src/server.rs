//! The simulated server: hosts the cool plugin, turns console lines into
//! events and drives the tick clock.
//!
//! Everything runs on one task. Ticks, console lines and plugin reactions
//! never overlap, so the plugin sees events strictly one after another.

use crate::config::AppConfig;
use crate::console::{parse_line, ConsoleCommand, ConsoleError, Issuer, HELP_LINES};
use crate::host::{HostError, SimPlayer, SimulatedHost};
use crate::signals::shutdown_signal;
use cool_events::{
    current_timestamp, BlockBreakEvent, BlockPlaceEvent, CommandEvent, CommandSender,
    DisconnectReason, EventError, EventSystem, Plugin, PluginError, PlayerChatEvent,
    PlayerInteractEvent, PlayerJoinedEvent, PlayerMoveEvent, PlayerQuitEvent, ServerContext,
    ServerTickEvent, TextFormat,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub const UNKNOWN_COMMAND: &str = "Unknown command. Try /cool for help.";

/// What the caller should do after a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),
    #[error("Event error: {0}")]
    Event(#[from] EventError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    World(#[from] cool_events::ServerError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct CoolServer {
    config: AppConfig,
    events: Arc<EventSystem>,
    host: Arc<SimulatedHost>,
    plugin: Box<dyn Plugin>,
    started: bool,
}

impl CoolServer {
    pub fn new(config: AppConfig) -> Self {
        let events = Arc::new(EventSystem::new());
        let host = Arc::new(SimulatedHost::new(events.clone(), config.plugin_configs()));

        Self {
            config,
            events,
            host,
            plugin: plugin_cool::create_plugin(),
            started: false,
        }
    }

    pub fn host(&self) -> &SimulatedHost {
        &self.host
    }

    pub fn events(&self) -> Arc<EventSystem> {
        self.events.clone()
    }

    fn context(&self) -> Arc<dyn ServerContext> {
        self.host.clone()
    }

    /// Loads the plugin: handler registration, then initialization.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.started {
            return Ok(());
        }

        info!(
            "🔌 Loading plugin {} v{}",
            self.plugin.name(),
            self.plugin.version()
        );
        let context = self.context();
        self.plugin.pre_init(context.clone()).await?;
        self.plugin.init(context).await?;
        self.started = true;

        let stats = self.events.get_stats().await;
        info!(
            "✅ Plugin {} ready with {} handlers",
            self.plugin.name(),
            stats.total_handlers
        );
        Ok(())
    }

    /// Advances the clock one tick and delivers it to the plugin.
    pub async fn tick(&self) -> Result<u64, SessionError> {
        let tick = self.host.advance_tick();
        self.events
            .emit_core("server_tick", &ServerTickEvent { tick })
            .await?;
        Ok(tick)
    }

    /// Parses and applies one console line. Problems are reported in the
    /// transcript and never stop the session.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(e) => {
                self.host.announce(format!("! {}", e));
                return Flow::Continue;
            }
        };

        match self.apply(command).await {
            Ok(flow) => flow,
            Err(e) => {
                warn!("Console line '{}' failed: {}", line.trim(), e);
                self.host.announce(format!("! {}", e));
                Flow::Continue
            }
        }
    }

    pub async fn apply(&mut self, command: ConsoleCommand) -> Result<Flow, SessionError> {
        match command {
            ConsoleCommand::Join { name, position } => {
                let position = position.unwrap_or(self.config.server.spawn);
                let player_id = self.host.add_player(&name, position)?;
                self.host.announce(format!("* {} joined the game", name));
                info!("👋 {} joined at {}", name, position);

                let event = PlayerJoinedEvent {
                    player_id,
                    name,
                    position,
                    timestamp: current_timestamp(),
                };
                self.events.emit_core("player_joined", &event).await?;
            }
            ConsoleCommand::Quit { name } => {
                let player = self.host.player_by_name(&name)?;
                let event = PlayerQuitEvent {
                    player_id: player.id,
                    name: player.name.clone(),
                    reason: DisconnectReason::ClientDisconnect,
                    timestamp: current_timestamp(),
                };
                // Plugins still see the player while handling the quit.
                self.events.emit_core("player_quit", &event).await?;
                self.host.remove_player(player.id);
                self.host.announce(format!("* {} left the game", player.name));
                info!("🚪 {} left", player.name);
            }
            ConsoleCommand::Say { name, message } => {
                let player = self.host.player_by_name(&name)?;
                let event = PlayerChatEvent {
                    player_id: player.id,
                    message: message.clone(),
                    timestamp: current_timestamp(),
                };
                self.events.emit_client("chat", "message", &event).await?;

                let line = self
                    .host
                    .take_chat_override(player.id)
                    .unwrap_or_else(|| format!("<{}> {}", player.name, message));
                self.host.announce(TextFormat::clean(&line));
            }
            ConsoleCommand::Move { name, to, sprint } => {
                let player = self.host.player_by_name(&name)?;
                self.host.set_position(player.id, to)?;
                let event = PlayerMoveEvent {
                    player_id: player.id,
                    from: player.position,
                    to,
                    sprinting: sprint,
                };
                self.events
                    .emit_client("movement", "player_moved", &event)
                    .await?;
            }
            ConsoleCommand::Break { name, block } => {
                let player = self.host.player_by_name(&name)?;
                let event = BlockBreakEvent {
                    player_id: player.id,
                    block,
                };
                self.events.emit_client("world", "block_break", &event).await?;
            }
            ConsoleCommand::Place { name, block } => {
                let player = self.host.player_by_name(&name)?;
                let event = BlockPlaceEvent {
                    player_id: player.id,
                    block,
                };
                self.events.emit_client("world", "block_place", &event).await?;
            }
            ConsoleCommand::Use { name, item, block } => {
                let player = self.host.player_by_name(&name)?;
                let event = PlayerInteractEvent {
                    player_id: player.id,
                    item,
                    block,
                };
                self.events
                    .emit_client("interaction", "use_item", &event)
                    .await?;

                if self.host.take_cancelled(player.id) {
                    self.host
                        .announce(format!("* {}'s interaction was cancelled", player.name));
                }
            }
            ConsoleCommand::Command { issuer, line } => self.issue_command(&issuer, &line).await?,
            ConsoleCommand::Wait { ticks } => {
                for _ in 0..ticks {
                    self.tick().await?;
                }
                debug!("⏱️ Waited {} ticks, now at {}", ticks, self.host.current_tick());
            }
            ConsoleCommand::Players => self.list_players(),
            ConsoleCommand::Help => {
                for line in HELP_LINES {
                    self.host.announce(format!("  {}", line));
                }
            }
            ConsoleCommand::Stop => return Ok(Flow::Stop),
        }

        Ok(Flow::Continue)
    }

    async fn issue_command(&self, issuer: &Issuer, line: &str) -> Result<(), SessionError> {
        let sender = match issuer {
            Issuer::Console => CommandSender::Console,
            Issuer::Player(name) => CommandSender::Player(self.host.player_by_name(name)?.id),
        };

        let Some(event) = CommandEvent::parse(sender, line) else {
            return Err(ConsoleError::Usage("cmd <name|console> <command> [args...]").into());
        };

        if !self.host.is_command_registered(&event.command) {
            let reply = format!("{}{}", TextFormat::RED, UNKNOWN_COMMAND);
            match sender {
                CommandSender::Player(player_id) => self.host.send_message(player_id, &reply)?,
                CommandSender::Console => self.host.send_console_message(&reply),
            }
            return Ok(());
        }

        debug!("⌨️ {} ran /{}", issuer, line);
        self.events.emit_client("command", "issued", &event).await?;
        Ok(())
    }

    fn list_players(&self) {
        let players: Vec<SimPlayer> = self.host.players();
        self.host
            .announce(format!("Online players ({}):", players.len()));
        for player in players {
            self.host
                .announce(format!("  {} at {}", player.name, player.position));
        }
    }

    /// Transcript lines produced since the last call.
    pub fn take_output(&self) -> Vec<String> {
        self.host.take_transcript()
    }

    fn flush_output(&self) {
        for line in self.take_output() {
            println!("{}", line);
        }
    }

    /// Runs console lines from stdin while ticking in real time, until `stop`,
    /// end of input or a shutdown signal.
    pub async fn run_interactive(&mut self, tick_interval: Duration) -> Result<(), SessionError> {
        let mut ticker = tokio::time::interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);
        let mut signals_live = true;

        info!("🎮 Console ready. Type 'help' for commands.");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await?;
                }
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if self.handle_line(&line).await == Flow::Stop {
                            info!("🛑 Stop requested from console");
                            break;
                        }
                    }
                    None => {
                        info!("🛑 Console input closed");
                        break;
                    }
                },
                result = &mut shutdown, if signals_live => match result {
                    Ok(()) => break,
                    Err(e) => {
                        error!("❌ Signal handling unavailable: {}", e);
                        signals_live = false;
                    }
                },
            }
            self.flush_output();
        }

        self.flush_output();
        Ok(())
    }

    /// Runs a console script. Time only passes through `wait` lines.
    pub async fn run_script(&mut self, path: &Path) -> Result<(), SessionError> {
        let script = tokio::fs::read_to_string(path).await?;
        info!("📜 Running script {}", path.display());

        for line in script.lines() {
            let flow = self.handle_line(line).await;
            self.flush_output();
            if flow == Flow::Stop {
                break;
            }
        }
        Ok(())
    }

    /// Shuts the plugin down and reports event totals.
    pub async fn shutdown(&mut self) -> Result<(), SessionError> {
        if !self.started {
            return Ok(());
        }

        self.plugin.shutdown(self.context()).await?;
        self.started = false;
        self.flush_output();

        let stats = self.events.get_stats().await;
        info!("📊 Final Event System Statistics:");
        info!("  - Events emitted: {}", stats.events_emitted);
        info!("  - Handler failures: {}", stats.handler_failures);
        info!("  - Ticks run: {}", self.host.current_tick());
        Ok(())
    }
}
