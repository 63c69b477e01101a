//! Plugin state and the event reactions that mutate it.
//!
//! Every handler registered by [`CoolPlugin`](crate::CoolPlugin) locks the
//! shared [`CoolState`] and calls one of the `on_*` methods here, so the
//! reactions can be driven directly in tests with any [`ServerContext`].

use crate::chat::cool_chat_line;
use crate::config::CoolConfig;
use crate::effects;
use crate::stats::StatsBook;
use crate::teleport::{HostBridge, PlayerName};
use cool_events::{
    BlockBreakEvent, BlockPlaceEvent, ItemKind, Particle, PlayerChatEvent, PlayerId,
    PlayerInteractEvent, PlayerJoinedEvent, PlayerMoveEvent, PlayerQuitEvent, Position,
    ServerContext, Sound, TextFormat, Viewers,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use teleport_requests::{ExpiryTicket, TeleportRequestManager, Tick, TickScheduler};
use tracing::{debug, trace};

/// Sprint moves shorter than this leave no trail.
const TRAIL_MIN_DISTANCE: f64 = 0.1;

pub struct CoolState {
    pub config: CoolConfig,
    pub stats: StatsBook,
    /// Pending requests, keyed by target name.
    pub teleports: TeleportRequestManager<PlayerName>,
    /// Pending expiry tickets, drained every tick.
    pub expiries: TickScheduler<ExpiryTicket<PlayerName>>,
    pub(crate) rng: StdRng,
}

impl CoolState {
    pub fn new(config: CoolConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// State with a caller-supplied random source, for reproducible effects.
    pub fn with_rng(config: CoolConfig, rng: StdRng) -> Self {
        let mut state = Self {
            config: CoolConfig::default(),
            stats: StatsBook::new(),
            teleports: TeleportRequestManager::new(),
            expiries: TickScheduler::new(),
            rng,
        };
        state.apply_config(config);
        state
    }

    pub fn apply_config(&mut self, config: CoolConfig) {
        self.teleports.set_expiry_delay(config.teleport.expiry_ticks);
        self.config = config;
    }

    /// Forgets all players and requests.
    pub fn reset(&mut self) {
        self.stats.clear();
        self.teleports.clear();
        self.expiries.clear();
    }

    pub fn on_join(&mut self, ctx: &dyn ServerContext, event: &PlayerJoinedEvent) {
        let player = event.player_id;
        self.stats.reset(player, event.position);

        let rule = format!("{}★═══════════════════════════════════════★", TextFormat::GOLD);
        tell(ctx, player, &rule);
        tell(
            ctx,
            player,
            &format!("{}       Welcome to the Cool Server!", TextFormat::AQUA),
        );
        tell(
            ctx,
            player,
            &format!(
                "{}    Type {}/cool{} for awesome commands!",
                TextFormat::YELLOW,
                TextFormat::WHITE,
                TextFormat::YELLOW
            ),
        );
        tell(ctx, player, &rule);

        for at in effects::join_burst(&mut self.rng, event.position) {
            ctx.spawn_particle(at, Particle::Flame, Viewers::Only(player));
        }
        ctx.play_sound(event.position, Sound::Pop);

        debug!("🎉 Welcomed {}", event.name);
    }

    pub fn on_quit(&mut self, event: &PlayerQuitEvent) {
        if self.stats.remove(event.player_id).is_some() {
            debug!("Dropped stats for {} ({:?})", event.name, event.reason);
        }
    }

    pub fn on_chat(&mut self, ctx: &dyn ServerContext, event: &PlayerChatEvent) {
        let Some(name) = ctx.player_name(event.player_id) else {
            return;
        };
        if let Some(line) = cool_chat_line(&name, &event.message) {
            ctx.set_chat_format(event.player_id, line);
        }
    }

    pub fn on_move(&mut self, ctx: &dyn ServerContext, event: &PlayerMoveEvent) {
        let Some(distance) = self.stats.record_move(event.player_id, event.from, event.to) else {
            return;
        };

        if event.sprinting && distance > TRAIL_MIN_DISTANCE {
            ctx.spawn_particle(
                effects::sprint_trail(event.from),
                Particle::Flame,
                Viewers::Only(event.player_id),
            );
        }
    }

    pub fn on_interact(&mut self, ctx: &dyn ServerContext, event: &PlayerInteractEvent) {
        if event.item != ItemKind::Diamond {
            return;
        }

        ctx.cancel_interaction(event.player_id);
        for at in effects::diamond_burst(&mut self.rng, event.block) {
            ctx.spawn_particle(at, Particle::Flame, Viewers::Everyone);
        }
        tell(
            ctx,
            event.player_id,
            &format!("{}✨ Diamond magic activated! ✨", TextFormat::AQUA),
        );
        ctx.play_sound(event.block, Sound::Pop);
    }

    pub fn on_block_break(&mut self, ctx: &dyn ServerContext, event: &BlockBreakEvent) {
        let interval = self.config.stats.milestone_interval;
        let Some(broken) = self.stats.record_break(event.player_id, interval) else {
            return;
        };

        tell(
            ctx,
            event.player_id,
            &format!(
                "{}🎉 Milestone reached! {}You've broken {}{}{} blocks!",
                TextFormat::GOLD,
                TextFormat::YELLOW,
                TextFormat::WHITE,
                broken,
                TextFormat::YELLOW
            ),
        );
        for at in effects::milestone_burst(&mut self.rng, event.block) {
            ctx.spawn_particle(at, Particle::Flame, Viewers::Everyone);
        }
    }

    pub fn on_block_place(&mut self, event: &BlockPlaceEvent) {
        self.stats.record_place(event.player_id);
    }

    /// Fires due teleport expiries, then runs the ambient particle round when
    /// the tick lands on the configured interval. Returns how many requests
    /// expired.
    pub fn on_tick(&mut self, ctx: &dyn ServerContext, tick: Tick) -> usize {
        let mut expired = 0;
        for ticket in self.expiries.drain_due(tick) {
            let mut bridge = HostBridge::new(ctx, &mut self.expiries);
            if self.teleports.fire_expiry(&mut bridge, &ticket) {
                expired += 1;
            }
        }

        let interval = self.config.effects.ambient_interval_ticks;
        if interval > 0 && tick % interval == 0 {
            self.ambient_round(ctx);
        }

        expired
    }

    fn ambient_round(&mut self, ctx: &dyn ServerContext) {
        let chance = self.config.effects.ambient_chance;
        for player in ctx.online_players() {
            if !effects::roll_chance(&mut self.rng, chance) {
                continue;
            }
            let Some(position) = ctx.player_position(player) else {
                continue;
            };
            let at: Position = effects::ambient_spark(&mut self.rng, position);
            trace!("✨ Ambient spark for {} at {}", player, at);
            ctx.spawn_particle(at, Particle::Flame, Viewers::Only(player));
        }
    }
}

impl Default for CoolState {
    fn default() -> Self {
        Self::new(CoolConfig::default())
    }
}

/// Sends a chat line, ignoring players that already left.
pub(crate) fn tell(ctx: &dyn ServerContext, player: PlayerId, line: &str) {
    if let Err(e) = ctx.send_message(player, line) {
        debug!("Message for {} dropped: {}", player, e);
    }
}
