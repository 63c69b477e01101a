//! `/cool`, `/stats`, `/tpa` and `/tpaccept`.

use crate::effects;
use crate::state::{tell, CoolState};
use crate::teleport::HostBridge;
use cool_events::{CommandEvent, Particle, PlayerId, ServerContext, TextFormat, Viewers};
use tracing::debug;

/// Commands the plugin registers with the host, with their usage lines.
pub const COMMANDS: [(&str, &str); 4] = [
    ("cool", "/cool [particles|fly|heal|speed [level]]"),
    ("stats", "/stats"),
    ("tpa", "/tpa <player>"),
    ("tpaccept", "/tpaccept"),
];

impl CoolState {
    pub fn on_command(&mut self, ctx: &dyn ServerContext, event: &CommandEvent) {
        if !COMMANDS.iter().any(|(name, _)| *name == event.command) {
            return;
        }

        let Some(player) = event.sender.as_player() else {
            ctx.send_console_message(&format!(
                "{}This command can only be used in-game!",
                TextFormat::RED
            ));
            return;
        };

        debug!("⌨️ {} issued /{} {:?}", player, event.command, event.args);
        match event.command.as_str() {
            "cool" => self.cool_command(ctx, player, &event.args),
            "stats" => self.stats_command(ctx, player),
            "tpa" => self.tpa_command(ctx, player, &event.args),
            "tpaccept" => self.tpaccept_command(ctx, player),
            _ => {}
        }
    }

    fn cool_command(&mut self, ctx: &dyn ServerContext, player: PlayerId, args: &[String]) {
        let Some(subcommand) = args.first() else {
            tell(ctx, player, &format!("{}=== Cool Commands ===", TextFormat::AQUA));
            for line in [
                "/cool particles - Spawn cool particles",
                "/cool fly - Toggle flight mode",
                "/cool heal - Heal yourself",
                "/cool speed [level] - Set speed",
            ] {
                tell(ctx, player, &format!("{}{}", TextFormat::YELLOW, line));
            }
            return;
        };

        match subcommand.to_lowercase().as_str() {
            "particles" => self.spawn_spiral(ctx, player),
            "fly" => toggle_flight(ctx, player),
            "heal" => self.heal(ctx, player),
            "speed" => {
                let level = clamp_level(
                    parse_level(args.get(1).map(String::as_str)),
                    self.config.speed.max_level,
                );
                ctx.set_movement_speed(player, 0.1 * level as f32);
                tell(
                    ctx,
                    player,
                    &format!("{}Speed set to level {}!", TextFormat::GREEN, level),
                );
            }
            _ => tell(
                ctx,
                player,
                &format!("{}Unknown subcommand! Use /cool for help.", TextFormat::RED),
            ),
        }
    }

    fn spawn_spiral(&mut self, ctx: &dyn ServerContext, player: PlayerId) {
        if let Some(position) = ctx.player_position(player) {
            for at in effects::spiral(position) {
                ctx.spawn_particle(at, Particle::Flame, Viewers::Only(player));
            }
        }
        tell(
            ctx,
            player,
            &format!("{}✨ Cool particles spawned! ✨", TextFormat::AQUA),
        );
    }

    fn heal(&mut self, ctx: &dyn ServerContext, player: PlayerId) {
        ctx.heal(player);
        tell(ctx, player, &format!("{}You have been healed!", TextFormat::GREEN));

        if let Some(position) = ctx.player_position(player) {
            for at in effects::heal_burst(&mut self.rng, position) {
                ctx.spawn_particle(at, Particle::Flame, Viewers::Only(player));
            }
        }
    }

    fn stats_command(&self, ctx: &dyn ServerContext, player: PlayerId) {
        let Some(stats) = self.stats.get(player) else {
            tell(ctx, player, &format!("{}No stats available!", TextFormat::RED));
            return;
        };

        let yellow = TextFormat::YELLOW;
        let white = TextFormat::WHITE;
        tell(ctx, player, &format!("{}=== Your Stats ===", TextFormat::GOLD));
        tell(
            ctx,
            player,
            &format!("{}Blocks Broken: {}{}", yellow, white, stats.blocks_broken),
        );
        tell(
            ctx,
            player,
            &format!("{}Blocks Placed: {}{}", yellow, white, stats.blocks_placed),
        );
        tell(
            ctx,
            player,
            &format!(
                "{}Distance Traveled: {}{} blocks",
                yellow,
                white,
                stats.rounded_distance()
            ),
        );
    }

    fn tpa_command(&mut self, ctx: &dyn ServerContext, player: PlayerId, args: &[String]) {
        let Some(query) = args.first() else {
            tell(ctx, player, &format!("{}Usage: /tpa <player>", TextFormat::RED));
            return;
        };

        let Some(name) = ctx.player_name(player) else {
            return;
        };
        let mut bridge = HostBridge::new(ctx, &mut self.expiries);
        if let Err(e) = self.teleports.request_teleport(&mut bridge, &name, query) {
            debug!("/tpa {} from {} refused: {}", query, player, e);
        }
    }

    fn tpaccept_command(&mut self, ctx: &dyn ServerContext, player: PlayerId) {
        let Some(name) = ctx.player_name(player) else {
            return;
        };
        let mut bridge = HostBridge::new(ctx, &mut self.expiries);
        if let Err(e) = self.teleports.accept_teleport(&mut bridge, &name) {
            debug!("/tpaccept from {} refused: {}", player, e);
        }
    }
}

fn toggle_flight(ctx: &dyn ServerContext, player: PlayerId) {
    if ctx.allows_flight(player) {
        ctx.set_allow_flight(player, false);
        ctx.set_flying(player, false);
        tell(ctx, player, &format!("{}Flight disabled!", TextFormat::RED));
    } else {
        ctx.set_allow_flight(player, true);
        tell(ctx, player, &format!("{}Flight enabled!", TextFormat::GREEN));
    }
}

/// Reads a speed level the way a lenient integer cast would: the leading
/// signed digits count, anything unreadable is 0, and a missing argument
/// means level 1.
pub fn parse_level(arg: Option<&str>) -> i64 {
    let Some(arg) = arg else {
        return 1;
    };

    let arg = arg.trim_start();
    let (negative, digits) = match arg.as_bytes().first() {
        Some(b'-') => (true, &arg[1..]),
        Some(b'+') => (false, &arg[1..]),
        _ => (false, arg),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative {
        -value
    } else {
        value
    }
}

/// Clamps a requested level into `1..=max_level`.
pub fn clamp_level(level: i64, max_level: u32) -> u32 {
    level.clamp(1, i64::from(max_level.max(1))) as u32
}
