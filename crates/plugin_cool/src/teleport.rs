//! Binds the teleport handshake to the host context.
//!
//! Requests are keyed by player name, not by [`PlayerId`]: ids are handed out
//! per session, while a name survives a reconnect and stays printable after
//! its player left.

use cool_events::{PlayerId, Position, ServerContext, TextFormat};
use teleport_requests::{
    ActorDirectory, ExpiryTicket, Mover, Notice, Notifier, Scheduler, Tick, TickScheduler, Tone,
};
use tracing::{debug, warn};

/// Canonical player name as reported by the host.
pub type PlayerName = String;

/// Short-lived adapter handed to the request manager for a single call.
///
/// Expiries go into the plugin's own tick queue, drained from the
/// `server_tick` handler.
pub struct HostBridge<'a> {
    context: &'a dyn ServerContext,
    expiries: &'a mut TickScheduler<ExpiryTicket<PlayerName>>,
}

impl<'a> HostBridge<'a> {
    pub fn new(
        context: &'a dyn ServerContext,
        expiries: &'a mut TickScheduler<ExpiryTicket<PlayerName>>,
    ) -> Self {
        Self { context, expiries }
    }

    /// The session id of the online player called `name`.
    fn online(&self, name: &str) -> Option<PlayerId> {
        self.context.find_player_exact(name)
    }

    fn canonical_name(&self, id: Option<PlayerId>) -> Option<PlayerName> {
        id.and_then(|id| self.context.player_name(id))
    }
}

impl ActorDirectory for HostBridge<'_> {
    type Id = PlayerName;
    type Position = Position;

    fn resolve_by_prefix_or_name(&self, query: &str) -> Option<PlayerName> {
        self.canonical_name(self.context.find_player_by_prefix(query))
    }

    fn resolve_exact(&self, name: &PlayerName) -> Option<PlayerName> {
        self.canonical_name(self.online(name))
    }

    fn current_position(&self, name: &PlayerName) -> Option<Position> {
        self.online(name)
            .and_then(|id| self.context.player_position(id))
    }

    fn display_name(&self, name: &PlayerName) -> String {
        name.clone()
    }
}

impl Notifier for HostBridge<'_> {
    fn notify(&mut self, to: &PlayerName, notice: &Notice) {
        let Some(id) = self.online(to) else {
            debug!("Notice for {} dropped: not online", to);
            return;
        };
        if let Err(e) = self.context.send_message(id, &styled(notice)) {
            debug!("Notice for {} dropped: {}", to, e);
        }
    }
}

impl Mover for HostBridge<'_> {
    fn relocate(&mut self, who: &PlayerName, to: Position) {
        let result = match self.online(who) {
            Some(id) => self.context.teleport(id, to).map_err(|e| e.to_string()),
            None => Err("not online".to_string()),
        };
        if let Err(e) = result {
            warn!("❌ Failed to teleport {} to {}: {}", who, to, e);
        }
    }
}

impl Scheduler for HostBridge<'_> {
    fn now(&self) -> Tick {
        self.context.current_tick()
    }

    fn schedule_once(&mut self, delay: Tick, ticket: ExpiryTicket<PlayerName>) {
        let now = self.context.current_tick();
        self.expiries.schedule(now, delay, ticket);
    }
}

/// Chat-formatted text for a notice.
pub fn styled(notice: &Notice) -> String {
    match notice {
        Notice::RequestReceived { requester } => format!(
            "{}{}{} wants to teleport to you. Type {}/tpaccept{} to accept.",
            TextFormat::YELLOW,
            requester,
            TextFormat::AQUA,
            TextFormat::WHITE,
            TextFormat::AQUA
        ),
        other => {
            let color = match other.tone() {
                Tone::Success => TextFormat::GREEN,
                Tone::Info => TextFormat::AQUA,
                Tone::Failure => TextFormat::RED,
            };
            format!("{}{}", color, other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_notices() {
        assert_eq!(
            styled(&Notice::RequestSent {
                target: "Bob".to_string()
            }),
            "§aTeleport request sent to Bob"
        );
        assert_eq!(styled(&Notice::NoPendingRequest), "§cNo pending teleport requests!");

        let received = styled(&Notice::RequestReceived {
            requester: "Alice".to_string(),
        });
        assert_eq!(
            received,
            "§eAlice§b wants to teleport to you. Type §f/tpaccept§b to accept."
        );
        assert_eq!(
            TextFormat::clean(&received),
            Notice::RequestReceived {
                requester: "Alice".to_string()
            }
            .to_string()
        );
    }
}
