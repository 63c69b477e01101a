//! Collaborators the manager calls into.
//!
//! A host adapter implements all four traits on one value and passes it to
//! every manager call, so the manager never holds on to host state.

use crate::notice::Notice;
use crate::request::{ExpiryTicket, Tick};
use std::fmt::Debug;
use std::hash::Hash;

/// Resolves actors and reads their state.
pub trait ActorDirectory {
    /// Stable actor identity.
    type Id: Clone + Eq + Hash + Debug;
    /// Where an actor currently is.
    type Position: Clone + Debug;

    /// Finds a reachable actor whose name matches `query` exactly or by prefix.
    fn resolve_by_prefix_or_name(&self, query: &str) -> Option<Self::Id>;

    /// Returns `id` if that actor is still reachable.
    fn resolve_exact(&self, id: &Self::Id) -> Option<Self::Id>;

    fn current_position(&self, id: &Self::Id) -> Option<Self::Position>;

    /// Name shown to other actors. Must not fail for actors that left.
    fn display_name(&self, id: &Self::Id) -> String;
}

/// Delivers notices. Best effort: an actor that went away just misses it.
pub trait Notifier: ActorDirectory {
    fn notify(&mut self, to: &Self::Id, notice: &Notice);
}

/// Moves actors.
pub trait Mover: ActorDirectory {
    /// Repositions `who` immediately. Assumed to succeed for reachable actors.
    fn relocate(&mut self, who: &Self::Id, to: Self::Position);
}

/// The host's clock and one-shot deferral.
pub trait Scheduler: ActorDirectory {
    fn now(&self) -> Tick;

    /// Hands `ticket` back to the manager's `fire_expiry` once `delay` ticks
    /// passed, on the same thread as all other calls.
    fn schedule_once(&mut self, delay: Tick, ticket: ExpiryTicket<Self::Id>);
}

/// Everything the manager needs from a host.
pub trait TeleportHost: Notifier + Mover + Scheduler {}

impl<T> TeleportHost for T where T: Notifier + Mover + Scheduler {}
