//! # Teleport Requests
//!
//! A paired-consent handshake with timeout: one actor asks to be moved to
//! another, the other accepts, and unanswered requests expire after a fixed
//! delay.
//!
//! The crate knows nothing about a game server. Everything it needs from the
//! outside world comes through the collaborator traits in [`host`], and the
//! expiry callback is a plain [`ExpiryTicket`] the host hands back through
//! [`TeleportRequestManager::fire_expiry`] once the delay elapsed.
//!
//! ## Lifecycle per target
//!
//! ```text
//! NoRequest --request--> Pending --accept--> NoRequest
//!                        Pending --expire--> NoRequest
//!                        Pending --request--> Pending (new requester, new time)
//! ```
//!
//! There is no cancellation of scheduled expiries. A ticket for a request
//! that was accepted or overwritten simply finds nothing matching when it
//! fires.

pub mod error;
pub mod host;
pub mod manager;
pub mod notice;
pub mod request;
pub mod scheduler;

pub use error::TeleportError;
pub use host::{ActorDirectory, Mover, Notifier, Scheduler, TeleportHost};
pub use manager::TeleportRequestManager;
pub use notice::{Notice, Tone};
pub use request::{ExpiryTicket, PendingRequest, RequestTable, Tick};
pub use scheduler::TickScheduler;

/// Host ticks per second of wall-clock time.
pub const TICKS_PER_SECOND: Tick = 20;

/// Expiry delay applied when none is configured: 30 seconds.
pub const DEFAULT_EXPIRY_TICKS: Tick = 30 * TICKS_PER_SECOND;

/// Converts whole seconds to host ticks.
pub const fn ticks_from_secs(secs: u64) -> Tick {
    secs * TICKS_PER_SECOND
}
