/// Why a teleport operation did not go through.
///
/// Every variant is also reported to the initiating actor as a [`Notice`](crate::Notice)
/// before it is returned. None of them leave the request table inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TeleportError {
    /// The query did not resolve to a reachable actor
    #[error("target not found")]
    TargetNotFound,
    /// An actor tried to request a teleport to themselves
    #[error("cannot request a teleport to yourself")]
    SelfTargetDenied,
    /// The accepting actor has nothing pending
    #[error("no pending teleport request")]
    NoPendingRequest,
    /// The requester left before the request was accepted. The stale
    /// request is cleared.
    #[error("requester is no longer reachable")]
    RequesterUnreachable,
}
