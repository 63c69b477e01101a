//! User-facing messages emitted by the handshake.

use std::fmt;

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Failure,
}

/// A message for one actor. Names are display names resolved when the
/// notice was produced.
///
/// `Display` renders the plain text; hosts that support styling can match on
/// the variant or use [`Notice::tone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    TargetNotFound,
    SelfTargetDenied,
    RequestSent { target: String },
    RequestReceived { requester: String },
    TeleportedTo { target: String },
    TeleportedToYou { requester: String },
    RequestExpired { target: String },
    NoPendingRequest,
    RequesterUnreachable,
}

impl Notice {
    pub fn tone(&self) -> Tone {
        match self {
            Notice::RequestSent { .. }
            | Notice::TeleportedTo { .. }
            | Notice::TeleportedToYou { .. } => Tone::Success,
            Notice::RequestReceived { .. } => Tone::Info,
            Notice::TargetNotFound
            | Notice::SelfTargetDenied
            | Notice::RequestExpired { .. }
            | Notice::NoPendingRequest
            | Notice::RequesterUnreachable => Tone::Failure,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::TargetNotFound => write!(f, "Player not found!"),
            Notice::SelfTargetDenied => write!(f, "You cannot teleport to yourself!"),
            Notice::RequestSent { target } => write!(f, "Teleport request sent to {}", target),
            Notice::RequestReceived { requester } => write!(
                f,
                "{} wants to teleport to you. Type /tpaccept to accept.",
                requester
            ),
            Notice::TeleportedTo { target } => write!(f, "Teleported to {}!", target),
            Notice::TeleportedToYou { requester } => {
                write!(f, "{} has been teleported to you!", requester)
            }
            Notice::RequestExpired { target } => {
                write!(f, "Teleport request to {} expired.", target)
            }
            Notice::NoPendingRequest => write!(f, "No pending teleport requests!"),
            Notice::RequesterUnreachable => {
                write!(f, "The player who requested teleport is no longer online!")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text_and_tone() {
        let received = Notice::RequestReceived {
            requester: "Alice".to_string(),
        };
        assert_eq!(
            received.to_string(),
            "Alice wants to teleport to you. Type /tpaccept to accept."
        );
        assert_eq!(received.tone(), Tone::Info);

        let expired = Notice::RequestExpired {
            target: "Bob".to_string(),
        };
        assert_eq!(expired.to_string(), "Teleport request to Bob expired.");
        assert_eq!(expired.tone(), Tone::Failure);

        assert_eq!(
            Notice::TeleportedTo { target: "Bob".to_string() }.tone(),
            Tone::Success
        );
    }
}
