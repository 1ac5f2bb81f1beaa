use std::fmt;

use crate::{AttemptId, Generation, LocalIdentity, Snapshot, Timer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Startup delay elapsed; bring the control and the signaling session up.
    Started,
    /// A reporting tick from one of the trigger sources.
    Tick(TickSource),
    /// Result of a `CaptureSnapshot` effect; `None` when the page has no data.
    SnapshotCaptured(Option<Snapshot>),
    /// Lifecycle event of the signaling session created for `generation`.
    Signaling {
        generation: Generation,
        event: SignalingEvent,
    },
    /// Lifecycle event of the data channel created for `attempt`.
    Channel {
        attempt: AttemptId,
        event: ChannelEvent,
    },
    /// The transport refused a report sent on `attempt`.
    SendFailed { attempt: AttemptId },
    /// A previously armed timer elapsed.
    TimerFired(Timer),
    /// User activated the settings control.
    SettingsRequested,
    /// Result of the host identifier prompt; `None` when cancelled.
    HostIdentifierEntered(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    Interval,
    ContentMutation,
    ChannelOpened,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingEvent {
    Opened { local_id: LocalIdentity },
    /// Link to the signaling server lost; the session object is still alive.
    Disconnected,
    /// Session object permanently destroyed.
    Closed,
    Error(SignalingErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened,
    Closed,
    Error(String),
}

/// Error classes reported by the signaling SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingErrorKind {
    IncompatibleEnvironment,
    InvalidIdentifier,
    IdentifierUnavailable,
    SecureTransportUnavailable,
    NetworkFailure,
    TransportFailure,
    /// Anything else the SDK reports, kept verbatim for the log.
    Other(String),
}

impl SignalingErrorKind {
    /// Maps the SDK's error type codes onto the known classes.
    pub fn from_code(code: &str) -> Self {
        match code {
            "browser-incompatible" => Self::IncompatibleEnvironment,
            "invalid-id" => Self::InvalidIdentifier,
            "unavailable-id" => Self::IdentifierUnavailable,
            "ssl-unavailable" => Self::SecureTransportUnavailable,
            "network" => Self::NetworkFailure,
            "webrtc" => Self::TransportFailure,
            other => Self::Other(other.to_string()),
        }
    }

    /// Fatal errors leave the session unusable and force a destroy + retry.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for SignalingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleEnvironment => write!(f, "incompatible environment"),
            Self::InvalidIdentifier => write!(f, "invalid identifier"),
            Self::IdentifierUnavailable => write!(f, "identifier unavailable"),
            Self::SecureTransportUnavailable => write!(f, "secure transport unavailable"),
            Self::NetworkFailure => write!(f, "network failure"),
            Self::TransportFailure => write!(f, "transport failure"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}
