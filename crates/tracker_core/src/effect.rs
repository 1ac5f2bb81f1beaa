use std::time::Duration;

use crate::{AttemptId, Generation, HostIdentifier, ReportMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Make sure the settings control is on the page.
    EnsureControl,
    /// Allocate a local identity and create a signaling session.
    OpenSignaling { generation: Generation },
    ReconnectSignaling { generation: Generation },
    DestroySignaling { generation: Generation },
    ConnectChannel {
        attempt: AttemptId,
        target: HostIdentifier,
        reliable: bool,
    },
    CloseChannel { attempt: AttemptId },
    /// Arm `timer`, replacing any armed timer of the same kind.
    ArmTimer { timer: Timer, delay: Duration },
    CancelTimer(TimerKind),
    CaptureSnapshot,
    Send {
        attempt: AttemptId,
        message: ReportMessage,
    },
    PromptHostIdentifier { current: HostIdentifier },
    PersistHostIdentifier(HostIdentifier),
    Notify(String),
}

/// Timers carry enough context to be recognised as stale when they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    SignalingRetry,
    ConnectTimeout { attempt: AttemptId },
}

impl Timer {
    pub fn kind(&self) -> TimerKind {
        match self {
            Timer::SignalingRetry => TimerKind::SignalingRetry,
            Timer::ConnectTimeout { .. } => TimerKind::ConnectTimeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    SignalingRetry,
    ConnectTimeout,
}
