//! Tracker core: pure connection-lifecycle state machine and report classification.
mod change;
mod effect;
mod msg;
mod report;
mod state;
mod update;
mod view_model;

pub use change::{ChangeDetector, Fingerprint};
pub use effect::{Effect, Timer, TimerKind};
pub use msg::{ChannelEvent, Msg, SignalingErrorKind, SignalingEvent, TickSource};
pub use report::{
    HeartbeatPayload, HostIdentifier, LocalIdentity, Progress, ReportKind, ReportMessage,
    Snapshot, DEFAULT_HOST_ID,
};
pub use state::{AttemptId, ChannelState, Generation, SignalingState, Timings, TrackerState};
pub use update::update;
pub use view_model::{ReportStats, TrackerView};
