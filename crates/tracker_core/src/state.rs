use std::time::Duration;

use crate::view_model::{ReportStats, TrackerView};
use crate::{ChangeDetector, HostIdentifier, LocalIdentity};

/// Identifies one signaling session; bumped on every `initialize`.
pub type Generation = u64;
/// Identifies one data channel connect attempt.
pub type AttemptId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalingState {
    #[default]
    Uninitialized,
    Connecting,
    Open,
    Disconnected,
    Destroyed,
}

impl SignalingState {
    /// A live session exists and must not be replaced.
    pub fn is_live(self) -> bool {
        !matches!(self, SignalingState::Uninitialized | SignalingState::Destroyed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
}

/// Delays driving the reconnection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Wait before re-creating a signaling session the SDK destroyed.
    pub destroyed_retry: Duration,
    /// Wait before re-creating a signaling session after a fatal error.
    pub fatal_retry: Duration,
    /// How long a channel may stay unopened before it is abandoned.
    pub connect_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            destroyed_retry: Duration::from_secs(2),
            fatal_retry: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct SignalingSlot {
    pub(crate) state: SignalingState,
    pub(crate) generation: Generation,
    pub(crate) local_id: Option<LocalIdentity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ChannelSlot {
    pub(crate) state: ChannelState,
    /// Reference to the current channel; `None` once it has been dropped.
    pub(crate) attempt: Option<AttemptId>,
}

/// Everything the reporting loop owns: both sessions, the change detector and
/// the bookkeeping for timers that may still be armed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerState {
    pub(crate) timings: Timings,
    pub(crate) host_id: HostIdentifier,
    pub(crate) started: bool,
    pub(crate) signaling: SignalingSlot,
    pub(crate) channel: ChannelSlot,
    pub(crate) last_generation: Generation,
    pub(crate) last_attempt: AttemptId,
    pub(crate) retry_armed: bool,
    pub(crate) capture_in_flight: bool,
    pub(crate) detector: ChangeDetector,
    pub(crate) stats: ReportStats,
    dirty: bool,
}

impl TrackerState {
    pub fn new(host_id: HostIdentifier) -> Self {
        Self::with_timings(host_id, Timings::default())
    }

    pub fn with_timings(host_id: HostIdentifier, timings: Timings) -> Self {
        Self {
            timings,
            host_id,
            ..Self::default()
        }
    }

    pub fn view(&self) -> TrackerView {
        TrackerView {
            signaling: self.signaling.state,
            channel: self.channel.state,
            host_id: self.host_id.to_string(),
            local_id: self.signaling.local_id.as_ref().map(ToString::to_string),
            generation: self.signaling.generation,
            attempt: self.channel.attempt,
            stats: self.stats.clone(),
            dirty: self.dirty,
        }
    }

    pub fn host_id(&self) -> &HostIdentifier {
        &self.host_id
    }

    pub fn signaling_state(&self) -> SignalingState {
        self.signaling.state
    }

    pub fn channel_state(&self) -> ChannelState {
        self.channel.state
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Returns whether anything observable changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn next_generation(&mut self) -> Generation {
        self.last_generation += 1;
        self.last_generation
    }

    pub(crate) fn next_attempt(&mut self) -> AttemptId {
        self.last_attempt += 1;
        self.last_attempt
    }

    pub(crate) fn set_signaling(&mut self, state: SignalingState) {
        if self.signaling.state != state {
            self.signaling.state = state;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_channel(&mut self, state: ChannelState, attempt: Option<AttemptId>) {
        if self.channel.state != state || self.channel.attempt != attempt {
            self.channel = ChannelSlot { state, attempt };
            self.mark_dirty();
        }
    }

    /// The current channel attempt, if any reference is held.
    pub(crate) fn current_attempt(&self) -> Option<AttemptId> {
        self.channel.attempt
    }

    pub(crate) fn channel_is_open(&self) -> bool {
        self.channel.attempt.is_some() && self.channel.state == ChannelState::Open
    }
}
