use crate::{AttemptId, ChannelState, Generation, SignalingState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportStats {
    pub updates_sent: u64,
    pub heartbeats_sent: u64,
    /// Ticks dropped because no snapshot was available.
    pub skipped_captures: u64,
    pub signaling_sessions: u64,
    pub signaling_retries: u64,
    pub connect_attempts: u64,
    pub connect_timeouts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerView {
    pub signaling: SignalingState,
    pub channel: ChannelState,
    pub host_id: String,
    pub local_id: Option<String>,
    pub generation: Generation,
    pub attempt: Option<AttemptId>,
    pub stats: ReportStats,
    pub dirty: bool,
}

impl TrackerView {
    /// One-line summary for status logging.
    pub fn status_line(&self) -> String {
        format!(
            "signaling={:?} channel={:?} host={} local={} updates={} heartbeats={}",
            self.signaling,
            self.channel,
            self.host_id,
            self.local_id.as_deref().unwrap_or("-"),
            self.stats.updates_sent,
            self.stats.heartbeats_sent,
        )
    }
}
