use std::fmt;

use serde::{Deserialize, Serialize};

/// Listener the data channel connects to when nothing has been configured.
pub const DEFAULT_HOST_ID: &str = "tracker-dashboard-listener-12345";

/// Address of the remote listener. Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostIdentifier(String);

impl HostIdentifier {
    /// Accepts user or store input; blank input is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HostIdentifier {
    fn default() -> Self {
        Self(DEFAULT_HOST_ID.to_string())
    }
}

impl fmt::Display for HostIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ephemeral participant id handed to the signaling service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalIdentity(String);

impl LocalIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progress counters of the monitored subject.
///
/// Field names on the wire match what the dashboard listener reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub total: u32,
    pub completed: u32,
    pub remaining: u32,
    pub percentage: u32,
    #[serde(rename = "solvedTaskNames")]
    pub completed_items: Vec<String>,
}

impl Progress {
    /// Derives the counters from the total and the names of completed items.
    ///
    /// The percentage is rounded half up, and is 0 when `total` is 0.
    /// `remaining` stops at 0 when more items are completed than `total`
    /// declares; the percentage then goes above 100.
    pub fn from_completed(total: u32, completed_items: Vec<String>) -> Self {
        let completed = u32::try_from(completed_items.len()).unwrap_or(u32::MAX);
        let percentage = if total == 0 {
            0
        } else {
            let scaled = u64::from(completed) * 100;
            let total = u64::from(total);
            u32::try_from((scaled + total / 2) / total).unwrap_or(u32::MAX)
        };
        Self {
            total,
            completed,
            remaining: total.saturating_sub(completed),
            percentage,
            completed_items,
        }
    }
}

/// One observation of the monitored subject, produced by the scraper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "username")]
    pub subject: String,
    #[serde(rename = "machine")]
    pub task: String,
    pub progress: Progress,
    /// Capture time, milliseconds since the Unix epoch.
    #[serde(rename = "timestamp")]
    pub captured_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    #[serde(rename = "username")]
    pub subject: String,
}

/// What goes over the data channel on each reporting tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "UPPERCASE")]
pub enum ReportMessage {
    Update(Snapshot),
    Heartbeat(HeartbeatPayload),
}

impl ReportMessage {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportMessage::Update(_) => ReportKind::Update,
            ReportMessage::Heartbeat(_) => ReportKind::Heartbeat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Update,
    Heartbeat,
}
