use serde_json::json;

use crate::{HeartbeatPayload, ReportMessage, Snapshot};

/// Comparison key over the fields that make a report worth sending in full.
///
/// Covers percentage, completed count and task name. Timestamp, subject and
/// item names are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(snapshot: &Snapshot) -> Self {
        let key = json!({
            "p": snapshot.progress.percentage,
            "c": snapshot.progress.completed,
            "m": snapshot.task,
        });
        Self(key.to_string())
    }
}

/// Decides between a full UPDATE and a HEARTBEAT for each captured snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeDetector {
    last: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the last fingerprint so the next classification is an UPDATE.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_reset(&self) -> bool {
        self.last.is_none()
    }

    pub fn classify(&mut self, snapshot: &Snapshot) -> ReportMessage {
        let current = Fingerprint::of(snapshot);
        if self.last.as_ref() == Some(&current) {
            return ReportMessage::Heartbeat(HeartbeatPayload {
                subject: snapshot.subject.clone(),
            });
        }
        self.last = Some(current);
        ReportMessage::Update(snapshot.clone())
    }
}
