use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracker_core::{Msg, Timer, TimerKind};

/// One slot per timer kind; arming a kind aborts whatever was armed before.
#[derive(Debug, Default)]
pub struct Timers {
    armed: HashMap<TimerKind, JoinHandle<()>>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, timer: Timer, delay: Duration, tx: UnboundedSender<Msg>) {
        self.cancel(timer.kind());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Msg::TimerFired(timer));
        });
        self.armed.insert(timer.kind(), handle);
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        if let Some(handle) = self.armed.remove(&kind) {
            handle.abort();
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed
            .get(&kind)
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.armed.drain() {
            handle.abort();
        }
    }
}
