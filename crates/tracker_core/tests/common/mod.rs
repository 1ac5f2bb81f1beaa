#![allow(dead_code)]

use std::sync::Once;

use tracker_core::{
    update, ChannelEvent, Effect, HostIdentifier, LocalIdentity, Msg, Progress, SignalingEvent,
    Snapshot, TrackerState,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

pub fn host(id: &str) -> HostIdentifier {
    HostIdentifier::parse(id).expect("valid host id")
}

pub fn snapshot(task: &str, total: u32, completed: u32) -> Snapshot {
    let items = (1..=completed).map(|n| format!("Task {n}")).collect();
    Snapshot {
        subject: "alice".to_string(),
        task: task.to_string(),
        progress: Progress::from_completed(total, items),
        captured_at_ms: 1_700_000_000_000,
    }
}

/// Applies a sequence of messages, collecting every effect in order.
pub fn run(state: TrackerState, msgs: Vec<Msg>) -> (TrackerState, Vec<Effect>) {
    let mut all = Vec::new();
    let mut state = state;
    for msg in msgs {
        let (next, effects) = update(state, msg);
        state = next;
        all.extend(effects);
    }
    (state, all)
}

pub fn signaling(generation: u64, event: SignalingEvent) -> Msg {
    Msg::Signaling { generation, event }
}

pub fn channel(attempt: u64, event: ChannelEvent) -> Msg {
    Msg::Channel { attempt, event }
}

pub fn opened(generation: u64) -> Msg {
    signaling(
        generation,
        SignalingEvent::Opened {
            local_id: LocalIdentity::new(format!("tracker-user-{generation}")),
        },
    )
}

/// Starts the tracker and opens signaling generation 1; channel attempt 1 is pending.
pub fn signaling_open() -> TrackerState {
    let (state, _) = run(
        TrackerState::new(host("dashboard")),
        vec![Msg::Started, opened(1)],
    );
    state
}

/// Starts the tracker and opens both sessions; the post-open capture is in flight.
pub fn channel_open() -> (TrackerState, Vec<Effect>) {
    update(signaling_open(), channel(1, ChannelEvent::Opened))
}

pub fn count(effects: &[Effect], pred: impl Fn(&Effect) -> bool) -> usize {
    effects.iter().filter(|effect| pred(effect)).count()
}
