use std::time::Duration;

use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::{
    ChannelEvent, ChannelState, Effect, HostIdentifier, Msg, ReportMessage, SignalingEvent,
    SignalingState, Snapshot, TickSource, Timer, TimerKind, TrackerState,
};
use crate::{AttemptId, Generation, SignalingErrorKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::Started => {
            if !state.started {
                state.started = true;
                effects.push(Effect::EnsureControl);
                initialize(&mut state, &mut effects);
            }
        }
        Msg::Tick(source) => tick(&mut state, &mut effects, source),
        Msg::SnapshotCaptured(snapshot) => report(&mut state, &mut effects, snapshot),
        Msg::Signaling { generation, event } => {
            on_signaling(&mut state, &mut effects, generation, event)
        }
        Msg::Channel { attempt, event } => on_channel(&mut state, &mut effects, attempt, event),
        Msg::SendFailed { attempt } => {
            // Whatever was lost gets re-sent in full by the next tick.
            if state.current_attempt() == Some(attempt) {
                state.detector.reset();
            }
        }
        Msg::TimerFired(Timer::SignalingRetry) => {
            state.retry_armed = false;
            tracker_debug!("Signaling retry timer fired");
            initialize(&mut state, &mut effects);
        }
        Msg::TimerFired(Timer::ConnectTimeout { attempt }) => {
            on_connect_timeout(&mut state, &mut effects, attempt)
        }
        Msg::SettingsRequested => {
            effects.push(Effect::PromptHostIdentifier {
                current: state.host_id.clone(),
            });
        }
        Msg::HostIdentifierEntered(entered) => {
            if let Some(raw) = entered {
                change_host(&mut state, &mut effects, &raw);
            }
        }
    }

    (state, effects)
}

/// Creates a signaling session unless a live one already exists.
fn initialize(state: &mut TrackerState, effects: &mut Vec<Effect>) {
    if state.signaling.state.is_live() {
        return;
    }
    if state.retry_armed {
        state.retry_armed = false;
        effects.push(Effect::CancelTimer(TimerKind::SignalingRetry));
    }

    let generation = state.next_generation();
    tracker_info!("Initializing signaling session (generation {generation})");
    state.signaling.generation = generation;
    state.signaling.local_id = None;
    state.set_signaling(SignalingState::Connecting);
    state.stats.signaling_sessions += 1;
    effects.push(Effect::OpenSignaling { generation });
}

fn on_signaling(
    state: &mut TrackerState,
    effects: &mut Vec<Effect>,
    generation: Generation,
    event: SignalingEvent,
) {
    if generation != state.signaling.generation
        || state.signaling.state == SignalingState::Destroyed
    {
        tracker_debug!("Ignoring {event:?} from retired signaling generation {generation}");
        return;
    }

    match event {
        SignalingEvent::Opened { local_id } => {
            tracker_info!("Signaling connected. ID: {local_id}");
            state.signaling.local_id = Some(local_id);
            state.set_signaling(SignalingState::Open);
            ensure_connected(state, effects);
        }
        SignalingEvent::Disconnected => {
            tracker_info!("Disconnected from signaling server. Attempting reconnect...");
            state.set_signaling(SignalingState::Disconnected);
            effects.push(Effect::ReconnectSignaling { generation });
        }
        SignalingEvent::Closed => {
            tracker_info!(
                "Signaling session destroyed. Re-initializing in {:?}...",
                state.timings.destroyed_retry
            );
            let delay = state.timings.destroyed_retry;
            state.set_signaling(SignalingState::Destroyed);
            drop_channel(state, effects, false);
            arm_retry(state, effects, delay);
        }
        SignalingEvent::Error(kind) => on_signaling_error(state, effects, generation, kind),
    }
}

fn on_signaling_error(
    state: &mut TrackerState,
    effects: &mut Vec<Effect>,
    generation: Generation,
    kind: SignalingErrorKind,
) {
    if !kind.is_fatal() {
        tracker_warn!("Signaling error: {kind}");
        return;
    }
    tracker_warn!(
        "Fatal signaling error: {kind}. Restarting signaling in {:?}...",
        state.timings.fatal_retry
    );
    let delay = state.timings.fatal_retry;
    effects.push(Effect::DestroySignaling { generation });
    state.set_signaling(SignalingState::Destroyed);
    drop_channel(state, effects, false);
    arm_retry(state, effects, delay);
}

fn arm_retry(state: &mut TrackerState, effects: &mut Vec<Effect>, delay: Duration) {
    state.retry_armed = true;
    state.stats.signaling_retries += 1;
    effects.push(Effect::ArmTimer {
        timer: Timer::SignalingRetry,
        delay,
    });
}

/// Brings the data channel up, or makes progress towards it.
fn ensure_connected(state: &mut TrackerState, effects: &mut Vec<Effect>) {
    match state.signaling.state {
        SignalingState::Uninitialized | SignalingState::Destroyed => {
            initialize(state, effects);
            return;
        }
        SignalingState::Disconnected => {
            tracker_debug!("Signaling disconnected. Reconnecting to signaling server...");
            effects.push(Effect::ReconnectSignaling {
                generation: state.signaling.generation,
            });
            return;
        }
        // The open event re-enters here.
        SignalingState::Connecting => return,
        SignalingState::Open => {}
    }

    if let Some(attempt) = state.current_attempt() {
        match state.channel.state {
            ChannelState::Open => return,
            ChannelState::Connecting => {
                tracker_debug!("Connect attempt {attempt} still pending");
                return;
            }
            ChannelState::Idle | ChannelState::Closed => {
                tracker_debug!("Closing stale channel attempt {attempt}");
                drop_channel(state, effects, true);
            }
        }
    }

    let attempt = state.next_attempt();
    tracker_info!("Initiating connection to host: {}", state.host_id);
    state.set_channel(ChannelState::Connecting, Some(attempt));
    state.stats.connect_attempts += 1;
    effects.push(Effect::ConnectChannel {
        attempt,
        target: state.host_id.clone(),
        reliable: true,
    });
    effects.push(Effect::ArmTimer {
        timer: Timer::ConnectTimeout { attempt },
        delay: state.timings.connect_timeout,
    });
}

/// Releases the channel reference. `close` asks the transport to close it too.
fn drop_channel(state: &mut TrackerState, effects: &mut Vec<Effect>, close: bool) {
    let Some(attempt) = state.current_attempt() else {
        return;
    };
    if close {
        effects.push(Effect::CloseChannel { attempt });
    }
    effects.push(Effect::CancelTimer(TimerKind::ConnectTimeout));
    state.set_channel(ChannelState::Idle, None);
}

fn on_channel(
    state: &mut TrackerState,
    effects: &mut Vec<Effect>,
    attempt: AttemptId,
    event: ChannelEvent,
) {
    if state.current_attempt() != Some(attempt) {
        tracker_debug!("Ignoring {event:?} from stale channel attempt {attempt}");
        return;
    }

    match event {
        ChannelEvent::Opened => {
            tracker_info!("Connected to dashboard host {}", state.host_id);
            effects.push(Effect::CancelTimer(TimerKind::ConnectTimeout));
            state.set_channel(ChannelState::Open, Some(attempt));
            state.detector.reset();
            tick(state, effects, TickSource::ChannelOpened);
        }
        ChannelEvent::Closed => {
            tracker_info!("Connection to host closed");
            effects.push(Effect::CancelTimer(TimerKind::ConnectTimeout));
            state.set_channel(ChannelState::Closed, None);
        }
        ChannelEvent::Error(detail) => {
            tracker_warn!("Connection error: {detail}");
            effects.push(Effect::CancelTimer(TimerKind::ConnectTimeout));
            state.set_channel(ChannelState::Closed, None);
        }
    }
}

fn on_connect_timeout(state: &mut TrackerState, effects: &mut Vec<Effect>, attempt: AttemptId) {
    if state.current_attempt() != Some(attempt) || state.channel.state == ChannelState::Open {
        return;
    }
    tracker_info!("Connection attempt {attempt} timed out. Resetting...");
    state.stats.connect_timeouts += 1;
    effects.push(Effect::CloseChannel { attempt });
    state.set_channel(ChannelState::Idle, None);
}

/// One reporting tick: control, connection health, then a snapshot request.
fn tick(state: &mut TrackerState, effects: &mut Vec<Effect>, source: TickSource) {
    if !state.started {
        return;
    }
    if state.capture_in_flight {
        tracker_debug!("Tick from {source:?} dropped; capture already in flight");
        return;
    }

    effects.push(Effect::EnsureControl);
    ensure_connected(state, effects);
    if !state.channel_is_open() {
        return;
    }
    state.capture_in_flight = true;
    effects.push(Effect::CaptureSnapshot);
}

fn report(state: &mut TrackerState, effects: &mut Vec<Effect>, snapshot: Option<Snapshot>) {
    state.capture_in_flight = false;
    let Some(snapshot) = snapshot else {
        state.stats.skipped_captures += 1;
        return;
    };
    let Some(attempt) = state.current_attempt().filter(|_| state.channel_is_open()) else {
        tracker_debug!("Channel closed while capturing; snapshot discarded");
        return;
    };

    let message = state.detector.classify(&snapshot);
    match &message {
        ReportMessage::Update(_) => {
            tracker_info!("Sending full update (data changed or new connection)");
            state.stats.updates_sent += 1;
        }
        ReportMessage::Heartbeat(_) => {
            state.stats.heartbeats_sent += 1;
        }
    }
    effects.push(Effect::Send { attempt, message });
}

fn change_host(state: &mut TrackerState, effects: &mut Vec<Effect>, raw: &str) {
    let Some(host_id) = HostIdentifier::parse(raw) else {
        return;
    };
    if host_id == state.host_id {
        return;
    }

    tracker_info!("Host ID changed to {host_id}; restarting connection");
    state.host_id = host_id.clone();
    state.mark_dirty();
    effects.push(Effect::PersistHostIdentifier(host_id));
    effects.push(Effect::Notify(
        "Host ID saved! Reloading connection...".to_string(),
    ));
    if !state.started {
        return;
    }

    drop_channel(state, effects, true);
    if state.signaling.state.is_live() {
        effects.push(Effect::DestroySignaling {
            generation: state.signaling.generation,
        });
    }
    state.set_signaling(SignalingState::Destroyed);
    state.capture_in_flight = false;
    initialize(state, effects);
}
