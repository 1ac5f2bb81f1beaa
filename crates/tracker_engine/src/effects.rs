use tokio::sync::mpsc::UnboundedSender;
use tracker_core::{AttemptId, Effect, Generation, Msg, TimerKind};
use tracker_logging::{tracker_debug, tracker_error, tracker_info, tracker_warn};

use crate::{
    ChannelEvents, ChannelHandle, ConnectOptions, HostIdStore, IdentityProvider, Scraper,
    SignalingEvents, SignalingHandle, Timers, Transport, UiControl,
};

/// Everything outside the state machine the tracker talks to.
pub struct Collaborators {
    pub transport: Box<dyn Transport>,
    pub scraper: Box<dyn Scraper>,
    pub ui: Box<dyn UiControl>,
    pub identity: Box<dyn IdentityProvider>,
    pub store: Box<dyn HostIdStore>,
}

/// Executes effects against the collaborators and owns the live SDK handles.
///
/// Results that the state machine has to see (captured snapshots, prompt
/// answers, SDK events, timer fires) are fed back through `msg_tx`.
pub struct EffectRunner {
    collaborators: Collaborators,
    msg_tx: UnboundedSender<Msg>,
    signaling: Option<(Generation, Box<dyn SignalingHandle>)>,
    channel: Option<(AttemptId, Box<dyn ChannelHandle>)>,
    timers: Timers,
}

impl EffectRunner {
    pub fn new(collaborators: Collaborators, msg_tx: UnboundedSender<Msg>) -> Self {
        Self {
            collaborators,
            msg_tx,
            signaling: None,
            channel: None,
            timers: Timers::new(),
        }
    }

    pub fn store(&self) -> &dyn HostIdStore {
        self.collaborators.store.as_ref()
    }

    pub fn timer_armed(&self, kind: TimerKind) -> bool {
        self.timers.is_armed(kind)
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_one(effect);
        }
    }

    fn run_one(&mut self, effect: Effect) {
        match effect {
            Effect::EnsureControl => self.collaborators.ui.ensure_control_present(),
            Effect::OpenSignaling { generation } => self.open_signaling(generation),
            Effect::ReconnectSignaling { generation } => match self.signaling.as_mut() {
                Some((current, handle)) if *current == generation => handle.reconnect(),
                _ => tracker_debug!("No signaling session {generation} to reconnect"),
            },
            Effect::DestroySignaling { generation } => match self.signaling.take() {
                Some((current, mut handle)) if current == generation => {
                    if let Some((attempt, mut channel)) = self.channel.take() {
                        tracker_debug!("Closing channel attempt {attempt} with its session");
                        channel.close();
                    }
                    handle.destroy();
                }
                other => {
                    tracker_debug!("No signaling session {generation} to destroy");
                    self.signaling = other;
                }
            },
            Effect::ConnectChannel {
                attempt,
                target,
                reliable,
            } => {
                let events = ChannelEvents::new(attempt, self.msg_tx.clone());
                let Some((_, signaling)) = self.signaling.as_mut() else {
                    tracker_warn!("Cannot connect attempt {attempt}: no signaling session");
                    events.error("no signaling session");
                    return;
                };
                if let Some((stale, mut handle)) = self.channel.take() {
                    tracker_debug!("Closing channel attempt {stale} before attempt {attempt}");
                    handle.close();
                }
                let handle = signaling.connect_to(&target, ConnectOptions { reliable }, events);
                self.channel = Some((attempt, handle));
            }
            Effect::CloseChannel { attempt } => {
                if let Some((current, mut handle)) = self.channel.take() {
                    if current == attempt {
                        handle.close();
                    } else {
                        self.channel = Some((current, handle));
                    }
                }
            }
            Effect::ArmTimer { timer, delay } => {
                self.timers.arm(timer, delay, self.msg_tx.clone());
            }
            Effect::CancelTimer(kind) => self.timers.cancel(kind),
            Effect::CaptureSnapshot => {
                let snapshot = self.collaborators.scraper.capture_snapshot();
                let _ = self.msg_tx.send(Msg::SnapshotCaptured(snapshot));
            }
            Effect::Send { attempt, message } => match self.channel.as_mut() {
                Some((current, handle)) if *current == attempt => {
                    if let Err(err) = handle.send(&message) {
                        tracker_warn!("Failed to send {:?} report: {err}", message.kind());
                        let _ = self.msg_tx.send(Msg::SendFailed { attempt });
                    }
                }
                _ => tracker_debug!("Dropping report for closed channel attempt {attempt}"),
            },
            Effect::PromptHostIdentifier { current } => {
                let entered = self.collaborators.ui.prompt_for_host_identifier(&current);
                let _ = self.msg_tx.send(Msg::HostIdentifierEntered(entered));
            }
            Effect::PersistHostIdentifier(host_id) => {
                if let Err(err) = self.collaborators.store.save(&host_id) {
                    tracker_error!("Failed to persist host ID {host_id}: {err}");
                }
            }
            Effect::Notify(message) => self.collaborators.ui.notify(&message),
        }
    }

    fn open_signaling(&mut self, generation: Generation) {
        if let Some((previous, _)) = self.signaling.take() {
            tracker_debug!("Releasing signaling session {previous}");
        }
        self.channel = None;

        let local_id = self.collaborators.identity.next_identity();
        tracker_info!("Creating signaling session with ID: {local_id}");
        let events = SignalingEvents::new(generation, self.msg_tx.clone());
        let handle = self.collaborators.transport.create_session(&local_id, events);
        self.signaling = Some((generation, handle));
    }

    /// Cancels timers and tears down any live session.
    pub fn shutdown(&mut self) {
        self.timers.cancel_all();
        if let Some((_, mut handle)) = self.channel.take() {
            handle.close();
        }
        if let Some((_, mut handle)) = self.signaling.take() {
            handle.destroy();
        }
    }
}
