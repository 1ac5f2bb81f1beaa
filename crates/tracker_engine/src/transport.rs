use tokio::sync::mpsc::UnboundedSender;
use tracker_core::{
    AttemptId, ChannelEvent, Generation, HostIdentifier, LocalIdentity, Msg, ReportMessage,
    SignalingErrorKind, SignalingEvent,
};

use crate::SendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    pub reliable: bool,
}

/// Event sink handed to the SDK for one signaling session.
///
/// Every event is tagged with the session's generation so the state machine
/// can drop events from sessions it has already replaced.
#[derive(Debug, Clone)]
pub struct SignalingEvents {
    generation: Generation,
    tx: UnboundedSender<Msg>,
}

impl SignalingEvents {
    pub fn new(generation: Generation, tx: UnboundedSender<Msg>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn opened(&self, local_id: LocalIdentity) {
        self.emit(SignalingEvent::Opened { local_id });
    }

    pub fn disconnected(&self) {
        self.emit(SignalingEvent::Disconnected);
    }

    pub fn closed(&self) {
        self.emit(SignalingEvent::Closed);
    }

    pub fn error(&self, kind: SignalingErrorKind) {
        self.emit(SignalingEvent::Error(kind));
    }

    fn emit(&self, event: SignalingEvent) {
        let _ = self.tx.send(Msg::Signaling {
            generation: self.generation,
            event,
        });
    }
}

/// Event sink handed to the SDK for one data channel attempt.
#[derive(Debug, Clone)]
pub struct ChannelEvents {
    attempt: AttemptId,
    tx: UnboundedSender<Msg>,
}

impl ChannelEvents {
    pub fn new(attempt: AttemptId, tx: UnboundedSender<Msg>) -> Self {
        Self { attempt, tx }
    }

    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn opened(&self) {
        self.emit(ChannelEvent::Opened);
    }

    pub fn closed(&self) {
        self.emit(ChannelEvent::Closed);
    }

    pub fn error(&self, detail: impl Into<String>) {
        self.emit(ChannelEvent::Error(detail.into()));
    }

    fn emit(&self, event: ChannelEvent) {
        let _ = self.tx.send(Msg::Channel {
            attempt: self.attempt,
            event,
        });
    }
}

/// Entry point of the peer-to-peer SDK.
pub trait Transport {
    fn create_session(
        &mut self,
        local_id: &LocalIdentity,
        events: SignalingEvents,
    ) -> Box<dyn SignalingHandle>;
}

pub trait SignalingHandle {
    fn reconnect(&mut self);
    fn destroy(&mut self);
    fn connect_to(
        &mut self,
        target: &HostIdentifier,
        options: ConnectOptions,
        events: ChannelEvents,
    ) -> Box<dyn ChannelHandle>;
}

pub trait ChannelHandle {
    fn send(&mut self, message: &ReportMessage) -> Result<(), SendError>;
    fn close(&mut self);
}
