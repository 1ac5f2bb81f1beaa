//! In-process transport for dry runs: every session and channel opens
//! immediately and reports are written to the log instead of the network.

use tracker_core::{HostIdentifier, LocalIdentity, ReportMessage};
use tracker_engine::{
    ChannelEvents, ChannelHandle, ConnectOptions, SendError, SignalingEvents, SignalingHandle,
    Transport,
};
use tracker_logging::{tracker_debug, tracker_info};

#[derive(Debug, Default)]
pub struct LoopbackTransport;

impl Transport for LoopbackTransport {
    fn create_session(
        &mut self,
        local_id: &LocalIdentity,
        events: SignalingEvents,
    ) -> Box<dyn SignalingHandle> {
        events.opened(local_id.clone());
        Box::new(LoopbackSignaling {
            local_id: local_id.clone(),
            events,
        })
    }
}

struct LoopbackSignaling {
    local_id: LocalIdentity,
    events: SignalingEvents,
}

impl SignalingHandle for LoopbackSignaling {
    fn reconnect(&mut self) {
        self.events.opened(self.local_id.clone());
    }

    fn destroy(&mut self) {
        self.events.closed();
    }

    fn connect_to(
        &mut self,
        target: &HostIdentifier,
        options: ConnectOptions,
        events: ChannelEvents,
    ) -> Box<dyn ChannelHandle> {
        tracker_debug!("loopback connect to {target} ({options:?})");
        events.opened();
        Box::new(LoopbackChannel {
            target: target.clone(),
            events,
            open: true,
        })
    }
}

struct LoopbackChannel {
    target: HostIdentifier,
    events: ChannelEvents,
    open: bool,
}

impl ChannelHandle for LoopbackChannel {
    fn send(&mut self, message: &ReportMessage) -> Result<(), SendError> {
        if !self.open {
            return Err(SendError::NotOpen);
        }
        let json = serde_json::to_string(message)?;
        tracker_info!("[{}] {json}", self.target);
        Ok(())
    }

    fn close(&mut self) {
        if std::mem::replace(&mut self.open, false) {
            self.events.closed();
        }
    }
}
