use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracker_core::{update, Msg, TickSource, TimerKind, TrackerState};
use tracker_logging::{tracker_debug, tracker_info};

use crate::persist::load_host_identifier;
use crate::{Collaborators, EffectRunner, TrackerConfig};

/// Cloneable handle for the external trigger sources.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    msg_tx: UnboundedSender<Msg>,
}

impl EngineHandle {
    /// The monitored page content changed.
    pub fn notify_content_mutated(&self) {
        let _ = self.msg_tx.send(Msg::Tick(TickSource::ContentMutation));
    }

    /// The user activated the settings control.
    pub fn request_settings(&self) {
        let _ = self.msg_tx.send(Msg::SettingsRequested);
    }
}

/// Single-threaded owner of the tracker state.
///
/// Messages from every source go through one queue and are applied one at a
/// time; the effects of a message are executed before the next one is taken.
pub struct Engine {
    config: TrackerConfig,
    state: TrackerState,
    runner: EffectRunner,
    msg_tx: UnboundedSender<Msg>,
    msg_rx: UnboundedReceiver<Msg>,
}

impl Engine {
    pub fn new(config: TrackerConfig, collaborators: Collaborators) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let runner = EffectRunner::new(collaborators, msg_tx.clone());
        let host_id = load_host_identifier(runner.store(), &config.default_host_id);
        let state = TrackerState::with_timings(host_id, config.timings);
        Self {
            config,
            state,
            runner,
            msg_tx,
            msg_rx,
        }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            msg_tx: self.msg_tx.clone(),
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn timer_armed(&self, kind: TimerKind) -> bool {
        self.runner.timer_armed(kind)
    }

    /// Applies one message and runs its effects.
    pub fn dispatch(&mut self, msg: Msg) {
        tracker_debug!("dispatch {msg:?}");
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            tracker_info!("status: {}", state.view().status_line());
        }
        self.state = state;
        self.runner.run(effects);
    }

    /// Drains the queue, including messages produced while draining.
    /// Returns the number of messages applied.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            processed += 1;
        }
        processed
    }

    /// Runs until `shutdown` is cancelled, then tears the sessions down.
    pub async fn run(mut self, shutdown: CancellationToken) -> TrackerState {
        let startup = tokio::select! {
            _ = shutdown.cancelled() => false,
            _ = tokio::time::sleep(self.config.startup_delay) => true,
        };
        if !startup {
            return self.finish();
        }
        self.dispatch(Msg::Started);

        let period = self.config.report_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let next = tokio::select! {
                _ = shutdown.cancelled() => None,
                _ = ticker.tick() => Some(Msg::Tick(TickSource::Interval)),
                msg = self.msg_rx.recv() => msg,
            };
            match next {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
        self.finish()
    }

    fn finish(mut self) -> TrackerState {
        tracker_info!("Shutting down tracker");
        self.runner.shutdown();
        self.state
    }
}
