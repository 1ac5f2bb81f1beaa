#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use tracker_core::{
    AttemptId, Generation, HostIdentifier, LocalIdentity, Progress, ReportMessage, Snapshot,
};
use tracker_engine::{
    ChannelEvents, ChannelHandle, Collaborators, ConnectOptions, Engine, HostIdStore,
    IdentityProvider, Scraper, SendError, SignalingEvents, SignalingHandle, StoreError,
    TrackerConfig, Transport, UiControl,
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

/// Everything the fake SDK and collaborators observed.
#[derive(Default)]
pub struct World {
    pub sessions: Vec<(LocalIdentity, SignalingEvents)>,
    pub channels: Vec<(HostIdentifier, ConnectOptions, ChannelEvents)>,
    pub reconnects: Vec<Generation>,
    pub destroyed: Vec<Generation>,
    pub closed: Vec<AttemptId>,
    pub sent: Vec<(AttemptId, ReportMessage)>,
    pub fail_sends: bool,
    pub snapshot: Option<Snapshot>,
    pub captures: usize,
    pub control_checks: usize,
    pub prompt_answers: VecDeque<Option<String>>,
    pub prompts: Vec<HostIdentifier>,
    pub notices: Vec<String>,
    pub stored_host: Option<HostIdentifier>,
    pub next_id: u32,
}

pub type Shared = Rc<RefCell<World>>;

impl World {
    pub fn session(&self, generation: Generation) -> &SignalingEvents {
        &self
            .sessions
            .iter()
            .find(|(_, events)| events.generation() == generation)
            .expect("session for generation")
            .1
    }

    pub fn channel(&self, attempt: AttemptId) -> &ChannelEvents {
        &self
            .channels
            .iter()
            .find(|(_, _, events)| events.attempt() == attempt)
            .expect("channel for attempt")
            .2
    }

    pub fn open_session(&self, generation: Generation) {
        let (local_id, events) = self
            .sessions
            .iter()
            .find(|(_, events)| events.generation() == generation)
            .expect("session for generation");
        events.opened(local_id.clone());
    }
}

struct FakeTransport(Shared);
struct FakeSignaling {
    world: Shared,
    generation: Generation,
}
struct FakeChannel {
    world: Shared,
    attempt: AttemptId,
}
struct FakeScraper(Shared);
struct FakeUi(Shared);
struct FakeIdentity(Shared);
struct FakeStore(Shared);

impl Transport for FakeTransport {
    fn create_session(
        &mut self,
        local_id: &LocalIdentity,
        events: SignalingEvents,
    ) -> Box<dyn SignalingHandle> {
        let generation = events.generation();
        self.0.borrow_mut().sessions.push((local_id.clone(), events));
        Box::new(FakeSignaling {
            world: self.0.clone(),
            generation,
        })
    }
}

impl SignalingHandle for FakeSignaling {
    fn reconnect(&mut self) {
        self.world.borrow_mut().reconnects.push(self.generation);
    }

    fn destroy(&mut self) {
        self.world.borrow_mut().destroyed.push(self.generation);
    }

    fn connect_to(
        &mut self,
        target: &HostIdentifier,
        options: ConnectOptions,
        events: ChannelEvents,
    ) -> Box<dyn ChannelHandle> {
        let attempt = events.attempt();
        self.world
            .borrow_mut()
            .channels
            .push((target.clone(), options, events));
        Box::new(FakeChannel {
            world: self.world.clone(),
            attempt,
        })
    }
}

impl ChannelHandle for FakeChannel {
    fn send(&mut self, message: &ReportMessage) -> Result<(), SendError> {
        let mut world = self.world.borrow_mut();
        if world.fail_sends {
            return Err(SendError::Transport("buffer full".to_string()));
        }
        world.sent.push((self.attempt, message.clone()));
        Ok(())
    }

    fn close(&mut self) {
        self.world.borrow_mut().closed.push(self.attempt);
    }
}

impl Scraper for FakeScraper {
    fn capture_snapshot(&mut self) -> Option<Snapshot> {
        let mut world = self.0.borrow_mut();
        world.captures += 1;
        world.snapshot.clone()
    }
}

impl UiControl for FakeUi {
    fn ensure_control_present(&mut self) {
        self.0.borrow_mut().control_checks += 1;
    }

    fn prompt_for_host_identifier(&mut self, current: &HostIdentifier) -> Option<String> {
        let mut world = self.0.borrow_mut();
        world.prompts.push(current.clone());
        world.prompt_answers.pop_front().flatten()
    }

    fn notify(&mut self, message: &str) {
        self.0.borrow_mut().notices.push(message.to_string());
    }
}

impl IdentityProvider for FakeIdentity {
    fn next_identity(&mut self) -> LocalIdentity {
        let mut world = self.0.borrow_mut();
        world.next_id += 1;
        LocalIdentity::new(format!("tracker-user-{}", world.next_id))
    }
}

impl HostIdStore for FakeStore {
    fn load(&self) -> Result<Option<HostIdentifier>, StoreError> {
        Ok(self.0.borrow().stored_host.clone())
    }

    fn save(&mut self, host_id: &HostIdentifier) -> Result<(), StoreError> {
        self.0.borrow_mut().stored_host = Some(host_id.clone());
        Ok(())
    }
}

pub fn collaborators(world: &Shared) -> Collaborators {
    Collaborators {
        transport: Box::new(FakeTransport(world.clone())),
        scraper: Box::new(FakeScraper(world.clone())),
        ui: Box::new(FakeUi(world.clone())),
        identity: Box::new(FakeIdentity(world.clone())),
        store: Box::new(FakeStore(world.clone())),
    }
}

pub fn config() -> TrackerConfig {
    TrackerConfig {
        default_host_id: host("dashboard"),
        ..TrackerConfig::default()
    }
}

pub fn engine(world: &Shared) -> Engine {
    Engine::new(config(), collaborators(world))
}

/// Lets spawned timer tasks observe the (paused) clock moving by `by`.
pub async fn advance(by: Duration) {
    tokio::time::sleep(by).await;
}
