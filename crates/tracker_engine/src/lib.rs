//! Tracker engine: collaborator seams, timers and the single-threaded event loop.
mod collaborators;
mod config;
mod effects;
mod engine;
mod identity;
mod persist;
mod timers;
mod transport;
mod types;

pub use collaborators::{Scraper, UiControl};
pub use config::{ConfigArgs, TrackerConfig};
pub use effects::{Collaborators, EffectRunner};
pub use engine::{Engine, EngineHandle};
pub use identity::{IdentityProvider, RandomIdentityProvider};
pub use persist::{
    ensure_state_dir, load_host_identifier, AtomicFileWriter, HostIdStore, RonHostIdStore,
    HOST_ID_KEY,
};
pub use timers::Timers;
pub use transport::{
    ChannelEvents, ChannelHandle, ConnectOptions, SignalingEvents, SignalingHandle, Transport,
};
pub use types::{PersistError, SendError, StoreError};
