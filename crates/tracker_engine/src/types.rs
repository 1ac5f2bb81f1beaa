use thiserror::Error;

/// Why a report could not be handed to the transport.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("channel is not open")]
    NotOpen,
    #[error("could not encode report: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport rejected report: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not parse settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}
