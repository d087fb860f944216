use thiserror::Error;

/// Vault read/write failures.
///
/// Surfaced from mutations that must re-persist the session pair before
/// returning; `logout` swallows them instead, since tearing the session
/// down must never fail.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize persisted session state: {0}")]
    Serde(#[from] serde_json::Error),
}
