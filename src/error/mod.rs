//! Error types for the Portcullis session core.
//!
//! Domain errors live in their own modules (authentication, configuration,
//! persistence) and are aggregated into a single [`Error`] enum via
//! `thiserror`'s `#[from]` conversions so call sites can use `?` freely.

pub mod auth;
pub mod config;
pub mod persist;

use thiserror::Error;

use crate::error::{auth::AuthError, config::ConfigError, persist::PersistError};

/// Main error type for the session core.
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication error (login, identity fetch, profile update).
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Persistence error (vault read/write/serialization).
    #[error(transparent)]
    PersistError(#[from] PersistError),
    /// HTTP client construction error.
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
}

impl Error {
    /// Returns the authentication error kind when this error is an
    /// [`AuthError`], for recording as the session's `last_error`.
    pub fn auth_kind(&self) -> Option<auth::AuthErrorKind> {
        match self {
            Self::AuthError(err) => Some(err.kind()),
            _ => None,
        }
    }
}
