use thiserror::Error;

/// Authentication failure taxonomy.
///
/// Each variant carries a distinct recovery policy:
/// - [`AuthError::InvalidCredentials`] and [`AuthError::Validation`] are
///   surfaced to the caller with session state untouched.
/// - [`AuthError::Unauthorized`] is treated as credential invalidation:
///   the session is cleared and the operator is sent back to login.
/// - [`AuthError::Network`] is surfaced without destroying the session;
///   the navigation guard still refuses entry to views whose identity it
///   could not load.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The login endpoint rejected the supplied username/password.
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// The API rejected the bearer credential (expired or revoked token).
    #[error("Credential rejected by the API")]
    Unauthorized,
    /// The API rejected the request body (profile update validation).
    #[error("Request rejected by the API: {0}")]
    Validation(String),
    /// The request never produced a usable response (connect, timeout).
    #[error("Network failure: {0}")]
    Network(String),
}

/// Lightweight, copyable tag for an [`AuthError`], recorded as the
/// session's `last_error` so the UI can render a message without owning
/// the error itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    Unauthorized,
    Validation,
    Network,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            Self::Unauthorized => AuthErrorKind::Unauthorized,
            Self::Validation(_) => AuthErrorKind::Validation,
            Self::Network(_) => AuthErrorKind::Network,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
