//! Store and session error types.
//!
//! `StoreError` is defined here rather than in `prepost-store` so the session
//! machine can classify store failures for its fail-closed/fail-open
//! decisions without string matching.

use thiserror::Error;

use crate::model::Phase;

/// Errors that can occur when talking to the tabular store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A network error occurred reaching the store.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested worksheet does not exist.
    #[error("worksheet not found: {0}")]
    WorksheetNotFound(String),

    /// The store API returned an error response.
    #[error("store error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The store returned rows the client could not decode.
    #[error("malformed store data: {0}")]
    Malformed(String),

    /// A local I/O failure (file-backed stores).
    #[error("store I/O error: {0}")]
    Io(String),
}

impl StoreError {
    /// Returns `true` if retrying the same request cannot succeed without
    /// operator intervention.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            StoreError::AuthenticationFailed(_) | StoreError::WorksheetNotFound(_)
        )
    }
}

/// Errors surfaced by session state machine transitions.
///
/// Every variant blocks the triggering transition; the session phase is
/// unchanged whenever one of these is returned.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The examinee submitted an empty name at login.
    #[error("name must not be empty")]
    EmptyName,

    /// The name is already registered in the store.
    #[error("name '{0}' is already registered")]
    DuplicateName(String),

    /// The login existence check could not read the store. Fail-closed: the
    /// examinee cannot proceed until registration can be verified.
    #[error("cannot verify registration: {0}")]
    RegistrationUnavailable(#[source] StoreError),

    /// A score write failed. The transition did not complete and the
    /// submission must be reissued.
    #[error("failed to save scores: {0}")]
    SaveFailed(#[source] StoreError),

    /// The trigger is not valid in the session's current phase.
    #[error("action '{action}' is not valid in the {phase} phase")]
    PhaseMismatch {
        action: &'static str,
        phase: Phase,
    },
}

impl SessionError {
    /// Returns `true` when the examinee can correct the problem themselves
    /// (fix the input or simply retry the same action).
    pub fn is_user_correctable(&self) -> bool {
        !matches!(self, SessionError::PhaseMismatch { .. })
    }
}
