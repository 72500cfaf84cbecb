//! Session error type.

use rollcall_ingest::IngestError;
use rollcall_model::RosterError;
use rollcall_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation needs an active roster and there is none.
    #[error("no roster is selected")]
    NoActiveRoster,

    #[error("roster not found: {0}")]
    RosterNotFound(String),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl SessionError {
    /// Text suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoActiveRoster => "Create or select a roster first".to_string(),
            Self::Persistence(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    /// Text suitable for the log, without person names unless allowed.
    pub fn log_message(&self) -> String {
        match self {
            Self::Roster(err) => err.log_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
