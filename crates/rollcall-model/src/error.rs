//! Validation errors for roster and person records.

use thiserror::Error;

use crate::ids::PersonId;
use crate::redact::redact_value;

/// A roster or person record violated one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Roster names must contain something other than whitespace.
    #[error("roster name must not be empty")]
    EmptyRosterName,

    /// A required person field was empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// A manual entry matched a person already on the roster.
    #[error("{given_name} {family_name} is already on this roster")]
    DuplicatePerson {
        given_name: String,
        family_name: String,
    },

    /// Two people in one roster share an id.
    #[error("person id {0} appears more than once in the roster")]
    DuplicateId(PersonId),

    /// An identifier was empty.
    #[error("identifier must not be empty")]
    EmptyId,
}

impl RosterError {
    /// Display text with person names passed through [`redact_value`].
    pub fn log_message(&self) -> String {
        match self {
            Self::DuplicatePerson {
                given_name,
                family_name,
            } => format!(
                "{} {} is already on this roster",
                redact_value(given_name),
                redact_value(family_name)
            ),
            other => other.to_string(),
        }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, RosterError>;
