//! Attendance roster data model.
//!
//! A [`Roster`] is a named, ordered collection of [`Person`] records for one
//! attendance session. People arrive either from a tabular import or from
//! manual entry, and that origin never changes once recorded.
//!
//! Duplicate detection and display ordering both go through the helpers in
//! [`name`]: [`NameKey`] for equality and [`compare_names`] for ordering.

pub mod error;
pub mod ids;
pub mod name;
pub mod person;
pub mod redact;
pub mod roster;

pub use error::{Result, RosterError};
pub use ids::{IMPORTED_ID_PREFIX, MANUAL_ID_PREFIX, PersonId, RosterId};
pub use name::{NameKey, collation_key, compare_names, compose_name};
pub use person::{Origin, Person};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data};
pub use roster::Roster;
