//! Conversion traits between model types and persistence types.
//!
//! Saving is infallible. Restoring re-validates every invariant of the
//! model, so a tampered or corrupted file surfaces as
//! [`PersistenceError::InvalidRecord`] rather than as a broken roster.

use chrono::{DateTime, SecondsFormat, Utc};
use rollcall_model::{Origin, Person, PersonId, Roster, RosterId};

use crate::error::{PersistenceError, Result};
use crate::types::{OriginSnapshot, PersonSnapshot, RosterSnapshot};

/// Trait for types that can be converted to a persistence snapshot.
pub trait ToSnapshot {
    /// The snapshot type.
    type Snapshot;

    /// Convert to a snapshot for persistence.
    fn to_snapshot(&self) -> Self::Snapshot;
}

/// Trait for types that can be rebuilt from a persistence snapshot.
pub trait FromSnapshot: Sized {
    /// The snapshot type.
    type Snapshot;

    /// Rebuild from a snapshot, validating it on the way.
    fn from_snapshot(snapshot: Self::Snapshot) -> Result<Self>;
}

/// RFC 3339 with as many fractional digits as needed to be exact.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PersistenceError::InvalidRecord {
            reason: format!("bad timestamp {value:?}: {e}"),
        })
}

fn invalid(err: rollcall_model::RosterError) -> PersistenceError {
    PersistenceError::InvalidRecord {
        reason: err.to_string(),
    }
}

impl ToSnapshot for Person {
    type Snapshot = PersonSnapshot;

    fn to_snapshot(&self) -> PersonSnapshot {
        PersonSnapshot {
            id: self.id().as_str().to_string(),
            given_name: self.given_name().to_string(),
            family_name: self.family_name().to_string(),
            national_id: self.national_id().map(str::to_string),
            phone: self.phone().map(str::to_string),
            present: self.present(),
            origin: match self.origin() {
                Origin::Imported => OriginSnapshot::Imported,
                Origin::Manual => OriginSnapshot::Manual,
            },
            created_at: format_timestamp(self.created_at()),
        }
    }
}

impl FromSnapshot for Person {
    type Snapshot = PersonSnapshot;

    fn from_snapshot(snapshot: PersonSnapshot) -> Result<Self> {
        let origin = match snapshot.origin {
            OriginSnapshot::Imported => Origin::Imported,
            OriginSnapshot::Manual => Origin::Manual,
        };
        let person = Person::new(
            PersonId::new(snapshot.id).map_err(invalid)?,
            &snapshot.given_name,
            &snapshot.family_name,
            origin,
            parse_timestamp(&snapshot.created_at)?,
        )
        .map_err(invalid)?
        .with_contact(snapshot.national_id.as_deref(), snapshot.phone.as_deref())
        .with_present(snapshot.present);
        Ok(person)
    }
}

impl ToSnapshot for Roster {
    type Snapshot = RosterSnapshot;

    fn to_snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            id: self.id().as_str().to_string(),
            name: self.name().to_string(),
            people: self.people().iter().map(ToSnapshot::to_snapshot).collect(),
            created_at: format_timestamp(self.created_at()),
            modified_at: format_timestamp(self.modified_at()),
        }
    }
}

impl FromSnapshot for Roster {
    type Snapshot = RosterSnapshot;

    fn from_snapshot(snapshot: RosterSnapshot) -> Result<Self> {
        let people = snapshot
            .people
            .into_iter()
            .map(Person::from_snapshot)
            .collect::<Result<Vec<_>>>()?;
        Roster::restore(
            RosterId::new(snapshot.id).map_err(invalid)?,
            snapshot.name,
            people,
            parse_timestamp(&snapshot.created_at)?,
            parse_timestamp(&snapshot.modified_at)?,
        )
        .map_err(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn precise() -> DateTime<Utc> {
        Utc.timestamp_opt(1_709_280_000, 123_456_789).unwrap()
    }

    #[test]
    fn test_timestamp_keeps_nanoseconds() {
        let text = format_timestamp(precise());
        assert_eq!(text, "2024-03-01T08:00:00.123456789Z");
        assert_eq!(parse_timestamp(&text).unwrap(), precise());
    }

    #[test]
    fn test_whole_seconds_have_no_fraction() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01T08:00:00Z");
    }

    #[test]
    fn test_person_round_trip() {
        let person = Person::new(
            PersonId::manual(42),
            "Ana",
            "García",
            Origin::Manual,
            precise(),
        )
        .unwrap()
        .with_contact(Some("12345678"), None)
        .with_present(false);

        let restored = Person::from_snapshot(person.to_snapshot()).unwrap();
        assert_eq!(restored, person);
    }

    #[test]
    fn test_blank_name_is_invalid_record() {
        let mut snapshot = Person::new(
            PersonId::manual(42),
            "Ana",
            "García",
            Origin::Manual,
            precise(),
        )
        .unwrap()
        .to_snapshot();
        snapshot.family_name = "  ".to_string();

        assert!(matches!(
            Person::from_snapshot(snapshot),
            Err(PersistenceError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_bad_timestamp_is_invalid_record() {
        let roster = Roster::new("Monday", precise()).unwrap();
        let mut snapshot = roster.to_snapshot();
        snapshot.modified_at = "yesterday".to_string();
        assert!(matches!(
            Roster::from_snapshot(snapshot),
            Err(PersistenceError::InvalidRecord { .. })
        ));
    }
}
