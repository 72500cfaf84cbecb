//! Roster mutations.
//!
//! Every operation takes the current roster by reference and returns a new
//! value; the input is never modified. Not-found ids yield `None` so callers
//! can treat them as no-ops.

use chrono::{DateTime, Utc};
use rollcall_model::{
    MANUAL_ID_PREFIX, Origin, Person, PersonId, Result, Roster, RosterError,
};
use serde::Deserialize;

/// Fields of a hand-entered person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ManualEntry {
    pub given_name: String,
    pub family_name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
}

impl ManualEntry {
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn national_id(mut self, value: impl Into<String>) -> Self {
        self.national_id = Some(value.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }
}

/// A new, empty roster.
pub fn create_roster(name: &str, now: DateTime<Utc>) -> Result<Roster> {
    let roster = Roster::new(name, now)?;
    tracing::debug!(roster_id = %roster.id(), "created roster");
    Ok(roster)
}

/// Existing people first, then `people` in the order given.
pub fn append_imported(roster: &Roster, people: Vec<Person>) -> Result<Roster> {
    let added = people.len();
    let mut all = roster.people().to_vec();
    all.extend(people);
    let updated = roster.with_people(all)?;
    tracing::debug!(roster_id = %roster.id(), added, people = updated.len(), "appended imported people");
    Ok(updated)
}

/// Add a hand-entered person, present from the start.
///
/// Rejects a name that normalizes to one already on the roster, whatever
/// that person's origin.
pub fn add_manual(
    roster: &Roster,
    entry: &ManualEntry,
    now: DateTime<Utc>,
) -> Result<(Roster, PersonId)> {
    let stamp = roster.free_id_stamp(MANUAL_ID_PREFIX, now.timestamp_millis());
    let person = Person::new(
        PersonId::manual(stamp),
        &entry.given_name,
        &entry.family_name,
        Origin::Manual,
        now,
    )?
    .with_contact(entry.national_id.as_deref(), entry.phone.as_deref());

    if roster.contains_name(&person.name_key()) {
        return Err(RosterError::DuplicatePerson {
            given_name: person.given_name().to_string(),
            family_name: person.family_name().to_string(),
        });
    }

    let id = person.id().clone();
    let mut people = roster.people().to_vec();
    people.push(person);
    let updated = roster.with_people(people)?;
    tracing::debug!(roster_id = %roster.id(), person_id = %id, "added manual person");
    Ok((updated, id))
}

/// Flip attendance for `id`. `None` if the roster has no such person.
pub fn toggle_attendance(roster: &Roster, id: &PersonId) -> Option<Roster> {
    roster.with_toggled(id)
}

/// Remove `id`, returning the updated roster and the removed person.
pub fn delete_student(roster: &Roster, id: &PersonId) -> Option<(Roster, Person)> {
    roster.without(id)
}
