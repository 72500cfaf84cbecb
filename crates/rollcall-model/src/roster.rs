//! Roster records.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, RosterError};
use crate::ids::{PersonId, RosterId};
use crate::name::NameKey;
use crate::person::Person;

/// A named attendance list.
///
/// `people` is kept in insertion order; display order is the consumer's
/// concern. Person ids are unique within a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    id: RosterId,
    name: String,
    people: Vec<Person>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Roster {
    /// Create an empty roster with a fresh id.
    pub fn new(name: &str, now: DateTime<Utc>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyRosterName);
        }
        Ok(Self {
            id: RosterId::generate(),
            name: name.to_string(),
            people: Vec::new(),
            created_at: now,
            modified_at: now,
        })
    }

    /// Rebuild a roster from stored parts, re-checking its invariants.
    pub fn restore(
        id: RosterId,
        name: String,
        people: Vec<Person>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(RosterError::EmptyRosterName);
        }
        ensure_unique_ids(&people)?;
        Ok(Self {
            id,
            name,
            people,
            created_at,
            modified_at,
        })
    }

    /// Same roster with a different people sequence.
    pub fn with_people(&self, people: Vec<Person>) -> Result<Self> {
        ensure_unique_ids(&people)?;
        Ok(Self {
            people,
            ..self.clone_header()
        })
    }

    /// Same roster stamped as modified at `now`.
    #[must_use]
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        Self {
            modified_at: now,
            ..self.clone()
        }
    }

    pub fn id(&self) -> &RosterId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn find(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| p.id() == id)
    }

    pub fn position(&self, id: &PersonId) -> Option<usize> {
        self.people.iter().position(|p| p.id() == id)
    }

    /// Whether someone with the same normalized name is already listed.
    pub fn contains_name(&self, key: &NameKey) -> bool {
        self.people.iter().any(|p| &p.name_key() == key)
    }

    pub fn name_keys(&self) -> HashSet<NameKey> {
        self.people.iter().map(Person::name_key).collect()
    }

    /// First millisecond stamp at or after `start` that no id with `prefix`
    /// uses yet.
    pub fn free_id_stamp(&self, prefix: &str, start: i64) -> i64 {
        let mut stamp = start;
        while self.people.iter().any(|p| p.id().uses_stamp(prefix, stamp)) {
            stamp += 1;
        }
        stamp
    }

    /// Same roster with one person's attendance flipped. `None` if `id` is
    /// not listed.
    pub fn with_toggled(&self, id: &PersonId) -> Option<Self> {
        let index = self.position(id)?;
        let mut people = self.people.clone();
        people[index] = people[index].toggled();
        Some(Self {
            people,
            ..self.clone_header()
        })
    }

    /// Same roster without the person `id`, plus the removed record.
    pub fn without(&self, id: &PersonId) -> Option<(Self, Person)> {
        let index = self.position(id)?;
        let mut people = self.people.clone();
        let removed = people.remove(index);
        let roster = Self {
            people,
            ..self.clone_header()
        };
        Some((roster, removed))
    }

    fn clone_header(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            people: Vec::new(),
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }
}

fn ensure_unique_ids(people: &[Person]) -> Result<()> {
    let mut seen = HashSet::with_capacity(people.len());
    for person in people {
        if !seen.insert(person.id()) {
            return Err(RosterError::DuplicateId(person.id().clone()));
        }
    }
    Ok(())
}
