//! Display projection of a roster: filter and order, nothing else.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rollcall_model::{Person, Roster, compare_names};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Family,
    Given,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "family" | "surname" => Ok(Self::Family),
            "given" | "name" => Ok(Self::Given),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Family => "family",
            Self::Given => "given",
        })
    }
}

/// How a roster is shown: an optional search term plus ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    pub search: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl RosterView {
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.order = order;
        self
    }

    /// People matching the search, in display order.
    pub fn apply<'a>(&self, roster: &'a Roster) -> Vec<&'a Person> {
        let needle = self.search.as_deref().map(|s| s.trim().to_lowercase());
        let mut people: Vec<&Person> = roster
            .people()
            .iter()
            .filter(|p| needle.as_deref().is_none_or(|n| matches(p, n)))
            .collect();
        people.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        people
    }

    fn compare(&self, a: &Person, b: &Person) -> Ordering {
        let family = || compare_names(a.family_name(), b.family_name());
        let given = || compare_names(a.given_name(), b.given_name());
        match self.sort_by {
            SortField::Family => family().then_with(given),
            SortField::Given => given().then_with(family),
        }
    }
}

fn matches(person: &Person, needle: &str) -> bool {
    [
        Some(person.given_name()),
        Some(person.family_name()),
        person.national_id(),
        person.phone(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
