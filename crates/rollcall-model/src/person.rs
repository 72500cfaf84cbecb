//! Person records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, RosterError};
use crate::ids::PersonId;
use crate::name::NameKey;

/// Where a person record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Row of a tabular import.
    Imported,
    /// Typed in by hand.
    Manual,
}

impl Origin {
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Manual)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Imported => "Imported",
            Self::Manual => "Manual",
        }
    }
}

/// One tracked individual on a roster.
///
/// Names are trimmed and never empty. The id, origin and creation time are
/// fixed at construction; attendance changes only through [`Person::toggled`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    id: PersonId,
    given_name: String,
    family_name: String,
    national_id: Option<String>,
    phone: Option<String>,
    present: bool,
    origin: Origin,
    created_at: DateTime<Utc>,
}

impl Person {
    /// Create a person. Imported people start absent, manual ones present.
    pub fn new(
        id: PersonId,
        given_name: &str,
        family_name: &str,
        origin: Origin,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let given_name = required(given_name, "given name")?;
        let family_name = required(family_name, "family name")?;
        Ok(Self {
            id,
            given_name,
            family_name,
            national_id: None,
            phone: None,
            present: origin.is_manual(),
            origin,
            created_at,
        })
    }

    /// Attach optional contact details; blank values are dropped.
    #[must_use]
    pub fn with_contact(mut self, national_id: Option<&str>, phone: Option<&str>) -> Self {
        self.national_id = optional(national_id);
        self.phone = optional(phone);
        self
    }

    #[must_use]
    pub fn with_present(mut self, present: bool) -> Self {
        self.present = present;
        self
    }

    /// Copy of this person with attendance flipped.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            present: !self.present,
            ..self.clone()
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn national_id(&self) -> Option<&str> {
        self.national_id.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn present(&self) -> bool {
        self.present
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_manual(&self) -> bool {
        self.origin.is_manual()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn name_key(&self) -> NameKey {
        NameKey::new(&self.given_name, &self.family_name)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RosterError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
