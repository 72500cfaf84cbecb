//! Row normalization: raw rows to deduplicated, sorted people.
//!
//! Expected layout after a single header row:
//!
//! | column | content            | required |
//! |--------|--------------------|----------|
//! | 0      | first given name   | yes      |
//! | 1      | second given name  | no       |
//! | 2      | first family name  | yes      |
//! | 3      | second family name | no       |
//!
//! Rows shorter than four cells or missing a required cell are skipped.
//! Duplicates are detected by [`NameKey`] within the batch only, unless
//! [`ImportOptions::dedup_against_roster`] is set.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rollcall_model::{
    IMPORTED_ID_PREFIX, NameKey, Origin, Person, PersonId, Roster, collation_key, compose_name,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const REQUIRED_CELLS: usize = 4;

/// Tunables for an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Also drop rows whose name is already on the target roster.
    pub dedup_against_roster: bool,
}

/// Outcome of normalizing one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    /// Surviving people, sorted by family name then given name.
    pub people: Vec<Person>,
    /// Rows dropped because an earlier row of this batch had the same key.
    pub duplicates_found: usize,
    /// Rows dropped because the roster already lists that name.
    /// Always zero unless `dedup_against_roster` is set.
    pub already_in_roster: usize,
    /// Data rows dropped for being short or missing a required name.
    pub incomplete_rows: usize,
}

struct Candidate {
    given_name: String,
    family_name: String,
}

/// Turn raw rows into people ready to append to `roster`.
///
/// The roster is consulted for id namespacing, and for dedup only when the
/// option asks for it. Ids are `excel_<stamp>_<index>` with the stamp
/// starting at `now` in milliseconds and moved forward past any stamp the
/// roster already uses.
pub fn normalize_rows<R, C>(
    rows: &[R],
    roster: &Roster,
    options: ImportOptions,
    now: DateTime<Utc>,
) -> Result<ImportBatch>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let existing = if options.dedup_against_roster {
        roster.name_keys()
    } else {
        HashSet::new()
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    let mut duplicates_found = 0;
    let mut already_in_roster = 0;
    let mut incomplete_rows = 0;

    // Row 0 is the header.
    for (index, row) in rows.iter().enumerate().skip(1) {
        let cells = row.as_ref();
        if cells.len() < REQUIRED_CELLS {
            tracing::trace!(row = index + 1, cells = cells.len(), "skipping short row");
            incomplete_rows += 1;
            continue;
        }

        let first_given = cells[0].as_ref().trim();
        let second_given = cells[1].as_ref().trim();
        let first_family = cells[2].as_ref().trim();
        let second_family = cells[3].as_ref().trim();

        if first_given.is_empty() || first_family.is_empty() {
            tracing::trace!(row = index + 1, "skipping row without required names");
            incomplete_rows += 1;
            continue;
        }

        let given_name = compose_name(&[first_given, second_given]);
        let family_name = compose_name(&[first_family, second_family]);
        let key = NameKey::new(&given_name, &family_name);

        if !seen.insert(key.clone()) {
            tracing::trace!(row = index + 1, "skipping duplicate row");
            duplicates_found += 1;
            continue;
        }
        if existing.contains(&key) {
            already_in_roster += 1;
            continue;
        }

        candidates.push(Candidate {
            given_name,
            family_name,
        });
    }

    candidates.sort_by_cached_key(|c| (collation_key(&c.family_name), collation_key(&c.given_name)));

    let stamp = roster.free_id_stamp(IMPORTED_ID_PREFIX, now.timestamp_millis());
    let people = candidates
        .into_iter()
        .enumerate()
        .map(|(index, c)| {
            Person::new(
                PersonId::imported(stamp, index),
                &c.given_name,
                &c.family_name,
                Origin::Imported,
                now,
            )
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    tracing::info!(
        roster_id = %roster.id(),
        people = people.len(),
        duplicates = duplicates_found,
        already_in_roster,
        incomplete = incomplete_rows,
        "normalized import rows"
    );

    Ok(ImportBatch {
        people,
        duplicates_found,
        already_in_roster,
        incomplete_rows,
    })
}
