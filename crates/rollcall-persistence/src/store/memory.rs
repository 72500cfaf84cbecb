use std::collections::BTreeMap;

use rollcall_model::{Roster, RosterId};

use super::{RosterRepository, sort_catalog};
use crate::error::Result;

/// In-process roster storage.
///
/// Nothing survives the process; used for ephemeral sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rosters: BTreeMap<RosterId, Roster>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `rosters`.
    pub fn with_rosters(rosters: impl IntoIterator<Item = Roster>) -> Self {
        Self {
            rosters: rosters
                .into_iter()
                .map(|r| (r.id().clone(), r))
                .collect(),
        }
    }

    pub fn get(&self, id: &RosterId) -> Option<&Roster> {
        self.rosters.get(id)
    }

    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }
}

impl RosterRepository for MemoryStore {
    fn save(&mut self, roster: &Roster) -> Result<()> {
        self.rosters.insert(roster.id().clone(), roster.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Roster>> {
        let mut rosters: Vec<Roster> = self.rosters.values().cloned().collect();
        sort_catalog(&mut rosters);
        Ok(rosters)
    }

    fn delete(&mut self, id: &RosterId) -> Result<()> {
        self.rosters.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_save_replaces_by_id() {
        let mut store = MemoryStore::new();
        let roster = Roster::new("Monday", Utc::now()).unwrap();
        store.save(&roster).unwrap();

        let later = roster.touched(roster.modified_at() + Duration::seconds(5));
        store.save(&later).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(roster.id()), Some(&later));
    }

    #[test]
    fn test_load_all_oldest_first() {
        let now = Utc::now();
        let newer = Roster::new("Tuesday", now).unwrap();
        let older = Roster::new("Monday", now - Duration::days(1)).unwrap();
        let store = MemoryStore::with_rosters([newer.clone(), older.clone()]);

        assert_eq!(store.load_all().unwrap(), vec![older, newer]);
    }

    #[test]
    fn test_delete_unknown_is_ok() {
        let mut store = MemoryStore::new();
        let id = RosterId::generate();
        assert!(store.delete(&id).is_ok());
        assert!(store.is_empty());
    }
}
