//! The persistence collaborator.
//!
//! [`RosterRepository`] is the seam between roster logic and durable
//! storage. [`FileStore`] keeps one `.roll` file per roster in a data
//! directory; [`MemoryStore`] keeps everything in process memory.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use rollcall_model::{Roster, RosterId};

use crate::error::Result;

/// Durable storage for rosters.
///
/// Implementations must preserve every field across a `save`/`load_all`
/// round trip, timestamps included at full precision.
pub trait RosterRepository {
    /// Insert or replace the stored copy of `roster`.
    fn save(&mut self, roster: &Roster) -> Result<()>;

    /// All stored rosters, oldest first.
    fn load_all(&self) -> Result<Vec<Roster>>;

    /// Remove a roster. Removing an unknown id succeeds.
    fn delete(&mut self, id: &RosterId) -> Result<()>;
}

impl<R: RosterRepository + ?Sized> RosterRepository for Box<R> {
    fn save(&mut self, roster: &Roster) -> Result<()> {
        (**self).save(roster)
    }

    fn load_all(&self) -> Result<Vec<Roster>> {
        (**self).load_all()
    }

    fn delete(&mut self, id: &RosterId) -> Result<()> {
        (**self).delete(id)
    }
}

/// Stable catalog order: creation time, then id.
pub(crate) fn sort_catalog(rosters: &mut [Roster]) {
    rosters.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}
