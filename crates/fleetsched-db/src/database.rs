//! The shared-access wrapper around the entry store.

use fleetsched_error::Result;
use fleetsched_trajectory::Trajectory;
use fleetsched_types::{Duration, Time, Version};
use parking_lot::{RwLock, RwLockReadGuard};

use crate::patch::OwnedPatch;
use crate::query::Query;
use crate::store::EntryStore;
use crate::view::ViewElement;

/// The schedule database: a single-writer, many-reader wrapper around
/// [`EntryStore`].
///
/// A mutation holds the write lock for exactly one change; readers see a
/// consistent snapshot in which every visible entry has
/// `version <= latest_version` at lock acquisition. Patches returned by
/// [`changes`](Self::changes) are materialized to owned form before the
/// read guard drops, so borrowed trajectories never escape the lock.
#[derive(Debug, Default)]
pub struct Database {
    store: RwLock<EntryStore>,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new trajectory; returns the lineage id.
    pub fn insert(&self, trajectory: &Trajectory) -> Result<Version> {
        self.store.write().insert(trajectory)
    }

    /// Splice an interruption into lineage `id`.
    pub fn interrupt(
        &self,
        id: Version,
        interruption: &Trajectory,
        delay: Duration,
    ) -> Result<Version> {
        self.store.write().interrupt(id, interruption, delay)
    }

    /// Delay lineage `id` from `from` onward.
    pub fn delay(&self, id: Version, from: Time, delay: Duration) -> Result<Version> {
        self.store.write().delay(id, from, delay)
    }

    /// Replace lineage `id`'s trajectory.
    pub fn replace(&self, id: Version, trajectory: &Trajectory) -> Result<Version> {
        self.store.write().replace(id, trajectory)
    }

    /// Remove lineage `id` from live state.
    pub fn erase(&self, id: Version) -> Result<Version> {
        self.store.write().erase(id)
    }

    /// Compact history finished before `cutoff`.
    pub fn cull(&self, cutoff: Time) -> Result<(Version, Vec<Version>)> {
        self.store.write().cull(cutoff)
    }

    /// Synthesize an owned patch for `query`.
    pub fn changes(&self, query: &Query) -> Result<OwnedPatch> {
        let store = self.store.read();
        store.changes(query).map(crate::patch::Patch::into_owned)
    }

    /// The live entries matching `query`.
    pub fn view(&self, query: &Query) -> Result<Vec<ViewElement>> {
        self.store.read().view(query)
    }

    /// The highest version assigned so far.
    #[must_use]
    pub fn latest_version(&self) -> Option<Version> {
        self.store.read().latest_version()
    }

    /// Verify store invariants; a failure is fatal.
    pub fn check_integrity(&self) -> Result<()> {
        self.store.read().check_integrity()
    }

    /// Direct read access for in-process consumers that want borrowed
    /// patches ([`EntryStore::changes`]) without the owned copy.
    #[must_use]
    pub fn read(&self) -> RwLockReadGuard<'_, EntryStore> {
        self.store.read()
    }
}
