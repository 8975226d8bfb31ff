//! The versioned entry store.
//!
//! Single-writer state: an arena of [`Entry`]s keyed by version, the map
//! from lineage root to live head, and the cull log. All mutation methods
//! are all-or-nothing: recoverable errors are detected before the store
//! is touched.

use std::collections::{BTreeMap, HashMap, HashSet};

use fleetsched_error::{Result, ScheduleError};
use fleetsched_trajectory::Trajectory;
use fleetsched_types::{Duration, Time, Version};
use tracing::{debug, warn};

use crate::change::{Change, OwnedChange};
use crate::entry::Entry;
use crate::inspect::{ChangeRelevanceInspector, Inspector, ViewInspector};
use crate::patch::Patch;
use crate::query::{Query, Relevance};
use crate::view::ViewElement;

/// In-memory arena of versioned schedule entries.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: BTreeMap<Version, Entry>,
    /// Lineage root version -> current live head version. Keys survive
    /// culling of the root entry itself; they are the ids clients hold.
    lineage_heads: HashMap<Version, Version>,
    /// Recorded cull changes; culled entries leave the arena but their
    /// cull record must still reach stale mirrors.
    cull_log: Vec<OwnedChange>,
    latest_version: Option<Version>,
}

impl EntryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The highest version assigned so far; `None` for a fresh database.
    #[inline]
    #[must_use]
    pub const fn latest_version(&self) -> Option<Version> {
        self.latest_version
    }

    /// Number of entries currently held (history included).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of live lineages.
    #[must_use]
    pub fn lineage_count(&self) -> usize {
        self.lineage_heads.len()
    }

    /// Look up an entry by version.
    #[must_use]
    pub fn entry(&self, version: Version) -> Option<&Entry> {
        self.entries.get(&version)
    }

    /// All entries, ascending by version.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    fn next_version(&self) -> Result<Version> {
        match self.latest_version {
            None => Ok(Version::FIRST),
            Some(version) => version
                .checked_next()
                .ok_or_else(|| ScheduleError::internal("version space exhausted")),
        }
    }

    fn live_head(&self, id: Version) -> Result<&Entry> {
        let head = self
            .lineage_heads
            .get(&id)
            .ok_or(ScheduleError::UnknownLineage { id })?;
        self.entries.get(head).ok_or_else(|| {
            ScheduleError::internal(format!("lineage {id} heads at missing entry {head}"))
        })
    }

    /// Link `entry` as the new head of lineage `id`, superseding `head`.
    fn adopt_successor(&mut self, id: Version, head: Version, entry: Entry) -> Result<()> {
        let version = entry.version();
        let predecessor = self
            .entries
            .get_mut(&head)
            .ok_or_else(|| ScheduleError::internal(format!("missing predecessor {head}")))?;
        predecessor.set_succeeded_by(version);
        self.entries.insert(version, entry);
        self.lineage_heads.insert(id, version);
        self.latest_version = Some(version);
        Ok(())
    }

    /// Introduce a new lineage rooted at the returned version.
    pub fn insert(&mut self, trajectory: &Trajectory) -> Result<Version> {
        if trajectory.is_empty() {
            return Err(ScheduleError::EmptyTrajectory);
        }
        let version = self.next_version()?;
        let change = Change::insert(trajectory.clone(), version);
        self.entries
            .insert(version, Entry::root(version, trajectory.clone(), change));
        self.lineage_heads.insert(version, version);
        self.latest_version = Some(version);
        debug!(%version, "inserted new lineage");
        Ok(version)
    }

    /// Substitute lineage `id`'s current trajectory wholesale.
    pub fn replace(&mut self, id: Version, trajectory: &Trajectory) -> Result<Version> {
        if trajectory.is_empty() {
            return Err(ScheduleError::EmptyTrajectory);
        }
        let head = self.live_head(id)?.version();
        let version = self.next_version()?;
        let change = Change::replace(head, trajectory.clone(), version);
        self.adopt_successor(
            id,
            head,
            Entry::successor(version, id, trajectory.clone(), false, change, head),
        )?;
        debug!(lineage = %id, %version, "replaced trajectory");
        Ok(version)
    }

    /// Shift lineage `id`'s waypoints at or after `from` by `delay`.
    ///
    /// A `from` past the trajectory's finish time is a timing no-op but
    /// still records a change.
    pub fn delay(&mut self, id: Version, from: Time, delay: Duration) -> Result<Version> {
        let head_entry = self.live_head(id)?;
        let head = head_entry.version();
        let delayed = head_entry.trajectory().delayed(from, delay)?;
        let version = self.next_version()?;
        let change = Change::delay(head, from, delay, version);
        self.adopt_successor(
            id,
            head,
            Entry::successor(version, id, delayed, false, change, head),
        )?;
        debug!(lineage = %id, %version, %delay, "delayed trajectory");
        Ok(version)
    }

    /// Splice `interruption` into lineage `id`'s current trajectory and
    /// push the remainder back by the interruption's duration plus `delay`.
    pub fn interrupt(
        &mut self,
        id: Version,
        interruption: &Trajectory,
        delay: Duration,
    ) -> Result<Version> {
        if delay.is_negative() {
            return Err(ScheduleError::NegativeInterruptionDelay { delay });
        }
        let head_entry = self.live_head(id)?;
        let head = head_entry.version();
        let composed = head_entry
            .trajectory()
            .with_interruption(interruption, delay)?;
        let version = self.next_version()?;
        let change = Change::interrupt(head, interruption.clone(), delay, version);
        self.adopt_successor(
            id,
            head,
            Entry::successor(version, id, composed, false, change, head),
        )?;
        debug!(lineage = %id, %version, "interrupted trajectory");
        Ok(version)
    }

    /// Remove lineage `id` from live state. History stays traversable
    /// until culled.
    pub fn erase(&mut self, id: Version) -> Result<Version> {
        let head_entry = self.live_head(id)?;
        let head = head_entry.version();
        let retired = head_entry.trajectory().clone();
        let version = self.next_version()?;
        let change = Change::erase(head, version);
        self.adopt_successor(
            id,
            head,
            Entry::successor(version, id, retired, true, change, head),
        )?;
        self.lineage_heads.remove(&id);
        debug!(lineage = %id, %version, "erased lineage");
        Ok(version)
    }

    /// Compact history: drop every non-live chain prefix whose trajectory
    /// finished before `cutoff`.
    ///
    /// Only non-live entries are eligible, and only in chain-prefix order,
    /// so succession links never dangle and a live lineage can never lose
    /// its head. Idempotent: a second cull at the same cutoff removes
    /// nothing further.
    ///
    /// Returns the version of the recorded cull change and the removed
    /// versions, ascending.
    pub fn cull(&mut self, cutoff: Time) -> Result<(Version, Vec<Version>)> {
        let chain_starts: Vec<Version> = self
            .entries
            .values()
            .filter(|entry| entry.succeeds().is_none())
            .map(Entry::version)
            .collect();

        let mut victims: Vec<Version> = Vec::new();
        for start in chain_starts {
            let mut cursor = Some(start);
            while let Some(current) = cursor {
                let entry = self.entries.get(&current).ok_or_else(|| {
                    ScheduleError::internal(format!("chain walk reached missing entry {current}"))
                })?;
                if entry.is_live() {
                    break;
                }
                let finish = entry.trajectory().finish_time().ok_or_else(|| {
                    ScheduleError::internal(format!("entry {current} holds an empty trajectory"))
                })?;
                if finish >= cutoff {
                    break;
                }
                victims.push(current);
                cursor = entry.succeeded_by();
            }
        }
        victims.sort_unstable();

        let victim_set: HashSet<Version> = victims.iter().copied().collect();
        for &victim in &victims {
            let Some(removed) = self.entries.remove(&victim) else {
                continue;
            };
            if let Some(successor) = removed.succeeded_by() {
                if !victim_set.contains(&successor) {
                    if let Some(survivor) = self.entries.get_mut(&successor) {
                        survivor.clear_succeeds();
                    }
                }
            }
        }

        let version = self.next_version()?;
        self.cull_log.push(Change::cull(victims.clone(), version));
        self.latest_version = Some(version);
        debug!(%version, culled = victims.len(), "culled history");
        Ok((version, victims))
    }

    /// Walk every terminal entry through `inspector` under `query`'s
    /// relevance filter.
    pub fn inspect<'a, I: Inspector<'a>>(
        &'a self,
        query: &Query,
        inspector: &mut I,
    ) -> Result<()> {
        let relevance: &dyn Relevance = query.filter();
        for entry in self.entries.values() {
            inspector.inspect(self, entry, relevance)?;
        }
        Ok(())
    }

    /// Synthesize the minimal patch bringing a mirror with `query`'s
    /// interest from `query.after_version()` up to `latest_version`.
    ///
    /// The returned changes may borrow trajectories from entry storage;
    /// call [`Patch::into_owned`] before letting the patch outlive this
    /// store.
    pub fn changes(&self, query: &Query) -> Result<Patch<'_>> {
        let after = query.after_version();
        let mut inspector = ChangeRelevanceInspector::new(after);
        self.inspect(query, &mut inspector)?;
        let mut changes = inspector.into_changes();

        // A fresh mirror has nothing to drop; cull records only matter to
        // mirrors that may still hold the culled versions.
        if let Some(after) = after {
            for cull in &self.cull_log {
                if cull.version() > after {
                    changes.push(cull.clone());
                }
            }
        }

        let patch = Patch::new(changes, self.latest_version);
        debug!(
            changes = patch.len(),
            after = after.map_or(0, Version::get),
            "synthesized patch"
        );
        Ok(patch)
    }

    /// The live entries matching `query`, with their lineage ids.
    ///
    /// The query's `after_version` does not apply to views; a view is a
    /// statement about current state, not a delta.
    pub fn view(&self, query: &Query) -> Result<Vec<ViewElement>> {
        let mut inspector = ViewInspector::default();
        self.inspect(query, &mut inspector)?;
        Ok(inspector.into_elements())
    }

    /// Verify the store's structural invariants.
    ///
    /// Returns [`ScheduleError::InternalInvariant`] on the first
    /// violation; a failure means the database can no longer be trusted.
    pub fn check_integrity(&self) -> Result<()> {
        let mut max_version = self.cull_log.iter().map(Change::version).max();
        for (&version, entry) in &self.entries {
            if entry.version() != version {
                return Err(self.integrity_failure(format!(
                    "entry keyed {version} reports version {}",
                    entry.version()
                )));
            }
            max_version = max_version.max(Some(version));

            if let Some(predecessor) = entry.succeeds() {
                if predecessor >= version {
                    return Err(self.integrity_failure(format!(
                        "entry {version} succeeds non-earlier {predecessor}"
                    )));
                }
                match self.entries.get(&predecessor) {
                    Some(prior) if prior.succeeded_by() == Some(version) => {}
                    Some(_) => {
                        return Err(self.integrity_failure(format!(
                            "entry {predecessor} does not acknowledge successor {version}"
                        )));
                    }
                    None => {
                        return Err(self.integrity_failure(format!(
                            "entry {version} succeeds missing {predecessor}"
                        )));
                    }
                }
            }

            if let Some(successor) = entry.succeeded_by() {
                match self.entries.get(&successor) {
                    Some(next) if next.succeeds() == Some(version) => {}
                    _ => {
                        return Err(self.integrity_failure(format!(
                            "entry {version} has dangling successor link {successor}"
                        )));
                    }
                }
            }

            if entry.is_live() && self.lineage_heads.get(&entry.lineage()) != Some(&version) {
                return Err(self.integrity_failure(format!(
                    "live entry {version} is not the head of lineage {}",
                    entry.lineage()
                )));
            }
        }

        for (&id, &head) in &self.lineage_heads {
            match self.entries.get(&head) {
                Some(entry) if entry.is_live() && entry.lineage() == id => {}
                Some(_) => {
                    return Err(self.integrity_failure(format!(
                        "lineage {id} heads at non-live or foreign entry {head}"
                    )));
                }
                None => {
                    return Err(
                        self.integrity_failure(format!("lineage {id} heads at missing {head}"))
                    );
                }
            }
        }

        if self.latest_version < max_version {
            return Err(self.integrity_failure(format!(
                "latest_version {:?} behind recorded maximum {max_version:?}",
                self.latest_version
            )));
        }

        Ok(())
    }

    fn integrity_failure(&self, detail: String) -> ScheduleError {
        warn!(%detail, "schedule store integrity violation");
        ScheduleError::internal(detail)
    }
}
