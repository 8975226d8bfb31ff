//! The inspector framework and the patch builder.
//!
//! The store walks every terminal entry past a pluggable [`Inspector`].
//! [`ChangeRelevanceInspector`] is the patch builder: it decides, per
//! entry, what a mirror at some prior version needs to hear to catch up.
//! [`ViewInspector`] collects live state.

use fleetsched_error::{Result, ScheduleError};
use fleetsched_types::Version;
use smallvec::SmallVec;

use crate::change::Change;
use crate::entry::Entry;
use crate::query::Relevance;
use crate::store::EntryStore;
use crate::view::ViewElement;

/// Visits each terminal entry of the store under a relevance filter.
pub trait Inspector<'a> {
    fn inspect(
        &mut self,
        store: &'a EntryStore,
        entry: &'a Entry,
        relevance: &dyn Relevance,
    ) -> Result<()>;
}

fn is_relevant(entry: &Entry, relevance: &dyn Relevance) -> bool {
    !entry.erased() && relevance.matches(entry.trajectory())
}

/// Walk `succeeds` links back to the most recent ancestor the mirror
/// already knows (`version <= after`), if any.
fn last_known_ancestor<'a>(
    store: &'a EntryStore,
    entry: &'a Entry,
    after: Version,
) -> Result<Option<&'a Entry>> {
    let mut cursor = entry;
    let mut steps = 0_usize;
    loop {
        if cursor.version() <= after {
            return Ok(Some(cursor));
        }
        let Some(predecessor) = cursor.succeeds() else {
            return Ok(None);
        };
        cursor = store.entry(predecessor).ok_or_else(|| {
            ScheduleError::internal(format!(
                "entry {} succeeds missing {predecessor}",
                cursor.version()
            ))
        })?;
        steps += 1;
        if steps > store.entry_count() {
            return Err(ScheduleError::internal(format!(
                "succession cycle reaching {}",
                entry.version()
            )));
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeRelevanceInspector
// ---------------------------------------------------------------------------

/// Builds the minimal ordered change sequence for one mirror.
///
/// Synthetic insertions borrow their trajectory from entry storage, so
/// building a patch for an in-process consumer copies nothing; replayed
/// history is cloned from the recorded changes.
pub struct ChangeRelevanceInspector<'a> {
    after: Option<Version>,
    changes: SmallVec<[Change<'a>; 8]>,
}

impl<'a> ChangeRelevanceInspector<'a> {
    #[must_use]
    pub fn new(after: Option<Version>) -> Self {
        Self {
            after,
            changes: SmallVec::new(),
        }
    }

    /// The accumulated changes, in visit order (callers sort by version).
    #[must_use]
    pub fn into_changes(self) -> Vec<Change<'a>> {
        self.changes.into_vec()
    }

    /// Emit every recorded change strictly after `ancestor`, in chain
    /// order, so the mirror replays the exact history it missed.
    fn replay_after(&mut self, store: &'a EntryStore, ancestor: &'a Entry) -> Result<()> {
        let mut cursor = ancestor.succeeded_by();
        let mut steps = 0_usize;
        while let Some(version) = cursor {
            let record = store.entry(version).ok_or_else(|| {
                ScheduleError::internal(format!("dangling successor link to {version}"))
            })?;
            self.changes.push(record.change().clone());
            cursor = record.succeeded_by();
            steps += 1;
            if steps > store.entry_count() {
                return Err(ScheduleError::internal(format!(
                    "succession cycle after {}",
                    ancestor.version()
                )));
            }
        }
        Ok(())
    }
}

impl<'a> Inspector<'a> for ChangeRelevanceInspector<'a> {
    fn inspect(
        &mut self,
        store: &'a EntryStore,
        entry: &'a Entry,
        relevance: &dyn Relevance,
    ) -> Result<()> {
        // Superseded entries are not authoritative; their terminal speaks
        // for the lineage.
        if entry.succeeded_by().is_some() {
            return Ok(());
        }
        if let Some(after) = self.after {
            if entry.version() <= after {
                return Ok(());
            }
        }

        if is_relevant(entry, relevance) {
            // Does this entry descend from something the mirror already
            // holds in its relevant set?
            let known_ancestor = match self.after {
                Some(after) => last_known_ancestor(store, entry, after)?
                    .filter(|ancestor| is_relevant(ancestor, relevance)),
                None => None,
            };
            match known_ancestor {
                // The mirror knows the lineage: replay its missed history.
                Some(ancestor) => self.replay_after(store, ancestor)?,
                // The mirror has never seen this lineage (or dropped it as
                // irrelevant): hand it the current state as an insertion.
                None => self
                    .changes
                    .push(Change::insert_borrowed(entry.trajectory(), entry.version())),
            }
        } else if let Some(after) = self.after {
            // The lineage is irrelevant now; if the mirror still believes
            // in it, tell it to drop the version it knows.
            if let Some(ancestor) = last_known_ancestor(store, entry, after)? {
                if is_relevant(ancestor, relevance) {
                    self.changes
                        .push(Change::erase(ancestor.version(), entry.version()));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ViewInspector
// ---------------------------------------------------------------------------

/// Collects the live entries matching a query.
#[derive(Default)]
pub struct ViewInspector {
    elements: Vec<ViewElement>,
}

impl ViewInspector {
    #[must_use]
    pub fn into_elements(self) -> Vec<ViewElement> {
        self.elements
    }
}

impl<'a> Inspector<'a> for ViewInspector {
    fn inspect(
        &mut self,
        _store: &'a EntryStore,
        entry: &'a Entry,
        relevance: &dyn Relevance,
    ) -> Result<()> {
        if entry.is_live() && relevance.matches(entry.trajectory()) {
            self.elements.push(ViewElement {
                id: entry.lineage(),
                version: entry.version(),
                trajectory: entry.trajectory().clone(),
            });
        }
        Ok(())
    }
}
