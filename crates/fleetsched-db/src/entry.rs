//! One versioned snapshot within a lineage.

use fleetsched_trajectory::Trajectory;
use fleetsched_types::Version;

use crate::change::OwnedChange;

/// The database's unit of versioned state.
///
/// Entries live in an arena keyed by version; succession links are stored
/// as `Option<Version>` rather than pointers, so culling is a set
/// operation and link integrity is checkable.
#[derive(Debug, Clone)]
pub struct Entry {
    version: Version,
    /// The lineage this entry belongs to: the version of its root insert.
    lineage: Version,
    /// The effective trajectory at this version. An erase terminal retains
    /// the trajectory it retired so culling can judge its finish time.
    trajectory: Trajectory,
    /// Set on the terminal entry recorded by an erase; an erased entry is
    /// never relevant to any query.
    erased: bool,
    change: OwnedChange,
    succeeds: Option<Version>,
    succeeded_by: Option<Version>,
}

impl Entry {
    /// A lineage root: entry produced by an insert.
    pub(crate) fn root(version: Version, trajectory: Trajectory, change: OwnedChange) -> Self {
        Self {
            version,
            lineage: version,
            trajectory,
            erased: false,
            change,
            succeeds: None,
            succeeded_by: None,
        }
    }

    /// An entry that supersedes `predecessor` within `lineage`.
    pub(crate) fn successor(
        version: Version,
        lineage: Version,
        trajectory: Trajectory,
        erased: bool,
        change: OwnedChange,
        predecessor: Version,
    ) -> Self {
        Self {
            version,
            lineage,
            trajectory,
            erased,
            change,
            succeeds: Some(predecessor),
            succeeded_by: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// The version of this entry's lineage root insert.
    #[inline]
    #[must_use]
    pub const fn lineage(&self) -> Version {
        self.lineage
    }

    #[inline]
    #[must_use]
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    #[inline]
    #[must_use]
    pub const fn erased(&self) -> bool {
        self.erased
    }

    #[inline]
    #[must_use]
    pub fn change(&self) -> &OwnedChange {
        &self.change
    }

    #[inline]
    #[must_use]
    pub const fn succeeds(&self) -> Option<Version> {
        self.succeeds
    }

    #[inline]
    #[must_use]
    pub const fn succeeded_by(&self) -> Option<Version> {
        self.succeeded_by
    }

    /// Whether this entry is authoritative for its lineage.
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.succeeded_by.is_none() && !self.erased
    }

    pub(crate) fn set_succeeded_by(&mut self, successor: Version) {
        self.succeeded_by = Some(successor);
    }

    /// Detach the backward link after the predecessor chain was culled.
    pub(crate) fn clear_succeeds(&mut self) {
        self.succeeds = None;
    }
}
