//! An ordered batch of changes for a mirror.

use fleetsched_types::Version;

use crate::change::Change;

/// The changes advancing a mirror from its known version to
/// `latest_version`, sorted ascending by change version.
///
/// Database-assigned versions are globally monotonic, so applying in this
/// order automatically respects causal dependencies between changes.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Patch<'a> {
    latest_version: Option<Version>,
    changes: Vec<Change<'a>>,
}

// Like `Change`, a patch deserializes through the owned wire shape only.
impl<'de, 'a> serde::Deserialize<'de> for Patch<'a> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct WirePatch {
            latest_version: Option<Version>,
            changes: Vec<Change<'static>>,
        }

        let wire = WirePatch::deserialize(deserializer)?;
        // Patch::new re-sorts, guarding against reordered payloads.
        Ok(Patch::new(wire.changes, wire.latest_version))
    }
}

/// A patch that owns all of its payload; the only form that serializes
/// out of the process.
pub type OwnedPatch = Patch<'static>;

impl<'a> Patch<'a> {
    /// Build a patch, sorting `changes` into application order.
    #[must_use]
    pub fn new(mut changes: Vec<Change<'a>>, latest_version: Option<Version>) -> Self {
        changes.sort_by_key(Change::version);
        Self {
            latest_version,
            changes,
        }
    }

    /// The database's latest version at synthesis time; `None` only for a
    /// patch from a database that never assigned a version.
    #[inline]
    #[must_use]
    pub const fn latest_version(&self) -> Option<Version> {
        self.latest_version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change<'a>> {
        self.changes.iter()
    }

    #[must_use]
    pub fn changes(&self) -> &[Change<'a>] {
        &self.changes
    }

    /// Materialize a patch that owns every trajectory payload.
    #[must_use]
    pub fn into_owned(self) -> OwnedPatch {
        Patch {
            latest_version: self.latest_version,
            changes: self.changes.into_iter().map(Change::into_owned).collect(),
        }
    }
}

impl<'p, 'a> IntoIterator for &'p Patch<'a> {
    type Item = &'p Change<'a>;
    type IntoIter = std::slice::Iter<'p, Change<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsched_types::{Duration, Time};

    fn v(raw: u64) -> Version {
        Version::new(raw).unwrap()
    }

    #[test]
    fn construction_sorts_by_version() {
        let changes = vec![
            Change::erase(v(2), v(3)),
            Change::delay(v(1), Time::EPOCH, Duration::from_secs(1), v(2)),
            Change::cull(vec![v(1)], v(5)),
        ];
        let patch = Patch::new(changes, Some(v(5)));
        let versions: Vec<_> = patch.iter().map(Change::version).collect();
        assert_eq!(versions, vec![v(2), v(3), v(5)]);
        assert_eq!(patch.latest_version(), Some(v(5)));
    }

    #[test]
    fn empty_patch() {
        let patch = Patch::new(Vec::new(), None);
        assert!(patch.is_empty());
        assert_eq!(patch.len(), 0);
        assert_eq!(patch.latest_version(), None);
    }

    #[test]
    fn serde_round_trip() {
        let patch = Patch::new(vec![Change::erase(v(1), v(2))], Some(v(2)));
        let json = serde_json::to_string(&patch).unwrap();
        let back: OwnedPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patch);
    }
}
