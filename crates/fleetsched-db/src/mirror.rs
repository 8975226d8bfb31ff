//! A consumer-side replica of the filtered schedule.

use std::collections::HashMap;

use fleetsched_error::Result;
use fleetsched_trajectory::Trajectory;
use fleetsched_types::Version;

use crate::change::ChangeBody;
use crate::patch::Patch;

/// A local copy of the schedule subset a query selects, advanced by
/// applying [`Patch`]es in order.
///
/// Trajectories are keyed by the most recent version the mirror has seen
/// for their lineage; every non-insert change names exactly that version
/// as its `original`. Unknown ids are ignored, and changes at or below
/// the mirror's version are skipped, so applying a patch twice is a
/// no-op.
#[derive(Debug, Default, Clone)]
pub struct Mirror {
    latest_version: Option<Version>,
    elements: HashMap<Version, Trajectory>,
}

impl Mirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest database version this mirror has caught up to.
    #[inline]
    #[must_use]
    pub const fn latest_version(&self) -> Option<Version> {
        self.latest_version
    }

    /// Number of trajectories currently mirrored.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// The mirrored trajectory known by `version`, if any.
    #[must_use]
    pub fn trajectory(&self, version: Version) -> Option<&Trajectory> {
        self.elements.get(&version)
    }

    /// Iterate the mirrored `(version, trajectory)` pairs.
    pub fn elements(&self) -> impl Iterator<Item = (Version, &Trajectory)> {
        self.elements.iter().map(|(&version, trajectory)| (version, trajectory))
    }

    /// Apply `patch` in change order.
    ///
    /// # Errors
    ///
    /// Propagates trajectory-composition failures, which can only arise
    /// from a patch that does not match this mirror's state.
    pub fn apply(&mut self, patch: &Patch<'_>) -> Result<()> {
        for change in patch {
            if let Some(latest) = self.latest_version {
                if change.version() <= latest {
                    continue;
                }
            }
            let version = change.version();
            match change.body() {
                ChangeBody::Insert { trajectory } => {
                    self.elements.insert(version, trajectory.get().clone());
                }
                ChangeBody::Interrupt {
                    original,
                    interruption,
                    delay,
                } => {
                    if let Some(base) = self.elements.remove(original) {
                        let composed = base.with_interruption(interruption.get(), *delay)?;
                        self.elements.insert(version, composed);
                    }
                }
                ChangeBody::Delay {
                    original,
                    from,
                    delay,
                } => {
                    if let Some(base) = self.elements.remove(original) {
                        let delayed = base.delayed(*from, *delay)?;
                        self.elements.insert(version, delayed);
                    }
                }
                ChangeBody::Replace {
                    original,
                    trajectory,
                } => {
                    if self.elements.remove(original).is_some() {
                        self.elements.insert(version, trajectory.get().clone());
                    }
                }
                ChangeBody::Erase { original } => {
                    self.elements.remove(original);
                }
                ChangeBody::Cull { versions } => {
                    for culled in versions {
                        self.elements.remove(culled);
                    }
                }
            }
            self.latest_version = self.latest_version.max(Some(version));
        }
        self.latest_version = self.latest_version.max(patch.latest_version());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::Change;
    use fleetsched_types::{Duration, MapId, Pose2D, ProfileRef, Time};

    fn v(raw: u64) -> Version {
        Version::new(raw).unwrap()
    }

    fn trajectory(times: &[i64]) -> Trajectory {
        Trajectory::from_waypoints(
            MapId::from("m"),
            times.iter().map(|&t| {
                (
                    Time::from_secs(t),
                    Pose2D::default(),
                    ProfileRef::default(),
                )
            }),
        )
        .unwrap()
    }

    #[test]
    fn insert_then_replace_rekeys_the_lineage() {
        let mut mirror = Mirror::new();
        let patch = Patch::new(vec![Change::insert(trajectory(&[0, 10]), v(1))], Some(v(1)));
        mirror.apply(&patch).unwrap();
        assert!(mirror.trajectory(v(1)).is_some());

        let patch = Patch::new(
            vec![Change::replace(v(1), trajectory(&[0, 20]), v(2))],
            Some(v(2)),
        );
        mirror.apply(&patch).unwrap();
        assert!(mirror.trajectory(v(1)).is_none());
        assert_eq!(
            mirror.trajectory(v(2)).unwrap().finish_time(),
            Some(Time::from_secs(20))
        );
        assert_eq!(mirror.latest_version(), Some(v(2)));
    }

    #[test]
    fn delay_recomputes_the_local_copy() {
        let mut mirror = Mirror::new();
        mirror
            .apply(&Patch::new(
                vec![Change::insert(trajectory(&[0, 5, 10]), v(1))],
                Some(v(1)),
            ))
            .unwrap();
        mirror
            .apply(&Patch::new(
                vec![Change::delay(
                    v(1),
                    Time::from_secs(4),
                    Duration::from_secs(2),
                    v(2),
                )],
                Some(v(2)),
            ))
            .unwrap();
        let times: Vec<_> = mirror
            .trajectory(v(2))
            .unwrap()
            .iter()
            .map(|w| w.finish_time())
            .collect();
        assert_eq!(
            times,
            vec![Time::from_secs(0), Time::from_secs(7), Time::from_secs(12)]
        );
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut mirror = Mirror::new();
        let patch = Patch::new(
            vec![
                Change::erase(v(40), v(41)),
                Change::cull(vec![v(1), v(2)], v(42)),
                Change::delay(v(50), Time::EPOCH, Duration::from_secs(1), v(51)),
            ],
            Some(v(51)),
        );
        mirror.apply(&patch).unwrap();
        assert_eq!(mirror.element_count(), 0);
        assert_eq!(mirror.latest_version(), Some(v(51)));
    }

    #[test]
    fn reapplying_a_patch_is_a_noop() {
        let mut mirror = Mirror::new();
        let patch = Patch::new(vec![Change::insert(trajectory(&[0, 10]), v(1))], Some(v(1)));
        mirror.apply(&patch).unwrap();
        let snapshot: Vec<_> = mirror.elements().map(|(v, t)| (v, t.clone())).collect();

        mirror.apply(&patch).unwrap();
        let replayed: Vec<_> = mirror.elements().map(|(v, t)| (v, t.clone())).collect();
        assert_eq!(snapshot, replayed);
        assert_eq!(mirror.element_count(), 1);
    }
}
