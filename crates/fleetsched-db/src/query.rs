//! Queries and the relevance seam.

use fleetsched_spacetime::{detect_conflicts, SpacetimeRegion, Timespan};
use fleetsched_trajectory::Trajectory;
use fleetsched_types::Version;

/// Decides whether a trajectory is of interest to a query.
///
/// The patch builder and the view walk are generic over this seam; the
/// spacetime and time-window filters are the two shipped implementations.
pub trait Relevance {
    fn matches(&self, trajectory: &Trajectory) -> bool;
}

/// The spatial/temporal half of a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    /// Matches every trajectory.
    All,
    /// Matches trajectories whose `[start_time, finish_time]` intersects
    /// the window; unbounded sides match everything on that side.
    Timespan(Timespan),
    /// Matches trajectories that may conflict with any of the regions,
    /// with segments inflated by `margin` meters.
    Spacetime {
        regions: Vec<SpacetimeRegion>,
        margin: f64,
    },
}

impl Relevance for QueryFilter {
    fn matches(&self, trajectory: &Trajectory) -> bool {
        match self {
            Self::All => true,
            Self::Timespan(window) => {
                match (trajectory.start_time(), trajectory.finish_time()) {
                    (Some(start), Some(finish)) => window.overlaps(start, finish),
                    _ => false,
                }
            }
            Self::Spacetime { regions, margin } => {
                detect_conflicts(trajectory, regions, *margin)
            }
        }
    }
}

/// A mirror's statement of interest: a filter plus the last version the
/// mirror already knows.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    filter: QueryFilter,
    after: Option<Version>,
}

impl Query {
    /// Match every live trajectory.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            filter: QueryFilter::All,
            after: None,
        }
    }

    /// Match trajectories intersecting `window`.
    #[must_use]
    pub const fn timespan(window: Timespan) -> Self {
        Self {
            filter: QueryFilter::Timespan(window),
            after: None,
        }
    }

    /// Match trajectories that may conflict with `regions`.
    #[must_use]
    pub fn spacetime(regions: Vec<SpacetimeRegion>, margin: f64) -> Self {
        Self {
            filter: QueryFilter::Spacetime { regions, margin },
            after: None,
        }
    }

    /// Restrict the patch to changes newer than `version`, the last
    /// version the requesting mirror has applied.
    #[must_use]
    pub fn after(mut self, version: Version) -> Self {
        self.after = Some(version);
        self
    }

    #[inline]
    #[must_use]
    pub const fn after_version(&self) -> Option<Version> {
        self.after
    }

    #[inline]
    #[must_use]
    pub const fn filter(&self) -> &QueryFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsched_spacetime::{BoundingBox, Region};
    use fleetsched_types::{MapId, Pose2D, ProfileRef, Time};

    fn trajectory(t0: i64, t1: i64) -> Trajectory {
        Trajectory::from_waypoints(
            MapId::from("m"),
            [
                (
                    Time::from_secs(t0),
                    Pose2D::default(),
                    ProfileRef::default(),
                ),
                (
                    Time::from_secs(t1),
                    Pose2D::new(10.0, 0.0, 0.0),
                    ProfileRef::default(),
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn all_matches_everything() {
        assert!(Query::all().filter().matches(&trajectory(0, 10)));
    }

    #[test]
    fn timespan_filter_uses_trajectory_support() {
        let q = Query::timespan(Timespan::between(Time::from_secs(12), Time::from_secs(20)));
        assert!(!q.filter().matches(&trajectory(0, 10)));
        assert!(q.filter().matches(&trajectory(5, 12)));

        let unbounded = Query::timespan(Timespan::starting_at(Time::from_secs(3)));
        assert!(unbounded.filter().matches(&trajectory(0, 10)));
    }

    #[test]
    fn spacetime_filter_delegates_to_predicate() {
        let near = Region::new(MapId::from("m"), BoundingBox::spanning(4.0, -1.0, 6.0, 1.0));
        let q = Query::spacetime(vec![SpacetimeRegion::eternal(near)], 0.0);
        assert!(q.filter().matches(&trajectory(0, 10)));

        let far = Region::new(
            MapId::from("m"),
            BoundingBox::spanning(40.0, 40.0, 60.0, 60.0),
        );
        let q = Query::spacetime(vec![SpacetimeRegion::eternal(far)], 0.0);
        assert!(!q.filter().matches(&trajectory(0, 10)));
    }

    #[test]
    fn after_builder() {
        let q = Query::all().after(Version::new(7).unwrap());
        assert_eq!(q.after_version(), Version::new(7));
    }
}
