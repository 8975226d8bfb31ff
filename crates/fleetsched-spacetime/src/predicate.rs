//! Conservative conflict predicates.
//!
//! Both predicates reduce motion segments to inflated axis-aligned boxes.
//! The interpolation keeps every position inside its segment's endpoint
//! box, so a box test over the segment's time window can only err toward
//! reporting a conflict, never toward missing one.

use fleetsched_trajectory::{Trajectory, Waypoint};
use fleetsched_types::Time;

use crate::region::{BoundingBox, SpacetimeRegion};

fn segment_box(start: &Waypoint, finish: &Waypoint) -> BoundingBox {
    let a = start.pose();
    let b = finish.pose();
    BoundingBox::spanning(a.x, a.y, b.x, b.y)
}

fn point_box(waypoint: &Waypoint) -> BoundingBox {
    let p = waypoint.pose();
    BoundingBox::spanning(p.x, p.y, p.x, p.y)
}

/// Each motion segment of `trajectory` as `(start, finish, bounds)`.
///
/// A single-waypoint trajectory yields one degenerate segment: a point
/// valid only at its instant.
fn swept_boxes<'a>(
    trajectory: &'a Trajectory,
    margin: f64,
) -> Box<dyn Iterator<Item = (Time, Time, BoundingBox)> + 'a> {
    if trajectory.len() == 1 {
        let only = trajectory
            .iter()
            .next()
            .map(|w| (w.finish_time(), w.finish_time(), point_box(w).inflate(margin)));
        return Box::new(only.into_iter());
    }
    Box::new(trajectory.segments().map(move |(start, finish)| {
        (
            start.finish_time(),
            finish.finish_time(),
            segment_box(start, finish).inflate(margin),
        )
    }))
}

/// Whether `trajectory` may pass through any of `regions`.
///
/// Conservative: a `true` means the trajectory's swept, `margin`-inflated
/// volume can intersect a region within its time window; a `false` is
/// definitive. An empty region list never conflicts.
#[must_use]
pub fn detect_conflicts(trajectory: &Trajectory, regions: &[SpacetimeRegion], margin: f64) -> bool {
    regions.iter().any(|spacetime| {
        if spacetime.region.map != *trajectory.map() {
            return false;
        }
        swept_boxes(trajectory, margin).any(|(start, finish, bounds)| {
            spacetime.timespan.overlaps(start, finish)
                && bounds.overlaps(spacetime.region.bounds)
        })
    })
}

fn windows_overlap(a0: Time, a1: Time, b0: Time, b1: Time) -> bool {
    a0 <= b1 && b0 <= a1
}

/// Whether two trajectories may conflict with each other.
///
/// Same conservative contract as [`detect_conflicts`]; each trajectory's
/// segments are inflated by `margin` (the caller folds both footprints
/// into it). Trajectories on different maps never conflict.
#[must_use]
pub fn detect_trajectory_conflict(a: &Trajectory, b: &Trajectory, margin: f64) -> bool {
    if a.map() != b.map() {
        return false;
    }
    let (Some(a_start), Some(a_finish)) = (a.start_time(), a.finish_time()) else {
        return false;
    };
    let (Some(b_start), Some(b_finish)) = (b.start_time(), b.finish_time()) else {
        return false;
    };
    if !windows_overlap(a_start, a_finish, b_start, b_finish) {
        return false;
    }

    let b_boxes: Vec<_> = swept_boxes(b, margin).collect();
    swept_boxes(a, margin).any(|(a0, a1, a_box)| {
        b_boxes
            .iter()
            .any(|&(b0, b1, b_box)| windows_overlap(a0, a1, b0, b1) && a_box.overlaps(b_box))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{Region, Timespan};
    use fleetsched_types::{MapId, Pose2D, ProfileRef};

    fn map() -> MapId {
        MapId::from("floor_1")
    }

    fn line(map: MapId, times_x: &[(i64, f64)], y: f64) -> Trajectory {
        Trajectory::from_waypoints(
            map,
            times_x.iter().map(|&(t, x)| {
                (
                    Time::from_secs(t),
                    Pose2D::new(x, y, 0.0),
                    ProfileRef::default(),
                )
            }),
        )
        .unwrap()
    }

    fn region_at(x0: f64, y0: f64, x1: f64, y1: f64) -> SpacetimeRegion {
        SpacetimeRegion::eternal(Region::new(map(), BoundingBox::spanning(x0, y0, x1, y1)))
    }

    #[test]
    fn crossing_region_conflicts() {
        let t = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        assert!(detect_conflicts(&t, &[region_at(4.0, -1.0, 6.0, 1.0)], 0.0));
    }

    #[test]
    fn distant_region_is_clear() {
        let t = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        assert!(!detect_conflicts(&t, &[region_at(4.0, 5.0, 6.0, 7.0)], 0.0));
    }

    #[test]
    fn margin_turns_near_miss_into_conflict() {
        let t = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        let near = region_at(4.0, 0.5, 6.0, 1.5);
        assert!(!detect_conflicts(&t, &[near.clone()], 0.0));
        assert!(detect_conflicts(&t, &[near], 1.0));
    }

    #[test]
    fn other_map_never_conflicts() {
        let t = line(MapId::from("floor_2"), &[(0, 0.0), (10, 10.0)], 0.0);
        assert!(!detect_conflicts(&t, &[region_at(4.0, -1.0, 6.0, 1.0)], 0.0));
    }

    #[test]
    fn time_window_excludes_early_passage() {
        let t = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        let mut spacetime = region_at(4.0, -1.0, 6.0, 1.0);
        spacetime.timespan = Timespan::starting_at(Time::from_secs(20));
        assert!(!detect_conflicts(&t, &[spacetime.clone()], 0.0));

        spacetime.timespan = Timespan::between(Time::from_secs(3), Time::from_secs(7));
        assert!(detect_conflicts(&t, &[spacetime], 0.0));
    }

    #[test]
    fn stationary_pose_conflicts_at_its_instant() {
        let t = line(map(), &[(5, 3.0)], 3.0);
        let mut spacetime = region_at(2.0, 2.0, 4.0, 4.0);
        assert!(detect_conflicts(&t, &[spacetime.clone()], 0.0));

        spacetime.timespan = Timespan::starting_at(Time::from_secs(6));
        assert!(!detect_conflicts(&t, &[spacetime], 0.0));
    }

    #[test]
    fn empty_region_list_matches_nothing() {
        let t = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        assert!(!detect_conflicts(&t, &[], 0.0));
    }

    #[test]
    fn trajectories_crossing_in_space_and_time_conflict() {
        let a = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        let b = line(map(), &[(0, 10.0), (10, 0.0)], 0.0);
        assert!(detect_trajectory_conflict(&a, &b, 0.0));
    }

    #[test]
    fn trajectories_separated_in_time_are_clear() {
        let a = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        let b = line(map(), &[(20, 10.0), (30, 0.0)], 0.0);
        assert!(!detect_trajectory_conflict(&a, &b, 0.0));
    }

    #[test]
    fn trajectories_separated_in_space_are_clear() {
        let a = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        let b = line(map(), &[(0, 0.0), (10, 10.0)], 50.0);
        assert!(!detect_trajectory_conflict(&a, &b, 0.0));
        // A wide enough margin closes the 50m gap.
        assert!(detect_trajectory_conflict(&a, &b, 30.0));
    }

    #[test]
    fn trajectories_on_different_maps_are_clear() {
        let a = line(map(), &[(0, 0.0), (10, 10.0)], 0.0);
        let b = line(MapId::from("floor_2"), &[(0, 10.0), (10, 0.0)], 0.0);
        assert!(!detect_trajectory_conflict(&a, &b, 0.0));
    }
}
