//! The ordered waypoint sequence and its mutation operations.

use fleetsched_error::{Result, ScheduleError};
use fleetsched_types::{Duration, MapId, Pose2D, ProfileRef, Time};
use smallvec::SmallVec;

use crate::motion::Motion;
use crate::waypoint::Waypoint;

/// An ordered, strictly time-increasing sequence of waypoints on one map.
///
/// A trajectory with a single waypoint is a stationary pose valid only at
/// that instant. The database requires trajectories to be non-empty, but
/// the type itself permits an empty sequence while it is being built.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trajectory {
    map: MapId,
    waypoints: SmallVec<[Waypoint; 4]>,
}

impl Trajectory {
    /// Create an empty trajectory on `map`.
    #[must_use]
    pub fn new(map: MapId) -> Self {
        Self {
            map,
            waypoints: SmallVec::new(),
        }
    }

    /// Build a trajectory from `(time, pose, profile)` triples.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::OutOfOrder`] if two triples share a finish time.
    pub fn from_waypoints<I>(map: MapId, waypoints: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Time, Pose2D, ProfileRef)>,
    {
        let mut trajectory = Self::new(map);
        for (time, pose, profile) in waypoints {
            trajectory.insert_waypoint(time, pose, profile)?;
        }
        Ok(trajectory)
    }

    /// The map this trajectory moves through.
    #[inline]
    #[must_use]
    pub fn map(&self) -> &MapId {
        &self.map
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Insert a waypoint at its time-ordered position.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::OutOfOrder`] if a waypoint with the same finish
    /// time already exists. The trajectory is left unchanged on error.
    pub fn insert_waypoint(&mut self, time: Time, pose: Pose2D, profile: ProfileRef) -> Result<()> {
        match self
            .waypoints
            .binary_search_by_key(&time, Waypoint::finish_time)
        {
            Ok(_) => Err(ScheduleError::OutOfOrder { time }),
            Err(at) => {
                self.waypoints
                    .insert(at, Waypoint::new(time, pose, profile));
                Ok(())
            }
        }
    }

    /// Iterate from the first waypoint with `finish_time >= time` onward.
    pub fn find(&self, time: Time) -> std::slice::Iter<'_, Waypoint> {
        let start = self
            .waypoints
            .partition_point(|w| w.finish_time() < time);
        self.waypoints[start..].iter()
    }

    /// First waypoint's finish time; `None` iff empty.
    #[must_use]
    pub fn start_time(&self) -> Option<Time> {
        self.waypoints.first().map(Waypoint::finish_time)
    }

    /// Last waypoint's finish time; `None` iff empty.
    #[must_use]
    pub fn finish_time(&self) -> Option<Time> {
        self.waypoints.last().map(Waypoint::finish_time)
    }

    /// Total scheduled duration; `None` iff empty.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        Some(self.finish_time()? - self.start_time()?)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }

    /// Consecutive waypoint pairs, one per motion segment.
    pub fn segments(&self) -> impl Iterator<Item = (&Waypoint, &Waypoint)> {
        self.waypoints.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Shift every waypoint with `finish_time >= from` by `delay`.
    ///
    /// A delay past the trajectory's finish time shifts nothing and
    /// succeeds. All-or-nothing: on error the trajectory is unchanged.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::WouldReorder`] if a negative `delay` would move
    /// the shifted suffix at or before the preceding waypoint.
    pub fn apply_delay(&mut self, from: Time, delay: Duration) -> Result<()> {
        let start = self
            .waypoints
            .partition_point(|w| w.finish_time() < from);
        if start == self.waypoints.len() {
            return Ok(());
        }

        if delay.is_negative() && start > 0 {
            let boundary = self.waypoints[start - 1].finish_time();
            let shifted = self.waypoints[start].finish_time() + delay;
            if shifted <= boundary {
                return Err(ScheduleError::WouldReorder { at: from, delay });
            }
        }

        for waypoint in &mut self.waypoints[start..] {
            waypoint.shift(delay);
        }
        Ok(())
    }

    /// Clone-and-delay, used by the schedule store to derive successor
    /// trajectories without touching the published one.
    pub fn delayed(&self, from: Time, delay: Duration) -> Result<Self> {
        let mut successor = self.clone();
        successor.apply_delay(from, delay)?;
        Ok(successor)
    }

    /// Splice `interruption` into this trajectory.
    ///
    /// Waypoints at or after the interruption's start time are pushed back
    /// by the interruption's duration plus `delay`, then the interruption's
    /// waypoints are merged in. The composed trajectory stays on this
    /// trajectory's map.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::EmptyTrajectory`] if `interruption` has no
    /// waypoints; [`ScheduleError::OutOfOrder`] if the merge would place
    /// two waypoints at the same instant.
    pub fn with_interruption(&self, interruption: &Self, delay: Duration) -> Result<Self> {
        let (int_start, int_finish) = match (interruption.start_time(), interruption.finish_time())
        {
            (Some(start), Some(finish)) => (start, finish),
            _ => return Err(ScheduleError::EmptyTrajectory),
        };

        let push_back = (int_finish - int_start) + delay;
        let mut composed = self.delayed(int_start, push_back)?;
        for waypoint in interruption.iter() {
            composed.insert_waypoint(waypoint.finish_time(), waypoint.pose(), waypoint.profile())?;
        }
        Ok(composed)
    }

    /// Interpolated pose at `time`.
    ///
    /// `None` outside `[start_time, finish_time]` and for an empty
    /// trajectory. A single-waypoint trajectory answers only at its exact
    /// instant.
    #[must_use]
    pub fn pose_at(&self, time: Time) -> Option<Pose2D> {
        let first = self.waypoints.first()?;
        if time < first.finish_time() {
            return None;
        }
        if self.waypoints.len() == 1 {
            return (time == first.finish_time()).then(|| first.pose());
        }
        let segment = self
            .segments()
            .find(|(_, finish)| time <= finish.finish_time())?;
        Motion::between(segment.0, segment.1).pose_at(time)
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
