//! A single timed sample within a trajectory.

use fleetsched_types::{Pose2D, ProfileRef, Time};

/// One `(finish_time, pose, profile)` sample within a [`Trajectory`].
///
/// `finish_time` is the instant the agent reaches `pose`; the motion that
/// gets it there is defined by the segment ending at this waypoint.
///
/// [`Trajectory`]: crate::Trajectory
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Waypoint {
    finish_time: Time,
    pose: Pose2D,
    profile: ProfileRef,
}

impl Waypoint {
    #[inline]
    #[must_use]
    pub const fn new(finish_time: Time, pose: Pose2D, profile: ProfileRef) -> Self {
        Self {
            finish_time,
            pose,
            profile,
        }
    }

    /// The instant the agent reaches this waypoint's pose.
    #[inline]
    #[must_use]
    pub const fn finish_time(&self) -> Time {
        self.finish_time
    }

    #[inline]
    #[must_use]
    pub const fn pose(&self) -> Pose2D {
        self.pose
    }

    #[inline]
    #[must_use]
    pub const fn profile(&self) -> ProfileRef {
        self.profile
    }

    pub(crate) fn shift(&mut self, delay: fleetsched_types::Duration) {
        self.finish_time = self.finish_time + delay;
    }
}
