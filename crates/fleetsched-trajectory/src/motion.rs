//! Deterministic inter-waypoint interpolation.

use fleetsched_types::{wrap_angle, Pose2D, Time};

use crate::waypoint::Waypoint;

/// The motion across one segment, between two consecutive waypoints.
///
/// Position follows a cubic Hermite curve with zero boundary velocity
/// (the agent eases out of one waypoint and into the next), which keeps
/// every interpolated position inside the axis-aligned box spanned by the
/// two endpoint poses. Yaw is interpolated linearly along the shortest
/// angular path.
///
/// Evaluation is pure f64 arithmetic on the waypoint data, so two
/// evaluations at the same instant are bitwise-identical on any peer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    start: Waypoint,
    finish: Waypoint,
}

impl Motion {
    /// The motion between `start` and `finish`.
    ///
    /// Callers pass consecutive waypoints of one trajectory, so
    /// `start.finish_time() < finish.finish_time()` holds.
    #[must_use]
    pub const fn between(start: &Waypoint, finish: &Waypoint) -> Self {
        Self {
            start: *start,
            finish: *finish,
        }
    }

    #[inline]
    #[must_use]
    pub const fn start_time(&self) -> Time {
        self.start.finish_time()
    }

    #[inline]
    #[must_use]
    pub const fn finish_time(&self) -> Time {
        self.finish.finish_time()
    }

    /// Interpolated pose at `time`; `None` outside this segment.
    #[must_use]
    pub fn pose_at(&self, time: Time) -> Option<Pose2D> {
        if time < self.start_time() || time > self.finish_time() {
            return None;
        }

        let elapsed = (time - self.start_time()).as_secs_f64();
        let span = (self.finish_time() - self.start_time()).as_secs_f64();
        let s = elapsed / span;
        // Zero-velocity Hermite basis collapses to the smoothstep blend.
        let blend = s * s * (3.0 - 2.0 * s);

        let from = self.start.pose();
        let to = self.finish.pose();
        let yaw_span = wrap_angle(to.yaw - from.yaw);
        Some(Pose2D::new(
            from.x + (to.x - from.x) * blend,
            from.y + (to.y - from.y) * blend,
            wrap_angle(from.yaw + yaw_span * blend),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsched_types::ProfileRef;

    fn waypoint(secs: i64, x: f64, y: f64, yaw: f64) -> Waypoint {
        Waypoint::new(
            Time::from_secs(secs),
            Pose2D::new(x, y, yaw),
            ProfileRef::default(),
        )
    }

    #[test]
    fn endpoints_are_exact() {
        let motion = Motion::between(&waypoint(0, 1.0, 2.0, 0.5), &waypoint(10, 5.0, -2.0, 1.5));
        assert_eq!(
            motion.pose_at(Time::from_secs(0)).unwrap(),
            Pose2D::new(1.0, 2.0, 0.5)
        );
        assert_eq!(
            motion.pose_at(Time::from_secs(10)).unwrap(),
            Pose2D::new(5.0, -2.0, 1.5)
        );
    }

    #[test]
    fn midpoint_is_halfway() {
        let motion = Motion::between(&waypoint(0, 0.0, 0.0, 0.0), &waypoint(10, 8.0, 4.0, 1.0));
        let mid = motion.pose_at(Time::from_secs(5)).unwrap();
        // smoothstep(0.5) = 0.5 exactly.
        assert!((mid.x - 4.0).abs() < 1e-12);
        assert!((mid.y - 2.0).abs() < 1e-12);
        assert!((mid.yaw - 0.5).abs() < 1e-12);
    }

    #[test]
    fn outside_segment_is_none() {
        let motion = Motion::between(&waypoint(0, 0.0, 0.0, 0.0), &waypoint(10, 1.0, 0.0, 0.0));
        assert!(motion.pose_at(Time::from_unix_nanos(-1)).is_none());
        assert!(motion
            .pose_at(Time::from_secs(10) + fleetsched_types::Duration::from_nanos(1))
            .is_none());
    }

    #[test]
    fn evaluation_is_bitwise_deterministic() {
        let motion = Motion::between(
            &waypoint(0, 0.3, 0.7, 0.11),
            &waypoint(7, 12.9, -3.4, 2.71),
        );
        let t = Time::from_unix_nanos(3_333_333_333);
        let a = motion.pose_at(t).unwrap();
        let b = motion.pose_at(t).unwrap();
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.yaw.to_bits(), b.yaw.to_bits());
    }

    #[test]
    fn yaw_takes_shortest_path() {
        // From just below +pi to just above -pi: the short way crosses the
        // wrap boundary rather than sweeping through zero.
        let nearly_pi = std::f64::consts::PI - 0.1;
        let motion = Motion::between(
            &waypoint(0, 0.0, 0.0, nearly_pi),
            &waypoint(10, 0.0, 0.0, -nearly_pi),
        );
        let mid = motion.pose_at(Time::from_secs(5)).unwrap();
        assert!(
            mid.yaw.abs() > 3.0,
            "midpoint yaw {} should sit near the wrap boundary",
            mid.yaw
        );
    }

    #[test]
    fn positions_stay_within_endpoint_box() {
        let motion = Motion::between(&waypoint(0, -1.0, 2.0, 0.0), &waypoint(9, 4.0, -3.0, 0.0));
        for ns in (0..=9_000_000_000_i64).step_by(250_000_000) {
            let p = motion.pose_at(Time::from_unix_nanos(ns)).unwrap();
            assert!((-1.0..=4.0).contains(&p.x));
            assert!((-3.0..=2.0).contains(&p.y));
        }
    }
}
