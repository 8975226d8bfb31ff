//! Time-parameterized trajectories.
//!
//! A [`Trajectory`] is an ordered, strictly time-increasing sequence of
//! [`Waypoint`]s on a single map. Between consecutive waypoints the pose
//! is defined by a deterministic interpolation ([`Motion`]): cubic Hermite
//! with zero boundary velocity in position, linear in yaw. Determinism
//! matters because conflict detection must be reproducible across peers:
//! two evaluations of the same instant produce bitwise-identical poses.

mod motion;
mod trajectory;
mod waypoint;

pub use motion::Motion;
pub use trajectory::Trajectory;
pub use waypoint::Waypoint;
