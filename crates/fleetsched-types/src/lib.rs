//! Cross-cutting types for the FleetSched schedule database.
//!
//! This crate defines the identifier, time, and pose vocabulary shared by
//! every other FleetSched crate: the nanosecond [`Time`]/[`Duration`] pair
//! the schedule timeline is expressed in, the monotonic [`Version`] the
//! database stamps on every change, and the planar [`Pose2D`] agents move
//! through.

mod pose;
mod time;
mod version;

pub use pose::{wrap_angle, MapId, Pose2D};
pub use time::{Duration, Time};
pub use version::{InvalidVersion, ProfileRef, Version};
