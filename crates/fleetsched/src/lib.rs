//! Public API facade for FleetSched.
//!
//! FleetSched is a versioned trajectory schedule database for multi-robot
//! traffic management: agents publish time-parameterized motion plans,
//! the [`Database`] versions every mutation, answers conservative
//! spatiotemporal conflict queries, and synthesizes minimal [`Patch`]es
//! that keep remote [`Mirror`]s consistent.

pub use fleetsched_db::{
    Change, ChangeBody, ChangeMode, Database, Entry, EntryStore, Mirror, OwnedChange, OwnedPatch,
    Patch, Query, QueryFilter, Relevance, TrajectoryRef, ViewElement,
};
pub use fleetsched_error::{Result, ScheduleError};
pub use fleetsched_spacetime::{
    detect_conflicts, detect_trajectory_conflict, BoundingBox, Region, SpacetimeRegion, Timespan,
};
pub use fleetsched_trajectory::{Motion, Trajectory, Waypoint};
pub use fleetsched_types::{Duration, MapId, Pose2D, ProfileRef, Time, Version};
