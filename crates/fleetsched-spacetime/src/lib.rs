//! Spacetime regions and the conservative conflict predicate.
//!
//! This crate is the database's sole source of geometric truth: the entry
//! store never inspects trajectory geometry directly, it only asks these
//! predicates. The predicates are **conservative**: they may report a
//! conflict for a tight miss, but they never miss a real overlap, so
//! downstream planners can treat positives as authoritative.

mod predicate;
mod region;

pub use predicate::{detect_conflicts, detect_trajectory_conflict};
pub use region::{BoundingBox, Region, SpacetimeRegion, Timespan};
