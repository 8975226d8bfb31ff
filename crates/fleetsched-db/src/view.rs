//! Read-only views of live schedule state.

use fleetsched_trajectory::Trajectory;
use fleetsched_types::Version;

/// One live trajectory as seen through a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewElement {
    /// The lineage id clients mutate through (root insert version).
    pub id: Version,
    /// The version of the live entry backing this element.
    pub version: Version,
    pub trajectory: Trajectory,
}
