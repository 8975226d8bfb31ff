//! Planar regions and time windows for conflict queries.

use fleetsched_types::{MapId, Time};

// ---------------------------------------------------------------------------
// BoundingBox
// ---------------------------------------------------------------------------

/// A planar axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The smallest box containing both `(x0, y0)` and `(x1, y1)`.
    #[must_use]
    pub fn spanning(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    #[must_use]
    pub const fn contains_point(self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Test whether this bounding box overlaps `other`.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Compute the union bounding box of `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grow the box by `margin` on every side.
    #[must_use]
    pub fn inflate(self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
}

// ---------------------------------------------------------------------------
// Region / Timespan / SpacetimeRegion
// ---------------------------------------------------------------------------

/// A planar region on a specific map.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub map: MapId,
    pub bounds: BoundingBox,
}

impl Region {
    #[must_use]
    pub const fn new(map: MapId, bounds: BoundingBox) -> Self {
        Self { map, bounds }
    }
}

/// A time window; an unbounded side matches everything on that side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Timespan {
    pub lower: Option<Time>,
    pub upper: Option<Time>,
}

impl Timespan {
    /// The window matching all of time.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// `[lower, upper]`, both inclusive.
    #[must_use]
    pub const fn between(lower: Time, upper: Time) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// `[lower, +inf)`.
    #[must_use]
    pub const fn starting_at(lower: Time) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    /// `(-inf, upper]`.
    #[must_use]
    pub const fn until(upper: Time) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    /// Whether the closed interval `[start, finish]` intersects this window.
    #[must_use]
    pub fn overlaps(&self, start: Time, finish: Time) -> bool {
        if let Some(upper) = self.upper {
            if upper < start {
                return false;
            }
        }
        if let Some(lower) = self.lower {
            if finish < lower {
                return false;
            }
        }
        true
    }
}

/// A planar region on a map, bounded to an optional time window.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpacetimeRegion {
    pub region: Region,
    pub timespan: Timespan,
}

impl SpacetimeRegion {
    #[must_use]
    pub const fn new(region: Region, timespan: Timespan) -> Self {
        Self { region, timespan }
    }

    /// A region with no time bound.
    #[must_use]
    pub const fn eternal(region: Region) -> Self {
        Self {
            region,
            timespan: Timespan::all(),
        }
    }
}
