//! Planar poses and map identifiers.

use std::fmt;
use std::sync::Arc;

/// A planar pose: position in meters, yaw in radians.
///
/// Yaw 0 points along +x; counter-clockwise is positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose2D {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }
}

impl fmt::Display for Pose2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}rad)", self.x, self.y, self.yaw)
    }
}

/// Normalize an angle to the half-open interval `(-pi, pi]`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let wrapped = angle - two_pi * (angle / two_pi).round();
    if wrapped <= -std::f64::consts::PI {
        wrapped + two_pi
    } else {
        wrapped
    }
}

/// Opaque identifier of a planar map level.
///
/// Backed by `Arc<str>` so entries, queries, and changes can share the
/// same allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(transparent)]
pub struct MapId(Arc<str>);

impl MapId {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MapId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_identity_in_range() {
        assert!((wrap_angle(1.0) - 1.0).abs() < 1e-12);
        assert!((wrap_angle(-1.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn wrap_angle_folds_full_turns() {
        let two_pi = 2.0 * std::f64::consts::PI;
        assert!((wrap_angle(1.0 + two_pi) - 1.0).abs() < 1e-9);
        assert!((wrap_angle(1.0 - 3.0 * two_pi) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_angle_boundary() {
        // -pi maps to +pi, keeping the interval half-open.
        let wrapped = wrap_angle(-std::f64::consts::PI);
        assert!((wrapped - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn map_id_shares_allocation() {
        let a = MapId::from("warehouse_l1");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "warehouse_l1");
    }
}
