//! Schedule timeline types.
//!
//! The schedule database runs on a single global, monotonic timeline with
//! nanosecond resolution. [`Time`] is an instant on that timeline and
//! [`Duration`] is a signed interval between two instants.
//!
//! The timeline is assumed to be post-Unix-epoch; behavior for negative
//! instants is undefined.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// An instant on the schedule timeline, in nanoseconds since the Unix epoch.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(transparent)]
pub struct Time(i64);

impl Time {
    /// The Unix epoch itself, the origin of the schedule timeline.
    pub const EPOCH: Self = Self(0);

    /// Construct from raw nanoseconds since the Unix epoch.
    #[inline]
    #[must_use]
    pub const fn from_unix_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Construct from whole seconds since the Unix epoch.
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * NANOS_PER_SEC)
    }

    /// Raw nanoseconds since the Unix epoch.
    #[inline]
    #[must_use]
    pub const fn unix_nanos(self) -> i64 {
        self.0
    }

    /// Shift this instant by `delta`, saturating at the timeline bounds.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, delta: Duration) -> Self {
        Self(self.0.saturating_add(delta.0))
    }

    /// Shift this instant by `delta`, returning `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, delta: Duration) -> Option<Self> {
        match self.0.checked_add(delta.0) {
            Some(nanos) => Some(Self(nanos)),
            None => None,
        }
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        self.saturating_add(rhs)
    }
}

impl AddAssign<Duration> for Time {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl Sub for Time {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}ns", self.0)
    }
}

const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;

/// A signed interval on the schedule timeline, in nanoseconds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(transparent)]
pub struct Duration(i64);

impl Duration {
    /// The zero-length interval.
    pub const ZERO: Self = Self(0);

    /// Construct from raw nanoseconds.
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Construct from whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis * NANOS_PER_MILLI)
    }

    /// Construct from whole seconds.
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * NANOS_PER_SEC)
    }

    /// Raw nanoseconds.
    #[inline]
    #[must_use]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// This interval as (possibly fractional) seconds.
    #[inline]
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        // i64 -> f64 is lossy above 2^53 ns (~104 days); interpolation
        // intervals are far below that.
        #[allow(clippy::cast_precision_loss)]
        {
            self.0 as f64 / NANOS_PER_SEC as f64
        }
    }

    /// Whether this interval is strictly negative.
    #[inline]
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Whether this interval is strictly positive.
    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Neg for Duration {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_arithmetic() {
        let t = Time::from_secs(10);
        assert_eq!(t + Duration::from_secs(5), Time::from_secs(15));
        assert_eq!(t + Duration::from_secs(-5), Time::from_secs(5));
        assert_eq!(Time::from_secs(15) - t, Duration::from_secs(5));
    }

    #[test]
    fn time_ordering() {
        assert!(Time::EPOCH < Time::from_unix_nanos(1));
        assert!(Time::from_secs(1) < Time::from_secs(2));
    }

    #[test]
    fn saturating_add_clamps() {
        let t = Time::from_unix_nanos(i64::MAX);
        assert_eq!(t + Duration::from_nanos(1), t);
    }

    #[test]
    fn duration_sign_queries() {
        assert!(Duration::from_nanos(-1).is_negative());
        assert!(Duration::from_nanos(1).is_positive());
        assert!(!Duration::ZERO.is_negative());
        assert!(!Duration::ZERO.is_positive());
    }

    #[test]
    fn duration_seconds_conversion() {
        let d = Duration::from_millis(1500);
        assert!((d.as_secs_f64() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Time::from_unix_nanos(42).to_string(), "t42ns");
        assert_eq!(Duration::from_nanos(-7).to_string(), "-7ns");
    }

    #[test]
    fn serde_round_trip() {
        let t = Time::from_secs(3);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "3000000000");
        let back: Time = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
