//! Database version and profile identifiers.

use std::fmt;
use std::num::NonZeroU64;

/// Monotonically increasing schedule version.
///
/// Domain: `1..=u64::MAX`. The database assigns one `Version` per change,
/// strictly increasing database-wide; a lineage is identified by the
/// version of its root insertion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct Version(NonZeroU64);

impl Version {
    /// The first version the database ever assigns.
    pub const FIRST: Self = match Self::new(1) {
        Some(v) => v,
        None => unreachable!(),
    };

    /// Construct a `Version` if `raw` is in-domain (nonzero).
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(nz) => Some(Self(nz)),
            None => None,
        }
    }

    /// Get the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Return the next version if it stays in-domain.
    #[inline]
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        Self::new(self.get().wrapping_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v#{}", self.get())
    }
}

impl TryFrom<u64> for Version {
    type Error = InvalidVersion;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidVersion { raw: value })
    }
}

/// Error returned when attempting to construct an out-of-domain [`Version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidVersion {
    raw: u64,
}

impl fmt::Display for InvalidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid Version {} (must be nonzero)", self.raw)
    }
}

impl std::error::Error for InvalidVersion {}

/// Opaque reference to an agent's footprint and kinematic class.
///
/// The registry that resolves profiles lives in the enclosing service;
/// the schedule database only carries the reference through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct ProfileRef(u32);

impl ProfileRef {
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProfileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile#{}", self.get())
    }
}
