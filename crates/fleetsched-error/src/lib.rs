//! Primary error type for FleetSched operations.
//!
//! Structured variants for the recoverable failures a scheduling client
//! can hit, plus a fatal variant for internal invariant violations.
//! Recoverable errors never leave the database in a partially mutated
//! state; fatal errors mean the store detected a bug in itself and the
//! enclosing process should stop trusting it.

use fleetsched_types::{Duration, Time, Version};
use thiserror::Error;

/// Primary error type for FleetSched operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The referenced lineage was never assigned or is no longer live.
    #[error("unknown or inactive schedule lineage: {id}")]
    UnknownLineage { id: Version },

    /// Trajectory construction would violate strict waypoint time ordering.
    #[error("waypoint at {time} collides with an existing waypoint time")]
    OutOfOrder { time: Time },

    /// A negative delay would invert waypoint ordering.
    #[error("delay of {delay} starting at {at} would reorder waypoints")]
    WouldReorder { at: Time, delay: Duration },

    /// The operation requires a trajectory with at least one waypoint.
    #[error("trajectory has no waypoints")]
    EmptyTrajectory,

    /// An interruption was requested with a negative resumption delay.
    #[error("interruption delay {delay} is negative")]
    NegativeInterruptionDelay { delay: Duration },

    /// A postcondition of the entry store failed. This indicates a bug in
    /// the database itself; the enclosing process should halt.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl ScheduleError {
    /// Create an internal invariant violation.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalInvariant(msg.into())
    }

    /// Whether the caller can recover by fixing its input and retrying.
    ///
    /// Recoverable errors are guaranteed not to have mutated the database.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Whether this error indicates a bug inside the database.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InternalInvariant(_))
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnknownLineage { .. } => {
                Some("Re-query the live schedule; the lineage may have been erased or culled")
            }
            Self::OutOfOrder { .. } => {
                Some("Waypoint finish times must be strictly increasing within a trajectory")
            }
            Self::WouldReorder { .. } => {
                Some("Shrink the negative delay or delay from an earlier waypoint")
            }
            Self::EmptyTrajectory => Some("Add at least one waypoint before submitting"),
            Self::NegativeInterruptionDelay { .. } => {
                Some("Interruptions may only push the original plan forward in time")
            }
            Self::InternalInvariant(_) => None,
        }
    }
}

/// Result type alias using [`ScheduleError`].
pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScheduleError::UnknownLineage {
            id: Version::new(4).unwrap(),
        };
        assert_eq!(err.to_string(), "unknown or inactive schedule lineage: v#4");

        let err = ScheduleError::OutOfOrder {
            time: Time::from_unix_nanos(12),
        };
        assert_eq!(
            err.to_string(),
            "waypoint at t12ns collides with an existing waypoint time"
        );
    }

    #[test]
    fn recoverability_split() {
        let recoverable = [
            ScheduleError::UnknownLineage {
                id: Version::FIRST,
            },
            ScheduleError::OutOfOrder { time: Time::EPOCH },
            ScheduleError::WouldReorder {
                at: Time::EPOCH,
                delay: Duration::from_secs(-1),
            },
            ScheduleError::EmptyTrajectory,
            ScheduleError::NegativeInterruptionDelay {
                delay: Duration::from_secs(-1),
            },
        ];
        for err in recoverable {
            assert!(err.is_recoverable(), "{err} should be recoverable");
            assert!(!err.is_fatal());
            assert!(err.suggestion().is_some());
        }

        let fatal = ScheduleError::internal("dangling successor link");
        assert!(fatal.is_fatal());
        assert!(!fatal.is_recoverable());
        assert!(fatal.suggestion().is_none());
    }

    #[test]
    fn internal_constructor() {
        let err = ScheduleError::internal("cycle detected");
        assert_eq!(
            err.to_string(),
            "internal invariant violated: cycle detected"
        );
        assert!(matches!(err, ScheduleError::InternalInvariant(msg) if msg == "cycle detected"));
    }
}
