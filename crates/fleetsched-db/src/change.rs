//! One recorded mutation of the schedule.
//!
//! A [`Change`] is what the database records per mutation and what a
//! [`Patch`](crate::Patch) carries to a mirror. Its trajectory payload is
//! a [`TrajectoryRef`]: **borrowed** when the change is synthesized
//! against a live database and consumed in-process (no copy of a large
//! trajectory), **owned** when the change crosses a lifetime boundary.
//! `into_owned` materializes a borrowed change; the reverse conversion
//! does not exist, and only the owned form deserializes.

use fleetsched_trajectory::Trajectory;
use fleetsched_types::{Duration, Time, Version};

// ---------------------------------------------------------------------------
// TrajectoryRef
// ---------------------------------------------------------------------------

/// A trajectory payload that is either borrowed from the database's entry
/// storage or owned by the change itself.
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryRef<'a> {
    /// Aliases entry storage; valid while the producing database lives.
    Borrowed(&'a Trajectory),
    /// Lifetime-independent deep copy.
    Owned(Trajectory),
}

impl TrajectoryRef<'_> {
    /// Read access, independent of storage mode.
    #[must_use]
    pub fn get(&self) -> &Trajectory {
        match self {
            Self::Borrowed(trajectory) => trajectory,
            Self::Owned(trajectory) => trajectory,
        }
    }

    /// Whether this payload owns its trajectory.
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Materialize an owned payload.
    #[must_use]
    pub fn own(self) -> TrajectoryRef<'static> {
        match self {
            Self::Borrowed(trajectory) => TrajectoryRef::Owned(trajectory.clone()),
            Self::Owned(trajectory) => TrajectoryRef::Owned(trajectory),
        }
    }
}

impl serde::Serialize for TrajectoryRef<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Change
// ---------------------------------------------------------------------------

/// Discriminator for the six change modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeMode {
    Insert,
    Interrupt,
    Delay,
    Replace,
    Erase,
    Cull,
}

/// The mode-specific payload of a [`Change`].
///
/// Non-insert payloads carry `original`: the predecessor version this
/// change supersedes, which is the version a mirror currently knows the
/// lineage by.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ChangeBody<'a> {
    /// Introduce a new lineage.
    Insert { trajectory: TrajectoryRef<'a> },
    /// Splice an interruption into the original, delaying its remainder.
    Interrupt {
        original: Version,
        interruption: TrajectoryRef<'a>,
        delay: Duration,
    },
    /// Shift the original's waypoints at or after `from` by `delay`.
    Delay {
        original: Version,
        from: Time,
        delay: Duration,
    },
    /// Wholesale substitution of the original's trajectory.
    Replace {
        original: Version,
        trajectory: TrajectoryRef<'a>,
    },
    /// Remove the lineage from live state.
    Erase { original: Version },
    /// Bulk history compaction.
    Cull { versions: Vec<Version> },
}

/// One mutation, stamped with the version the database assigned to it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Change<'a> {
    version: Version,
    #[serde(flatten)]
    body: ChangeBody<'a>,
}

// Deserialization goes through an owned wire shape: the borrowed form
// never crosses a process boundary, so the payload always materializes as
// `TrajectoryRef::Owned`.
impl<'de, 'a> serde::Deserialize<'de> for Change<'a> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(tag = "mode", rename_all = "lowercase")]
        enum WireBody {
            Insert {
                trajectory: Trajectory,
            },
            Interrupt {
                original: Version,
                interruption: Trajectory,
                delay: Duration,
            },
            Delay {
                original: Version,
                from: Time,
                delay: Duration,
            },
            Replace {
                original: Version,
                trajectory: Trajectory,
            },
            Erase {
                original: Version,
            },
            Cull {
                versions: Vec<Version>,
            },
        }

        #[derive(serde::Deserialize)]
        struct WireChange {
            version: Version,
            #[serde(flatten)]
            body: WireBody,
        }

        let wire = WireChange::deserialize(deserializer)?;
        Ok(match wire.body {
            WireBody::Insert { trajectory } => Change::insert(trajectory, wire.version),
            WireBody::Interrupt {
                original,
                interruption,
                delay,
            } => Change::interrupt(original, interruption, delay, wire.version),
            WireBody::Delay {
                original,
                from,
                delay,
            } => Change::delay(original, from, delay, wire.version),
            WireBody::Replace {
                original,
                trajectory,
            } => Change::replace(original, trajectory, wire.version),
            WireBody::Erase { original } => Change::erase(original, wire.version),
            WireBody::Cull { versions } => Change::cull(versions, wire.version),
        })
    }
}

/// A change that owns all of its payload.
pub type OwnedChange = Change<'static>;

impl<'a> Change<'a> {
    /// An insertion carrying an owned trajectory.
    #[must_use]
    pub fn insert(trajectory: Trajectory, version: Version) -> OwnedChange {
        Change {
            version,
            body: ChangeBody::Insert {
                trajectory: TrajectoryRef::Owned(trajectory),
            },
        }
    }

    /// An insertion borrowing a trajectory from entry storage.
    ///
    /// Used when synthesizing a patch for an in-process consumer; the
    /// change is only valid while the database outlives it.
    #[must_use]
    pub fn insert_borrowed(trajectory: &'a Trajectory, version: Version) -> Self {
        Self {
            version,
            body: ChangeBody::Insert {
                trajectory: TrajectoryRef::Borrowed(trajectory),
            },
        }
    }

    #[must_use]
    pub fn interrupt(
        original: Version,
        interruption: Trajectory,
        delay: Duration,
        version: Version,
    ) -> OwnedChange {
        Change {
            version,
            body: ChangeBody::Interrupt {
                original,
                interruption: TrajectoryRef::Owned(interruption),
                delay,
            },
        }
    }

    #[must_use]
    pub fn delay(original: Version, from: Time, delay: Duration, version: Version) -> OwnedChange {
        Change {
            version,
            body: ChangeBody::Delay {
                original,
                from,
                delay,
            },
        }
    }

    #[must_use]
    pub fn replace(original: Version, trajectory: Trajectory, version: Version) -> OwnedChange {
        Change {
            version,
            body: ChangeBody::Replace {
                original,
                trajectory: TrajectoryRef::Owned(trajectory),
            },
        }
    }

    #[must_use]
    pub fn erase(original: Version, version: Version) -> OwnedChange {
        Change {
            version,
            body: ChangeBody::Erase { original },
        }
    }

    #[must_use]
    pub fn cull(versions: Vec<Version>, version: Version) -> OwnedChange {
        Change {
            version,
            body: ChangeBody::Cull { versions },
        }
    }

    /// The version the database assigned to this change.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub const fn mode(&self) -> ChangeMode {
        match &self.body {
            ChangeBody::Insert { .. } => ChangeMode::Insert,
            ChangeBody::Interrupt { .. } => ChangeMode::Interrupt,
            ChangeBody::Delay { .. } => ChangeMode::Delay,
            ChangeBody::Replace { .. } => ChangeMode::Replace,
            ChangeBody::Erase { .. } => ChangeMode::Erase,
            ChangeBody::Cull { .. } => ChangeMode::Cull,
        }
    }

    #[inline]
    #[must_use]
    pub const fn body(&self) -> &ChangeBody<'a> {
        &self.body
    }

    /// The predecessor version this change supersedes; `None` for inserts
    /// and culls.
    #[must_use]
    pub const fn original(&self) -> Option<Version> {
        match &self.body {
            ChangeBody::Interrupt { original, .. }
            | ChangeBody::Delay { original, .. }
            | ChangeBody::Replace { original, .. }
            | ChangeBody::Erase { original } => Some(*original),
            ChangeBody::Insert { .. } | ChangeBody::Cull { .. } => None,
        }
    }

    /// The trajectory payload, if this mode carries one.
    #[must_use]
    pub fn trajectory(&self) -> Option<&Trajectory> {
        match &self.body {
            ChangeBody::Insert { trajectory } | ChangeBody::Replace { trajectory, .. } => {
                Some(trajectory.get())
            }
            ChangeBody::Interrupt { interruption, .. } => Some(interruption.get()),
            ChangeBody::Delay { .. } | ChangeBody::Erase { .. } | ChangeBody::Cull { .. } => None,
        }
    }

    /// Materialize a change that owns all of its payload.
    #[must_use]
    pub fn into_owned(self) -> OwnedChange {
        let body = match self.body {
            ChangeBody::Insert { trajectory } => ChangeBody::Insert {
                trajectory: trajectory.own(),
            },
            ChangeBody::Interrupt {
                original,
                interruption,
                delay,
            } => ChangeBody::Interrupt {
                original,
                interruption: interruption.own(),
                delay,
            },
            ChangeBody::Delay {
                original,
                from,
                delay,
            } => ChangeBody::Delay {
                original,
                from,
                delay,
            },
            ChangeBody::Replace {
                original,
                trajectory,
            } => ChangeBody::Replace {
                original,
                trajectory: trajectory.own(),
            },
            ChangeBody::Erase { original } => ChangeBody::Erase { original },
            ChangeBody::Cull { versions } => ChangeBody::Cull { versions },
        };
        Change {
            version: self.version,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsched_types::{MapId, Pose2D, ProfileRef};

    fn trajectory() -> Trajectory {
        Trajectory::from_waypoints(
            MapId::from("m"),
            [
                (Time::from_secs(0), Pose2D::default(), ProfileRef::default()),
                (
                    Time::from_secs(5),
                    Pose2D::new(1.0, 0.0, 0.0),
                    ProfileRef::default(),
                ),
            ],
        )
        .unwrap()
    }

    fn v(raw: u64) -> Version {
        Version::new(raw).unwrap()
    }

    #[test]
    fn borrowed_insert_materializes() {
        let t = trajectory();
        let change = Change::insert_borrowed(&t, v(3));
        assert_eq!(change.mode(), ChangeMode::Insert);
        assert!(!matches!(
            change.body(),
            ChangeBody::Insert {
                trajectory: TrajectoryRef::Owned(_)
            }
        ));

        let owned = change.into_owned();
        assert!(matches!(
            owned.body(),
            ChangeBody::Insert {
                trajectory: TrajectoryRef::Owned(_)
            }
        ));
        assert_eq!(owned.trajectory(), Some(&t));
        assert_eq!(owned.version(), v(3));
    }

    #[test]
    fn wrong_variant_accessors_are_absent() {
        let change = Change::erase(v(1), v(2));
        assert_eq!(change.trajectory(), None);
        assert_eq!(change.original(), Some(v(1)));

        let change = Change::insert(trajectory(), v(1));
        assert_eq!(change.original(), None);
        assert!(change.trajectory().is_some());

        let change = Change::cull(vec![v(1), v(2)], v(3));
        assert_eq!(change.original(), None);
        assert_eq!(change.trajectory(), None);
    }

    #[test]
    fn wire_shape_is_mode_tagged() {
        let change = Change::delay(v(1), Time::from_secs(4), Duration::from_secs(2), v(2));
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["mode"], "delay");
        assert_eq!(json["version"], 2);
        assert_eq!(json["original"], 1);
        assert_eq!(json["from"], 4_000_000_000_i64);
        assert_eq!(json["delay"], 2_000_000_000_i64);
    }

    #[test]
    fn serde_round_trip_produces_owned_payload() {
        let change = Change::insert(trajectory(), v(7));
        let json = serde_json::to_string(&change).unwrap();
        let back: OwnedChange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, change);
        assert!(matches!(
            back.body(),
            ChangeBody::Insert {
                trajectory: TrajectoryRef::Owned(_)
            }
        ));
    }

    #[test]
    fn mode_discriminators() {
        let t = trajectory();
        assert_eq!(Change::insert(t.clone(), v(1)).mode(), ChangeMode::Insert);
        assert_eq!(
            Change::interrupt(v(1), t.clone(), Duration::ZERO, v(2)).mode(),
            ChangeMode::Interrupt
        );
        assert_eq!(
            Change::delay(v(1), Time::EPOCH, Duration::ZERO, v(2)).mode(),
            ChangeMode::Delay
        );
        assert_eq!(Change::replace(v(1), t, v(2)).mode(), ChangeMode::Replace);
        assert_eq!(Change::erase(v(1), v(2)).mode(), ChangeMode::Erase);
        assert_eq!(Change::cull(vec![v(1)], v(2)).mode(), ChangeMode::Cull);
    }
}
