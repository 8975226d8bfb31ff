//! Randomized operation-stream model for FleetSched property tests.
//!
//! [`ScheduleOp`] is the abstract mutation vocabulary; `apply_ops` drives
//! a [`Database`] through a generated stream, tolerating the recoverable
//! rejections a real client would see (unknown lineage after an erase, a
//! reordering delay) while treating fatal errors as test failures.

use fleetsched_db::Database;
use fleetsched_trajectory::Trajectory;
use fleetsched_types::{Duration, MapId, Pose2D, ProfileRef, Time, Version};
use proptest::prelude::*;

/// One abstract mutation against the schedule.
///
/// Lineage targets are indices into the list of every lineage id the
/// stream has created so far, so generated streams stay meaningful as the
/// schedule evolves.
#[derive(Debug, Clone)]
pub enum ScheduleOp {
    Insert { start_secs: i64, gaps: Vec<i64>, y: f64 },
    Replace { target: usize, start_secs: i64, gaps: Vec<i64>, y: f64 },
    Delay { target: usize, from_secs: i64, delay_secs: i64 },
    Interrupt { target: usize, start_secs: i64, span_secs: i64, delay_secs: i64 },
    Erase { target: usize },
    Cull { cutoff_secs: i64 },
}

fn build_trajectory(start_secs: i64, gaps: &[i64], y: f64) -> Trajectory {
    let mut time = Time::from_secs(start_secs);
    let mut waypoints = vec![(time, Pose2D::new(0.0, y, 0.0), ProfileRef::default())];
    for (index, &gap) in gaps.iter().enumerate() {
        time = time + Duration::from_secs(gap.max(1));
        #[allow(clippy::cast_precision_loss)]
        let x = (index + 1) as f64;
        waypoints.push((time, Pose2D::new(x, y, 0.0), ProfileRef::default()));
    }
    Trajectory::from_waypoints(MapId::from("harness"), waypoints)
        .expect("generated gaps are strictly positive")
}

fn pick(lineages: &[Version], target: usize) -> Option<Version> {
    if lineages.is_empty() {
        None
    } else {
        Some(lineages[target % lineages.len()])
    }
}

/// Drive `db` through `ops`, returning every lineage id ever created.
///
/// Recoverable rejections are expected (streams erase lineages and then
/// target them again); fatal errors panic.
pub fn apply_ops(db: &Database, ops: &[ScheduleOp]) -> Vec<Version> {
    let mut lineages = Vec::new();
    for op in ops {
        let outcome = match op {
            ScheduleOp::Insert {
                start_secs,
                gaps,
                y,
            } => match db.insert(&build_trajectory(*start_secs, gaps, *y)) {
                Ok(id) => {
                    lineages.push(id);
                    Ok(())
                }
                Err(err) => Err(err),
            },
            ScheduleOp::Replace {
                target,
                start_secs,
                gaps,
                y,
            } => match pick(&lineages, *target) {
                Some(id) => db
                    .replace(id, &build_trajectory(*start_secs, gaps, *y))
                    .map(|_| ()),
                None => Ok(()),
            },
            ScheduleOp::Delay {
                target,
                from_secs,
                delay_secs,
            } => match pick(&lineages, *target) {
                Some(id) => db
                    .delay(
                        id,
                        Time::from_secs(*from_secs),
                        Duration::from_secs(*delay_secs),
                    )
                    .map(|_| ()),
                None => Ok(()),
            },
            ScheduleOp::Interrupt {
                target,
                start_secs,
                span_secs,
                delay_secs,
            } => match pick(&lineages, *target) {
                Some(id) => db
                    .interrupt(
                        id,
                        &build_trajectory(*start_secs, &[(*span_secs).max(1)], -1.0),
                        Duration::from_secs(*delay_secs),
                    )
                    .map(|_| ()),
                None => Ok(()),
            },
            ScheduleOp::Erase { target } => match pick(&lineages, *target) {
                Some(id) => db.erase(id).map(|_| ()),
                None => Ok(()),
            },
            ScheduleOp::Cull { cutoff_secs } => {
                db.cull(Time::from_secs(*cutoff_secs)).map(|_| ())
            }
        };
        if let Err(err) = outcome {
            assert!(
                err.is_recoverable(),
                "operation stream hit a fatal error: {err}"
            );
        }
    }
    lineages
}

fn gaps_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1_i64..10, 1..4)
}

/// A single random schedule operation.
pub fn op_strategy() -> impl Strategy<Value = ScheduleOp> {
    prop_oneof![
        3 => (0_i64..60, gaps_strategy(), -5.0_f64..5.0).prop_map(|(start_secs, gaps, y)| {
            ScheduleOp::Insert { start_secs, gaps, y }
        }),
        2 => (any::<usize>(), 0_i64..60, gaps_strategy(), -5.0_f64..5.0).prop_map(
            |(target, start_secs, gaps, y)| ScheduleOp::Replace { target, start_secs, gaps, y }
        ),
        2 => (any::<usize>(), 0_i64..80, -4_i64..10).prop_map(|(target, from_secs, delay_secs)| {
            ScheduleOp::Delay { target, from_secs, delay_secs }
        }),
        1 => (any::<usize>(), 0_i64..60, 1_i64..8, 0_i64..5).prop_map(
            |(target, start_secs, span_secs, delay_secs)| ScheduleOp::Interrupt {
                target,
                start_secs,
                span_secs,
                delay_secs,
            }
        ),
        1 => any::<usize>().prop_map(|target| ScheduleOp::Erase { target }),
        1 => (0_i64..120).prop_map(|cutoff_secs| ScheduleOp::Cull { cutoff_secs }),
    ]
}

/// A random operation stream.
pub fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<ScheduleOp>> {
    prop::collection::vec(op_strategy(), 0..max_len)
}
