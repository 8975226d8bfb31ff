//! The versioned trajectory schedule database.
//!
//! Agents publish time-parameterized motion plans; the database versions
//! every mutation, answers conservative spatiotemporal conflict queries
//! against the live schedule, and synthesizes minimal [`Patch`]es that
//! bring remote [`Mirror`]s up to date.
//!
//! Layering:
//!
//! - [`EntryStore`]: the pure single-writer arena; entries keyed by
//!   version, lineage succession chains, culling.
//! - [`ChangeRelevanceInspector`]: the patch builder, run by the store's
//!   inspector walk.
//! - [`Database`]: the `RwLock` wrapper giving mutations exclusive
//!   access and readers consistent snapshots.
//! - [`Mirror`]: the consumer-side replica used to apply patches.

mod change;
mod database;
mod entry;
mod inspect;
mod mirror;
mod patch;
mod query;
mod store;
mod view;

pub use change::{Change, ChangeBody, ChangeMode, OwnedChange, TrajectoryRef};
pub use database::Database;
pub use entry::Entry;
pub use inspect::{ChangeRelevanceInspector, Inspector, ViewInspector};
pub use mirror::Mirror;
pub use patch::{OwnedPatch, Patch};
pub use query::{Query, QueryFilter, Relevance};
pub use store::EntryStore;
pub use view::ViewElement;
