//! External authority snapshots.

mod adapter;
mod record;
pub mod snapshot;

pub use adapter::{SourceAdapter, StaticAdapter};
pub use record::{SnapshotMetadata, SourceIndex, SourceRecord};
pub use snapshot::{parse_snapshot, SnapshotAdapter};
