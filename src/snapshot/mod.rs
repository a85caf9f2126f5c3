//! Snapshot node types and the builder that assembles them from a traversal.

mod builder;
mod error;
#[allow(clippy::module_inception)]
mod snapshot;

pub use builder::FileSystemSnapshotBuilder;
pub(crate) use error::{
    BuilderSnafu, DuplicateEntrySnafu, MetadataSnafu, NotADirectorySnafu, ReadSnafu,
    RootIsFileSnafu, WalkSnafu,
};
pub use error::{SnapshotBuilderError, SnapshotError};
pub use snapshot::{
    DirectorySnapshot, FileSystemSnapshot, MissingFileSnapshot, RegularFileSnapshot,
};
