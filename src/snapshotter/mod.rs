//! Snapshotting of file collections and of individual filesystem locations.

mod file_collection_snapshotter;
mod file_system_snapshotter;

pub(crate) use file_collection_snapshotter::snapshot_file_tree;
pub use file_collection_snapshotter::{DefaultFileCollectionSnapshotter, FileCollectionSnapshotter};
pub use file_system_snapshotter::{DefaultFileSystemSnapshotter, FileSystemSnapshotter};
