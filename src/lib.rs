//! Snapshots of heterogeneous file collections for change detection.
//!
//! A [`FileCollection`] mixes explicit file lists, pattern-filtered directory
//! trees and traversal-only trees. [`FileCollectionSnapshotter::snapshot`]
//! turns it into an ordered list of immutable [`FileSystemSnapshot`] roots
//! carrying interned absolute paths, content hashes and timestamps.
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use filesnap::{
//!     DefaultFileCollectionSnapshotter, DefaultFileSystemSnapshotter, DefaultStringInterner,
//!     FileCollection, FileCollectionSnapshotter, FileHasher, MetroFileHasher, StringInterner,
//! };
//!
//! let hasher: Arc<dyn FileHasher> = Arc::new(MetroFileHasher::new());
//! let interner: Arc<dyn StringInterner> = Arc::new(DefaultStringInterner::new());
//! let file_system = Arc::new(DefaultFileSystemSnapshotter::new(hasher.clone(), interner.clone()));
//! let snapshotter = DefaultFileCollectionSnapshotter::new(hasher, interner, file_system);
//!
//! let inputs = FileCollection::read(Path::new("inputs.yaml"), Path::new("."))?;
//! let roots = snapshotter.snapshot(&inputs)?;
//! println!("{} snapshot roots", roots.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![allow(clippy::enum_variant_names)]

pub mod collection;
pub mod file_tree;
pub mod hash;
pub mod interner;
pub mod logging;
pub mod patterns;
pub mod snapshot;
pub mod snapshotter;

mod ext;

pub use collection::{CollectionConfigError, FileCollection, LeafCollection};
pub use file_tree::{
    DirectoryEntryDetails, DirectoryFileTree, FileTree, FileVisitDetails, FileVisitor,
    MemoryFileTree, RelativePath,
};
pub use hash::{FileHasher, HashCode, MetroFileHasher};
pub use interner::{DefaultStringInterner, StringInterner};
pub use patterns::{PatternSet, PatternSetError};
pub use snapshot::{
    DirectorySnapshot, FileSystemSnapshot, FileSystemSnapshotBuilder, MissingFileSnapshot,
    RegularFileSnapshot, SnapshotBuilderError, SnapshotError,
};
pub use snapshotter::{
    DefaultFileCollectionSnapshotter, DefaultFileSystemSnapshotter, FileCollectionSnapshotter,
    FileSystemSnapshotter,
};
