use std::path::PathBuf;

use snafu::Snafu;

/// Failure reported by a snapshotting collaborator or by the builder.
///
/// Collaborators (hashers, traversal sources, filesystem snapshotters) all
/// report through this type, so callers see their errors exactly as raised.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SnapshotError {
    #[snafu(display("Failed to read metadata of {}", path.display()))]
    MetadataError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read contents of {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to walk the directory tree at {}", root.display()))]
    WalkError {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[snafu(display("Snapshot builder rejected an entry"))]
    BuilderError { source: SnapshotBuilderError },
}

/// Entries that cannot be placed into a snapshot tree.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SnapshotBuilderError {
    #[snafu(display(
        "Cannot add {} because the snapshot root is already the file {}",
        path.display(),
        root.display()
    ))]
    RootIsFile { path: PathBuf, root: PathBuf },
    #[snafu(display("Cannot add {} below '{}', which is a file", path.display(), segment))]
    NotADirectory { path: PathBuf, segment: String },
    #[snafu(display("An entry named '{}' already exists for {}", name, path.display()))]
    DuplicateEntry { path: PathBuf, name: String },
}
