use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use snafu::ResultExt;
use tracing::debug;

use crate::ext::AbsolutePathExt;
use crate::file_tree::{DirectoryEntryDetails, DirectoryFileTree, FileVisitDetails, RelativePath};
use crate::hash::FileHasher;
use crate::interner::StringInterner;
use crate::patterns::PatternSet;
use crate::snapshot::{
    FileSystemSnapshot, MetadataSnafu, MissingFileSnapshot, RegularFileSnapshot, SnapshotError,
};
use crate::snapshotter::snapshot_file_tree;

/// Snapshots single filesystem locations and filtered directory trees.
pub trait FileSystemSnapshotter {
    /// Snapshot of a file, a whole directory, or a missing location.
    fn snapshot(&self, path: &Path) -> Result<FileSystemSnapshot, SnapshotError>;

    fn snapshot_directory_tree(
        &self,
        root: &Path,
        patterns: &PatternSet,
    ) -> Result<FileSystemSnapshot, SnapshotError>;
}

/// Reads the local filesystem directly on every call.
#[derive(Clone)]
pub struct DefaultFileSystemSnapshotter {
    hasher: Arc<dyn FileHasher>,
    interner: Arc<dyn StringInterner>,
}

enum EntryKind {
    Missing,
    File,
    Directory,
    /// FIFOs, sockets and devices: present, but without content to hash.
    Special,
}

impl DefaultFileSystemSnapshotter {
    pub fn new(hasher: Arc<dyn FileHasher>, interner: Arc<dyn StringInterner>) -> Self {
        Self { hasher, interner }
    }

    fn entry_kind(path: &Path) -> Result<EntryKind, SnapshotError> {
        match path.metadata() {
            Ok(metadata) if metadata.is_dir() => Ok(EntryKind::Directory),
            Ok(metadata) if metadata.is_file() => Ok(EntryKind::File),
            Ok(_) => Ok(EntryKind::Special),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(EntryKind::Missing),
            Err(e) => Err(e).context(MetadataSnafu {
                path: path.to_path_buf(),
            }),
        }
    }

    fn missing(&self, path: &Path) -> FileSystemSnapshot {
        debug!("{} does not exist, recording it as missing", path.display());
        self.missing_snapshot(path)
    }

    fn special(&self, path: &Path) -> FileSystemSnapshot {
        debug!(
            "{} is neither a regular file nor a directory, recording it as missing",
            path.display()
        );
        self.missing_snapshot(path)
    }

    fn missing_snapshot(&self, path: &Path) -> FileSystemSnapshot {
        FileSystemSnapshot::Missing(MissingFileSnapshot {
            absolute_path: self.interner.intern(&path.absolute_path_string()),
            name: file_name(path),
        })
    }

    fn regular_file(&self, path: &Path) -> Result<FileSystemSnapshot, SnapshotError> {
        let details = DirectoryEntryDetails::root_file(path.to_path_buf());
        Ok(FileSystemSnapshot::RegularFile(RegularFileSnapshot::new(
            self.interner.intern(&path.absolute_path_string()),
            file_name(path),
            self.hasher.hash(&details)?,
            details.last_modified()?,
        )))
    }

    fn directory(
        &self,
        root: &Path,
        patterns: &PatternSet,
    ) -> Result<FileSystemSnapshot, SnapshotError> {
        let tree = DirectoryFileTree::new(root).with_patterns(patterns.clone());
        snapshot_file_tree(
            &tree,
            Some(tree.root()),
            self.hasher.as_ref(),
            self.interner.as_ref(),
        )
    }
}

impl FileSystemSnapshotter for DefaultFileSystemSnapshotter {
    fn snapshot(&self, path: &Path) -> Result<FileSystemSnapshot, SnapshotError> {
        match Self::entry_kind(path)? {
            EntryKind::Missing => Ok(self.missing(path)),
            EntryKind::Special => Ok(self.special(path)),
            EntryKind::File => self.regular_file(path),
            EntryKind::Directory => self.directory(path, &PatternSet::new()),
        }
    }

    fn snapshot_directory_tree(
        &self,
        root: &Path,
        patterns: &PatternSet,
    ) -> Result<FileSystemSnapshot, SnapshotError> {
        match Self::entry_kind(root)? {
            EntryKind::Missing => Ok(self.missing(root)),
            EntryKind::Special => Ok(self.special(root)),
            EntryKind::File => {
                let relative_path = RelativePath::from_segments([file_name(root)]);
                if patterns.is_file_included(&relative_path) {
                    self.regular_file(root)
                } else {
                    Ok(FileSystemSnapshot::Empty)
                }
            }
            EntryKind::Directory => self.directory(root, patterns),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
