use std::path::Path;
use std::sync::Arc;

use snafu::ResultExt;
use tracing::{debug, trace};

use crate::collection::{FileCollection, LeafCollection};
use crate::ext::AbsolutePathExt;
use crate::file_tree::{FileTree, FileVisitDetails, FileVisitor, RelativePath};
use crate::hash::FileHasher;
use crate::interner::StringInterner;
use crate::snapshot::{
    BuilderSnafu, FileSystemSnapshot, FileSystemSnapshotBuilder, RegularFileSnapshot,
    SnapshotError,
};
use crate::snapshotter::FileSystemSnapshotter;

/// Turns a file collection into one snapshot root per leaf unit.
pub trait FileCollectionSnapshotter {
    /// Roots in leaf order; a plain file list contributes one root per member.
    ///
    /// Any collaborator error aborts the whole call.
    fn snapshot(
        &self,
        collection: &FileCollection,
    ) -> Result<Vec<FileSystemSnapshot>, SnapshotError>;
}

pub struct DefaultFileCollectionSnapshotter {
    hasher: Arc<dyn FileHasher>,
    interner: Arc<dyn StringInterner>,
    file_system_snapshotter: Arc<dyn FileSystemSnapshotter>,
}

impl DefaultFileCollectionSnapshotter {
    pub fn new(
        hasher: Arc<dyn FileHasher>,
        interner: Arc<dyn StringInterner>,
        file_system_snapshotter: Arc<dyn FileSystemSnapshotter>,
    ) -> Self {
        Self {
            hasher,
            interner,
            file_system_snapshotter,
        }
    }

    fn snapshot_leaf(
        &self,
        leaf: LeafCollection<'_>,
        roots: &mut Vec<FileSystemSnapshot>,
    ) -> Result<(), SnapshotError> {
        match leaf {
            LeafCollection::Files(files) => {
                trace!("Snapshotting {} individual files", files.len());
                for file in files {
                    roots.push(self.file_system_snapshotter.snapshot(file)?);
                }
            }
            LeafCollection::Tree { root, patterns } => {
                trace!("Snapshotting directory tree {}", root.display());
                roots.push(
                    self.file_system_snapshotter
                        .snapshot_directory_tree(root, patterns)?,
                );
            }
            LeafCollection::Generic(tree) => {
                trace!("Snapshotting generic file tree");
                roots.push(snapshot_file_tree(
                    tree,
                    None,
                    self.hasher.as_ref(),
                    self.interner.as_ref(),
                )?);
            }
        }
        Ok(())
    }
}

impl FileCollectionSnapshotter for DefaultFileCollectionSnapshotter {
    fn snapshot(
        &self,
        collection: &FileCollection,
    ) -> Result<Vec<FileSystemSnapshot>, SnapshotError> {
        let leaves = collection.leaves();
        debug!("Snapshotting file collection with {} leaves", leaves.len());

        let mut roots = Vec::new();
        for leaf in leaves {
            self.snapshot_leaf(leaf, &mut roots)?;
        }

        debug!("Produced {} snapshot roots", roots.len());
        Ok(roots)
    }
}

/// Drives `tree` into a fresh builder and returns the finished snapshot.
///
/// With `root` set, that directory is recorded before traversal starts, so a
/// tree without entries still yields an empty directory rather than
/// [`FileSystemSnapshot::Empty`].
pub(crate) fn snapshot_file_tree(
    tree: &dyn FileTree,
    root: Option<&Path>,
    hasher: &dyn FileHasher,
    interner: &dyn StringInterner,
) -> Result<FileSystemSnapshot, SnapshotError> {
    let mut visitor = SnapshottingVisitor {
        builder: FileSystemSnapshotBuilder::new(interner),
        hasher,
        interner,
    };
    if let Some(root) = root {
        visitor
            .builder
            .add_dir(root, &RelativePath::root())
            .context(BuilderSnafu)?;
    }
    tree.visit(&mut visitor)?;
    Ok(visitor.builder.build())
}

struct SnapshottingVisitor<'a> {
    builder: FileSystemSnapshotBuilder<'a>,
    hasher: &'a dyn FileHasher,
    interner: &'a dyn StringInterner,
}

impl SnapshottingVisitor<'_> {
    fn regular_file_snapshot(
        &self,
        details: &dyn FileVisitDetails,
    ) -> Result<RegularFileSnapshot, SnapshotError> {
        Ok(RegularFileSnapshot::new(
            self.interner
                .intern(&details.file().absolute_path_string()),
            details.name(),
            self.hasher.hash(details)?,
            details.last_modified()?,
        ))
    }
}

impl FileVisitor for SnapshottingVisitor<'_> {
    fn visit_dir(&mut self, details: &dyn FileVisitDetails) -> Result<(), SnapshotError> {
        self.builder
            .add_dir(details.file(), details.relative_path())
            .context(BuilderSnafu)
    }

    fn visit_file(&mut self, details: &dyn FileVisitDetails) -> Result<(), SnapshotError> {
        let snapshot = self.regular_file_snapshot(details)?;
        self.builder
            .add_file(details.file(), details.relative_path(), snapshot)
            .context(BuilderSnafu)
    }
}
