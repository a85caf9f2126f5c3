use std::io::Read;
use std::path::Path;

use crate::file_tree::RelativePath;
use crate::snapshot::SnapshotError;

/// What a traversal source reports about one visited directory or file.
pub trait FileVisitDetails {
    /// Location of the entry on disk (or its synthetic equivalent).
    fn file(&self) -> &Path;

    /// Segments relative to the root of the traversed tree.
    fn relative_path(&self) -> &RelativePath;

    fn name(&self) -> String {
        match self.relative_path().name() {
            Some(name) => name.to_string(),
            None => self
                .file()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Last modification time in milliseconds since the unix epoch.
    fn last_modified(&self) -> Result<u64, SnapshotError>;

    /// Opens the entry's byte content.
    fn open(&self) -> Result<Box<dyn Read + '_>, SnapshotError>;
}

/// Push-style callbacks driven by a [`FileTree`].
///
/// Returning an error aborts the traversal; the source hands it back unchanged.
pub trait FileVisitor {
    fn visit_dir(&mut self, details: &dyn FileVisitDetails) -> Result<(), SnapshotError>;

    fn visit_file(&mut self, details: &dyn FileVisitDetails) -> Result<(), SnapshotError>;
}

/// A traversal source: calls the visitor once for every directory and regular
/// file below its root, in an order of its own choosing.
pub trait FileTree {
    fn visit(&self, visitor: &mut dyn FileVisitor) -> Result<(), SnapshotError>;
}
