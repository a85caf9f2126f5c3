use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::file_tree::{FileTree, FileVisitDetails, FileVisitor, RelativePath};
use crate::snapshot::SnapshotError;

/// A synthetic tree whose entries are declared up front and visited in
/// declaration order.
///
/// Stands in for sources that have no directory on disk, such as archive
/// contents or generated resources.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileTree {
    root: PathBuf,
    entries: Vec<MemoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MemoryEntry {
    Directory(RelativePath),
    File {
        relative_path: RelativePath,
        content: Vec<u8>,
        last_modified: u64,
    },
}

impl MemoryFileTree {
    /// `root` is the location the entries are reported relative to.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_dir(mut self, relative_path: impl Into<RelativePath>) -> Self {
        self.entries.push(MemoryEntry::Directory(relative_path.into()));
        self
    }

    pub fn with_file(
        mut self,
        relative_path: impl Into<RelativePath>,
        content: impl Into<Vec<u8>>,
        last_modified: u64,
    ) -> Self {
        self.entries.push(MemoryEntry::File {
            relative_path: relative_path.into(),
            content: content.into(),
            last_modified,
        });
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn location_of(&self, relative_path: &RelativePath) -> PathBuf {
        relative_path
            .segments()
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl FileTree for MemoryFileTree {
    fn visit(&self, visitor: &mut dyn FileVisitor) -> Result<(), SnapshotError> {
        for entry in &self.entries {
            match entry {
                MemoryEntry::Directory(relative_path) => {
                    let details = MemoryEntryDetails {
                        file: self.location_of(relative_path),
                        relative_path,
                        content: &[],
                        last_modified: 0,
                    };
                    visitor.visit_dir(&details)?;
                }
                MemoryEntry::File {
                    relative_path,
                    content,
                    last_modified,
                } => {
                    let details = MemoryEntryDetails {
                        file: self.location_of(relative_path),
                        relative_path,
                        content,
                        last_modified: *last_modified,
                    };
                    visitor.visit_file(&details)?;
                }
            }
        }
        Ok(())
    }
}

struct MemoryEntryDetails<'a> {
    file: PathBuf,
    relative_path: &'a RelativePath,
    content: &'a [u8],
    last_modified: u64,
}

impl FileVisitDetails for MemoryEntryDetails<'_> {
    fn file(&self) -> &Path {
        &self.file
    }

    fn relative_path(&self) -> &RelativePath {
        self.relative_path
    }

    fn last_modified(&self) -> Result<u64, SnapshotError> {
        Ok(self.last_modified)
    }

    fn open(&self) -> Result<Box<dyn Read + '_>, SnapshotError> {
        Ok(Box::new(Cursor::new(self.content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ContentVisitor {
        seen: Vec<(PathBuf, String, u64)>,
    }

    impl FileVisitor for ContentVisitor {
        fn visit_dir(&mut self, details: &dyn FileVisitDetails) -> Result<(), SnapshotError> {
            self.seen.push((details.file().to_path_buf(), String::new(), 0));
            Ok(())
        }

        fn visit_file(&mut self, details: &dyn FileVisitDetails) -> Result<(), SnapshotError> {
            let mut content = String::new();
            details
                .open()?
                .read_to_string(&mut content)
                .expect("Failed to read memory content");
            self.seen.push((
                details.file().to_path_buf(),
                content,
                details.last_modified()?,
            ));
            Ok(())
        }
    }

    #[test]
    fn test_visits_in_declaration_order() {
        let tree = MemoryFileTree::new("/virtual")
            .with_file(["z.txt"].as_slice(), "z", 3)
            .with_dir(["a"].as_slice())
            .with_file(["a", "b.txt"].as_slice(), "b", 7);
        let mut visitor = ContentVisitor::default();

        tree.visit(&mut visitor).expect("Failed to visit tree");

        assert_eq!(
            visitor.seen,
            vec![
                (PathBuf::from("/virtual/z.txt"), "z".to_string(), 3),
                (PathBuf::from("/virtual/a"), String::new(), 0),
                (PathBuf::from("/virtual/a/b.txt"), "b".to_string(), 7),
            ]
        );
    }

    #[test]
    fn test_empty_tree_visits_nothing() {
        let mut visitor = ContentVisitor::default();
        MemoryFileTree::new("/virtual")
            .visit(&mut visitor)
            .expect("Failed to visit tree");
        assert!(visitor.seen.is_empty());
    }
}
