use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use snafu::ResultExt;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::ext::SystemTimeExt;
use crate::file_tree::{FileTree, FileVisitDetails, FileVisitor, RelativePath};
use crate::patterns::PatternSet;
use crate::snapshot::{MetadataSnafu, ReadSnafu, SnapshotError, WalkSnafu};

/// A real directory on disk, walked depth-first in file-name order.
///
/// The root itself is never reported; every directory and regular file below
/// it is, unless the pattern set filters it out. Other entry kinds (FIFOs,
/// sockets, devices, unfollowed symlinks) and dangling symlinks are skipped.
/// A missing root visits nothing.
#[derive(Debug, Clone)]
pub struct DirectoryFileTree {
    root: PathBuf,
    patterns: PatternSet,
    follow_links: bool,
}

impl DirectoryFileTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            patterns: PatternSet::new(),
            follow_links: true,
        }
    }

    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative_path_of(&self, path: &Path) -> RelativePath {
        RelativePath::from_path(path.strip_prefix(&self.root).unwrap_or(path))
    }
}

impl FileTree for DirectoryFileTree {
    fn visit(&self, visitor: &mut dyn FileVisitor) -> Result<(), SnapshotError> {
        if !self.root.is_dir() {
            debug!(
                "Directory tree root {} is not a directory, nothing to visit",
                self.root.display()
            );
            return Ok(());
        }
        debug!("Walking directory tree at {}", self.root.display());

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !entry.file_type().is_dir()
                    || self
                        .patterns
                        .is_dir_included(&self.relative_path_of(entry.path()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if is_broken_link(&e) => {
                    debug!(
                        "Skipping broken symlink {}",
                        e.path().unwrap_or(self.root.as_path()).display()
                    );
                    continue;
                }
                Err(e) => {
                    return Err(e).context(WalkSnafu {
                        root: self.root.clone(),
                    });
                }
            };
            let details = DirectoryEntryDetails::new(
                entry.path().to_path_buf(),
                self.relative_path_of(entry.path()),
            );

            let file_type = entry.file_type();
            if file_type.is_dir() {
                trace!("Visiting directory {}", details.relative_path());
                visitor.visit_dir(&details)?;
            } else if !file_type.is_file() {
                trace!(
                    "Skipping {}, neither a regular file nor a directory",
                    details.relative_path()
                );
            } else if self.patterns.is_file_included(details.relative_path()) {
                trace!("Visiting file {}", details.relative_path());
                visitor.visit_file(&details)?;
            }
        }

        Ok(())
    }
}

/// A followed symlink whose target does not exist.
fn is_broken_link(error: &walkdir::Error) -> bool {
    let target_missing = error
        .io_error()
        .is_some_and(|io_error| io_error.kind() == ErrorKind::NotFound);
    let is_symlink = error
        .path()
        .and_then(|path| path.symlink_metadata().ok())
        .is_some_and(|metadata| metadata.file_type().is_symlink());
    target_missing && is_symlink
}

/// Visit details backed by a path on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntryDetails {
    file: PathBuf,
    relative_path: RelativePath,
}

impl DirectoryEntryDetails {
    pub fn new(file: PathBuf, relative_path: RelativePath) -> Self {
        Self {
            file,
            relative_path,
        }
    }

    /// Details for a lone file that is its own root.
    pub fn root_file(file: PathBuf) -> Self {
        Self::new(file, RelativePath::root())
    }
}

impl FileVisitDetails for DirectoryEntryDetails {
    fn file(&self) -> &Path {
        &self.file
    }

    fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    fn last_modified(&self) -> Result<u64, SnapshotError> {
        let modified = self
            .file
            .metadata()
            .and_then(|metadata| metadata.modified())
            .context(MetadataSnafu {
                path: self.file.clone(),
            })?;
        Ok(modified.to_epoch_millis())
    }

    fn open(&self) -> Result<Box<dyn Read + '_>, SnapshotError> {
        let file = File::open(&self.file).context(ReadSnafu {
            path: self.file.clone(),
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}
