use std::sync::Arc;

use crate::file_tree::RelativePath;
use crate::hash::{HashCode, HashCombiner};

/// Immutable snapshot of one filesystem location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSystemSnapshot {
    /// Nothing was visited, e.g. a generic tree without entries.
    Empty,
    Missing(MissingFileSnapshot),
    RegularFile(RegularFileSnapshot),
    Directory(DirectorySnapshot),
}

impl FileSystemSnapshot {
    pub fn is_empty(&self) -> bool {
        matches!(self, FileSystemSnapshot::Empty)
    }

    pub fn absolute_path(&self) -> Option<&str> {
        match self {
            FileSystemSnapshot::Empty => None,
            FileSystemSnapshot::Missing(missing) => Some(missing.absolute_path.as_ref()),
            FileSystemSnapshot::RegularFile(file) => Some(file.absolute_path.as_ref()),
            FileSystemSnapshot::Directory(directory) => Some(directory.absolute_path.as_ref()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FileSystemSnapshot::Empty => None,
            FileSystemSnapshot::Missing(missing) => Some(missing.name.as_str()),
            FileSystemSnapshot::RegularFile(file) => Some(file.name.as_str()),
            FileSystemSnapshot::Directory(directory) => Some(directory.name.as_str()),
        }
    }

    /// Content hash for files, Merkle hash for directories.
    pub fn hash(&self) -> Option<HashCode> {
        match self {
            FileSystemSnapshot::RegularFile(file) => Some(file.hash),
            FileSystemSnapshot::Directory(directory) => Some(directory.hash),
            FileSystemSnapshot::Empty | FileSystemSnapshot::Missing(_) => None,
        }
    }

    pub fn as_regular_file(&self) -> Option<&RegularFileSnapshot> {
        match self {
            FileSystemSnapshot::RegularFile(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectorySnapshot> {
        match self {
            FileSystemSnapshot::Directory(directory) => Some(directory),
            _ => None,
        }
    }

    /// Regular files in this snapshot, depth-first in child order.
    pub fn regular_files(&self) -> Vec<&RegularFileSnapshot> {
        let mut files = Vec::new();
        self.collect_regular_files(&mut files);
        files
    }

    fn collect_regular_files<'a>(&'a self, files: &mut Vec<&'a RegularFileSnapshot>) {
        match self {
            FileSystemSnapshot::RegularFile(file) => files.push(file),
            FileSystemSnapshot::Directory(directory) => {
                for child in &directory.children {
                    child.collect_regular_files(files);
                }
            }
            FileSystemSnapshot::Empty | FileSystemSnapshot::Missing(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularFileSnapshot {
    pub absolute_path: Arc<str>,
    pub name: String,
    pub hash: HashCode,
    /// Milliseconds since the unix epoch.
    pub last_modified: u64,
}

impl RegularFileSnapshot {
    pub fn new(absolute_path: Arc<str>, name: String, hash: HashCode, last_modified: u64) -> Self {
        Self {
            absolute_path,
            name,
            hash,
            last_modified,
        }
    }
}

/// A location that did not exist when it was snapshotted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFileSnapshot {
    pub absolute_path: Arc<str>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub absolute_path: Arc<str>,
    pub name: String,
    /// Segments relative to the root of the tree this directory was built in.
    pub relative_path: RelativePath,
    /// Children in insertion order, never [`FileSystemSnapshot::Empty`].
    pub children: Vec<FileSystemSnapshot>,
    pub hash: HashCode,
}

impl DirectorySnapshot {
    pub fn new(
        absolute_path: Arc<str>,
        name: String,
        relative_path: RelativePath,
        children: Vec<FileSystemSnapshot>,
    ) -> Self {
        let hash = Self::merkle_hash(&children);
        Self {
            absolute_path,
            name,
            relative_path,
            children,
            hash,
        }
    }

    pub fn child(&self, name: &str) -> Option<&FileSystemSnapshot> {
        self.children
            .iter()
            .find(|child| child.name() == Some(name))
    }

    fn merkle_hash(children: &[FileSystemSnapshot]) -> HashCode {
        let mut combiner = HashCombiner::new();
        for child in children {
            if let (Some(name), Some(hash)) = (child.name(), child.hash()) {
                combiner.add_named(name, hash);
            }
        }
        combiner.finish()
    }
}
