use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashlink::LinkedHashMap;
use snafu::ensure;
use tracing::{debug, trace};

use crate::ext::AbsolutePathExt;
use crate::file_tree::RelativePath;
use crate::interner::StringInterner;
use crate::snapshot::{
    DirectorySnapshot, DuplicateEntrySnafu, FileSystemSnapshot, NotADirectorySnafu,
    RegularFileSnapshot, RootIsFileSnafu, SnapshotBuilderError,
};

/// Accumulates visited directories and files into one snapshot tree.
///
/// Entries are placed by their relative path segments and may arrive in any
/// order: missing ancestors are created on demand and reused when visited
/// later. The root location is derived from the first entry. [`build`] consumes
/// the builder, so a finished builder can neither be built again nor extended.
///
/// [`build`]: FileSystemSnapshotBuilder::build
pub struct FileSystemSnapshotBuilder<'a> {
    interner: &'a dyn StringInterner,
    root: Option<RootBuilder>,
}

enum RootBuilder {
    File {
        location: PathBuf,
        snapshot: RegularFileSnapshot,
    },
    Directory {
        absolute_path: Arc<str>,
        name: String,
        contents: DirectoryBuilder,
    },
}

#[derive(Default)]
struct DirectoryBuilder {
    children: LinkedHashMap<String, ChildBuilder>,
}

enum ChildBuilder {
    Directory(DirectoryBuilder),
    File(RegularFileSnapshot),
}

impl<'a> FileSystemSnapshotBuilder<'a> {
    pub fn new(interner: &'a dyn StringInterner) -> Self {
        Self {
            interner,
            root: None,
        }
    }

    /// Records the directory `dir`, found at `relative_path` below the root.
    ///
    /// An empty relative path only establishes the root directory.
    pub fn add_dir(
        &mut self,
        dir: &Path,
        relative_path: &RelativePath,
    ) -> Result<(), SnapshotBuilderError> {
        trace!("Adding directory '{}'", relative_path);
        self.root_directory(dir, relative_path)?
            .directory_at(relative_path.segments(), dir)?;
        Ok(())
    }

    /// Records the regular file `file`, found at `relative_path` below the root.
    ///
    /// A file at the empty relative path becomes the whole snapshot.
    pub fn add_file(
        &mut self,
        file: &Path,
        relative_path: &RelativePath,
        snapshot: RegularFileSnapshot,
    ) -> Result<(), SnapshotBuilderError> {
        trace!("Adding file '{}'", relative_path);
        let Some((name, parent_segments)) = relative_path.segments().split_last() else {
            return self.set_root_file(file, snapshot);
        };

        let parent = self
            .root_directory(file, relative_path)?
            .directory_at(parent_segments, file)?;
        ensure!(
            !parent.children.contains_key(name),
            DuplicateEntrySnafu {
                path: file.to_path_buf(),
                name: name.clone(),
            }
        );
        parent
            .children
            .insert(name.clone(), ChildBuilder::File(snapshot));
        Ok(())
    }

    /// Finishes the tree. A builder that saw no entries yields
    /// [`FileSystemSnapshot::Empty`].
    pub fn build(self) -> FileSystemSnapshot {
        let snapshot = match self.root {
            None => FileSystemSnapshot::Empty,
            Some(RootBuilder::File { snapshot, .. }) => FileSystemSnapshot::RegularFile(snapshot),
            Some(RootBuilder::Directory {
                absolute_path,
                name,
                contents,
            }) => FileSystemSnapshot::Directory(contents.build(
                self.interner,
                absolute_path,
                name,
                RelativePath::root(),
            )),
        };
        debug!(
            "Built snapshot rooted at {}",
            snapshot.absolute_path().unwrap_or("<empty>")
        );
        snapshot
    }

    fn set_root_file(
        &mut self,
        file: &Path,
        snapshot: RegularFileSnapshot,
    ) -> Result<(), SnapshotBuilderError> {
        if let Some(root) = &self.root {
            return match root {
                RootBuilder::File { location, .. } => RootIsFileSnafu {
                    path: file.to_path_buf(),
                    root: location.clone(),
                }
                .fail(),
                RootBuilder::Directory { name, .. } => DuplicateEntrySnafu {
                    path: file.to_path_buf(),
                    name: name.clone(),
                }
                .fail(),
            };
        }

        self.root = Some(RootBuilder::File {
            location: file.to_path_buf(),
            snapshot,
        });
        Ok(())
    }

    /// Returns the root directory, creating it from `location` on first use.
    fn root_directory(
        &mut self,
        location: &Path,
        relative_path: &RelativePath,
    ) -> Result<&mut DirectoryBuilder, SnapshotBuilderError> {
        let interner = self.interner;
        let root = self
            .root
            .get_or_insert_with(|| Self::root_directory_for(interner, location, relative_path));

        match root {
            RootBuilder::Directory { contents, .. } => Ok(contents),
            RootBuilder::File { location: root, .. } => RootIsFileSnafu {
                path: location.to_path_buf(),
                root: root.clone(),
            }
            .fail(),
        }
    }

    /// The root is `location` with one trailing component stripped per segment.
    fn root_directory_for(
        interner: &dyn StringInterner,
        location: &Path,
        relative_path: &RelativePath,
    ) -> RootBuilder {
        let root_location = location
            .ancestors()
            .nth(relative_path.len())
            .unwrap_or(location);
        let absolute_path = interner.intern(&root_location.absolute_path_string());
        let name = root_location
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| absolute_path.to_string());
        debug!("Snapshot root directory is {}", absolute_path);
        RootBuilder::Directory {
            absolute_path,
            name,
            contents: DirectoryBuilder::default(),
        }
    }
}

impl DirectoryBuilder {
    /// Walks down `segments`, creating directories that do not exist yet.
    fn directory_at(
        &mut self,
        segments: &[String],
        path: &Path,
    ) -> Result<&mut DirectoryBuilder, SnapshotBuilderError> {
        let mut current = self;
        for segment in segments {
            let child = current
                .children
                .entry(segment.clone())
                .or_insert_with(|| ChildBuilder::Directory(DirectoryBuilder::default()));
            current = match child {
                ChildBuilder::Directory(directory) => directory,
                ChildBuilder::File(_) => {
                    return NotADirectorySnafu {
                        path: path.to_path_buf(),
                        segment: segment.clone(),
                    }
                    .fail();
                }
            };
        }
        Ok(current)
    }

    fn build(
        self,
        interner: &dyn StringInterner,
        absolute_path: Arc<str>,
        name: String,
        relative_path: RelativePath,
    ) -> DirectorySnapshot {
        let children = self
            .children
            .into_iter()
            .map(|(child_name, child)| match child {
                ChildBuilder::File(snapshot) => FileSystemSnapshot::RegularFile(snapshot),
                ChildBuilder::Directory(directory) => {
                    let child_path = Path::new(absolute_path.as_ref()).join(&child_name);
                    let child_path = interner.intern(&child_path.to_string_lossy());
                    let child_relative_path = relative_path.child(child_name.as_str());
                    FileSystemSnapshot::Directory(directory.build(
                        interner,
                        child_path,
                        child_name,
                        child_relative_path,
                    ))
                }
            })
            .collect();

        DirectorySnapshot::new(absolute_path, name, relative_path, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashCode;
    use crate::interner::DefaultStringInterner;

    const ROOT: &str = "/workspace/tree";

    fn rel(segments: &[&str]) -> RelativePath {
        RelativePath::from(segments)
    }

    fn location(segments: &[&str]) -> PathBuf {
        segments
            .iter()
            .fold(PathBuf::from(ROOT), |path, segment| path.join(segment))
    }

    fn file_snapshot(interner: &dyn StringInterner, segments: &[&str]) -> RegularFileSnapshot {
        let path = location(segments);
        RegularFileSnapshot::new(
            interner.intern(&path.to_string_lossy()),
            segments.last().map(|s| s.to_string()).unwrap_or_default(),
            HashCode::from_bytes(path.to_string_lossy().as_bytes()),
            42,
        )
    }

    fn add_file(
        builder: &mut FileSystemSnapshotBuilder<'_>,
        interner: &dyn StringInterner,
        segments: &[&str],
    ) {
        builder
            .add_file(&location(segments), &rel(segments), file_snapshot(interner, segments))
            .expect("Failed to add file");
    }

    #[test]
    fn test_builds_nested_tree() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);

        builder
            .add_dir(&location(&["a"]), &rel(&["a"]))
            .expect("Failed to add dir");
        add_file(&mut builder, &interner, &["a", "b.txt"]);
        builder
            .add_dir(&location(&["a", "c"]), &rel(&["a", "c"]))
            .expect("Failed to add dir");
        add_file(&mut builder, &interner, &["a", "c", "d.txt"]);

        let snapshot = builder.build();
        let root = snapshot.as_directory().expect("Expected a directory root");
        assert_eq!(&*root.absolute_path, ROOT);
        assert_eq!(root.name, "tree");
        assert_eq!(root.children.len(), 1);

        let a = root
            .child("a")
            .and_then(FileSystemSnapshot::as_directory)
            .expect("Expected directory a");
        assert_eq!(a.relative_path, rel(&["a"]));
        assert_eq!(&*a.absolute_path, "/workspace/tree/a");
        let names: Vec<_> = a.children.iter().filter_map(|c| c.name()).collect();
        assert_eq!(names, vec!["b.txt", "c"]);

        let c = a
            .child("c")
            .and_then(FileSystemSnapshot::as_directory)
            .expect("Expected directory c");
        let d = c
            .child("d.txt")
            .and_then(FileSystemSnapshot::as_regular_file)
            .expect("Expected file d.txt");
        assert_eq!(&*d.absolute_path, "/workspace/tree/a/c/d.txt");
        assert_eq!(d.last_modified, 42);
    }

    #[test]
    fn test_files_before_their_directories() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);

        add_file(&mut builder, &interner, &["a", "c", "d.txt"]);
        builder
            .add_dir(&location(&["a", "c"]), &rel(&["a", "c"]))
            .expect("Failed to reuse dir");
        builder
            .add_dir(&location(&["a"]), &rel(&["a"]))
            .expect("Failed to reuse dir");

        let snapshot = builder.build();
        let files: Vec<_> = snapshot
            .regular_files()
            .iter()
            .map(|f| f.absolute_path.to_string())
            .collect();
        assert_eq!(files, vec!["/workspace/tree/a/c/d.txt".to_string()]);
        let root = snapshot.as_directory().expect("Expected a directory root");
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_empty_builder_builds_empty_snapshot() {
        let interner = DefaultStringInterner::new();
        let builder = FileSystemSnapshotBuilder::new(&interner);
        assert_eq!(builder.build(), FileSystemSnapshot::Empty);
    }

    #[test]
    fn test_root_dir_only_builds_empty_directory() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);
        builder
            .add_dir(Path::new(ROOT), &RelativePath::root())
            .expect("Failed to add root");

        let snapshot = builder.build();
        let root = snapshot.as_directory().expect("Expected a directory root");
        assert!(root.children.is_empty());
        assert_eq!(&*root.absolute_path, ROOT);
    }

    #[test]
    fn test_root_file_becomes_the_snapshot() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);
        let snapshot = file_snapshot(&interner, &["only.txt"]);
        builder
            .add_file(&location(&["only.txt"]), &RelativePath::root(), snapshot.clone())
            .expect("Failed to add root file");

        assert_eq!(builder.build(), FileSystemSnapshot::RegularFile(snapshot));
    }

    #[test]
    fn test_entries_after_root_file_are_rejected() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);
        builder
            .add_file(
                &location(&["only.txt"]),
                &RelativePath::root(),
                file_snapshot(&interner, &["only.txt"]),
            )
            .expect("Failed to add root file");

        let result = builder.add_dir(&location(&["a"]), &rel(&["a"]));
        assert!(matches!(result, Err(SnapshotBuilderError::RootIsFile { .. })));

        let result = builder.add_file(
            &location(&["other.txt"]),
            &RelativePath::root(),
            file_snapshot(&interner, &["other.txt"]),
        );
        assert!(matches!(result, Err(SnapshotBuilderError::RootIsFile { .. })));
    }

    #[test]
    fn test_entry_below_file_is_rejected() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);
        add_file(&mut builder, &interner, &["a.txt"]);

        let result = builder.add_dir(&location(&["a.txt", "b"]), &rel(&["a.txt", "b"]));
        match result {
            Err(SnapshotBuilderError::NotADirectory { segment, .. }) => {
                assert_eq!(segment, "a.txt");
            }
            other => panic!("Expected NotADirectory, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_file_is_rejected() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);
        builder
            .add_dir(&location(&["a"]), &rel(&["a"]))
            .expect("Failed to add dir");

        let result = builder.add_file(
            &location(&["a"]),
            &rel(&["a"]),
            file_snapshot(&interner, &["a"]),
        );
        assert!(matches!(
            result,
            Err(SnapshotBuilderError::DuplicateEntry { .. })
        ));
    }

    #[test]
    fn test_segments_are_used_verbatim() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);
        add_file(&mut builder, &interner, &["Dir", "File.TXT"]);
        add_file(&mut builder, &interner, &["dir", "file.txt"]);

        let snapshot = builder.build();
        let root = snapshot.as_directory().expect("Expected a directory root");
        let names: Vec<_> = root.children.iter().filter_map(|c| c.name()).collect();
        assert_eq!(names, vec!["Dir", "dir"]);
    }

    #[test]
    fn test_directory_paths_are_interned() {
        let interner = DefaultStringInterner::new();
        let mut builder = FileSystemSnapshotBuilder::new(&interner);
        builder
            .add_dir(&location(&["a"]), &rel(&["a"]))
            .expect("Failed to add dir");

        let snapshot = builder.build();
        let root = snapshot.as_directory().expect("Expected a directory root");
        let a = root
            .child("a")
            .and_then(FileSystemSnapshot::as_directory)
            .expect("Expected directory a");
        let interned = interner.intern("/workspace/tree/a");
        assert!(Arc::ptr_eq(&a.absolute_path, &interned));
    }
}
