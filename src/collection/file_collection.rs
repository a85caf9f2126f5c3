use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::file_tree::FileTree;
use crate::patterns::PatternSet;

/// A possibly nested set of filesystem inputs.
#[derive(Clone)]
pub enum FileCollection {
    /// Individual files or directories, each snapshotted on its own.
    Files(Vec<PathBuf>),
    /// A directory on disk filtered by a pattern set.
    Tree { root: PathBuf, patterns: PatternSet },
    /// A tree that can only be traversed, such as archive contents.
    Generic(Arc<dyn FileTree>),
    Composite(Vec<FileCollection>),
}

/// One indivisible part of a [`FileCollection`], with its snapshot strategy
/// decided by the variant.
#[derive(Clone, Copy)]
pub enum LeafCollection<'a> {
    Files(&'a [PathBuf]),
    Tree {
        root: &'a Path,
        patterns: &'a PatternSet,
    },
    Generic(&'a dyn FileTree),
}

impl FileCollection {
    pub fn empty() -> Self {
        FileCollection::Composite(Vec::new())
    }

    pub fn files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        FileCollection::Files(files.into_iter().map(Into::into).collect())
    }

    pub fn tree(root: impl Into<PathBuf>, patterns: PatternSet) -> Self {
        FileCollection::Tree {
            root: root.into(),
            patterns,
        }
    }

    pub fn generic(tree: impl FileTree + 'static) -> Self {
        FileCollection::Generic(Arc::new(tree))
    }

    pub fn composite(collections: impl IntoIterator<Item = FileCollection>) -> Self {
        FileCollection::Composite(collections.into_iter().collect())
    }

    /// Leaves in definition order, nested composites flattened depth-first.
    pub fn leaves(&self) -> Vec<LeafCollection<'_>> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<LeafCollection<'a>>) {
        match self {
            FileCollection::Files(files) => leaves.push(LeafCollection::Files(files)),
            FileCollection::Tree { root, patterns } => {
                leaves.push(LeafCollection::Tree { root, patterns })
            }
            FileCollection::Generic(tree) => leaves.push(LeafCollection::Generic(tree.as_ref())),
            FileCollection::Composite(collections) => {
                for collection in collections {
                    collection.collect_leaves(leaves);
                }
            }
        }
    }
}

impl fmt::Debug for FileCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileCollection::Files(files) => f.debug_tuple("Files").field(files).finish(),
            FileCollection::Tree { root, patterns } => f
                .debug_struct("Tree")
                .field("root", root)
                .field("patterns", patterns)
                .finish(),
            FileCollection::Generic(_) => f.debug_tuple("Generic").finish_non_exhaustive(),
            FileCollection::Composite(collections) => {
                f.debug_tuple("Composite").field(collections).finish()
            }
        }
    }
}

impl fmt::Debug for LeafCollection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafCollection::Files(files) => f.debug_tuple("Files").field(files).finish(),
            LeafCollection::Tree { root, patterns } => f
                .debug_struct("Tree")
                .field("root", root)
                .field("patterns", patterns)
                .finish(),
            LeafCollection::Generic(_) => f.debug_tuple("Generic").finish_non_exhaustive(),
        }
    }
}

impl Default for FileCollection {
    fn default() -> Self {
        Self::empty()
    }
}
