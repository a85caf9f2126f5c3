//! Traversal sources and the push-visitor protocol used to snapshot trees.

mod directory_tree;
mod memory_tree;
mod relative_path;
mod visitor;

pub use directory_tree::{DirectoryEntryDetails, DirectoryFileTree};
pub use memory_tree::MemoryFileTree;
pub use relative_path::RelativePath;
pub use visitor::{FileTree, FileVisitDetails, FileVisitor};
