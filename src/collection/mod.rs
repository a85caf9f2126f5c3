//! File collections: what gets snapshotted.

mod declaration;
mod file_collection;

pub use declaration::CollectionConfigError;
pub use file_collection::{FileCollection, LeafCollection};
