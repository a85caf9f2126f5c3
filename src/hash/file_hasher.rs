use std::hash::Hasher;
use std::io::{ErrorKind, Read};

use metrohash::MetroHash64;
use snafu::ResultExt;

use crate::file_tree::FileVisitDetails;
use crate::hash::HashCode;
use crate::snapshot::{ReadSnafu, SnapshotError};

const BUFFER_SIZE: usize = 64 * 1024;

/// Produces a stable hash of a file's byte content.
pub trait FileHasher {
    fn hash(&self, file: &dyn FileVisitDetails) -> Result<HashCode, SnapshotError>;
}

/// Streams file content through MetroHash64.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetroFileHasher;

impl MetroFileHasher {
    pub fn new() -> Self {
        Self
    }
}

impl FileHasher for MetroFileHasher {
    fn hash(&self, file: &dyn FileVisitDetails) -> Result<HashCode, SnapshotError> {
        let mut reader = file.open()?;
        let mut hasher = MetroHash64::default();
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(e).context(ReadSnafu {
                        path: file.file().to_path_buf(),
                    });
                }
            };
            hasher.write(&buffer[..bytes_read]);
        }

        Ok(HashCode::from_u64(hasher.finish()))
    }
}
