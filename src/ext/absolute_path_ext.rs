use std::path::{Path, PathBuf};

/// Makes `path` absolute by joining it onto the current directory.
///
/// Unlike `canonicalize`, this never touches the filesystem beyond reading the
/// current directory: `.`/`..` components and symlinks are kept verbatim, so two
/// spellings of one location stay distinct.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(current_dir) => current_dir.join(path),
        Err(_) => path.to_path_buf(),
    }
}

pub trait AbsolutePathExt {
    fn absolute_path(&self) -> PathBuf;

    /// Lossy string form of [`AbsolutePathExt::absolute_path`], suitable for interning.
    fn absolute_path_string(&self) -> String {
        self.absolute_path().to_string_lossy().into_owned()
    }
}

impl AbsolutePathExt for Path {
    fn absolute_path(&self) -> PathBuf {
        absolute_path(self)
    }
}

impl AbsolutePathExt for PathBuf {
    fn absolute_path(&self) -> PathBuf {
        absolute_path(self)
    }
}
