use std::fmt;
use std::path::{Component, Path};

use derive_more::From;

/// Path of a tree entry relative to the tree root, as a sequence of names.
///
/// Segments are stored verbatim. The empty sequence denotes the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, From)]
pub struct RelativePath {
    segments: Vec<String>,
}

impl RelativePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a relative filesystem path into its normal components.
    ///
    /// `.` components are dropped by [`Path::components`]; nothing else is rewritten.
    pub fn from_path(path: &Path) -> Self {
        Self {
            segments: path
                .components()
                .filter_map(|component| match component {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    Component::ParentDir => Some("..".to_string()),
                    _ => None,
                })
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl From<&[&str]> for RelativePath {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments.iter().copied())
    }
}
