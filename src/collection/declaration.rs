//! File collections declared in YAML.
//!
//! ```yaml
//! inputs:
//!   - files: [Cargo.toml, build.rs]
//!   - tree: src
//!     include: ["**/*.rs"]
//!     exclude: ["generated/**"]
//!   - inputs:
//!       - files: [README.md]
//! ```
//!
//! Relative paths are resolved against the base directory handed to the parser.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::collection::FileCollection;
use crate::patterns::{PatternSet, PatternSetError};

const INPUTS_KEY: &str = "inputs";
const FILES_KEY: &str = "files";
const TREE_KEY: &str = "tree";
const INCLUDE_KEY: &str = "include";
const EXCLUDE_KEY: &str = "exclude";

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

impl FileCollection {
    /// Reads a YAML declaration from `path`, resolving entries against `base_dir`.
    pub fn read(path: &Path, base_dir: &Path) -> Result<Self, CollectionConfigError> {
        debug!("Reading file collection declaration {}", path.display());
        let contents = std::fs::read_to_string(path).context(ReadSnafu {
            file_path: path.to_path_buf(),
        })?;
        Self::from_yaml_str(&contents, base_dir)
    }

    pub fn from_yaml_str(contents: &str, base_dir: &Path) -> Result<Self, CollectionConfigError> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            debug!("Empty file collection declaration");
            return Ok(Self::empty());
        };

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        match top_level.get(&key(INPUTS_KEY)) {
            Some(inputs) => parse_inputs(inputs, base_dir),
            None => {
                debug!("No '{}' section in declaration", INPUTS_KEY);
                Ok(Self::empty())
            }
        }
    }
}

fn parse_inputs(inputs: &Yaml, base_dir: &Path) -> Result<FileCollection, CollectionConfigError> {
    let entries = inputs.as_sequence().context(InputsNotSequenceSnafu)?;
    let collections = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = entry
                .as_mapping()
                .context(InvalidEntrySnafu { index })?;
            parse_entry(index, entry, base_dir)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FileCollection::Composite(collections))
}

fn parse_entry(
    index: usize,
    entry: &LinkedHashMap<Yaml, Yaml>,
    base_dir: &Path,
) -> Result<FileCollection, CollectionConfigError> {
    if let Some(files) = entry.get(&key(FILES_KEY)) {
        let files = string_list(files, FILES_KEY)?
            .into_iter()
            .map(|file| base_dir.join(file))
            .collect();
        return Ok(FileCollection::Files(files));
    }

    if let Some(tree) = entry.get(&key(TREE_KEY)) {
        let root = tree.as_str().context(NotAStringSnafu { key: TREE_KEY })?;
        let includes = optional_string_list(entry, INCLUDE_KEY)?;
        let excludes = optional_string_list(entry, EXCLUDE_KEY)?;
        let patterns = PatternSet::with_patterns(includes, excludes).context(PatternSnafu)?;
        return Ok(FileCollection::tree(base_dir.join(root), patterns));
    }

    if let Some(inputs) = entry.get(&key(INPUTS_KEY)) {
        return parse_inputs(inputs, base_dir);
    }

    InvalidEntrySnafu { index }.fail()
}

fn optional_string_list(
    entry: &LinkedHashMap<Yaml, Yaml>,
    name: &'static str,
) -> Result<Vec<String>, CollectionConfigError> {
    match entry.get(&key(name)) {
        Some(value) => string_list(value, name),
        None => Ok(Vec::new()),
    }
}

/// Accepts a sequence of strings or a single string.
fn string_list(value: &Yaml, name: &'static str) -> Result<Vec<String>, CollectionConfigError> {
    if let Some(single) = value.as_str() {
        return Ok(vec![single.to_string()]);
    }
    value
        .as_sequence()
        .context(NotAStringListSnafu { key: name })?
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .context(NotAStringListSnafu { key: name })
        })
        .collect()
}

#[derive(Debug, Snafu)]
pub enum CollectionConfigError {
    #[snafu(display("Failed to read the declaration file: {}", file_path.display()))]
    ReadError {
        file_path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the declaration file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the declaration should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The '{}' section should be a list", INPUTS_KEY))]
    InputsNotSequence,
    #[snafu(display(
        "Input #{} should be a map with one of '{}', '{}' or '{}'",
        index,
        FILES_KEY,
        TREE_KEY,
        INPUTS_KEY
    ))]
    InvalidEntry { index: usize },
    #[snafu(display("'{}' should be a string", key))]
    NotAString { key: &'static str },
    #[snafu(display("'{}' should be a string or a list of strings", key))]
    NotAStringList { key: &'static str },
    #[snafu(display("Invalid patterns in a tree input"))]
    PatternError { source: PatternSetError },
}
