//! Project feature list persisted in `dependencies.json`.
//!
//! Canonical shape:
//!
//! ```json
//! { "$schema": "./node_modules/@mark1russell7/cue/dependencies/schema.json",
//!   "dependencies": ["ts", "node"] }
//! ```
//!
//! Older projects store a bare `["ts", "node"]` array. Reads accept both;
//! writes always emit the wrapped object.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use cuekit_core::fs::{FileSystem, read_json, write_json};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEPENDENCIES_FILE: &str = "dependencies.json";

/// Schema reference written into every saved `dependencies.json`.
pub const DEPENDENCIES_SCHEMA: &str = "./node_modules/@mark1russell7/cue/dependencies/schema.json";

/// Shape written by [`save_dependencies`].
#[derive(Debug, Serialize)]
struct DependenciesJson<'a> {
    #[serde(rename = "$schema")]
    schema: &'a str,
    dependencies: &'a [String],
}

/// Wrapped shape as read back. Every other key, `$schema` included, is
/// ignored whatever its type.
#[derive(Debug, Deserialize)]
struct WrappedDependencies {
    dependencies: Vec<String>,
}

/// Either on-disk encoding.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredDependencies {
    Wrapped(WrappedDependencies),
    Legacy(Vec<String>),
}

impl StoredDependencies {
    fn into_list(self) -> Vec<String> {
        match self {
            Self::Wrapped(doc) => doc.dependencies,
            Self::Legacy(list) => list,
        }
    }
}

pub fn dependencies_path(project_root: &Path) -> PathBuf {
    project_root.join(DEPENDENCIES_FILE)
}

/// Load the declared feature list.
///
/// Returns `None` when the file is missing, malformed, or has neither
/// accepted shape. Callers treat all of these as "not initialized".
/// Duplicate names collapse to their first occurrence.
pub fn load_dependencies(fs: &dyn FileSystem, project_root: &Path) -> Option<Vec<String>> {
    let path = dependencies_path(project_root);
    let stored: StoredDependencies = read_json(fs, &path)?;
    let list = stored.into_list();

    let mut seen = HashSet::new();
    let deduped: Vec<String> = list
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect();
    debug!("loaded {} feature(s) from {}", deduped.len(), path.display());
    Some(deduped)
}

/// Write the canonical wrapped shape. Returns `false` on any write failure.
pub fn save_dependencies(fs: &dyn FileSystem, deps: &[String], project_root: &Path) -> bool {
    let doc = DependenciesJson {
        schema: DEPENDENCIES_SCHEMA,
        dependencies: deps,
    };
    write_json(fs, &dependencies_path(project_root), &doc)
}

#[cfg(test)]
#[path = "dependencies_tests.rs"]
mod tests;
