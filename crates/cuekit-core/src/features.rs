//! Feature graph: the reference manifest and transitive resolution.

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

/// Feature whose presence enables `tsconfig.json` generation.
pub const TYPED_FEATURE: &str = "ts";

/// Feature whose presence enables the `cue.mod/` module descriptor.
pub const MODULE_FEATURE: &str = "cue";

/// Base tsconfig selection order. Later entries are more specific and
/// override earlier ones when present.
pub const TSCONFIG_PRIORITY: &[&str] = &["ts", "node", "node-cjs", "vite", "react"];

/// A single feature definition from `features.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Reference data shipped by the CUE package: feature graph plus presets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesManifest {
    #[serde(default)]
    pub features: BTreeMap<String, Feature>,
    #[serde(default)]
    pub presets: BTreeMap<String, Vec<String>>,
}

impl FeaturesManifest {
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn preset(&self, name: &str) -> Option<&[String]> {
        self.presets.get(name).map(Vec::as_slice)
    }

    /// Comma-separated feature names, for "Available: ..." error text.
    pub fn available_features(&self) -> String {
        join_keys(self.features.keys())
    }

    /// Comma-separated preset names, for "Available: ..." error text.
    pub fn available_presets(&self) -> String {
        join_keys(self.presets.keys())
    }
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    keys.map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Compute the transitive closure of `requested` over the manifest.
///
/// Names missing from the manifest are dropped without error and do not
/// expand. Each feature appears once, in order of first resolution; the
/// result is not topologically sorted.
pub fn resolve_features<S: AsRef<str>>(requested: &[S], manifest: &FeaturesManifest) -> Vec<String> {
    let mut resolved = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = requested.iter().map(|s| s.as_ref().to_string()).collect();

    while let Some(feature) = queue.pop_front() {
        if seen.contains(&feature) {
            continue;
        }
        let Some(def) = manifest.features.get(&feature) else {
            continue;
        };

        seen.insert(feature.clone());
        for dep in &def.dependencies {
            if !seen.contains(dep) {
                queue.push_back(dep.clone());
            }
        }
        resolved.push(feature);
    }

    resolved
}

/// Map a feature name to the CUE fragment identifier used for its file.
pub fn fragment_id(feature: &str) -> &str {
    match feature {
        "vite-react" => "viteReact",
        other => other,
    }
}

/// Pick the base tsconfig for a resolved feature set. Walks
/// [`TSCONFIG_PRIORITY`] in order and keeps the last entry present.
pub fn select_tsconfig<S: AsRef<str>>(resolved: &[S]) -> &'static str {
    select_by_priority(TSCONFIG_PRIORITY, resolved).unwrap_or(TYPED_FEATURE)
}

/// Last entry of `priority` contained in `resolved`, if any.
pub fn select_by_priority<S: AsRef<str>>(
    priority: &[&'static str],
    resolved: &[S],
) -> Option<&'static str> {
    let mut selected = None;
    for candidate in priority {
        if resolved.iter().any(|f| f.as_ref() == *candidate) {
            selected = Some(*candidate);
        }
    }
    selected
}

#[cfg(test)]
#[path = "features_tests.rs"]
mod tests;
