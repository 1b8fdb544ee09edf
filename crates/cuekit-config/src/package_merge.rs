//! Merge a freshly evaluated `package.json` fragment into the user's
//! existing file without clobbering their edits.
//!
//! Each top-level key follows a fixed policy (see [`MergePolicy`]). Key
//! order of the existing file is preserved, new keys are appended in
//! generated order, and `$schema` is always forced and placed first so
//! that regenerating is byte-stable.

use serde_json::{Map, Value};

/// Schema reference forced into every generated `package.json`.
pub const PACKAGE_SCHEMA: &str = "https://json.schemastore.org/package";

const SCHEMA_KEY: &str = "$schema";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the user's value unless it is missing, `null`, `false`, `0`
    /// or an empty string.
    KeepExisting,
    /// Shallow map merge; user entries win on collision.
    MergeMap,
    /// Generated entries first, then user-only entries, deduplicated.
    UnionList,
    /// Generated value replaces whatever was there.
    Overwrite,
}

pub fn policy_for(key: &str) -> MergePolicy {
    match key {
        "name" | "version" | "description" => MergePolicy::KeepExisting,
        "devDependencies" | "peerDependencies" | "scripts" => MergePolicy::MergeMap,
        "files" => MergePolicy::UnionList,
        _ => MergePolicy::Overwrite,
    }
}

pub fn merge_package_json(
    generated: &Map<String, Value>,
    existing: Option<&Map<String, Value>>,
) -> Map<String, Value> {
    let mut pkg = existing.cloned().unwrap_or_default();

    for (key, value) in generated {
        let current = pkg.get(key);
        let merged = match policy_for(key) {
            MergePolicy::KeepExisting => {
                if !is_blank(current) {
                    continue;
                }
                value.clone()
            }
            MergePolicy::MergeMap => merge_maps(value, current),
            MergePolicy::UnionList => union_lists(value, current),
            MergePolicy::Overwrite => value.clone(),
        };
        pkg.insert(key.clone(), merged);
    }

    let mut ordered = Map::with_capacity(pkg.len() + 1);
    ordered.insert(SCHEMA_KEY.to_string(), Value::String(PACKAGE_SCHEMA.to_string()));
    for (key, value) in pkg {
        if key != SCHEMA_KEY {
            ordered.insert(key, value);
        }
    }
    ordered
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

fn merge_maps(generated: &Value, existing: Option<&Value>) -> Value {
    let mut merged = generated.as_object().cloned().unwrap_or_default();
    if let Some(Value::Object(user)) = existing {
        for (key, value) in user {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

fn union_lists(generated: &Value, existing: Option<&Value>) -> Value {
    match (generated, existing) {
        (Value::Array(gen_items), Some(Value::Array(user_items))) => {
            let mut merged = gen_items.clone();
            for item in user_items {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            Value::Array(merged)
        }
        _ => generated.clone(),
    }
}

#[cfg(test)]
#[path = "package_merge_tests.rs"]
mod tests;
