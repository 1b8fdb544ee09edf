use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config_merge::{merge_toml_values, warn_unknown_sections};
use crate::paths;

/// Overrides `[evaluator].program`.
pub const ENV_EVALUATOR: &str = "CUEKIT_EVALUATOR";
/// Overrides `[package].root`.
pub const ENV_PACKAGE_ROOT: &str = "CUEKIT_PACKAGE_ROOT";

/// Where the CUE package (features.json, fragments, schemas) is installed,
/// relative to the project root.
pub const DEFAULT_PACKAGE_ROOT: &str = "node_modules/@mark1russell7/cue";

/// Tool configuration, merged from user config, project config and the
/// environment (lowest to highest precedence).
///
/// ```toml
/// [evaluator]
/// program = "cue"
///
/// [package]
/// root = "node_modules/@mark1russell7/cue"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuekitConfig {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub package: PackageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_program() -> String {
    "cue".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Absolute, or relative to the project root. Defaults to
    /// [`DEFAULT_PACKAGE_ROOT`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl CuekitConfig {
    /// Load user and project config files, then apply environment overrides.
    /// Missing files are fine; malformed files are errors.
    pub fn load(project_root: &Path) -> Result<Self> {
        let user_path = paths::user_config_path();
        let project_path = paths::project_config_path(project_root);
        let mut config = Self::load_with_paths(user_path.as_deref(), &project_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load config from explicit paths. Testable without global filesystem state.
    pub(crate) fn load_with_paths(user_path: Option<&Path>, project_path: &Path) -> Result<Self> {
        let mut merged = toml::Value::Table(toml::Table::new());
        let layers = user_path
            .into_iter()
            .chain(std::iter::once(project_path))
            .filter(|p| p.is_file());

        for path in layers {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let value: toml::Value = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            warn_unknown_sections(&value, &path.display().to_string());
            merged = merge_toml_values(merged, value);
        }

        // Roundtrip through string for reliable deserialization
        let merged_str = toml::to_string(&merged).context("Failed to serialize merged config")?;
        toml::from_str(&merged_str).context("Failed to deserialize merged config")
    }

    pub(crate) fn apply_env(&mut self) {
        if let Some(program) = non_empty_env(ENV_EVALUATOR) {
            self.evaluator.program = program;
        }
        if let Some(root) = non_empty_env(ENV_PACKAGE_ROOT) {
            self.package.root = Some(PathBuf::from(root));
        }
    }

    /// Resolve the package root against the project directory.
    pub fn package_root(&self, project_root: &Path) -> PathBuf {
        let root = self
            .package
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PACKAGE_ROOT));
        if root.is_absolute() {
            root
        } else {
            project_root.join(root)
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
