use std::path::{Path, PathBuf};

use cuekit_core::fs::{FileSystem, read_json};
use cuekit_core::FeaturesManifest;
use cuekit_process::Evaluator;

/// Name of the feature manifest inside the package root.
pub(crate) const FEATURES_FILE: &str = "features.json";

/// Capabilities and locations a command runs against.
pub(crate) struct CommandContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub evaluator: &'a dyn Evaluator,
    pub project_root: PathBuf,
    pub package_root: PathBuf,
}

impl CommandContext<'_> {
    pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(relative)
    }

    pub fn package_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.package_root.join(relative)
    }

    /// Load `features.json`; `None` if missing or malformed.
    pub fn load_features(&self) -> Option<FeaturesManifest> {
        read_json(self.fs, &self.package_path(FEATURES_FILE))
    }

    pub fn package_root_display(&self) -> String {
        self.package_root.display().to_string()
    }
}
