//! Tool configuration, the project dependency store, and the
//! `package.json` merge engine.

pub mod config;
mod config_merge;
pub mod dependencies;
pub mod package_merge;
pub mod paths;

pub use config::{CuekitConfig, EvaluatorConfig, PackageConfig};
pub use dependencies::{
    DEPENDENCIES_FILE, DEPENDENCIES_SCHEMA, dependencies_path, load_dependencies,
    save_dependencies,
};
pub use package_merge::{PACKAGE_SCHEMA, merge_package_json};
