//! Shared types for cuekit: error taxonomy, command outputs, the feature
//! graph, and the file-system capability.

pub mod error;
pub mod features;
pub mod fs;
pub mod types;

pub use error::AppError;
pub use features::{Feature, FeaturesManifest, resolve_features};
pub use fs::{FileSystem, StdFs};
