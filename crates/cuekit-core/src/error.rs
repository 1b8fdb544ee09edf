/// Failures a command reports in its `error` field.
///
/// These never propagate out of a command as `Err`; each command renders the
/// `Display` text into its output struct and sets `success: false`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Could not load features.json from {0}")]
    ManifestMissing(String),

    #[error("No dependencies.json found. Run `cuekit init` first.")]
    DependenciesMissing,

    #[error("Unknown feature: {name}. Available: {available}")]
    UnknownFeature { name: String, available: String },

    #[error("Unknown preset: {name}. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("CUE is not installed. Install from: https://cuelang.org/docs/install/")]
    EvaluatorMissing,

    #[error("Failed to write {0}")]
    WriteFailed(String),
}
