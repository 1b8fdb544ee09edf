use cuekit_config::{dependencies_path, load_dependencies};
use cuekit_core::AppError;
use cuekit_core::fs::file_exists;
use cuekit_core::types::ValidateOutput;
use cuekit_process::VetOutcome;
use tracing::{debug, warn};

use crate::context::CommandContext;

/// Schema shipped by the package, relative to its root.
const SCHEMA_FILE: &str = "dependencies/schema.cue";
const SCHEMA_DEFINITION: &str = "#Dependencies";

/// Check `dependencies.json` against the manifest, then against the
/// package's CUE schema when the evaluator is installed.
pub(crate) fn handle_validate(ctx: &CommandContext<'_>) -> ValidateOutput {
    let Some(deps) = load_dependencies(ctx.fs, &ctx.project_root) else {
        return ValidateOutput {
            success: false,
            valid: false,
            features: Vec::new(),
            errors: vec![AppError::DependenciesMissing.to_string()],
            message: None,
        };
    };

    let Some(manifest) = ctx.load_features() else {
        return ValidateOutput {
            success: false,
            valid: false,
            features: deps,
            errors: vec![AppError::ManifestMissing(ctx.package_root_display()).to_string()],
            message: None,
        };
    };

    let invalid = |features: Vec<String>, errors: Vec<String>, message: String| ValidateOutput {
        success: true,
        valid: false,
        features,
        errors,
        message: Some(message),
    };

    let errors: Vec<String> = deps
        .iter()
        .filter(|name| !manifest.has_feature(name))
        .map(|name| format!("Unknown feature: '{name}'"))
        .collect();
    if !errors.is_empty() {
        let message = format!("Validation failed with {} error(s)", errors.len());
        return invalid(deps, errors, message);
    }

    let schema = ctx.package_path(SCHEMA_FILE);
    if !ctx.evaluator.is_available() {
        debug!("evaluator not installed, skipping schema check");
    } else if !file_exists(ctx.fs, &schema) {
        debug!("no schema at {}, skipping schema check", schema.display());
    } else {
        let data = dependencies_path(&ctx.project_root);
        let diagnostic = match ctx.evaluator.vet(&schema, SCHEMA_DEFINITION, &data) {
            Ok(VetOutcome::Passed) => None,
            Ok(VetOutcome::Failed { diagnostic }) => Some(diagnostic),
            Err(err) => {
                warn!("schema check could not run: {err}");
                Some(err.to_string())
            }
        };
        if let Some(diagnostic) = diagnostic {
            return invalid(
                deps,
                vec![format!("CUE schema validation failed: {diagnostic}")],
                "CUE schema validation failed".to_string(),
            );
        }
    }

    ValidateOutput {
        success: true,
        valid: true,
        features: deps,
        errors: Vec::new(),
        message: Some("Validation passed".to_string()),
    }
}
