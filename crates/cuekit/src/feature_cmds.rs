//! `add` / `remove`: edit the declared feature list.

use cuekit_config::{DEPENDENCIES_FILE, load_dependencies, save_dependencies};
use cuekit_core::AppError;
use cuekit_core::types::{AddOutput, RemoveOutput};

use crate::context::CommandContext;

pub(crate) fn handle_add(ctx: &CommandContext<'_>, feature: &str) -> AddOutput {
    let fail = |err: AppError| AddOutput {
        success: false,
        feature: feature.to_string(),
        added: false,
        message: None,
        error: Some(err.to_string()),
    };
    let done = |added: bool, message: String| AddOutput {
        success: true,
        feature: feature.to_string(),
        added,
        message: Some(message),
        error: None,
    };

    let Some(manifest) = ctx.load_features() else {
        return fail(AppError::ManifestMissing(ctx.package_root_display()));
    };
    if !manifest.has_feature(feature) {
        return fail(AppError::UnknownFeature {
            name: feature.to_string(),
            available: manifest.available_features(),
        });
    }

    // Adding works before init: a missing file is an empty list.
    let mut deps = load_dependencies(ctx.fs, &ctx.project_root).unwrap_or_default();
    if deps.iter().any(|d| d == feature) {
        return done(false, format!("Feature '{feature}' is already in dependencies"));
    }

    deps.push(feature.to_string());
    if !save_dependencies(ctx.fs, &deps, &ctx.project_root) {
        return fail(AppError::WriteFailed(DEPENDENCIES_FILE.to_string()));
    }
    done(true, format!("Added '{feature}' to {DEPENDENCIES_FILE}"))
}

pub(crate) fn handle_remove(ctx: &CommandContext<'_>, feature: &str) -> RemoveOutput {
    let fail = |err: AppError| RemoveOutput {
        success: false,
        feature: feature.to_string(),
        removed: false,
        message: None,
        error: Some(err.to_string()),
    };
    let done = |removed: bool, message: String| RemoveOutput {
        success: true,
        feature: feature.to_string(),
        removed,
        message: Some(message),
        error: None,
    };

    let Some(mut deps) = load_dependencies(ctx.fs, &ctx.project_root) else {
        return fail(AppError::DependenciesMissing);
    };

    let Some(idx) = deps.iter().position(|d| d == feature) else {
        return done(false, format!("Feature '{feature}' is not in dependencies"));
    };

    deps.remove(idx);
    if !save_dependencies(ctx.fs, &deps, &ctx.project_root) {
        return fail(AppError::WriteFailed(DEPENDENCIES_FILE.to_string()));
    }
    done(true, format!("Removed '{feature}' from {DEPENDENCIES_FILE}"))
}
