//! `generate`: evaluate CUE fragments for the resolved feature set and
//! write the derived config files into the project.

use cuekit_config::{load_dependencies, merge_package_json};
use cuekit_core::AppError;
use cuekit_core::features::{MODULE_FEATURE, TYPED_FEATURE, fragment_id, select_tsconfig};
use cuekit_core::fs::{file_exists, mkdir, read_json, write_file, write_json};
use cuekit_core::resolve_features;
use cuekit_core::types::{GenerateOutput, SkippedArtifact};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::context::CommandContext;

const PACKAGE_FILE: &str = "package.json";
const TSCONFIG_FILE: &str = "tsconfig.json";
const GITIGNORE_FILE: &str = ".gitignore";
const CUE_MOD_DIR: &str = "cue.mod";
const MODULE_FILE: &str = "cue.mod/module.cue";

const TSCONFIG_SCHEMA: &str = "https://json.schemastore.org/tsconfig";
const TSCONFIG_BASE: &str = "@mark1russell7/cue/ts/config";

const MODULE_DESCRIPTOR: &str = "module: \"project.local\"\nlanguage: {\n\tversion: \"v0.15.1\"\n}\n";

const BASE_FRAGMENT: &str = "base.cue";

/// Where an evaluated artifact's fragments live and how they are named.
struct FragmentSource {
    /// Directory under the package root.
    dir: &'static str,
    /// CUE expression extracted with `-e`.
    expression: &'static str,
    /// Feature name to fragment file stem.
    stem: fn(&str) -> &str,
}

const PACKAGE_SOURCE: FragmentSource = FragmentSource {
    dir: "npm/package",
    expression: "output",
    stem: fragment_id,
};

const IGNORE_SOURCE: FragmentSource = FragmentSource {
    dir: "git/ignore",
    expression: "patterns",
    stem: raw_name,
};

fn raw_name(feature: &str) -> &str {
    feature
}

/// What happened to one artifact.
enum Outcome {
    Wrote(String),
    Skipped(SkippedArtifact),
    NotApplicable,
}

fn skip(artifact: &str, reason: impl Into<String>) -> Outcome {
    let reason = reason.into();
    warn!("skipping {artifact}: {reason}");
    Outcome::Skipped(SkippedArtifact {
        artifact: artifact.to_string(),
        reason,
    })
}

/// Inputs shared by every artifact step.
struct Plan {
    resolved: Vec<String>,
    existing: Option<Map<String, Value>>,
}

type Step = fn(&CommandContext<'_>, &Plan) -> Result<Outcome, AppError>;

/// Artifacts in the order they are produced.
const STEPS: [Step; 4] = [package_json, tsconfig_json, gitignore, cue_module];

pub(crate) fn handle_generate(ctx: &CommandContext<'_>) -> GenerateOutput {
    let fail = |err: AppError, resolved: Vec<String>, generated: Vec<String>| GenerateOutput {
        success: false,
        resolved_features: resolved,
        generated,
        skipped: Vec::new(),
        message: None,
        error: Some(err.to_string()),
    };

    if !ctx.evaluator.is_available() {
        debug!("evaluator '{}' not found", ctx.evaluator.program());
        return fail(AppError::EvaluatorMissing, Vec::new(), Vec::new());
    }

    let Some(manifest) = ctx.load_features() else {
        return fail(
            AppError::ManifestMissing(ctx.package_root_display()),
            Vec::new(),
            Vec::new(),
        );
    };

    let Some(deps) = load_dependencies(ctx.fs, &ctx.project_root) else {
        return fail(AppError::DependenciesMissing, Vec::new(), Vec::new());
    };

    let resolved = resolve_features(&deps, &manifest);
    debug!("resolved features: {resolved:?}");

    let plan = Plan {
        resolved,
        existing: existing_package(ctx),
    };

    let mut generated = Vec::new();
    let mut skipped = Vec::new();
    for step in STEPS {
        match step(ctx, &plan) {
            Ok(Outcome::Wrote(name)) => generated.push(name),
            Ok(Outcome::Skipped(skip)) => skipped.push(skip),
            Ok(Outcome::NotApplicable) => {}
            Err(err) => return fail(err, plan.resolved, generated),
        }
    }

    info!(
        "generated {} artifact(s), skipped {}",
        generated.len(),
        skipped.len()
    );
    let message = format!("Generated {} files", generated.len());
    GenerateOutput {
        success: true,
        resolved_features: plan.resolved,
        generated,
        skipped,
        message: Some(message),
        error: None,
    }
}

/// Current `package.json` as an object; anything else counts as absent.
fn existing_package(ctx: &CommandContext<'_>) -> Option<Map<String, Value>> {
    match read_json::<Value>(ctx.fs, &ctx.project_path(PACKAGE_FILE))? {
        Value::Object(map) => Some(map),
        other => {
            debug!("ignoring non-object {PACKAGE_FILE}: {other}");
            None
        }
    }
}

/// `base.cue` followed by every resolved feature's fragment that exists.
fn fragment_files(
    ctx: &CommandContext<'_>,
    source: &FragmentSource,
    resolved: &[String],
) -> Vec<String> {
    let dir = ctx.package_path(source.dir);
    let mut files = vec![BASE_FRAGMENT.to_string()];
    for feature in resolved {
        let file = format!("{}.cue", (source.stem)(feature));
        if file_exists(ctx.fs, &dir.join(&file)) {
            files.push(file);
        } else {
            debug!("no {} fragment for '{feature}'", source.dir);
        }
    }
    files
}

fn evaluate(
    ctx: &CommandContext<'_>,
    source: &FragmentSource,
    resolved: &[String],
) -> Result<Value, String> {
    let files = fragment_files(ctx, source, resolved);
    ctx.evaluator
        .eval(&ctx.package_path(source.dir), &files, source.expression)
        .map_err(|err| err.to_string())
}

fn package_json(ctx: &CommandContext<'_>, plan: &Plan) -> Result<Outcome, AppError> {
    let generated = match evaluate(ctx, &PACKAGE_SOURCE, &plan.resolved) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Ok(skip(PACKAGE_FILE, "evaluator output is not an object")),
        Err(reason) => return Ok(skip(PACKAGE_FILE, reason)),
    };

    let merged = merge_package_json(&generated, plan.existing.as_ref());
    if !write_json(ctx.fs, &ctx.project_path(PACKAGE_FILE), &merged) {
        return Err(AppError::WriteFailed(PACKAGE_FILE.to_string()));
    }
    Ok(Outcome::Wrote(PACKAGE_FILE.to_string()))
}

fn tsconfig_json(ctx: &CommandContext<'_>, plan: &Plan) -> Result<Outcome, AppError> {
    if !plan.resolved.iter().any(|f| f == TYPED_FEATURE) {
        return Ok(Outcome::NotApplicable);
    }

    let selected = select_tsconfig(&plan.resolved);
    let tsconfig = json!({
        "$schema": TSCONFIG_SCHEMA,
        "extends": format!("{TSCONFIG_BASE}/{selected}.json"),
    });
    if !write_json(ctx.fs, &ctx.project_path(TSCONFIG_FILE), &tsconfig) {
        return Err(AppError::WriteFailed(TSCONFIG_FILE.to_string()));
    }
    Ok(Outcome::Wrote(TSCONFIG_FILE.to_string()))
}

fn gitignore(ctx: &CommandContext<'_>, plan: &Plan) -> Result<Outcome, AppError> {
    let value = match evaluate(ctx, &IGNORE_SOURCE, &plan.resolved) {
        Ok(value) => value,
        Err(reason) => return Ok(skip(GITIGNORE_FILE, reason)),
    };
    let Ok(patterns) = serde_json::from_value::<Vec<String>>(value) else {
        return Ok(skip(GITIGNORE_FILE, "evaluator output is not a list of strings"));
    };

    let mut content = patterns.join("\n");
    content.push('\n');
    if !write_file(ctx.fs, &ctx.project_path(GITIGNORE_FILE), &content) {
        return Err(AppError::WriteFailed(GITIGNORE_FILE.to_string()));
    }
    Ok(Outcome::Wrote(GITIGNORE_FILE.to_string()))
}

fn cue_module(ctx: &CommandContext<'_>, plan: &Plan) -> Result<Outcome, AppError> {
    if !plan.resolved.iter().any(|f| f == MODULE_FEATURE) {
        return Ok(Outcome::NotApplicable);
    }

    let dir = ctx.project_path(CUE_MOD_DIR);
    if !file_exists(ctx.fs, &dir) && !mkdir(ctx.fs, &dir) {
        return Err(AppError::WriteFailed(format!("{CUE_MOD_DIR}/")));
    }

    let module = ctx.project_path(MODULE_FILE);
    if file_exists(ctx.fs, &module) {
        debug!("{MODULE_FILE} already present, leaving it alone");
    } else if !write_file(ctx.fs, &module, MODULE_DESCRIPTOR) {
        return Err(AppError::WriteFailed(MODULE_FILE.to_string()));
    }
    Ok(Outcome::Wrote(format!("{CUE_MOD_DIR}/")))
}

#[cfg(test)]
#[path = "generate_cmd_tests.rs"]
mod tests;
