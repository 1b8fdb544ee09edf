use cuekit_config::{DEPENDENCIES_FILE, dependencies_path, save_dependencies};
use cuekit_core::AppError;
use cuekit_core::fs::{file_exists, mkdir, write_file};
use cuekit_core::types::InitOutput;
use tracing::debug;

use crate::context::CommandContext;

const SRC_DIR: &str = "src";
const ENTRY_FILE: &str = "src/index.ts";
const ENTRY_STUB: &str = "// Entry point\nexport {};\n";

/// Create `dependencies.json` from a preset, plus a `src/` entry stub.
pub(crate) fn handle_init(ctx: &CommandContext<'_>, preset_name: &str, force: bool) -> InitOutput {
    let fail = |err: AppError, created: Vec<String>| InitOutput {
        success: false,
        preset: preset_name.to_string(),
        created,
        message: None,
        error: Some(err.to_string()),
    };

    let Some(manifest) = ctx.load_features() else {
        return fail(AppError::ManifestMissing(ctx.package_root_display()), Vec::new());
    };

    let Some(preset) = manifest.preset(preset_name) else {
        return fail(
            AppError::UnknownPreset {
                name: preset_name.to_string(),
                available: manifest.available_presets(),
            },
            Vec::new(),
        );
    };

    if file_exists(ctx.fs, &dependencies_path(&ctx.project_root)) && !force {
        return InitOutput {
            success: true,
            preset: preset_name.to_string(),
            created: Vec::new(),
            message: Some(format!(
                "{DEPENDENCIES_FILE} already exists (use --force to overwrite)"
            )),
            error: None,
        };
    }

    let mut created = Vec::new();
    if !save_dependencies(ctx.fs, preset, &ctx.project_root) {
        return fail(AppError::WriteFailed(DEPENDENCIES_FILE.to_string()), created);
    }
    created.push(DEPENDENCIES_FILE.to_string());

    let src = ctx.project_path(SRC_DIR);
    if !file_exists(ctx.fs, &src) {
        if !mkdir(ctx.fs, &src) {
            return fail(AppError::WriteFailed(format!("{SRC_DIR}/")), created);
        }
        created.push(format!("{SRC_DIR}/"));
    }

    let entry = ctx.project_path(ENTRY_FILE);
    if !file_exists(ctx.fs, &entry) {
        if !write_file(ctx.fs, &entry, ENTRY_STUB) {
            return fail(AppError::WriteFailed(ENTRY_FILE.to_string()), created);
        }
        created.push(ENTRY_FILE.to_string());
    }

    debug!("initialized {} with preset '{preset_name}'", ctx.project_root.display());
    InitOutput {
        success: true,
        preset: preset_name.to_string(),
        created,
        message: Some(format!(
            "Initialized with preset '{preset_name}'. Run `cuekit generate` to create config files."
        )),
        error: None,
    }
}
