use anyhow::{Context, Result};
use clap::Parser;
use cuekit_config::CuekitConfig;
use cuekit_core::StdFs;
use cuekit_process::{CueCli, Evaluator};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod context;
mod feature_cmds;
mod generate_cmd;
mod init_cmd;
mod output;
mod validate_cmd;

#[cfg(test)]
mod test_support;

use cli::{Cli, Commands};
use context::CommandContext;
use output::emit;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let filter = if cli.verbose {
        EnvFilter::new("cuekit=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .ok();

    let cwd = std::env::current_dir().context("cannot determine CWD")?;
    let project_root = match cli.command.cwd() {
        Some(dir) => cwd.join(dir),
        None => cwd.clone(),
    };

    let mut config = CuekitConfig::load(&project_root)
        .with_context(|| format!("failed to load config for {}", project_root.display()))?;
    if let Some(root) = &cli.package_root {
        config.package.root = Some(cwd.join(root));
    }

    let fs = StdFs;
    let evaluator = CueCli::with_base(&config.evaluator.program, &cwd);
    let ctx = CommandContext {
        fs: &fs,
        evaluator: &evaluator,
        package_root: config.package_root(&project_root),
        project_root,
    };
    debug!(
        "project {} package {} evaluator {}",
        ctx.project_root.display(),
        ctx.package_root.display(),
        evaluator.program()
    );

    let format = cli.format;
    let success = match cli.command {
        Commands::Init { preset, force, .. } => {
            emit(&init_cmd::handle_init(&ctx, &preset, force), format)?
        }
        Commands::Add { feature, .. } => emit(&feature_cmds::handle_add(&ctx, &feature), format)?,
        Commands::Remove { feature, .. } => {
            emit(&feature_cmds::handle_remove(&ctx, &feature), format)?
        }
        Commands::Generate { .. } => emit(&generate_cmd::handle_generate(&ctx), format)?,
        Commands::Validate { .. } => emit(&validate_cmd::handle_validate(&ctx), format)?,
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
