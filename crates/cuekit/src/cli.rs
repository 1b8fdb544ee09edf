use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cuekit_core::types::OutputFormat;

#[derive(Parser)]
#[command(name = "cuekit", version)]
#[command(about = "cuekit: manage CUE features and generate project config files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json or text)
    #[arg(long, default_value = "json", global = true)]
    pub format: OutputFormat,

    /// Override the CUE package location (default: node_modules/@mark1russell7/cue)
    #[arg(long, global = true, value_name = "DIR")]
    pub package_root: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Project directory selection shared by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct CwdArg {
    /// Project directory (defaults to CWD)
    #[arg(short = 'C', long)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize dependencies.json with a preset
    Init {
        /// Preset name from features.json
        #[arg(short, long, default_value = "lib")]
        preset: String,

        /// Overwrite an existing dependencies.json
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        cwd: CwdArg,
    },

    /// Add a feature to dependencies.json
    Add {
        /// Feature name
        feature: String,

        #[command(flatten)]
        cwd: CwdArg,
    },

    /// Remove a feature from dependencies.json
    Remove {
        /// Feature name
        feature: String,

        #[command(flatten)]
        cwd: CwdArg,
    },

    /// Generate config files from dependencies.json
    Generate {
        #[command(flatten)]
        cwd: CwdArg,
    },

    /// Validate dependencies.json
    Validate {
        #[command(flatten)]
        cwd: CwdArg,
    },
}

impl Commands {
    pub fn cwd(&self) -> Option<&PathBuf> {
        match self {
            Self::Init { cwd, .. }
            | Self::Add { cwd, .. }
            | Self::Remove { cwd, .. }
            | Self::Generate { cwd }
            | Self::Validate { cwd } => cwd.cwd.as_ref(),
        }
    }
}
