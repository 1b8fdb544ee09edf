use anyhow::{Context, Result};
use cuekit_core::types::{CommandOutput, OutputFormat};

/// Render a command result for stdout.
pub(crate) fn render<T: CommandOutput>(output: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(output).context("failed to serialize command output")
        }
        OutputFormat::Text => Ok(output.summary()),
    }
}

/// Print the result and report whether the command succeeded.
pub(crate) fn emit<T: CommandOutput>(output: &T, format: OutputFormat) -> Result<bool> {
    println!("{}", render(output, format)?);
    Ok(output.success())
}
