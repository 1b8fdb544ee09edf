//! External evaluator capability: runs the `cue` CLI as a blocking
//! subprocess and captures its structured output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tracing::debug;

/// Default evaluator executable.
pub const DEFAULT_PROGRAM: &str = "cue";

#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("evaluator exited with status {status}: {diagnostic}")]
    Failed { status: i32, diagnostic: String },

    #[error("evaluator produced invalid JSON: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

/// Result of checking data against a schema definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VetOutcome {
    Passed,
    Failed { diagnostic: String },
}

/// Config evaluator used by `generate` and `validate`.
///
/// Calls block until the evaluator exits; there is no timeout.
pub trait Evaluator {
    /// Executable name, for diagnostics.
    fn program(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Unify `files` (relative to `dir`) and extract `expression` as JSON.
    fn eval(&self, dir: &Path, files: &[String], expression: &str) -> Result<Value, EvalError>;

    /// Check `data` against the `definition` in `schema`.
    fn vet(&self, schema: &Path, definition: &str, data: &Path) -> Result<VetOutcome, EvalError>;
}

/// [`Evaluator`] backed by the `cue` command-line tool.
///
/// The program is located once, at construction; every call spawns that
/// resolved path.
#[derive(Debug, Clone)]
pub struct CueCli {
    program: PathBuf,
    resolved: Option<PathBuf>,
}

impl Default for CueCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CueCli {
    /// Locate `program` relative to the process working directory.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let base = std::env::current_dir().unwrap_or_default();
        Self::with_base(program, &base)
    }

    /// Relative paths such as `./tools/cue` resolve against `base`; bare
    /// names are searched on `PATH`.
    pub fn with_base(program: impl Into<PathBuf>, base: &Path) -> Self {
        let program = program.into();
        let resolved = which::which_in(&program, std::env::var_os("PATH"), base)
            .ok()
            .map(|path| if path.is_absolute() { path } else { base.join(path) });
        match &resolved {
            Some(path) => debug!("evaluator {} -> {}", program.display(), path.display()),
            None => debug!("evaluator {} not found", program.display()),
        }
        Self { program, resolved }
    }

    fn command(&self) -> Command {
        Command::new(self.resolved.as_deref().unwrap_or(&self.program))
    }

    fn run(&self, cmd: &mut Command) -> Result<Output, EvalError> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("running {:?}", cmd);
        cmd.output().map_err(|source| EvalError::Spawn {
            program: self.program.display().to_string(),
            source,
        })
    }
}

impl Evaluator for CueCli {
    fn program(&self) -> &str {
        self.program.to_str().unwrap_or(DEFAULT_PROGRAM)
    }

    fn is_available(&self) -> bool {
        self.resolved.is_some()
    }

    fn eval(&self, dir: &Path, files: &[String], expression: &str) -> Result<Value, EvalError> {
        let mut cmd = self.command();
        cmd.arg("eval")
            .args(files)
            .args(["-e", expression, "--out", "json"])
            .current_dir(dir);
        let output = self.run(&mut cmd)?;

        if !output.status.success() {
            return Err(EvalError::Failed {
                status: exit_code(&output),
                diagnostic: diagnostic(&output),
            });
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn vet(&self, schema: &Path, definition: &str, data: &Path) -> Result<VetOutcome, EvalError> {
        let mut cmd = self.command();
        cmd.args(["vet", "-d", definition]).arg(schema).arg(data);
        let output = self.run(&mut cmd)?;

        if output.status.success() {
            Ok(VetOutcome::Passed)
        } else {
            Ok(VetOutcome::Failed {
                diagnostic: diagnostic(&output),
            })
        }
    }
}

fn exit_code(output: &Output) -> i32 {
    // Signal-killed processes have no code.
    output.status.code().unwrap_or(1)
}

/// Stderr if the process wrote any, stdout otherwise.
fn diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr.trim().to_string()
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
