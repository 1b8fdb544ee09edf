use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How command results are rendered on stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Shared surface of all command outputs.
pub trait CommandOutput: Serialize {
    fn success(&self) -> bool;

    /// One-line human summary for `--format text`.
    fn summary(&self) -> String;
}

/// Either the error text or the informational message, whichever is set.
fn status_line(error: &Option<String>, message: &Option<String>) -> String {
    error
        .as_deref()
        .map(|e| format!("error: {e}"))
        .or_else(|| message.clone())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOutput {
    pub success: bool,
    pub preset: String,
    pub created: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput for InitOutput {
    fn success(&self) -> bool {
        self.success
    }

    fn summary(&self) -> String {
        let mut line = status_line(&self.error, &self.message);
        for path in &self.created {
            line.push_str(&format!("\n  created {path}"));
        }
        line
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOutput {
    pub success: bool,
    pub feature: String,
    pub added: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput for AddOutput {
    fn success(&self) -> bool {
        self.success
    }

    fn summary(&self) -> String {
        status_line(&self.error, &self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOutput {
    pub success: bool,
    pub feature: String,
    pub removed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput for RemoveOutput {
    fn success(&self) -> bool {
        self.success
    }

    fn summary(&self) -> String {
        status_line(&self.error, &self.message)
    }
}

/// An artifact `generate` did not write because its evaluation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedArtifact {
    pub artifact: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput {
    pub success: bool,
    pub resolved_features: Vec<String>,
    pub generated: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput for GenerateOutput {
    fn success(&self) -> bool {
        self.success
    }

    fn summary(&self) -> String {
        let mut line = status_line(&self.error, &self.message);
        for name in &self.generated {
            line.push_str(&format!("\n  wrote {name}"));
        }
        for skip in &self.skipped {
            line.push_str(&format!("\n  [!] skipped {}: {}", skip.artifact, skip.reason));
        }
        line
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOutput {
    pub success: bool,
    pub valid: bool,
    pub features: Vec<String>,
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandOutput for ValidateOutput {
    fn success(&self) -> bool {
        self.success
    }

    fn summary(&self) -> String {
        let mut line = self.message.clone().unwrap_or_default();
        for err in &self.errors {
            if !line.is_empty() {
                line.push('\n');
            }
            line.push_str(&format!("  [!] {err}"));
        }
        line
    }
}
