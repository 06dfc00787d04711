//! The normalized outcome of running a prompt through any backend.

use serde::{Deserialize, Serialize};

/// Captured output of a completed backend invocation.
///
/// A non-zero `exit_code` is data, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// Everything written to standard output.
    pub stdout: String,
    /// Everything written to standard error.
    pub stderr: String,
    /// Process exit status; API calls always report 0.
    pub exit_code: i32,
}

impl ProcessOutput {
    /// Output of a successful API call: the generated text with exit code 0.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            stdout: text.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }
}

/// Result of dispatching a prompt to an execution backend.
///
/// Serializes to either `{stdout, stderr, exit_code}` or `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionResult {
    /// The backend ran and produced output.
    Completed(ProcessOutput),
    /// The adapter could not run the backend.
    Failed {
        /// Human-readable reason.
        error: String,
    },
}

impl ExecutionResult {
    /// Build a failure result.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// The failure message, if this is a failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

impl From<ProcessOutput> for ExecutionResult {
    fn from(output: ProcessOutput) -> Self {
        Self::Completed(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variants_serialize_to_disjoint_shapes() {
        let done = ExecutionResult::from(ProcessOutput {
            stdout: "out".into(),
            stderr: "warn".into(),
            exit_code: 2,
        });
        assert_eq!(
            serde_json::to_value(&done).unwrap(),
            json!({"stdout": "out", "stderr": "warn", "exit_code": 2})
        );

        let failed = ExecutionResult::failed("boom");
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({"error": "boom"}));
        assert_eq!(failed.error(), Some("boom"));
        assert_eq!(done.error(), None);
    }

    #[test]
    fn api_text_looks_like_clean_exit() {
        let output = ProcessOutput::from_text("generated");
        assert_eq!(output.stderr, "");
        assert_eq!(output.exit_code, 0);
    }
}
