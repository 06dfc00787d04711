//! Whitelisted execution of local AI command-line tools.
//!
//! The whitelist check is the security boundary of this adapter: the CLI name
//! and its arguments come from a local caller, so nothing outside
//! [`ALLOWED_CLIS`] is ever handed to a [`CommandRunner`].

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use cockpit_core::{ExecutionResult, ProcessOutput};
use tokio::process::Command;

use crate::error::RunError;

/// Command-line tools the adapter may invoke, sorted.
pub const ALLOWED_CLIS: [&str; 5] = ["claude", "codex", "copilot", "gemini", "ollama"];

/// Default bound on a single CLI invocation.
pub const DEFAULT_CLI_TIMEOUT: Duration = Duration::from_secs(60);

/// Returns true if `cli_id` is on the whitelist.
#[must_use]
pub fn is_allowed(cli_id: &str) -> bool {
    ALLOWED_CLIS.contains(&cli_id)
}

/// Trait for running a program to completion.
///
/// This trait abstracts process spawning, allowing for
/// mock implementations in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, capturing stdout, stderr and exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned, or does not finish in time.
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, RunError>;
}

/// Runs programs with `tokio::process`, killing them after a timeout.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    /// Create a runner that kills children still running after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The per-invocation bound.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CLI_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, RunError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| RunError::TimedOut {
                program: program.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| RunError::from_io(program, e))?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // Killed by a signal: no exit code.
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// The CLI Execution Adapter.
#[derive(Debug, Clone, Default)]
pub struct CliAdapter<R> {
    runner: R,
}

impl<R: CommandRunner> CliAdapter<R> {
    /// Create an adapter spawning processes through `runner`.
    #[must_use]
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    /// The underlying runner.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Run a whitelisted CLI with `args`.
    ///
    /// Never fails: rejected identifiers, missing binaries and timeouts come
    /// back as [`ExecutionResult::Failed`]. A non-zero exit status is returned
    /// as a completed result.
    pub async fn run(&self, cli_id: &str, args: &[String]) -> ExecutionResult {
        if !is_allowed(cli_id) {
            tracing::warn!(cli = %cli_id, "Rejected CLI outside whitelist");
            return ExecutionResult::failed(format!(
                "CLI '{cli_id}' not in whitelist. Allowed: {}",
                ALLOWED_CLIS.join(", ")
            ));
        }

        let program = self.resolve_program(cli_id).await;
        tracing::debug!(program = %program, args = args.len(), "Running CLI");

        match self.runner.run(&program, args).await {
            Ok(output) => {
                tracing::debug!(program = %program, exit_code = output.exit_code, "CLI finished");
                output.into()
            }
            Err(err) => {
                tracing::error!(program = %program, error = %err, "CLI invocation failed");
                ExecutionResult::failed(err.to_string())
            }
        }
    }

    /// Pick the executable name for an already whitelisted CLI.
    ///
    /// On Windows, npm-installed tools are often only reachable as `<name>.cmd`;
    /// probe the bare name first and fall back to the shim.
    async fn resolve_program(&self, cli_id: &str) -> String {
        if cfg!(windows) {
            let probe = self.runner.run(cli_id, &["--version".to_string()]).await;
            if probe.is_err_and(|e| e.is_not_found()) {
                return format!("{cli_id}.cmd");
            }
        }
        cli_id.to_string()
    }
}

/// A command runner that records invocations instead of spawning processes.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    behavior: MockBehavior,
    calls: parking_lot::Mutex<Vec<(String, Vec<String>)>>,
}

#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
enum MockBehavior {
    /// Echo the arguments, space separated, on stdout.
    #[default]
    Echo,
    Output(ProcessOutput),
    NotFound,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockCommandRunner {
    /// A runner that echoes its arguments and exits 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that always returns `output`.
    #[must_use]
    pub fn with_output(output: ProcessOutput) -> Self {
        Self {
            behavior: MockBehavior::Output(output),
            calls: parking_lot::Mutex::default(),
        }
    }

    /// A runner that reports every program as missing.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            behavior: MockBehavior::NotFound,
            calls: parking_lot::Mutex::default(),
        }
    }

    /// Every `(program, args)` pair run so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().clone()
    }

    /// Number of processes that would have been spawned.
    #[must_use]
    pub fn spawn_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, RunError> {
        self.calls.lock().push((program.to_string(), args.to_vec()));
        match &self.behavior {
            MockBehavior::Echo => Ok(ProcessOutput::from_text(args.join(" "))),
            MockBehavior::Output(output) => Ok(output.clone()),
            MockBehavior::NotFound => Err(RunError::NotFound {
                program: program.to_string(),
            }),
        }
    }
}
