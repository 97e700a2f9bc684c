//! Tool formatters for the MCP surface.
//!
//! Every tool maps to one formatter method on [`ToolContext`]: validate the
//! parameters, resolve the working directory, build a literal argument
//! vector for the orchestration CLI, run it, and render the outcome into a
//! uniform text envelope. All failures are caught here and converted into
//! an envelope with the error flag set; only the protocol router rejects
//! unknown tool names.

mod composer;
mod database;
mod init;
mod lifecycle;
mod php;
mod phpunit;

pub use composer::ComposerParams;
pub use database::DbQueryParams;
pub use init::InitProjectParams;
pub use lifecycle::ProjectParams;
pub use php::{MagentoCliParams, PhpScriptParams};
pub use phpunit::PhpunitParams;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};

use crate::config::Config;
use crate::executor::{CommandOutput, CommandRunner, RunnerError};

/// Everything a formatter needs: configuration plus the command runner.
///
/// Built once at startup and shared immutably; no per-call state lives
/// here, so concurrent tool calls never contend.
#[derive(Clone)]
pub struct ToolContext {
    config: Config,
    runner: Arc<dyn CommandRunner>,
}

impl ToolContext {
    /// Create a context around a runner.
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the orchestration CLI with `args` in `dir`.
    pub(crate) async fn run_warden(
        &self,
        args: &[String],
        dir: &Path,
    ) -> Result<CommandOutput, RunnerError> {
        self.runner.run(&self.config.orchestrator.bin, args, dir).await
    }

    /// Run the orchestration CLI and package the pieces for rendering.
    pub(crate) async fn execute(
        &self,
        args: Vec<String>,
        dir: PathBuf,
    ) -> Result<Execution, RunnerError> {
        let output = self.run_warden(&args, &dir).await?;
        Ok(Execution { command_line: self.command_line(&args), dir, output })
    }

    /// Command string echoed back in envelopes (display only).
    pub(crate) fn command_line(&self, args: &[String]) -> String {
        let mut line = self.config.orchestrator.bin.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// A completed orchestration CLI invocation, ready for rendering.
pub(crate) struct Execution {
    pub command_line: String,
    pub dir: PathBuf,
    pub output: CommandOutput,
}

impl Execution {
    /// Standard envelope for this invocation.
    pub(crate) fn report(&self, label: &str) -> ToolReport {
        command_report(label, &self.command_line, &self.dir, &self.output)
    }
}

/// Why a tool call could not produce a command result.
///
/// A command that ran and exited non-zero is not in this enum; it renders
/// as a normal envelope with the error flag set.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A required parameter was missing or empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The supplied project path does not resolve to a directory.
    #[error("Project directory not found: {0}")]
    ProjectNotFound(String),

    /// The test runner found no configuration file and none was supplied.
    #[error("No phpunit configuration found in {}", .0.display())]
    MissingPhpunitConfig(PathBuf),

    /// Composer inside the environment is not major version 2.
    #[error("Unsupported composer version: {0}")]
    UnsupportedComposer(String),

    /// Filesystem work around the call failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The orchestration CLI could not be launched.
    #[error(transparent)]
    Run(#[from] RunnerError),
}

/// Uniform outcome of every tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    /// Rendered text block
    pub text: String,

    /// Mirrors the command's failure, or an earlier error
    pub is_error: bool,
}

impl ToolReport {
    /// Convert into the protocol-level result.
    pub fn into_call_result(self) -> CallToolResult {
        let content = vec![Content::text(self.text)];
        if self.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

const EMPTY_STREAM: &str = "(no output)";

fn stream_or_placeholder(stream: &str) -> &str {
    if stream.trim().is_empty() {
        EMPTY_STREAM
    } else {
        stream.trim_end()
    }
}

/// Envelope for a command that ran to completion (any exit code).
pub(crate) fn command_report(
    label: &str,
    command_line: &str,
    dir: &Path,
    output: &CommandOutput,
) -> ToolReport {
    let text = format!(
        "{label}\n\n$ {command_line}\nDirectory: {dir}\nExit code: {code}\n\n--- stdout ---\n{stdout}\n\n--- stderr ---\n{stderr}",
        dir = dir.display(),
        code = output.exit_code,
        stdout = stream_or_placeholder(&output.stdout),
        stderr = stream_or_placeholder(&output.stderr),
    );
    ToolReport { text, is_error: !output.success() }
}

/// Envelope for a call that failed before producing a command result.
pub(crate) fn error_report(label: &str, err: &ToolError) -> ToolReport {
    let mut text = format!("{label}\n\nError: {err}");

    if let ToolError::Run(RunnerError::Spawn { partial_stdout, partial_stderr, .. }) = err {
        if !partial_stdout.is_empty() {
            text.push_str("\n\n--- partial stdout ---\n");
            text.push_str(partial_stdout);
        }
        if !partial_stderr.is_empty() {
            text.push_str("\n\n--- partial stderr ---\n");
            text.push_str(partial_stderr);
        }
    }

    ToolReport { text, is_error: true }
}

/// Reject a blank required parameter before anything is spawned.
pub(crate) fn require(name: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidInput(format!("{name} must not be empty")));
    }
    Ok(())
}

/// Expand, trim and absolutize a project path without touching the disk.
pub(crate) fn resolve_target_dir(raw: &str) -> Result<PathBuf, ToolError> {
    let expanded = shellexpand::tilde(raw);
    let trimmed = expanded.trim_end_matches('/');
    let candidate = if trimmed.is_empty() { Path::new("/") } else { Path::new(trimmed) };

    if candidate.is_absolute() {
        Ok(candidate.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(candidate))
    }
}

/// Resolve a project path that must already exist on disk.
pub(crate) fn resolve_project_dir(raw: &str) -> Result<PathBuf, ToolError> {
    let dir = resolve_target_dir(raw)?;
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(ToolError::ProjectNotFound(dir.display().to_string()))
    }
}

/// Owned argument vector from string literals.
pub(crate) fn string_args(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}
