//! External command execution.
//!
//! Spawns the orchestration CLI as a child process and captures its output.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Everything the process wrote to standard output
    pub stdout: String,

    /// Everything the process wrote to standard error
    pub stderr: String,

    /// Exit code; -1 when the process was terminated by a signal
    pub exit_code: i32,
}

impl CommandOutput {
    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Failure to run an external command at all.
///
/// A command that starts and exits non-zero is not an error here; it
/// resolves to a [`CommandOutput`] carrying the non-zero code.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The process could not be spawned, or its pipes could not be drained.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,

        /// Output captured before the failure (normally empty)
        partial_stdout: String,

        /// Diagnostics captured before the failure (normally empty)
        partial_stderr: String,

        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
}

/// Runs external commands on behalf of the tool formatters.
///
/// Production code uses [`ProcessRunner`]; tests substitute a recording
/// stub so command construction can be asserted without spawning anything.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with literal arguments in `dir` and wait for exit.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        dir: &Path,
    ) -> Result<CommandOutput, RunnerError>;
}

/// Command runner backed by `tokio::process`.
///
/// No shell is involved: arguments reach the child exactly as given, and
/// stdin is closed so the child cannot block on terminal input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        dir: &Path,
    ) -> Result<CommandOutput, RunnerError> {
        let start = Instant::now();
        debug!(program, ?args, dir = %dir.display(), "spawning command");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|source| spawn_error(program, source))?;

        // Drains both pipes concurrently before reaping the child, so the
        // two streams stay independent append-only buffers.
        let output =
            child.wait_with_output().await.map_err(|source| spawn_error(program, source))?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        };

        debug!(
            exit_code = result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            elapsed = ?start.elapsed(),
            "command finished"
        );

        Ok(result)
    }
}

fn spawn_error(program: &str, source: std::io::Error) -> RunnerError {
    RunnerError::Spawn {
        program: program.to_string(),
        partial_stdout: String::new(),
        partial_stderr: String::new(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn cwd() -> PathBuf {
        std::env::current_dir().unwrap()
    }

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let runner = ProcessRunner::new();
        let result = runner.run("echo", &args(&["hello"]), &cwd()).await.unwrap();

        assert!(result.success());
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_preserves_argument_boundaries() {
        // An argv element with spaces must reach the child as one argument.
        let runner = ProcessRunner::new();
        let result = runner.run("echo", &args(&["SELECT 1"]), &cwd()).await.unwrap();

        assert_eq!(result.stdout.trim(), "SELECT 1");
    }

    #[tokio::test]
    async fn test_run_reports_nonzero_exit_as_output() {
        let runner = ProcessRunner::new();
        let result = runner.run("false", &[], &cwd()).await.unwrap();

        assert!(!result.success());
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn test_run_respects_working_directory() {
        let runner = ProcessRunner::new();
        let result = runner.run("pwd", &[], Path::new("/tmp")).await.unwrap();

        assert!(result.success());
        // On macOS, /tmp is a symlink to /private/tmp
        assert!(result.stdout.contains("tmp"));
    }

    #[tokio::test]
    async fn test_spawn_failure_carries_empty_partial_output() {
        let runner = ProcessRunner::new();
        let err = runner
            .run("definitely-not-a-real-binary-4b1c", &[], &cwd())
            .await
            .unwrap_err();

        match err {
            RunnerError::Spawn { program, partial_stdout, partial_stderr, .. } => {
                assert_eq!(program, "definitely-not-a-real-binary-4b1c");
                assert!(partial_stdout.is_empty());
                assert!(partial_stderr.is_empty());
            }
        }
    }
}
