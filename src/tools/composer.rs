//! Dependency manager tool: composer inside php-fpm, gated by a
//! capability probe for major version 2.

use std::path::Path;

use serde::Deserialize;

use rmcp::schemars;

use super::{
    error_report, require, resolve_project_dir, string_args, Execution, ToolContext, ToolError,
    ToolReport,
};

/// Parameters for a composer invocation.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ComposerParams {
    /// Host path of the project directory (required)
    #[serde(default)]
    pub project_path: String,

    /// Composer command line, split on whitespace, e.g. "install --no-dev" (required)
    #[serde(default)]
    pub command: String,
}

const LABEL: &str = "Composer";

/// Substring of `composer --version` output that marks major version 2.
const V2_MARKER: &str = "Composer version 2";

impl ToolContext {
    /// Run a composer command inside php-fpm.
    ///
    /// Probes for a v2 binary first: `composer2` if installed, otherwise
    /// `composer` provided its version report carries the v2 marker. The
    /// requested command never runs against composer 1.
    pub async fn run_composer(&self, params: ComposerParams) -> ToolReport {
        match self.try_run_composer(params).await {
            Ok(execution) => execution.report(LABEL),
            Err(err) => error_report(LABEL, &err),
        }
    }

    async fn try_run_composer(&self, params: ComposerParams) -> Result<Execution, ToolError> {
        require("project_path", &params.project_path)?;
        require("command", &params.command)?;
        let dir = resolve_project_dir(&params.project_path)?;

        let binary = self.detect_composer_binary(&dir).await?;

        let mut args = string_args(&["env", "exec", "-T", "php-fpm", binary]);
        args.extend(params.command.split_whitespace().map(ToString::to_string));

        Ok(self.execute(args, dir).await?)
    }

    async fn detect_composer_binary(&self, dir: &Path) -> Result<&'static str, ToolError> {
        let probe = self
            .run_warden(&string_args(&["env", "exec", "-T", "php-fpm", "which", "composer2"]), dir)
            .await?;
        if probe.success() {
            return Ok("composer2");
        }

        let version = self
            .run_warden(&string_args(&["env", "exec", "-T", "php-fpm", "composer", "--version"]), dir)
            .await?;
        if version.success() && version.stdout.contains(V2_MARKER) {
            return Ok("composer");
        }

        let detail = if version.success() {
            let first_line = version.stdout.lines().next().unwrap_or("").trim();
            if first_line.is_empty() {
                "no version reported".to_string()
            } else {
                format!("found `{first_line}`")
            }
        } else {
            format!("`composer --version` exited with code {}", version.exit_code)
        };
        Err(ToolError::UnsupportedComposer(format!("expected major version 2, {detail}")))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::stub_context;
    use super::*;

    fn params(path: &std::path::Path, command: &str) -> ComposerParams {
        ComposerParams {
            project_path: path.display().to_string(),
            command: command.to_string(),
        }
    }

    #[tokio::test]
    async fn test_uses_composer2_when_installed() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();
        runner.push_output(0, "/usr/bin/composer2\n", "");

        let report = ctx.run_composer(params(temp.path(), "install")).await;

        assert!(!report.is_error);
        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, vec!["env", "exec", "-T", "php-fpm", "which", "composer2"]);
        assert_eq!(calls[1].args, vec!["env", "exec", "-T", "php-fpm", "composer2", "install"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_composer_when_v2() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();
        runner.push_output(1, "", "which: no composer2\n");
        runner.push_output(0, "Composer version 2.7.7 2024-06-10 22:11:12\n", "");

        let report = ctx.run_composer(params(temp.path(), "install")).await;

        assert!(!report.is_error);
        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[1].args,
            vec!["env", "exec", "-T", "php-fpm", "composer", "--version"]
        );
        assert_eq!(calls[2].args, vec!["env", "exec", "-T", "php-fpm", "composer", "install"]);
    }

    #[tokio::test]
    async fn test_rejects_composer_v1_before_the_real_command() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();
        runner.push_output(1, "", "");
        runner.push_output(0, "Composer version 1.10.26 2022-04-13 16:39:56\n", "");

        let report = ctx.run_composer(params(temp.path(), "install")).await;

        assert!(report.is_error);
        assert!(report.text.contains("Unsupported composer version"));
        assert!(report.text.contains("Composer version 1.10.26"));
        // The probe ran, the user's command never did
        assert_eq!(runner.call_count(), 2);
    }

    #[tokio::test]
    async fn test_rejects_when_version_probe_fails() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();
        runner.push_output(1, "", "");
        runner.push_output(127, "", "composer: not found\n");

        let report = ctx.run_composer(params(temp.path(), "install")).await;

        assert!(report.is_error);
        assert!(report.text.contains("exited with code 127"));
        assert_eq!(runner.call_count(), 2);
    }

    #[tokio::test]
    async fn test_command_string_is_split_on_whitespace() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();
        runner.push_output(0, "/usr/bin/composer2\n", "");

        ctx.run_composer(params(temp.path(), "require  monolog/monolog --dev")).await;

        assert_eq!(
            runner.calls()[1].args,
            vec![
                "env",
                "exec",
                "-T",
                "php-fpm",
                "composer2",
                "require",
                "monolog/monolog",
                "--dev",
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_command_spawns_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();

        let report = ctx.run_composer(params(temp.path(), "")).await;

        assert!(report.is_error);
        assert_eq!(runner.call_count(), 0);
    }
}
