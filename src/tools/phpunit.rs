//! Test runner tool: phpunit inside php-fpm, with configuration
//! auto-detection against the project directory.

use std::path::Path;

use serde::Deserialize;

use rmcp::schemars;

use super::{
    error_report, require, resolve_project_dir, string_args, Execution, ToolContext, ToolError,
    ToolReport,
};

/// Parameters for a phpunit run.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct PhpunitParams {
    /// Host path of the project directory (required)
    #[serde(default)]
    pub project_path: String,

    /// Explicit phpunit configuration file; auto-detected when omitted
    pub config_file: Option<String>,

    /// Test file or directory to run, relative to the project root
    pub test_path: Option<String>,

    /// Extra phpunit options, inserted before the test path
    #[serde(default)]
    pub args: Vec<String>,
}

const LABEL: &str = "PHPUnit";

/// Probed in priority order when no explicit configuration is given.
const CONFIG_CANDIDATES: &[&str] = &["phpunit.xml.dist", "phpunit.xml"];

impl ToolContext {
    /// Run phpunit inside php-fpm.
    pub async fn run_phpunit(&self, params: PhpunitParams) -> ToolReport {
        match self.try_run_phpunit(params).await {
            Ok(execution) => execution.report(LABEL),
            Err(err) => error_report(LABEL, &err),
        }
    }

    async fn try_run_phpunit(&self, params: PhpunitParams) -> Result<Execution, ToolError> {
        require("project_path", &params.project_path)?;
        let dir = resolve_project_dir(&params.project_path)?;

        let config_file = match params.config_file.filter(|c| !c.trim().is_empty()) {
            Some(explicit) => explicit,
            None => detect_config(&dir)?,
        };

        let mut args = string_args(&["env", "exec", "-T", "php-fpm", "vendor/bin/phpunit", "-c"]);
        args.push(config_file);
        args.extend(params.args);
        if let Some(test_path) = params.test_path.filter(|t| !t.trim().is_empty()) {
            args.push(test_path);
        }

        Ok(self.execute(args, dir).await?)
    }
}

fn detect_config(dir: &Path) -> Result<String, ToolError> {
    CONFIG_CANDIDATES
        .iter()
        .find(|candidate| dir.join(candidate).is_file())
        .map(|candidate| (*candidate).to_string())
        .ok_or_else(|| ToolError::MissingPhpunitConfig(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::super::testing::stub_context;
    use super::*;

    fn params(path: &std::path::Path) -> PhpunitParams {
        PhpunitParams {
            project_path: path.display().to_string(),
            config_file: None,
            test_path: None,
            args: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_prefers_dist_config_over_plain() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("phpunit.xml.dist"), "<phpunit/>").unwrap();
        std::fs::write(temp.path().join("phpunit.xml"), "<phpunit/>").unwrap();
        let (ctx, runner) = stub_context();

        let report = ctx.run_phpunit(params(temp.path())).await;

        assert!(!report.is_error);
        assert_eq!(
            runner.calls()[0].args,
            vec!["env", "exec", "-T", "php-fpm", "vendor/bin/phpunit", "-c", "phpunit.xml.dist"]
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_plain_config() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("phpunit.xml"), "<phpunit/>").unwrap();
        let (ctx, runner) = stub_context();

        ctx.run_phpunit(params(temp.path())).await;

        assert!(runner.calls()[0].args.contains(&"phpunit.xml".to_string()));
    }

    #[tokio::test]
    async fn test_explicit_config_skips_detection() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();

        let mut p = params(temp.path());
        p.config_file = Some("dev/tests/unit/phpunit.xml".to_string());
        let report = ctx.run_phpunit(p).await;

        assert!(!report.is_error);
        assert!(runner.calls()[0].args.contains(&"dev/tests/unit/phpunit.xml".to_string()));
    }

    #[tokio::test]
    async fn test_no_config_fails_without_spawning() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();

        let report = ctx.run_phpunit(params(temp.path())).await;

        assert!(report.is_error);
        assert!(report.text.contains("No phpunit configuration found"));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_options_come_before_test_path() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("phpunit.xml.dist"), "<phpunit/>").unwrap();
        let (ctx, runner) = stub_context();

        let mut p = params(temp.path());
        p.test_path = Some("tests/Unit/TotalsTest.php".to_string());
        p.args = vec!["--filter".to_string(), "testGrandTotal".to_string()];
        ctx.run_phpunit(p).await;

        assert_eq!(
            runner.calls()[0].args,
            vec![
                "env",
                "exec",
                "-T",
                "php-fpm",
                "vendor/bin/phpunit",
                "-c",
                "phpunit.xml.dist",
                "--filter",
                "testGrandTotal",
                "tests/Unit/TotalsTest.php",
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_project_path_spawns_nothing() {
        let (ctx, runner) = stub_context();

        let report = ctx.run_phpunit(params(std::path::Path::new(""))).await;

        assert!(report.is_error);
        assert_eq!(runner.call_count(), 0);
    }
}
