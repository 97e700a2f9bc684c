//! PHP execution tools: standalone scripts and bin/magento commands, both
//! run inside the environment's php-fpm container.

use serde::Deserialize;

use rmcp::schemars;

use super::{
    error_report, require, resolve_project_dir, string_args, Execution, ToolContext, ToolError,
    ToolReport,
};

/// Parameters for running a PHP script.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct PhpScriptParams {
    /// Host path of the project directory (required)
    #[serde(default)]
    pub project_path: String,

    /// Script path relative to the project root (required)
    #[serde(default)]
    pub script_path: String,

    /// Extra arguments passed to the script
    #[serde(default)]
    pub args: Vec<String>,
}

/// Parameters for a bin/magento command.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct MagentoCliParams {
    /// Host path of the project directory (required)
    #[serde(default)]
    pub project_path: String,

    /// Magento CLI command, e.g. "cache:flush" (required)
    #[serde(default)]
    pub command: String,

    /// Extra arguments passed after the command
    #[serde(default)]
    pub args: Vec<String>,
}

const SCRIPT_LABEL: &str = "PHP script";
const CLI_LABEL: &str = "Magento CLI";

impl ToolContext {
    /// Run a PHP script inside php-fpm.
    pub async fn run_php_script(&self, params: PhpScriptParams) -> ToolReport {
        match self.try_run_php_script(params).await {
            Ok(execution) => execution.report(SCRIPT_LABEL),
            Err(err) => error_report(SCRIPT_LABEL, &err),
        }
    }

    async fn try_run_php_script(&self, params: PhpScriptParams) -> Result<Execution, ToolError> {
        require("project_path", &params.project_path)?;
        require("script_path", &params.script_path)?;
        let dir = resolve_project_dir(&params.project_path)?;

        let mut args = string_args(&["env", "exec", "-T", "php-fpm", "php"]);
        args.push(params.script_path);
        args.extend(params.args);

        Ok(self.execute(args, dir).await?)
    }

    /// Run a bin/magento command inside php-fpm.
    pub async fn run_magento_cli(&self, params: MagentoCliParams) -> ToolReport {
        match self.try_run_magento_cli(params).await {
            Ok(execution) => execution.report(CLI_LABEL),
            Err(err) => error_report(CLI_LABEL, &err),
        }
    }

    async fn try_run_magento_cli(&self, params: MagentoCliParams) -> Result<Execution, ToolError> {
        require("project_path", &params.project_path)?;
        require("command", &params.command)?;
        let dir = resolve_project_dir(&params.project_path)?;

        let mut args = string_args(&["env", "exec", "-T", "php-fpm", "bin/magento"]);
        args.push(params.command);
        args.extend(params.args);

        Ok(self.execute(args, dir).await?)
    }
}
