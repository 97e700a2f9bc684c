//! Project scaffolding tool: `env init` plus a pinned `.env` baseline.

use std::fs;

use serde::Deserialize;

use rmcp::schemars;

use crate::envfile::apply_env_values;

use super::{
    error_report, require, resolve_target_dir, string_args, ToolContext, ToolError, ToolReport,
};

/// Parameters for initializing a new project environment.
///
/// Every optional field has a concrete default, so a call with only the
/// two required fields produces a fully pinned environment file.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct InitProjectParams {
    /// Host path of the project directory; created if missing (required)
    pub project_path: String,

    /// Environment name passed to the orchestrator (required)
    pub project_name: String,

    /// Environment template, e.g. "magento2"
    pub environment_type: String,

    /// PHP version to pin
    pub php_version: String,

    /// Composer major version to pin
    pub composer_version: String,

    /// Node.js version to pin
    pub node_version: String,

    /// MariaDB version to pin
    pub mariadb_version: String,

    /// Redis version to pin
    pub redis_version: String,

    /// OpenSearch version to pin
    pub opensearch_version: String,

    /// RabbitMQ version to pin
    pub rabbitmq_version: String,

    /// Varnish version to pin
    pub varnish_version: String,

    /// Run a database service
    pub enable_db: bool,

    /// Run a Redis service
    pub enable_redis: bool,

    /// Run an OpenSearch service
    pub enable_opensearch: bool,

    /// Run a RabbitMQ service
    pub enable_rabbitmq: bool,

    /// Run a Varnish service
    pub enable_varnish: bool,
}

impl Default for InitProjectParams {
    fn default() -> Self {
        Self {
            project_path: String::new(),
            project_name: String::new(),
            environment_type: "magento2".to_string(),
            php_version: "8.3".to_string(),
            composer_version: "2".to_string(),
            node_version: "20".to_string(),
            mariadb_version: "10.6".to_string(),
            redis_version: "7.2".to_string(),
            opensearch_version: "2.12".to_string(),
            rabbitmq_version: "3.13".to_string(),
            varnish_version: "7.5".to_string(),
            enable_db: true,
            enable_redis: true,
            enable_opensearch: true,
            enable_rabbitmq: false,
            enable_varnish: false,
        }
    }
}

const LABEL: &str = "Initialize project";

impl ToolContext {
    /// Scaffold a project: create the directory, run `env init`, then pin
    /// every version and service toggle in the project's `.env` file.
    ///
    /// The `.env` pass only happens after a zero exit; a failed init
    /// leaves the directory untouched beyond its creation.
    pub async fn init_project(&self, params: InitProjectParams) -> ToolReport {
        match self.try_init_project(params).await {
            Ok(report) => report,
            Err(err) => error_report(LABEL, &err),
        }
    }

    async fn try_init_project(&self, params: InitProjectParams) -> Result<ToolReport, ToolError> {
        require("project_path", &params.project_path)?;
        require("project_name", &params.project_name)?;
        let dir = resolve_target_dir(&params.project_path)?;
        fs::create_dir_all(&dir)?;

        let args =
            string_args(&["env", "init", &params.project_name, &params.environment_type]);
        let execution = self.execute(args, dir).await?;
        let mut report = execution.report(LABEL);
        if !execution.output.success() {
            return Ok(report);
        }

        let env_path = execution.dir.join(".env");
        let values = env_values(&params);
        apply_env_values(&env_path, &values)?;
        report.text.push_str(&format!(
            "\n\nEnvironment file: {} ({} keys pinned)",
            env_path.display(),
            values.len()
        ));
        Ok(report)
    }
}

fn env_values(params: &InitProjectParams) -> Vec<(String, String)> {
    fn flag(enabled: bool) -> String {
        if enabled { "1" } else { "0" }.to_string()
    }

    vec![
        ("PHP_VERSION".to_string(), params.php_version.clone()),
        ("COMPOSER_VERSION".to_string(), params.composer_version.clone()),
        ("NODE_VERSION".to_string(), params.node_version.clone()),
        ("MARIADB_VERSION".to_string(), params.mariadb_version.clone()),
        ("REDIS_VERSION".to_string(), params.redis_version.clone()),
        ("OPENSEARCH_VERSION".to_string(), params.opensearch_version.clone()),
        ("RABBITMQ_VERSION".to_string(), params.rabbitmq_version.clone()),
        ("VARNISH_VERSION".to_string(), params.varnish_version.clone()),
        ("WARDEN_DB".to_string(), flag(params.enable_db)),
        ("WARDEN_REDIS".to_string(), flag(params.enable_redis)),
        ("WARDEN_OPENSEARCH".to_string(), flag(params.enable_opensearch)),
        ("WARDEN_RABBITMQ".to_string(), flag(params.enable_rabbitmq)),
        ("WARDEN_VARNISH".to_string(), flag(params.enable_varnish)),
    ]
}
