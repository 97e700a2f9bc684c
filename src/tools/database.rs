//! Database query tool: `mysql` through the environment's db container.

use serde::Deserialize;

use rmcp::schemars;

use super::{
    error_report, require, resolve_project_dir, string_args, Execution, ToolContext, ToolError,
    ToolReport,
};

/// Parameters for a SQL statement against the db service.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct DbQueryParams {
    /// Host path of the project directory (required)
    #[serde(default)]
    pub project_path: String,

    /// SQL to execute, passed verbatim as one argument (required)
    #[serde(default)]
    pub query: String,

    /// Database name; the configured default database when omitted
    pub database: Option<String>,
}

const LABEL: &str = "Database query";

impl ToolContext {
    /// Run a SQL statement as root inside the db container.
    pub async fn db_query(&self, params: DbQueryParams) -> ToolReport {
        match self.try_db_query(params).await {
            Ok(execution) => execution.report(LABEL),
            Err(err) => error_report(LABEL, &err),
        }
    }

    async fn try_db_query(&self, params: DbQueryParams) -> Result<Execution, ToolError> {
        require("project_path", &params.project_path)?;
        require("query", &params.query)?;
        let dir = resolve_project_dir(&params.project_path)?;

        let db = &self.config().database;
        let password_arg = format!("-p{}", db.root_password);
        let database = params
            .database
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| db.default_database.clone());

        let mut args = string_args(&["env", "exec", "-T", "db", "mysql", "-u", "root"]);
        args.push(password_arg.clone());
        args.push(database);
        args.push("-e".to_string());
        args.push(params.query);

        let mut execution = self.execute(args, dir).await?;
        // The echoed command line must not leak the credential
        execution.command_line = execution.command_line.replace(&password_arg, "-p****");
        Ok(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{stub_context, stub_context_with};
    use super::*;
    use crate::config::Config;

    fn params(path: &std::path::Path, query: &str, database: Option<&str>) -> DbQueryParams {
        DbQueryParams {
            project_path: path.display().to_string(),
            query: query.to_string(),
            database: database.map(ToString::to_string),
        }
    }

    #[tokio::test]
    async fn test_builds_exact_argument_vector() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();

        let report = ctx.db_query(params(temp.path(), "SELECT 1", Some("magento"))).await;

        assert!(!report.is_error);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args,
            vec![
                "env", "exec", "-T", "db", "mysql", "-u", "root", "-pmagento", "magento", "-e",
                "SELECT 1",
            ]
        );
        assert_eq!(calls[0].dir, temp.path());
    }

    #[tokio::test]
    async fn test_database_defaults_from_config() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.default_database = "shop".to_string();
        let (ctx, runner) = stub_context_with(config);

        ctx.db_query(params(temp.path(), "SHOW TABLES", None)).await;

        let args = &runner.calls()[0].args;
        assert!(args.contains(&"shop".to_string()));
        assert!(!args.contains(&"magento".to_string()));
    }

    #[tokio::test]
    async fn test_password_comes_from_config() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.root_password = "s3cret".to_string();
        let (ctx, runner) = stub_context_with(config);

        ctx.db_query(params(temp.path(), "SELECT 1", None)).await;

        assert!(runner.calls()[0].args.contains(&"-ps3cret".to_string()));
    }

    #[tokio::test]
    async fn test_envelope_masks_the_credential() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _runner) = stub_context();

        let report = ctx.db_query(params(temp.path(), "SELECT 1", None)).await;

        assert!(report.text.contains("-p****"));
        assert!(!report.text.contains("-pmagento"));
    }

    #[tokio::test]
    async fn test_blank_query_spawns_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();

        let report = ctx.db_query(params(temp.path(), "  ", None)).await;

        assert!(report.is_error);
        assert!(report.text.contains("Invalid input: query"));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_project_spawns_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let gone = temp.path().join("gone");
        let (ctx, runner) = stub_context();

        let report = ctx.db_query(params(&gone, "SELECT 1", None)).await;

        assert!(report.is_error);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_database_falls_back_to_default() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, runner) = stub_context();

        ctx.db_query(params(temp.path(), "SELECT 1", Some(""))).await;

        assert!(runner.calls()[0].args.contains(&"magento".to_string()));
    }
}
