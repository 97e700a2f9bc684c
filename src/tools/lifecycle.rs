//! Environment discovery and lifecycle tools.

use serde::Deserialize;

use rmcp::schemars;

use crate::environments::parse_environment_list;

use super::{
    command_report, error_report, require, resolve_project_dir, string_args, Execution,
    ToolContext, ToolError, ToolReport,
};

/// Parameters naming the target project.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ProjectParams {
    /// Host path of the project directory (required)
    #[serde(default)]
    pub project_path: String,
}

const LIST_LABEL: &str = "Warden environments";

impl ToolContext {
    /// List running environments parsed from the status listing.
    pub async fn list_environments(&self) -> ToolReport {
        match self.try_list_environments().await {
            Ok(report) => report,
            Err(err) => error_report(LIST_LABEL, &err),
        }
    }

    async fn try_list_environments(&self) -> Result<ToolReport, ToolError> {
        let args = string_args(&["status"]);
        let dir = std::env::current_dir()?;
        let output = self.run_warden(&args, &dir).await?;
        let command_line = self.command_line(&args);

        if !output.success() {
            return Ok(command_report(LIST_LABEL, &command_line, &dir, &output));
        }

        let records = parse_environment_list(&output.stdout);
        let mut text =
            format!("{LIST_LABEL}\n\n$ {command_line}\nExit code: {}\n\n", output.exit_code);

        if records.is_empty() {
            text.push_str("No running environments found.");
        } else {
            text.push_str(&format!("Found {} environment(s):\n", records.len()));
            let width = records.iter().map(|r| r.name.len()).max().unwrap_or(0);
            for record in &records {
                text.push_str(&format!("  {:<width$}  {}\n", record.name, record.path));
            }
            text.truncate(text.trim_end().len());
        }

        Ok(ToolReport { text, is_error: false })
    }

    /// Bring a project's environment up (`env up`).
    pub async fn start_project(&self, params: ProjectParams) -> ToolReport {
        self.lifecycle("Start project", &["env", "up"], &params.project_path).await
    }

    /// Take a project's environment down (`env down`).
    pub async fn stop_project(&self, params: ProjectParams) -> ToolReport {
        self.lifecycle("Stop project", &["env", "down"], &params.project_path).await
    }

    /// Start the shared service containers (`svc up`).
    pub async fn start_services(&self, params: ProjectParams) -> ToolReport {
        self.lifecycle("Start services", &["svc", "up"], &params.project_path).await
    }

    /// Stop the shared service containers (`svc down`).
    pub async fn stop_services(&self, params: ProjectParams) -> ToolReport {
        self.lifecycle("Stop services", &["svc", "down"], &params.project_path).await
    }

    async fn lifecycle(&self, label: &str, subcommand: &[&str], project_path: &str) -> ToolReport {
        match self.try_lifecycle(subcommand, project_path).await {
            Ok(execution) => execution.report(label),
            Err(err) => error_report(label, &err),
        }
    }

    async fn try_lifecycle(
        &self,
        subcommand: &[&str],
        project_path: &str,
    ) -> Result<Execution, ToolError> {
        require("project_path", project_path)?;
        let dir = resolve_project_dir(project_path)?;
        Ok(self.execute(string_args(subcommand), dir).await?)
    }
}
