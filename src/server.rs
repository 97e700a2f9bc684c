//! MCP server surface: the tool router and the stdio entry point.
//!
//! Each tool method is a thin shim over [`ToolContext`]; the heavy lifting
//! (validation, argv construction, envelope rendering) lives in the tools
//! module so it stays testable without a protocol session.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use tracing::info;

use crate::config::Config;
use crate::executor::{CommandRunner, ProcessRunner};
use crate::tools::{
    ComposerParams, DbQueryParams, InitProjectParams, MagentoCliParams, PhpScriptParams,
    PhpunitParams, ProjectParams, ToolContext,
};

/// Guidance surfaced to the client when it connects.
const INSTRUCTIONS: &str = "This server drives Warden, a Docker-based development \
environment manager, on the local machine. Tools that act on a project take a \
project_path pointing at the project directory on the host; relative paths resolve \
against the server's working directory and a leading ~ expands to the home \
directory. Every result echoes the exact command line that ran, its exit code, and \
the captured stdout and stderr, so a failure can be diagnosed from the reply alone.";

/// The MCP-facing server: one tool per orchestration workflow.
#[derive(Clone)]
pub struct WardenMcpServer {
    ctx: ToolContext,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WardenMcpServer {
    /// Build a server around a configuration and a command runner.
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self { ctx: ToolContext::new(config, runner), tool_router: Self::tool_router() }
    }

    /// Registered tools, for catalog listings outside a live session.
    pub fn catalog(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    #[tool(
        description = "List running Warden environments with their names and project directories"
    )]
    async fn list_environments(&self) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.list_environments().await.into_call_result())
    }

    #[tool(description = "Start the Warden environment for a project directory")]
    async fn start_project(
        &self,
        Parameters(params): Parameters<ProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.start_project(params).await.into_call_result())
    }

    #[tool(description = "Stop the Warden environment for a project directory")]
    async fn stop_project(
        &self,
        Parameters(params): Parameters<ProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.stop_project(params).await.into_call_result())
    }

    #[tool(description = "Start the shared Warden services that sit in front of every environment")]
    async fn start_services(
        &self,
        Parameters(params): Parameters<ProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.start_services(params).await.into_call_result())
    }

    #[tool(description = "Stop the shared Warden services")]
    async fn stop_services(
        &self,
        Parameters(params): Parameters<ProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.stop_services(params).await.into_call_result())
    }

    #[tool(description = "Run a SQL query against the project's database container as root")]
    async fn db_query(
        &self,
        Parameters(params): Parameters<DbQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.db_query(params).await.into_call_result())
    }

    #[tool(description = "Run a PHP script inside the project's php-fpm container")]
    async fn run_php_script(
        &self,
        Parameters(params): Parameters<PhpScriptParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.run_php_script(params).await.into_call_result())
    }

    #[tool(
        description = "Run a bin/magento console command inside the project's php-fpm container"
    )]
    async fn run_magento_cli(
        &self,
        Parameters(params): Parameters<MagentoCliParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.run_magento_cli(params).await.into_call_result())
    }

    #[tool(
        description = "Run PHPUnit inside the project's php-fpm container, auto-detecting phpunit.xml.dist or phpunit.xml when no configuration file is given"
    )]
    async fn run_phpunit(
        &self,
        Parameters(params): Parameters<PhpunitParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.run_phpunit(params).await.into_call_result())
    }

    #[tool(
        description = "Run a composer command inside the project's php-fpm container (composer 2 required)"
    )]
    async fn run_composer(
        &self,
        Parameters(params): Parameters<ComposerParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.run_composer(params).await.into_call_result())
    }

    #[tool(
        description = "Create a project directory, initialize a Warden environment in it, and pin service versions in its .env file"
    )]
    async fn init_project(
        &self,
        Parameters(params): Parameters<InitProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.ctx.init_project(params).await.into_call_result())
    }
}

#[tool_handler]
impl ServerHandler for WardenMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: crate::APP_NAME.to_string(),
                version: crate::VERSION.to_string(),
                ..Implementation::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Serve the MCP protocol over stdin/stdout until the client disconnects.
pub async fn serve_stdio(config: Config) -> anyhow::Result<()> {
    let server = WardenMcpServer::new(config, Arc::new(ProcessRunner));
    info!(
        orchestrator = %server.ctx.config().orchestrator.bin,
        version = crate::VERSION,
        "serving MCP over stdio"
    );

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;
    Ok(())
}
