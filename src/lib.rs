//! # Warden MCP
//!
//! MCP server that lets AI assistants drive Warden-managed development
//! environments on the local machine.
//!
//! The server speaks the Model Context Protocol over stdio and exposes one
//! tool per orchestration workflow. Every tool shells out to the `warden`
//! CLI with a literal argument vector and reports the command line, exit
//! code, and captured output back to the client as plain text.
//!
//! ## Tools
//!
//! - **Lifecycle**: start and stop a project's environment and the shared services
//! - **Discovery**: list running environments with their project directories
//! - **Inside the containers**: SQL queries, PHP scripts, `bin/magento`,
//!   PHPUnit, and composer, all through `warden env exec`
//! - **Scaffolding**: initialize a new project and pin service versions in
//!   its `.env` file
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install warden-mcp
//!
//! # Register the `warden-mcp` binary with your MCP client, or run it
//! # directly (the protocol is spoken on stdin/stdout)
//! warden-mcp serve
//!
//! # Inspect the tool catalog without a client
//! warden-mcp list-tools
//! ```

pub mod config;
pub mod envfile;
pub mod environments;
pub mod executor;
pub mod server;
pub mod tools;

pub use config::Config;
pub use environments::{parse_environment_list, strip_ansi_codes, EnvironmentRecord};
pub use executor::{CommandOutput, CommandRunner, ProcessRunner, RunnerError};
pub use server::{serve_stdio, WardenMcpServer};
pub use tools::{
    ComposerParams, DbQueryParams, InitProjectParams, MagentoCliParams, PhpScriptParams,
    PhpunitParams, ProjectParams, ToolContext, ToolReport,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "warden-mcp";
