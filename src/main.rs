//! Warden MCP - MCP server for Warden-managed development environments.
//!
//! Serving is the default subcommand; the others exist so the binary can
//! be inspected (tool catalog, effective configuration) without a client.

use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use warden_mcp::{serve_stdio, Config, ProcessRunner, WardenMcpServer, APP_NAME};

/// MCP server for Warden-managed development environments
#[derive(Parser)]
#[command(name = "warden-mcp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Orchestration CLI to invoke instead of `warden`
    #[arg(long, global = true, env = "WARDEN_MCP_BIN", value_name = "PATH")]
    warden_bin: Option<String>,

    /// MySQL root password inside the db container
    #[arg(
        long,
        global = true,
        env = "WARDEN_DB_ROOT_PASSWORD",
        hide_env_values = true,
        value_name = "PASSWORD"
    )]
    db_root_password: Option<String>,

    /// Database used when a query does not name one
    #[arg(long, global = true, env = "WARDEN_DB_NAME", value_name = "NAME")]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP protocol on stdin/stdout (default)
    Serve,

    /// List the tools the server exposes
    ListTools {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the MCP transport
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            serve_stdio(config).await?;
        }
        Some(Commands::ListTools { json }) => {
            cmd_list_tools(config, json)?;
        }
        Some(Commands::Config { path }) => {
            cmd_config(&config, path)?;
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Load configuration and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;

    if let Some(bin) = &cli.warden_bin {
        config.orchestrator.bin = bin.clone();
    }
    if let Some(password) = &cli.db_root_password {
        config.database.root_password = password.clone();
    }
    if let Some(database) = &cli.database {
        config.database.default_database = database.clone();
    }

    Ok(config)
}

/// Print the tool catalog.
fn cmd_list_tools(config: Config, json: bool) -> Result<()> {
    let server = WardenMcpServer::new(config, Arc::new(ProcessRunner));
    let mut tools = server.catalog();
    tools.sort_by(|a, b| a.name.cmp(&b.name));

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
    } else {
        for tool in &tools {
            println!("{:<18} {}", tool.name, tool.description.as_deref().unwrap_or(""));
        }
    }

    Ok(())
}

/// Show configuration with the database credential masked.
fn cmd_config(config: &Config, show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::consulted_path() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let mut display = config.clone();
    display.database.root_password = config.database.masked_password();
    let toml = toml::to_string_pretty(&display)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
}
