use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

use crate::params::ParamMap;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;

/// Command-line interface for the waymark router
#[derive(Parser, Debug)]
#[command(name = "waymark")]
#[command(about = "Match requests and generate URLs from a route table", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List routes in matching order
    Routes {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "WAYMARK_ROUTES")]
        table: Option<PathBuf>,
    },
    /// Match a request and print the resulting parameters as JSON
    Match {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "WAYMARK_ROUTES")]
        table: Option<PathBuf>,

        /// HTTP method
        method: String,

        /// Request path
        path: String,
    },
    /// Generate the URL of a named route
    Url {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "WAYMARK_ROUTES")]
        table: Option<PathBuf>,

        /// Route name
        name: String,

        /// Parameters as key=value
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
}

fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{arg}'")),
    }
}

fn load_router(table: Option<PathBuf>) -> anyhow::Result<(Router, RuntimeConfig)> {
    let config = RuntimeConfig {
        routes_file: table,
        ..RuntimeConfig::from_env()
    };
    let router = config.load_router()?;
    Ok((router, config))
}

/// Execute `cli`, writing results to `out`.
///
/// # Errors
///
/// Fails when the table cannot be loaded, the method is not acceptable,
/// nothing matches, or URL generation fails.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command {
        Commands::Routes { table } => {
            let (router, _) = load_router(table)?;
            for route in router.routes() {
                let defaults = serde_json::to_string(route.default_params())?;
                writeln!(out, "{:<20} /{:<32} {}", route.name(), route.template(), defaults)?;
            }
        }
        Commands::Match {
            table,
            method,
            path,
        } => {
            let (router, config) = load_router(table)?;
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method '{method}'"))?;
            if !config.allows(&method) {
                bail!("method {method} is not routed when WAYMARK_STRICT_METHODS is set");
            }
            let matched = router.match_request(&method, &path)?;
            let body = json!({
                "route": matched.route_name,
                "params": matched.params,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        }
        Commands::Url {
            table,
            name,
            params,
        } => {
            let (router, _) = load_router(table)?;
            let params: ParamMap = params.into_iter().collect();
            let url = router
                .url(&name, &params)
                .with_context(|| format!("Cannot build URL for '{name}'"))?;
            writeln!(out, "/{url}")?;
        }
    }
    Ok(())
}

/// Parse the process arguments and run the selected command on stdout.
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}
