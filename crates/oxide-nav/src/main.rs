//! oxide-nav CLI
//!
//! Command-line tool for trying out route templates.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use serde_json::Value;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_nav::{CompiledRoute, MemoryHost, Router, RouterConfig};

/// Route template matching and navigation.
#[derive(Parser)]
#[command(name = "oxide-nav")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match paths against a single template.
    Check {
        /// Route template, e.g. `users/:id:int`.
        template: String,

        /// Paths to test.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Register templates and navigate to a URL.
    Navigate {
        /// Full URL to navigate to.
        #[arg(short, long)]
        url: String,

        /// Application name used to derive the base URL.
        #[arg(short, long, env = "OXIDE_NAV_APP")]
        app: String,

        /// Explicit base URL.
        #[arg(short, long)]
        base_url: Option<String>,

        /// JSON router configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Templates to register.
        #[arg(short, long = "route", required = true)]
        routes: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Check { template, paths } => {
            let route = CompiledRoute::compile(&template)?;
            info!("Pattern: {}", route.matcher().as_str());

            for path in paths {
                println!("{}", serde_json::to_string(&check_report(&route, &path))?);
            }
        }

        Commands::Navigate {
            url,
            app,
            base_url,
            config,
            routes,
        } => {
            let router_config = load_config(config, base_url)?;
            let host = Arc::new(MemoryHost::new(url, app));
            let router = Router::with_config(host, router_config)?;
            info!("Base URL: {}", router.base_url());

            let templates: Vec<&str> = routes.iter().map(String::as_str).collect();
            router.on_route_match(&templates, |event| {
                let report = json!({
                    "template": event.template(),
                    "values": event.values(),
                });
                println!("{}", serde_json::to_string(&report)?);
                Ok(())
            })?;

            match router.navigate()? {
                Some(navigation) => {
                    println!("{}", serde_json::to_string_pretty(&navigation)?);
                    if !navigation.is_match() {
                        info!("No route matched {}", navigation.path);
                    }
                }
                None => info!("URL is outside {}, nothing to do", router.base_url()),
            }
        }
    }

    Ok(())
}

/// Builds the `check` report for one path.
fn check_report(route: &CompiledRoute, path: &str) -> Value {
    json!({
        "path": path,
        "matches": route.matches(path),
        "values": route.values(path),
    })
}

/// Reads the configuration file, if any, and applies `--base-url`.
fn load_config(
    config: Option<PathBuf>,
    base_url: Option<String>,
) -> anyhow::Result<RouterConfig> {
    let mut router_config = match config {
        Some(path) => RouterConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => RouterConfig::default(),
    };
    if let Some(base_url) = base_url {
        router_config = router_config.base_url(base_url);
    }
    Ok(router_config)
}
