//! ingress-pilot: A terminal UI for inspecting ingress-nginx controllers

mod config;

use clap::Parser;
use color_eyre::Result;
use ingress_nginx_rs::kubectl::KubectlCli;
use ingress_pilot_tui::App;
use std::fs::File;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// ingress-pilot: Terminal UI for ingress-nginx controllers
#[derive(Parser, Debug)]
#[command(name = "ingress-pilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Namespace of the ingress-nginx controller deployment
    #[arg(short, long)]
    namespace: Option<String>,

    /// Name of the ingress-nginx controller deployment
    #[arg(short, long)]
    deployment: Option<String>,

    /// Path to the config file (default: <config_dir>/ingress-pilot/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// kubectl program to invoke
    #[arg(long, default_value = "kubectl")]
    kubectl: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Log file path (default: <temp_dir>/ingress-pilot.log)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging to file (not stdout, which would corrupt TUI)
    let log_path = resolve_log_path(cli.log_file);
    let log_file = File::create(&log_path)?;

    let filter = if cli.debug {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(true)
                .with_target(false),
        )
        .with(filter)
        .init();

    tracing::info!("Starting ingress-pilot");

    // Resolve the controller locator once: flag > config file > default
    let file_config = config::load(cli.config.as_deref())?;
    let locator = config::resolve_locator(cli.namespace, cli.deployment, file_config);
    tracing::info!(
        namespace = %locator.namespace,
        deployment = %locator.deployment,
        "Resolved controller locator"
    );

    // Run the TUI
    let mut app = App::new(KubectlCli::new(cli.kubectl), locator);
    app.run().await?;

    tracing::info!("Goodbye!");
    Ok(())
}

/// Resolve the log file path, falling back to the platform temp directory.
fn resolve_log_path(log_file: Option<String>) -> PathBuf {
    match log_file {
        Some(path) => PathBuf::from(path),
        None => std::env::temp_dir().join("ingress-pilot.log"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_path_uses_temp_dir() {
        let path = resolve_log_path(None);
        let expected = std::env::temp_dir().join("ingress-pilot.log");
        assert_eq!(path, expected);
    }

    #[test]
    fn explicit_log_path_is_used() {
        let custom = "/some/custom/path.log".to_string();
        let path = resolve_log_path(Some(custom.clone()));
        assert_eq!(path, PathBuf::from(custom));
    }
}
