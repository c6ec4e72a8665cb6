//! Seller Panel console.
//!
//! An interactive, line-based front-end for the marketplace seller
//! dashboard: sign in, browse the metrics, list and filter products, create
//! and edit them, and change their status.
//!
//! # Usage
//!
//! ```bash
//! # API address from SELLER_PANEL_API_URL (or .env)
//! seller-panel
//!
//! # Explicit API address, starting on the product list
//! seller-panel --api-url http://localhost:3333 --start /products
//! ```
//!
//! Type `help` at the prompt for the commands available on each screen.
//!
//! # Logging
//!
//! Logs go to stderr. `RUST_LOG` overrides the default filter;
//! `SELLER_PANEL_LOG_JSON=1` switches to JSON lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::Parser;
use seller_panel_dashboard::config::DashboardConfig;
use seller_panel_dashboard::navigation::Route;
use tracing_subscriber::EnvFilter;

mod console;

const DEFAULT_LOG_FILTER: &str = "seller_panel_dashboard=info,seller_panel=info";

#[derive(Parser)]
#[command(name = "seller-panel")]
#[command(author, version, about = "Marketplace seller dashboard console")]
struct Cli {
    /// Marketplace API base URL (overrides `SELLER_PANEL_API_URL`)
    #[arg(long)]
    api_url: Option<String>,

    /// Screen to open first, as a path (`/`, `/products`, `/sign-up`, ...)
    #[arg(long, default_value = "/sign-in")]
    start: String,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var_os("SELLER_PANEL_LOG_JSON").is_some() {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Console failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match cli.api_url.as_deref() {
        Some(url) => DashboardConfig::from_env_with_url(url)?,
        None => DashboardConfig::from_env()?,
    };
    tracing::info!(api_url = %config.api_url, "Starting seller console");

    let start = Route::from_path(&cli.start);
    let mut console = console::Console::new(&config, start)?;
    console.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_start_route() {
        let cli = Cli::parse_from(["seller-panel"]);
        assert_eq!(Route::from_path(&cli.start), Route::sign_in());
        assert!(cli.api_url.is_none());
    }
}
