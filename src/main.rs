//! rt-rest - command line access to a Request Tracker instance
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `RT_BASE_URL`: Base URL of the RT instance
//! - `RT_AUTH_TOKEN`, or `RT_USERNAME` and `RT_PASSWORD`
//!
//! # Usage
//!
//! ```bash
//! rt-rest info
//! rt-rest ticket 42
//! rt-rest history 42
//! rt-rest search 'Queue = "General" AND Status = "open"'
//! rt-rest parse response.txt
//! ```

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use rt_rest::config::Config;
use rt_rest::legacy;
use rt_rest::models::{Pagination, TicketQuery};
use rt_rest::rt_client::RtClient;

const USAGE: &str = "usage: rt-rest <info | ticket <id> | history <id> | search <TicketSQL> | parse <file>>";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the JSON output
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rt_rest=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (command.as_str(), rest),
        None => bail!(USAGE),
    };

    if command == "parse" {
        let [file] = rest else { bail!(USAGE) };
        let body = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file))?;
        let output = serde_json::json!({
            "status": legacy::parse_status_code(&body),
            "records": legacy::parse(&body),
        });
        return print_json(&output);
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!("Configuration loaded, base_url: {}", config.base_url);

    let client = RtClient::connect(&config)
        .await
        .context("Failed to connect to RT")?;

    match (command, rest) {
        ("info", []) => print_json(&client.rt_info().await?),
        ("ticket", [id]) => print_json(&client.ticket().get(id).await?),
        ("history", [id]) => print_json(&client.ticket().history(id, Pagination::new()).await?),
        ("search", [query]) => print_json(
            &client
                .ticket()
                .search(&TicketQuery::sql(query.as_str()), Pagination::new())
                .await?,
        ),
        _ => bail!(USAGE),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", text);
    Ok(())
}
