#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive entry point for the MIN explorer tools.
//!
//! Lets users pick between the terminal browser and the dashboard server
//! and guides them through the configuration for each.

use dialoguer::{Input, Select};
use min_explorer_browse::{DEFAULT_DASHBOARD_URL, DeepLink};
use min_explorer_gateway::{AvalancheCanadaClient, GatewayConfig};

/// Top-level tool selection.
enum Tool {
    Browse,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::Browse, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Browse => "Browse observations",
            Self::Server => "Start server",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    println!("MIN Explorer");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Browse => {
            let url: String = Input::new()
                .with_prompt("Dashboard link to restore")
                .default(DEFAULT_DASHBOARD_URL.to_string())
                .interact_text()?;
            let link = DeepLink::parse(&url)?;

            let config = GatewayConfig::from_env()?;
            log::debug!("Browsing {} via {}", config.region, config.base_url);
            let client = AvalancheCanadaClient::new(&config)?;
            min_explorer_browse::interactive::run(&client, link, config.window_days).await?;
        }
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(min_explorer_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}
