#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal browser for recent MIN avalanche observations.
//!
//! ```text
//! min_explorer_browse [--url <dashboard link>]
//! min_explorer_browse list
//! min_explorer_browse show <id>
//! ```
//!
//! Running with no subcommand enters interactive mode, restoring the
//! selection carried by `--url` if given.

use clap::{Parser, Subcommand};
use min_explorer_browse::text::{detail_view, header, list_view};
use min_explorer_browse::{DEFAULT_DASHBOARD_URL, DeepLink, Session};
use min_explorer_coordinator::AddressBar;
use min_explorer_gateway::{AvalancheCanadaClient, GatewayConfig};

#[derive(Parser)]
#[command(
    name = "min_explorer_browse",
    about = "Browse recent MIN avalanche observations in the terminal"
)]
struct Cli {
    /// Dashboard link to restore, e.g. `http://127.0.0.1:8080/?observation=<id>`
    #[arg(long, default_value = DEFAULT_DASHBOARD_URL)]
    url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the observation list and exit
    List,
    /// Print one observation and its deep link
    Show {
        /// Submission identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = GatewayConfig::from_env()?;
    let client = AvalancheCanadaClient::new(&config)?;
    let mut link = DeepLink::parse(&cli.url)?;

    let Some(command) = cli.command else {
        return Ok(min_explorer_browse::interactive::run(&client, link, config.window_days).await?);
    };

    match command {
        Commands::List => {
            link.push_selection(None);
            let session = Session::open(&client, link, config.window_days).await?;
            println!("{}", header(session.region(), session.page()));
            print!("{}", list_view(session.page().observations(), None)?);
        }
        Commands::Show { id } => {
            link.push_selection(Some(&id));
            let session = Session::open(&client, link, config.window_days).await?;
            match detail_view(session.coordinator())? {
                Some(detail) => print!("{detail}"),
                None => println!("Observation not found: {id}"),
            }
            println!("\nLink: {}", session.link());
        }
    }

    Ok(())
}
