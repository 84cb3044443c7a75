#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! MIN observation dashboard server.
//!
//! Configuration comes from the environment: `BIND_ADDR`, `PORT`,
//! `MIN_API_BASE_URL`, `MIN_REGION`, `MAP_STYLE_URL`, `MAP_ACCESS_TOKEN`.

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    min_explorer_server::run_server().await?;
    Ok(())
}
