mod domain;
mod error;
mod formulas;
mod hlm;
mod rep_max;
mod server;
mod wendler;

use std::net::IpAddr;

use anyhow::{Context, Result};
use clap::Parser;

use crate::server::ServerConfig;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:8080,http://192.168.1.129:8080,http://localhost:8000";

/// Strength training load calculator: 1RM tables, HLM and 5/3/1 programs.
#[derive(Parser, Debug)]
#[command(name = "liftcalc")]
#[command(about = "JSON API for 1RM estimates and strength training programs")]
#[command(version)]
struct Args {
    /// Address to bind the web server to.
    /// Can also be set via LIFTCALC_HOST environment variable.
    #[arg(long, value_name = "HOST", env = "LIFTCALC_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port number for the web server.
    /// Can also be set via LIFTCALC_PORT environment variable.
    #[arg(long, value_name = "PORT", env = "LIFTCALC_PORT", default_value = "9000")]
    port: u16,

    /// Comma-separated origins allowed by CORS, or `*` for any.
    /// Can also be set via LIFTCALC_CORS_ORIGINS environment variable.
    #[arg(
        long,
        value_name = "ORIGINS",
        env = "LIFTCALC_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_CORS_ORIGINS
    )]
    cors_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    log::info!("Allowed CORS origins: {}", args.cors_origins.join(", "));

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        cors_origins: args.cors_origins,
    };

    server::run_server(config)
        .await
        .with_context(|| format!("Server failed on {}:{}", args.host, args.port))?;

    Ok(())
}
