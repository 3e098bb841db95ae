use anyhow::Result;
use clap::Parser;
use placement_api::{ApiConfig, serve};
use tracing_subscriber::EnvFilter;

use constants::api::DEFAULT_API_PORT;

/// HTTP service receiving placement transforms
#[derive(Parser, Debug)]
#[command(name = "placement-api", version)]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = DEFAULT_API_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();
    serve(ApiConfig::new().with_host(args.host).with_port(args.port)).await
}
