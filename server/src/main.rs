use anyhow::Result;
use axum::Router;
use clap::Parser;
use nhs_core::DEFAULT_DATASET_FILE;
use server::{build_app, port_or_default, DEFAULT_PORT};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Answer questions by redirecting to the best matching NHS conditions page")]
struct Args {
    /// Port to bind
    #[arg(default_value_t = DEFAULT_PORT.to_string())]
    port: String,
    /// Dataset file written by the crawler
    #[arg(default_value = DEFAULT_DATASET_FILE)]
    dataset: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let port = port_or_default(&args.port);

    let app: Router = match build_app(&args.dataset) {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(%err, dataset = %args.dataset, "unable to load dataset");
            return Err(err);
        }
    };

    let addr: SocketAddr = format!("{}:{}", args.host, port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
