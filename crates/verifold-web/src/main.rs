//! Verifold Web Server
//!
//! Run with: cargo run -p verifold-web

use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verifold_engine::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Verifold Web Server...");

    let config = Config::load_or_default();
    let addr: SocketAddr = config.web.bind_addr.parse()?;

    let state = verifold_web::state::AppState::new(config).await?;
    let app = verifold_web::router::build_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
