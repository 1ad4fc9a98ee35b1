//! Frontline server binary.
//!
//! Binds to `0.0.0.0:$PORT` (default 8080) and runs until terminated.
//! Log verbosity follows `RUST_LOG` (default `info`).

use frontline::{FrontlineError, FrontlineServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), FrontlineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let server = FrontlineServer::builder()
        .bind(&format!("0.0.0.0:{port}"))
        .build()
        .await?;

    if let Ok(addr) = server.local_addr() {
        tracing::info!(%addr, "accepting connections");
    }
    server.run().await
}
