//! `FrontlineServer` builder and accept loop.
//!
//! This is the entry point for running a Frontline combat server. It
//! ties together the layers: transport → protocol → arena. One arena
//! actor serves every connection the transport accepts.

use frontline_arena::{ArenaConfig, ArenaHandle, spawn_arena};
use frontline_transport::{Transport, WebSocketTransport};

use crate::FrontlineError;
use crate::handler::handle_connection;

/// Builder for configuring and starting a Frontline server.
///
/// # Example
///
/// ```rust,no_run
/// use frontline::prelude::*;
///
/// # async fn run() -> Result<(), FrontlineError> {
/// let server = FrontlineServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct FrontlineServerBuilder {
    bind_addr: String,
    arena_config: ArenaConfig,
}

impl FrontlineServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            arena_config: ArenaConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the arena configuration (timer periods, world bounds).
    pub fn arena_config(mut self, config: ArenaConfig) -> Self {
        self.arena_config = config;
        self
    }

    /// Binds the listener and starts the arena actor.
    pub async fn build(self) -> Result<FrontlineServer, FrontlineError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let arena = spawn_arena(self.arena_config);
        Ok(FrontlineServer { transport, arena })
    }
}

impl Default for FrontlineServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Frontline combat server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FrontlineServer {
    transport: WebSocketTransport,
    arena: ArenaHandle,
}

impl FrontlineServer {
    /// Creates a new builder.
    pub fn builder() -> FrontlineServerBuilder {
        FrontlineServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns a handle to the arena, e.g. for querying [`stats`].
    ///
    /// [`stats`]: ArenaHandle::stats
    pub fn arena(&self) -> &ArenaHandle {
        &self.arena
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), FrontlineError> {
        tracing::info!("Frontline server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let arena = self.arena.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, arena).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
