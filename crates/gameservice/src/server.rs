//! `GameServer` builder and accept loop.
//!
//! This is the entry point for running the router. It ties together all
//! the layers: transport → protocol → session → lobby.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use gameservice_lobby::Lobby;
use gameservice_session::{AccountStore, NoopStore, PendingLogins, PlayerRegistry};
use gameservice_transport::{Connection, TcpTransport, Transport};

use crate::handler::handle_connection;
use crate::{DispatchTable, GameServiceError, RouterConfig};

/// State shared by every connection task.
pub struct ServerState<S> {
    pub(crate) registry: PlayerRegistry,
    pub(crate) pending: PendingLogins,
    pub(crate) lobby: Lobby,
    pub(crate) store: S,
    pub(crate) dispatch: DispatchTable<S>,
    pub(crate) config: RouterConfig,
}

impl<S: AccountStore> ServerState<S> {
    pub fn new(config: RouterConfig, store: S) -> Self {
        let ttl = Duration::from_secs(config.session.pending_login_ttl_secs);
        Self {
            registry: PlayerRegistry::new(),
            pending: PendingLogins::new(ttl),
            lobby: Lobby::new(&config.lobby),
            store,
            dispatch: DispatchTable::standard(),
            config,
        }
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn pending(&self) -> &PendingLogins {
        &self.pending
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting the router.
///
/// # Example
///
/// ```rust,no_run
/// use gameservice::prelude::*;
///
/// # async fn run() -> Result<(), GameServiceError> {
/// let server = GameServer::builder()
///     .bind("0.0.0.0:40000")
///     .config(RouterConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GameServerBuilder<S = NoopStore> {
    bind_addr: String,
    config: RouterConfig,
    store: S,
}

impl GameServerBuilder<NoopStore> {
    /// Creates a new builder with default settings and no persistence.
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:40000".to_string(),
            config: RouterConfig::default(),
            store: NoopStore,
        }
    }
}

impl Default for GameServerBuilder<NoopStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AccountStore> GameServerBuilder<S> {
    /// Sets the address to bind the router to.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the account store.
    pub fn store<T: AccountStore>(self, store: T) -> GameServerBuilder<T> {
        GameServerBuilder {
            bind_addr: self.bind_addr,
            config: self.config,
            store,
        }
    }

    /// Binds the listener.
    pub async fn build(self) -> Result<GameServer<S>, GameServiceError> {
        let transport = TcpTransport::bind(&self.bind_addr).await?;
        let state = Arc::new(ServerState::new(self.config, self.store));
        Ok(GameServer { transport, state })
    }
}

// ---------------------------------------------------------------------------
// GameServer
// ---------------------------------------------------------------------------

/// A bound router. Call [`run()`](Self::run) to start accepting.
pub struct GameServer<S = NoopStore> {
    transport: TcpTransport,
    state: Arc<ServerState<S>>,
}

impl GameServer<NoopStore> {
    pub fn builder() -> GameServerBuilder {
        GameServerBuilder::new()
    }
}

impl<S: AccountStore> GameServer<S> {
    pub fn local_addr(&self) -> Result<SocketAddr, GameServiceError> {
        Ok(self.transport.local_addr()?)
    }

    /// Shared state, for inspection while the server runs.
    pub fn state(&self) -> Arc<ServerState<S>> {
        Arc::clone(&self.state)
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each connection runs in its own task, watched by a supervisor task
    /// that logs how it ended. A panic inside one connection closes only
    /// that connection.
    pub async fn run(mut self) -> Result<(), GameServiceError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "router running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let conn_id = conn.id();
                    let peer = conn.peer_addr();
                    tracing::info!(%conn_id, %peer, "connection accepted");

                    let task = tokio::spawn(handle_connection(conn, Arc::clone(&self.state)));
                    tokio::spawn(async move {
                        match task.await {
                            Ok(Ok(())) => {
                                tracing::info!(%conn_id, %peer, "connection closed");
                            }
                            Ok(Err(e)) => {
                                tracing::warn!(%conn_id, %peer, error = %e, "connection ended with error");
                            }
                            Err(e) if e.is_panic() => {
                                tracing::error!(%conn_id, %peer, "connection task panicked");
                            }
                            Err(e) => {
                                tracing::debug!(%conn_id, %peer, error = %e, "connection task cancelled");
                            }
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
