//! The `gsinit.php` route and its HTTP listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use gameservice_lobby::GameCatalog;
use serde::Deserialize;
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::{DiscoveryConfig, GsConnectError};

struct Discovery {
    games: GameCatalog,
    servers: String,
}

#[derive(Debug, Deserialize)]
struct GsInitQuery {
    user: Option<String>,
    dp: Option<String>,
}

/// Builds the discovery routes for `games`.
pub fn router(config: &DiscoveryConfig, games: GameCatalog) -> Router {
    let discovery = Arc::new(Discovery {
        games,
        servers: config.servers_block(),
    });
    Router::new()
        .route("/gsinit.php", get(gsinit))
        .with_state(discovery)
}

async fn gsinit(
    State(discovery): State<Arc<Discovery>>,
    Query(query): Query<GsInitQuery>,
) -> Response {
    let Some(product) = query.dp.filter(|dp| !dp.is_empty()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if !discovery.games.contains(&product) {
        tracing::debug!(%product, "gsinit for unsupported product");
        return StatusCode::NOT_FOUND.into_response();
    }

    let user = query.user.unwrap_or_default();
    tracing::info!(%user, %product, "client connecting");

    (
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CONNECTION, "close"),
        ],
        discovery.servers.clone(),
    )
        .into_response()
}

/// Serves the discovery routes on one TCP listener.
pub struct GsConnectServer {
    listener: TcpListener,
    app: Router,
}

impl GsConnectServer {
    pub async fn bind(
        addr: impl ToSocketAddrs,
        config: &DiscoveryConfig,
        games: GameCatalog,
    ) -> Result<Self, GsConnectError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            app: router(config, games),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, GsConnectError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) -> Result<(), GsConnectError> {
        tracing::info!(addr = ?self.listener.local_addr().ok(), "gsconnect listening");
        axum::serve(self.listener, self.app).await?;
        Ok(())
    }
}
