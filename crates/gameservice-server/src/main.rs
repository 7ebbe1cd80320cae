//! Game service process: runs the router, CD-key, NAT and discovery
//! services plus the chat and proxy stubs.

mod cli;
mod config;
mod stub;

use std::future::Future;

use anyhow::{Context, Result};
use clap::Parser;
use gameservice::GameServer;
use gameservice_cdkey::CdKeyServer;
use gameservice_gsconnect::GsConnectServer;
use gameservice_lobby::GameCatalog;
use gameservice_nat::NatServer;
use tokio::task::JoinSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::config::ServerConfig;
use crate::stub::LineLogger;

type Outcome = (&'static str, Result<()>);

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_args(Args::parse())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        external_host = %config.external_host,
        games = ?config.games,
        "starting game service"
    );

    let mut services = start(&config).await?;

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            info!("shutdown signal received");
        }
        Some(finished) = services.join_next() => {
            let (name, result) = finished.context("service task panicked")?;
            result.with_context(|| format!("{name} service failed"))?;
            anyhow::bail!("{name} service stopped");
        }
    }

    services.shutdown().await;
    Ok(())
}

/// Binds every service, then spawns each one. Binding fails fast so a
/// taken port aborts startup before anything is served.
async fn start(config: &ServerConfig) -> Result<JoinSet<Outcome>> {
    let router = GameServer::builder()
        .bind(config.router.addr())
        .config(config.router_config())
        .build()
        .await
        .with_context(|| format!("failed to bind router on {}", config.router.addr()))?;

    let cdkey = CdKeyServer::bind(config.cdkey.addr())
        .await
        .with_context(|| format!("failed to bind cd-key service on {}", config.cdkey.addr()))?;

    let nat = NatServer::bind(config.nat.addr())
        .await
        .with_context(|| format!("failed to bind nat service on {}", config.nat.addr()))?;

    let web = GsConnectServer::bind(
        config.web.addr(),
        &config.discovery_config(),
        GameCatalog::new(config.games.iter().cloned()),
    )
    .await
    .with_context(|| format!("failed to bind gsconnect on {}", config.web.addr()))?;

    let irc = LineLogger::bind("irc", config.irc.addr())
        .await
        .with_context(|| format!("failed to bind irc stub on {}", config.irc.addr()))?;

    let proxy = LineLogger::bind("proxy", config.proxy.addr())
        .await
        .with_context(|| format!("failed to bind proxy stub on {}", config.proxy.addr()))?;

    let mut services = JoinSet::new();
    services.spawn(named("router", router.run()));
    services.spawn(named("cd-key", cdkey.run()));
    services.spawn(named("nat", nat.run()));
    services.spawn(named("gsconnect", web.run()));
    services.spawn(named("irc", irc.run()));
    services.spawn(named("proxy", proxy.run()));
    Ok(services)
}

async fn named<E>(name: &'static str, service: impl Future<Output = Result<(), E>>) -> Outcome
where
    E: std::error::Error + Send + Sync + 'static,
{
    (name, service.await.map_err(anyhow::Error::from))
}
