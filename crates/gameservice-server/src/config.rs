//! Process configuration: built-in defaults, an optional JSON file, then
//! command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use gameservice::RouterConfig;
use gameservice_gsconnect::DiscoveryConfig;
use gameservice_lobby::{DEFAULT_GAMES, LobbyConfig};
use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// A listen address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default = "any_host")]
    pub host: String,
    pub port: u16,
}

fn any_host() -> String {
    "0.0.0.0".to_owned()
}

impl Endpoint {
    fn any(port: u16) -> Self {
        Self {
            host: any_host(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub web: Endpoint,
    pub router: Endpoint,
    pub proxy: Endpoint,
    pub irc: Endpoint,
    pub nat: Endpoint,
    pub cdkey: Endpoint,

    /// Supported games, sorted by [`ServerConfig::finish`].
    pub games: Vec<String>,

    /// Host every service is advertised on.
    pub external_host: String,
    pub motd: String,

    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            web: Endpoint::any(80),
            router: Endpoint::any(40000),
            proxy: Endpoint::any(4040),
            irc: Endpoint::any(6668),
            nat: Endpoint::any(45000),
            cdkey: Endpoint::any(44000),
            games: DEFAULT_GAMES.iter().map(|g| g.to_string()).collect(),
            external_host: "127.0.0.1".to_owned(),
            motd: LobbyConfig::default().motd,
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Reads the file named by `--config` if any, then applies the other
    /// flags on top.
    pub fn from_args(args: Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(args).finish())
    }

    fn with_overrides(mut self, args: Args) -> Self {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.external_host, args.external_host);
        set(&mut self.web.host, args.web_host);
        set(&mut self.web.port, args.web_port);
        set(&mut self.router.host, args.router_host);
        set(&mut self.router.port, args.router_port);
        set(&mut self.proxy.host, args.proxy_host);
        set(&mut self.proxy.port, args.proxy_port);
        set(&mut self.irc.host, args.irc_host);
        set(&mut self.irc.port, args.irc_port);
        set(&mut self.nat.port, args.nat_port);
        set(&mut self.cdkey.port, args.cdkey_port);
        set(&mut self.log_level, args.log_level);
        if !args.games.is_empty() {
            self.games = args.games;
        }
        self
    }

    fn finish(mut self) -> Self {
        self.games.sort();
        self.games.dedup();
        self
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            advertised_host: self.external_host.clone(),
            advertised_port: self.router.port,
            lobby: LobbyConfig {
                supported_games: self.games.clone(),
                motd: self.motd.clone(),
            },
            ..Default::default()
        }
    }

    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            external_host: self.external_host.clone(),
            router_port: self.router.port,
            cdkey_port: self.cdkey.port,
            nat_port: self.nat.port,
            irc_port: self.irc.port,
            proxy_port: self.proxy.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gameservice-server").chain(argv.iter().copied()))
            .unwrap()
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_args(args(&[])).unwrap();
        assert_eq!(config.web.addr(), "0.0.0.0:80");
        assert_eq!(config.router.addr(), "0.0.0.0:40000");
        assert_eq!(config.proxy.port, 4040);
        assert_eq!(config.irc.port, 6668);
        assert_eq!(config.nat.port, 45000);
        assert_eq!(config.cdkey.port, 44000);
        assert_eq!(config.external_host, "127.0.0.1");
        assert_eq!(
            config.games,
            [
                "HEROES_5",
                "SPLINTERCELL3PC",
                "SPLINTERCELL3PCADVERS",
                "SPLINTERCELL3PCCOOP",
                "SPLINTERCELL3PS2US",
            ]
        );
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    #[test]
    fn test_cli_overrides() {
        let config = ServerConfig::from_args(args(&[
            "--external-host",
            "203.0.113.8",
            "--router-port",
            "41000",
            "--nat-port",
            "1",
            "ZGAME",
            "AGAME",
        ]))
        .unwrap();

        assert_eq!(config.external_host, "203.0.113.8");
        assert_eq!(config.router.port, 41000);
        assert_eq!(config.router.host, "0.0.0.0");
        assert_eq!(config.nat.port, 1);
        assert_eq!(config.games, ["AGAME", "ZGAME"]);
    }

    #[test]
    fn test_json_sections_fall_back_to_defaults() {
        let config: ServerConfig = serde_json::from_str(
            r#"{"router":{"port":41234},"motd":"hello","games":["B","A","B"]}"#,
        )
        .unwrap();
        let config = config.finish();

        assert_eq!(config.router.host, "0.0.0.0");
        assert_eq!(config.router.port, 41234);
        assert_eq!(config.web.port, 80);
        assert_eq!(config.motd, "hello");
        assert_eq!(config.games, ["A", "B"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ServerConfig::load(Path::new("/nonexistent/gameservice.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    // =========================================================================
    // Derived service configs
    // =========================================================================

    #[test]
    fn test_router_and_discovery_share_the_external_host() {
        let config = ServerConfig::from_args(args(&["--external-host", "198.51.100.3"])).unwrap();

        let router = config.router_config();
        assert_eq!(router.advertised_host, "198.51.100.3");
        assert_eq!(router.advertised_port, 40000);
        assert_eq!(router.lobby.supported_games, config.games);

        let discovery = config.discovery_config();
        assert_eq!(discovery.external_host, "198.51.100.3");
        assert_eq!(discovery.cdkey_port, 44000);
    }
}
