//! Router configuration.

use gameservice_lobby::LobbyConfig;
use gameservice_session::SessionConfig;
use serde::Deserialize;

/// Settings for the router service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Host handed to clients in the `JOINWAITMODULE` reply.
    pub advertised_host: String,

    /// Port handed to clients in the `JOINWAITMODULE` reply.
    pub advertised_port: u16,

    pub session: SessionConfig,
    pub lobby: LobbyConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            advertised_host: "127.0.0.1".to_owned(),
            advertised_port: 40000,
            session: SessionConfig::default(),
            lobby: LobbyConfig::default(),
        }
    }
}
