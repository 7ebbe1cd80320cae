//! Where each service can be reached from the outside.

use serde::Deserialize;

/// Addresses advertised to clients in the `gsinit` reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Host clients use for every service.
    pub external_host: String,
    pub router_port: u16,
    pub cdkey_port: u16,
    pub nat_port: u16,
    pub irc_port: u16,
    pub proxy_port: u16,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            external_host: "127.0.0.1".to_owned(),
            router_port: 40000,
            cdkey_port: 44000,
            nat_port: 45000,
            irc_port: 6668,
            proxy_port: 4040,
        }
    }
}

impl DiscoveryConfig {
    /// Renders the `[Servers]` block. Every game receives the same one.
    pub fn servers_block(&self) -> String {
        let host = &self.external_host;
        [
            "[Servers]".to_owned(),
            format!("RouterIP0={host}"),
            format!("RouterPort0={}", self.router_port),
            format!("CDKeyServerIP0={host}"),
            format!("CDKeyServerPort0={}", self.cdkey_port),
            format!("NATServerIP0={host}"),
            format!("NATServerPort0={}", self.nat_port),
            format!("IRCIP0={host}"),
            format!("IRCPort0={}", self.irc_port),
            format!("ProxyIP0={host}"),
            format!("ProxyPort0={}", self.proxy_port),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servers_block_layout() {
        let block = DiscoveryConfig {
            external_host: "203.0.113.4".into(),
            ..Default::default()
        }
        .servers_block();

        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "[Servers]");
        assert_eq!(lines[1], "RouterIP0=203.0.113.4");
        assert_eq!(lines[2], "RouterPort0=40000");
        assert_eq!(lines[4], "CDKeyServerPort0=44000");
        assert_eq!(lines[6], "NATServerPort0=45000");
        assert_eq!(lines[8], "IRCPort0=6668");
        assert_eq!(lines[10], "ProxyPort0=4040");
        assert!(!block.ends_with('\n'));
    }

    #[test]
    fn test_partial_json() {
        let config: DiscoveryConfig = serde_json::from_str(r#"{"nat_port":1}"#).unwrap();
        assert_eq!(config.nat_port, 1);
        assert_eq!(config.router_port, 40000);
    }
}
