use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "Legacy game service backend: router, CD-key, NAT and discovery", long_about = None)]
pub struct Args {
    /// JSON configuration file. Built-in defaults apply without one.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host advertised to clients for every service
    #[arg(long)]
    pub external_host: Option<String>,

    #[arg(long)]
    pub web_host: Option<String>,
    #[arg(long)]
    pub web_port: Option<u16>,

    #[arg(long)]
    pub router_host: Option<String>,
    #[arg(long)]
    pub router_port: Option<u16>,

    #[arg(long)]
    pub proxy_host: Option<String>,
    #[arg(long)]
    pub proxy_port: Option<u16>,

    #[arg(long)]
    pub irc_host: Option<String>,
    #[arg(long)]
    pub irc_port: Option<u16>,

    #[arg(long)]
    pub nat_port: Option<u16>,
    #[arg(long)]
    pub cdkey_port: Option<u16>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Supported games. Replaces the configured list when given.
    pub games: Vec<String>,
}
