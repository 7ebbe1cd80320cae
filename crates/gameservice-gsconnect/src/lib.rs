//! HTTP discovery endpoint.
//!
//! Before touching the router, a client fetches
//! `/gsinit.php?user=<name>&dp=<product>` and reads back an INI
//! `[Servers]` block naming the router, CD-key, NAT, chat and proxy
//! addresses. Unknown products get a 404, a missing product a 400.

mod config;
mod error;
mod server;

pub use config::DiscoveryConfig;
pub use error::GsConnectError;
pub use server::{GsConnectServer, router};
