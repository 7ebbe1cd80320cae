//! # gameservice
//!
//! Router for a legacy online game service.
//!
//! Game clients connect over TCP, exchange keys, log in through a
//! two-connection wait-module flow and join a game's lobby. This crate
//! owns the dispatch table, the handlers and the per-connection loop; the
//! layers below it live in their own crates:
//!
//! ```text
//! gameservice            ← dispatch, handlers, connection loop (this crate)
//!   gameservice-lobby    ← lobby sub-protocol, supported games
//!   gameservice-session  ← session state, key exchange, player registry
//!   gameservice-transport← framed TCP connections
//!   gameservice-protocol ← header, values, ciphers
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gameservice::prelude::*;
//!
//! # async fn start() -> Result<(), GameServiceError> {
//! let server = GameServer::builder().bind("0.0.0.0:40000").build().await?;
//! server.run().await
//! # }
//! ```

mod config;
mod dispatch;
mod error;
mod handler;
mod handlers;
mod server;

pub use config::RouterConfig;
pub use dispatch::{DispatchTable, Failure, HandlerFn, HandlerResult, LobbyHandlerFn};
pub use error::GameServiceError;
pub use server::{GameServer, GameServerBuilder, ServerState};

/// Everything needed to embed the router.
pub mod prelude {
    pub use crate::{
        DispatchTable, Failure, GameServer, GameServerBuilder, GameServiceError, RouterConfig,
        ServerState,
    };
    pub use gameservice_lobby::{LobbyConfig, LobbyMessageType};
    pub use gameservice_protocol::{Message, MessageType, PlayerId, Property, RouterErrorCode, Value};
    pub use gameservice_session::{AccountStore, NoopStore, Player, SessionConfig, SessionError};
}
