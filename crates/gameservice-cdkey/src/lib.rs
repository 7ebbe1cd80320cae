//! UDP CD-key service.
//!
//! Game clients validate their CD key with a few request/response
//! datagrams before they log in. The datagrams reuse the router's value
//! codec and block cipher, with one fixed key shared by every client.
//! This service accepts every key.

mod error;
mod handlers;
pub mod message;
mod server;

pub use error::CdKeyError;
pub use handlers::respond;
pub use message::{Datagram, Request, RequestType};
pub use server::{CdKeyServer, handle_datagram};
