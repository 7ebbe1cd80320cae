//! UDP NAT-traversal responder.
//!
//! Clients open a reliable-UDP (SRP) connection to learn how their NAT
//! maps ports. This service answers each SYN with a SYN|ACK and keeps no
//! per-peer state.

mod error;
pub mod packet;
mod server;

pub use error::NatError;
pub use packet::{SrpPacket, SrpWindow, checksum};
pub use server::{NatServer, handle_packet};
