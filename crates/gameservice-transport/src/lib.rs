//! Framed connections for the router.
//!
//! The router loop is written against [`Transport`] (accepts clients) and
//! [`Connection`] (moves whole frames). [`TcpTransport`] is the only
//! implementation: a TCP stream cut into frames by
//! [`FrameCodec`](gameservice_protocol::FrameCodec). Frames cross this
//! layer still encrypted; the session opens and seals them.

#![allow(async_fn_in_trait)]

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{TcpConnection, TcpTransport};

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use gameservice_protocol::RawFrame;

static NEXT_CONNECTION: AtomicU64 = AtomicU64::new(1);

/// Process-unique connection number, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocates the next id. Ids start at 1 and are never reused.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener handing out framed client connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// One client link carrying raw frames in both directions.
///
/// `send` and `recv` take `&self` so a reply can be written while another
/// task waits on the next frame.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    async fn send(&self, frame: RawFrame) -> Result<(), Self::Error>;

    /// The next frame, or `Ok(None)` once the peer closed between frames.
    /// A close in the middle of a frame is an error.
    async fn recv(&self) -> Result<Option<RawFrame>, Self::Error>;

    /// Shuts down the sending side; the peer sees end of stream.
    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;

    fn peer_addr(&self) -> SocketAddr;
}
