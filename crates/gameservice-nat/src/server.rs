//! The UDP receive loop.

use std::net::SocketAddr;

use tokio::net::{ToSocketAddrs, UdpSocket};

use crate::packet::{BUFFER_SIZE, SrpPacket};
use crate::NatError;

/// Answers SRP connection attempts so clients can detect their NAT type.
pub struct NatServer {
    socket: UdpSocket,
}

impl NatServer {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, NatError> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NatError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receives forever. Bad packets are logged and dropped.
    pub async fn run(self) -> Result<(), NatError> {
        tracing::info!(addr = ?self.socket.local_addr().ok(), "nat service listening");
        let mut buf = [0u8; BUFFER_SIZE];

        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    tracing::error!(error = %e, "nat receive failed");
                    continue;
                }
            };

            match handle_packet(&buf[..len]) {
                Ok(Some(reply)) => {
                    if let Err(e) = self.socket.send_to(&reply, peer).await {
                        tracing::warn!(%peer, error = %e, "nat send failed");
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(%peer, error = %e, "nat packet dropped"),
            }
        }
    }
}

/// Builds the reply to one datagram. Only SYN packets are answered.
pub fn handle_packet(bytes: &[u8]) -> Result<Option<[u8; 20]>, NatError> {
    let Some(packet) = SrpPacket::parse(bytes)? else {
        return Ok(None);
    };
    tracing::debug!(%packet, "-> nat");

    if !packet.is_syn() {
        return Ok(None);
    }
    let reply = packet.syn_ack();
    tracing::debug!(packet = %reply, "<- nat");
    Ok(Some(reply.to_bytes()))
}
