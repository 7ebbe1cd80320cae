//! Chat and proxy placeholders: accept TCP clients, log what they send,
//! never answer.

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

pub struct LineLogger {
    service: &'static str,
    listener: TcpListener,
}

impl LineLogger {
    pub async fn bind(service: &'static str, addr: impl ToSocketAddrs) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { service, listener })
    }

    #[cfg(test)]
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) -> io::Result<()> {
        let service = self.service;
        tracing::info!(service, addr = ?self.listener.local_addr().ok(), "stub listening");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tokio::spawn(log_lines(service, stream, peer));
                }
                Err(e) => tracing::error!(service, error = %e, "accept failed"),
            }
        }
    }
}

async fn log_lines(service: &'static str, stream: TcpStream, peer: SocketAddr) {
    tracing::info!(service, %peer, "client connected");
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                tracing::debug!(service, %peer, "<- {}", text.trim_end());
            }
            Err(e) => {
                tracing::debug!(service, %peer, error = %e, "read failed");
                break;
            }
        }
    }
    tracing::info!(service, %peer, "client disconnected");
}
