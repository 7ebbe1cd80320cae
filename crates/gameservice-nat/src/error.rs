//! Error types for the NAT responder.

/// Errors raised while handling NAT-traversal datagrams.
#[derive(Debug, thiserror::Error)]
pub enum NatError {
    /// Binding or using the UDP socket failed.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    /// The datagram ends before the header or window does.
    #[error("packet truncated: {len} bytes, expected {expected}")]
    Truncated { len: usize, expected: usize },
}
