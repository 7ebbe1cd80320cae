//! Error types for the CD-key service.

use gameservice_protocol::ProtocolError;

/// Why a datagram was not answered.
#[derive(Debug, thiserror::Error)]
pub enum CdKeyError {
    /// Binding or using the UDP socket failed.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    /// Shorter than the 5-byte header, or than the size it declares.
    #[error("datagram truncated: {len} bytes, expected {expected}")]
    Truncated { len: usize, expected: usize },

    /// The declared payload size exceeds the receive buffer.
    #[error("payload size {0} too large")]
    TooLarge(u32),

    /// Only `SETGROUPSZDATA` datagrams carry CD-key traffic.
    #[error("unsupported message type {0}")]
    UnsupportedType(u8),

    /// The request type is not a number.
    #[error("invalid request type {0:?}")]
    InvalidRequestType(String),

    /// Decryption or value decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
