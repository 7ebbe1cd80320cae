//! Error types for the protocol layer.
//!
//! Everything in here is fatal for the connection that produced it: a
//! frame that cannot be framed, decrypted, or decoded leaves the byte
//! stream in an unknown position, so the session loop closes instead of
//! trying to resynchronize.

/// Errors that can occur while framing, decrypting or decoding a message.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The underlying stream failed while reading or writing a frame.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The header declared a size beyond [`MAX_PACKET_SIZE`](crate::MAX_PACKET_SIZE).
    #[error("frame size {size} exceeds the maximum packet size")]
    FrameTooLarge { size: usize },

    /// The header declared a size smaller than the header itself.
    #[error("frame size {size} is smaller than the header")]
    FrameTooSmall { size: usize },

    /// The peer closed the stream in the middle of a frame.
    #[error("stream ended with {remaining} bytes of an unfinished frame")]
    Truncated { remaining: usize },

    /// The value payload could not be decoded. There is no resync.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// A decoded list did not have the item the caller asked for.
    #[error("missing field {index}: expected {expected}")]
    MissingField { index: usize, expected: &'static str },

    /// A `GS_ENCRYPT` frame arrived before a symmetric key was installed.
    #[error("symmetric key not initialized")]
    MissingKey,

    /// The symmetric key has a length the cipher does not accept.
    #[error("invalid symmetric key length {0}")]
    InvalidKeyLength(usize),

    /// Ciphertext that is not a whole number of cipher blocks.
    #[error("ciphertext length {0} is not a multiple of the block size")]
    BlockLength(usize),

    /// An RSA public key buffer with the wrong layout.
    #[error("malformed key buffer of {len} bytes")]
    MalformedKeyBuffer { len: usize },

    /// The RSA primitive itself failed (bad padding, key out of range).
    #[error("rsa: {0}")]
    Rsa(#[from] rsa::Error),
}
