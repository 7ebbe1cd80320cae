//! Wire protocol for the game service.
//!
//! This crate defines everything between raw bytes and decoded messages:
//!
//! - **Header** ([`FrameHeader`], [`Property`]): the fixed 6-byte frame
//!   header and the per-frame encryption mode.
//! - **Codec** ([`FrameCodec`]): splits a byte stream into [`RawFrame`]s.
//! - **Values** ([`Value`], [`value`]): the tagged string/binary/list
//!   payload format.
//! - **Ciphers** ([`scramble`], [`SymmetricKey`]): the fixed obfuscation
//!   cipher and the session block cipher, plus the RSA key buffer layout
//!   used by the handshake.
//! - **Messages** ([`Message`], [`MessageType`], [`RouterErrorCode`]).
//!
//! ```text
//! bytes → FrameCodec → RawFrame → Message::open → Message
//! Message → Message::seal → RawFrame → FrameCodec → bytes
//! ```
//!
//! It knows nothing about connections or players.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
pub mod crypto;
mod error;
mod header;
mod message;
pub mod scramble;
mod types;
pub mod value;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::{FrameCodec, RawFrame};
pub use crypto::SymmetricKey;
pub use error::ProtocolError;
pub use header::{FrameHeader, HEADER_SIZE, MAX_PACKET_SIZE, Property};
pub use message::Message;
pub use types::{MessageType, PlayerId, RouterErrorCode, target, type_name};
pub use value::Value;
