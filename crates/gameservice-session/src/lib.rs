//! Connection sessions and player bookkeeping for the game service.
//!
//! This crate handles everything that lives between a decoded message and
//! a handler's decision:
//!
//! 1. **Sessions** ([`Session`], [`SessionState`]): one per connection,
//!    holding the login state machine and the negotiated keys.
//! 2. **Key exchange** ([`Session::key_exchange`]): RSA public keys first,
//!    then the symmetric key.
//! 3. **Players** ([`Player`], [`PlayerCollection`], [`PlayerRegistry`]):
//!    who is logged in, indexed by id and name.
//! 4. **Staged logins** ([`PendingLogins`]): players between `LOGIN` and
//!    the wait-module confirmation, expiring after a few seconds.
//! 5. **Persistence seam** ([`AccountStore`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Router (above)        ← dispatches messages, owns the registry
//!     ↕
//! Session (this crate)  ← state machine, keys, players
//!     ↕
//! Protocol (below)      ← frames, values, ciphers, PlayerId
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod handshake;
mod pending;
mod player;
mod registry;
mod session;
mod store;

pub use error::SessionError;
pub use handshake::{HandshakeError, SERVER_KEY_LEN};
pub use pending::PendingLogins;
pub use player::{Player, PlayerCollection, Profile};
pub use registry::PlayerRegistry;
pub use session::{Session, SessionConfig, SessionState};
pub use store::{AccountStore, NoopStore};
