//! Two-phase RSA-to-symmetric key exchange.
//!
//! Both phases arrive as `KEY_EXCHANGE` messages with the payload
//! `[requestId, [args...]]`:
//!
//! 1. `"1"`: the client sends its RSA public key buffer. The server makes
//!    a fresh keypair and answers with its own public key buffer.
//! 2. `"2"`: the client sends its symmetric key, encrypted under the
//!    server's public key. The server installs it and answers with a
//!    server-generated symmetric key encrypted under the client's key.
//!
//! A failed step leaves the session's keys and state as they were.

use gameservice_protocol::crypto::{self, RSA_KEY_BITS};
use gameservice_protocol::value::{list_at, string_at};
use gameservice_protocol::{ProtocolError, SymmetricKey, Value};
use rand_core::OsRng;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};

use crate::{Session, SessionState};

/// Length of the symmetric key the server generates in phase 2.
pub const SERVER_KEY_LEN: usize = 16;

/// Why a key-exchange step was refused.
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    /// The payload is not `[requestId, [args...]]`.
    #[error("malformed key exchange request: {0}")]
    Malformed(#[source] ProtocolError),

    /// The request id is neither `"1"` nor `"2"`.
    #[error("unknown key exchange request {0:?}")]
    UnknownRequest(String),

    /// The args list carries no binary blob.
    #[error("key exchange request carries no key data")]
    MissingKeyData,

    /// Phase 2 arrived before phase 1 completed.
    #[error("key exchange phase 2 before phase 1")]
    OutOfOrder,

    /// The client's public key buffer could not be parsed.
    #[error("invalid client public key: {0}")]
    InvalidPublicKey(#[source] ProtocolError),

    /// Generating the server keypair failed.
    #[error("rsa key generation failed: {0}")]
    KeyGeneration(#[source] rsa::Error),

    /// The client's encrypted symmetric key could not be decrypted.
    #[error("rsa decryption failed: {0}")]
    Decrypt(#[source] rsa::Error),

    /// The server key could not be encrypted for the client.
    #[error("rsa encryption failed: {0}")]
    Encrypt(#[source] rsa::Error),

    /// The decrypted symmetric key has an unusable length.
    #[error("invalid symmetric key: {0}")]
    InvalidSymmetricKey(#[source] ProtocolError),
}

impl Session {
    /// Runs one key-exchange step and returns the reply payload.
    pub fn key_exchange(&mut self, request: &[Value]) -> Result<Vec<Value>, HandshakeError> {
        let request_id = string_at(request, 0).map_err(HandshakeError::Malformed)?;
        let args = list_at(request, 1).map_err(HandshakeError::Malformed)?;

        match request_id {
            "1" => self.exchange_public_keys(args),
            "2" => self.exchange_symmetric_keys(args),
            other => Err(HandshakeError::UnknownRequest(other.to_owned())),
        }
    }

    fn exchange_public_keys(&mut self, args: &[Value]) -> Result<Vec<Value>, HandshakeError> {
        let client_public = crypto::public_key_from_buffer(first_binary(args)?)
            .map_err(HandshakeError::InvalidPublicKey)?;

        let server_private =
            RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).map_err(HandshakeError::KeyGeneration)?;
        let buffer = crypto::public_key_to_buffer(&server_private.to_public_key())
            .map_err(HandshakeError::InvalidPublicKey)?;

        self.keys.client_public = Some(client_public);
        self.keys.server_private = Some(server_private);
        if self.state.is_pre_login() {
            self.state = SessionState::KeyExchanged;
        }
        tracing::debug!(peer = %self.peer(), "public keys exchanged");

        Ok(reply("1", buffer))
    }

    fn exchange_symmetric_keys(&mut self, args: &[Value]) -> Result<Vec<Value>, HandshakeError> {
        let (Some(server_private), Some(client_public)) =
            (&self.keys.server_private, &self.keys.client_public)
        else {
            return Err(HandshakeError::OutOfOrder);
        };

        let decrypted = server_private
            .decrypt(Pkcs1v15Encrypt, first_binary(args)?)
            .map_err(HandshakeError::Decrypt)?;
        let game_key = SymmetricKey::new(decrypted).map_err(HandshakeError::InvalidSymmetricKey)?;

        let server_key = SymmetricKey::new(rand::random::<[u8; SERVER_KEY_LEN]>().to_vec())
            .map_err(HandshakeError::InvalidSymmetricKey)?;
        let sealed = client_public
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, server_key.as_bytes())
            .map_err(HandshakeError::Encrypt)?;

        self.keys.game_key = Some(game_key);
        self.keys.server_key = Some(server_key);
        if self.state.is_pre_login() {
            self.state = SessionState::AwaitingLogin;
        }
        tracing::debug!(peer = %self.peer(), "symmetric keys exchanged");

        Ok(reply("2", sealed))
    }
}

fn first_binary(args: &[Value]) -> Result<&[u8], HandshakeError> {
    args.iter()
        .find_map(Value::as_bytes)
        .ok_or(HandshakeError::MissingKeyData)
}

/// `[requestId, ["1", len, blob]]`
fn reply(request_id: &str, blob: Vec<u8>) -> Vec<Value> {
    vec![
        Value::from(request_id),
        Value::List(vec![
            Value::from("1"),
            Value::String(blob.len().to_string()),
            Value::Binary(blob),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPublicKey;

    struct Client {
        private: RsaPrivateKey,
    }

    impl Client {
        fn new() -> Self {
            Self {
                private: RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).unwrap(),
            }
        }

        fn phase_one(&self) -> Vec<Value> {
            let buffer = crypto::public_key_to_buffer(&self.private.to_public_key()).unwrap();
            vec![
                Value::from("1"),
                Value::List(vec![
                    Value::from("1"),
                    Value::String(buffer.len().to_string()),
                    Value::Binary(buffer),
                ]),
            ]
        }

        fn phase_two(&self, server_public: &RsaPublicKey, key: &[u8]) -> Vec<Value> {
            let sealed = server_public.encrypt(&mut OsRng, Pkcs1v15Encrypt, key).unwrap();
            vec![
                Value::from("2"),
                Value::List(vec![
                    Value::from("1"),
                    Value::String(sealed.len().to_string()),
                    Value::Binary(sealed),
                ]),
            ]
        }
    }

    fn session() -> Session {
        Session::new("192.168.1.20:3000".parse().unwrap())
    }

    fn blob(reply: &[Value]) -> Vec<u8> {
        let args = list_at(reply, 1).unwrap();
        args[2].as_bytes().unwrap().to_vec()
    }

    #[test]
    fn test_full_exchange_installs_client_key() {
        let client = Client::new();
        let mut s = session();

        let reply = s.key_exchange(&client.phase_one()).unwrap();
        assert_eq!(string_at(&reply, 0).unwrap(), "1");
        assert_eq!(s.state(), SessionState::KeyExchanged);

        let server_public = crypto::public_key_from_buffer(&blob(&reply)).unwrap();
        let args = list_at(&reply, 1).unwrap();
        assert_eq!(args[1].as_str(), Some("260"));

        let reply = s
            .key_exchange(&client.phase_two(&server_public, b"client-key-1234"))
            .unwrap();
        assert_eq!(string_at(&reply, 0).unwrap(), "2");
        assert_eq!(s.state(), SessionState::AwaitingLogin);
        assert_eq!(s.game_key().unwrap().as_bytes(), b"client-key-1234");

        // The client can recover the server key with its private key.
        let server_key = client.private.decrypt(Pkcs1v15Encrypt, &blob(&reply)).unwrap();
        assert_eq!(server_key.len(), SERVER_KEY_LEN);
        assert_eq!(s.server_key().unwrap().as_bytes(), &server_key[..]);
    }

    #[test]
    fn test_phase_two_first_is_out_of_order() {
        let client = Client::new();
        let mut s = session();
        let request = client.phase_two(&client.private.to_public_key(), b"abcdefgh");
        assert!(matches!(s.key_exchange(&request), Err(HandshakeError::OutOfOrder)));
        assert_eq!(s.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_unknown_request_id() {
        let mut s = session();
        let request = vec![Value::from("7"), Value::List(vec![])];
        assert!(matches!(
            s.key_exchange(&request),
            Err(HandshakeError::UnknownRequest(id)) if id == "7"
        ));
    }

    #[test]
    fn test_short_key_buffer() {
        let mut s = session();
        let request = vec![
            Value::from("1"),
            Value::List(vec![Value::Binary(vec![0; 40])]),
        ];
        assert!(matches!(
            s.key_exchange(&request),
            Err(HandshakeError::InvalidPublicKey(_))
        ));
        assert_eq!(s.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_missing_key_data() {
        let mut s = session();
        let request = vec![Value::from("1"), Value::List(vec![Value::from("1")])];
        assert!(matches!(s.key_exchange(&request), Err(HandshakeError::MissingKeyData)));
    }

    #[test]
    fn test_malformed_payload() {
        let mut s = session();
        assert!(matches!(
            s.key_exchange(&[Value::from("1")]),
            Err(HandshakeError::Malformed(_))
        ));
    }

    #[test]
    fn test_garbage_ciphertext_fails_to_decrypt() {
        let client = Client::new();
        let mut s = session();
        s.key_exchange(&client.phase_one()).unwrap();

        let request = vec![
            Value::from("2"),
            Value::List(vec![Value::Binary(vec![0x42; 64])]),
        ];
        assert!(matches!(s.key_exchange(&request), Err(HandshakeError::Decrypt(_))));
        assert!(s.game_key().is_none());
        assert_eq!(s.state(), SessionState::KeyExchanged);
    }

    #[test]
    fn test_short_symmetric_key_is_rejected() {
        let client = Client::new();
        let mut s = session();
        let reply = s.key_exchange(&client.phase_one()).unwrap();
        let server_public = crypto::public_key_from_buffer(&blob(&reply)).unwrap();

        let request = client.phase_two(&server_public, b"abc");
        assert!(matches!(
            s.key_exchange(&request),
            Err(HandshakeError::InvalidSymmetricKey(_))
        ));
    }

    #[test]
    fn test_rekey_after_login_keeps_state() {
        let client = Client::new();
        let mut s = session();
        s.bind_player(gameservice_protocol::PlayerId(3)).unwrap();
        s.key_exchange(&client.phase_one()).unwrap();
        assert_eq!(s.state(), SessionState::LoggedIn);
    }
}
