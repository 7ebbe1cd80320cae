//! CD-key datagram layout.
//!
//! ```text
//! +------+-----------------+------------------------------------+
//! | type | size (u32, BE)  | Blowfish(fixed key, value list)    |
//! +------+-----------------+------------------------------------+
//!   1 B        4 B                     size bytes
//! ```
//!
//! The value list is `[messageId, requestType, unknown, [inner...]]`.

use gameservice_protocol::value::{self, string_at};
use gameservice_protocol::{MessageType, SymmetricKey, Value};

use crate::CdKeyError;

/// Key every CD-key datagram is encrypted with.
pub const CDKEY_KEY: &[u8] = b"SKJDHF$0maoijfn4i8$aJdnv1jaldifar93-AS_dfo;hjhC4jhflasnF3fnd";

pub const HEADER_SIZE: usize = 5;

/// Largest accepted encrypted payload.
pub const MAX_PAYLOAD: usize = 512;

/// Requests a CD-key client can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RequestType {
    Challenge = 1,
    Activation = 2,
    Auth = 3,
    Validation = 4,
    PlayerStatus = 5,
    DisconnectUser = 6,
    StillAlive = 7,
}

impl RequestType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Challenge),
            2 => Some(Self::Activation),
            3 => Some(Self::Auth),
            4 => Some(Self::Validation),
            5 => Some(Self::PlayerStatus),
            6 => Some(Self::DisconnectUser),
            7 => Some(Self::StillAlive),
            _ => None,
        }
    }
}

/// Player status reported by a validation reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlayerStatus {
    Unknown = 0,
    Invalid = 1,
    Valid = 2,
}

// ---------------------------------------------------------------------------
// Datagram
// ---------------------------------------------------------------------------

/// A decrypted CD-key datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub msg_type: u8,
    pub data: Vec<Value>,
}

impl Datagram {
    /// Decrypts and decodes one datagram.
    ///
    /// Returns `Ok(None)` for the empty keep-alive form (type or size 0).
    pub fn parse(bytes: &[u8], key: &SymmetricKey) -> Result<Option<Self>, CdKeyError> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(CdKeyError::Truncated {
                len: bytes.len(),
                expected: HEADER_SIZE,
            });
        };
        let msg_type = header[0];
        let size = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);

        if msg_type == 0 || size == 0 {
            return Ok(None);
        }
        if size as usize > MAX_PAYLOAD {
            return Err(CdKeyError::TooLarge(size));
        }

        let end = HEADER_SIZE + size as usize;
        let payload = bytes.get(HEADER_SIZE..end).ok_or(CdKeyError::Truncated {
            len: bytes.len(),
            expected: end,
        })?;
        let data = value::decode_padded(&key.decrypt(payload)?)?;

        Ok(Some(Self { msg_type, data }))
    }

    /// Encodes, encrypts and frames the datagram.
    pub fn to_bytes(&self, key: &SymmetricKey) -> Vec<u8> {
        let payload = key.encrypt(&value::encode(&self.data));
        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.push(self.msg_type);
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&payload);
        out
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// The value list of a request datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub message_id: String,
    pub request_type: u8,
    pub unknown: String,
    pub inner: Vec<Value>,
}

impl Request {
    /// Reads `[messageId, requestType, unknown?, inner?]`. Keep-alives
    /// usually omit the last two.
    pub fn from_data(data: &[Value]) -> Result<Self, CdKeyError> {
        let message_id = string_at(data, 0)?.to_owned();
        let raw_type = string_at(data, 1)?;
        let request_type = raw_type
            .parse::<u8>()
            .map_err(|_| CdKeyError::InvalidRequestType(raw_type.to_owned()))?;
        let unknown = data
            .get(2)
            .and_then(Value::as_str)
            .unwrap_or("0")
            .to_owned();
        let inner = data
            .get(3)
            .and_then(Value::as_list)
            .map(<[Value]>::to_vec)
            .unwrap_or_default();

        Ok(Self {
            message_id,
            request_type,
            unknown,
            inner,
        })
    }

    pub fn kind(&self) -> Option<RequestType> {
        RequestType::from_u8(self.request_type)
    }

    /// `[messageId, requestType, unknown, ["38", results]]`
    pub fn success(&self, results: Vec<Value>) -> Vec<Value> {
        vec![
            Value::String(self.message_id.clone()),
            Value::String(self.request_type.to_string()),
            Value::String(self.unknown.clone()),
            Value::List(vec![
                Value::String(MessageType::GsSuccess.as_u8().to_string()),
                Value::List(results),
            ]),
        ]
    }
}
