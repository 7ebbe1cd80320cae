//! Lobby sub-types and the `LOBBY_MSG` envelopes.
//!
//! A `LOBBY_MSG` payload is `[subType, [args...]]`, the sub-type being a
//! decimal string. Replies echo the sub-type, then carry the router's
//! success (`"38"`) or failure (`"39"`) marker.

use gameservice_protocol::value::{list_at, string_at};
use gameservice_protocol::{MessageType, ProtocolError, Value};

use crate::{LobbyError, LobbyErrorCode};

/// Operations multiplexed inside `LOBBY_MSG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LobbyMessageType {
    Login = 1,
    Logout = 2,
    GameList = 3,
}

impl LobbyMessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Login),
            2 => Some(Self::Logout),
            3 => Some(Self::GameList),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for LobbyMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "LobbyLogin"),
            Self::Logout => write!(f, "LobbyLogout"),
            Self::GameList => write!(f, "LobbyGameList"),
        }
    }
}

// ---------------------------------------------------------------------------
// LobbyRequest
// ---------------------------------------------------------------------------

/// A `LOBBY_MSG` payload split into its sub-type and arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyRequest {
    /// Raw sub-type; may not name a known [`LobbyMessageType`].
    pub sub_type: u8,
    pub args: Vec<Value>,
}

impl LobbyRequest {
    /// # Errors
    /// [`ProtocolError::MissingField`] if the payload is not
    /// `[decimal string, list]`.
    pub fn parse(data: &[Value]) -> Result<Self, ProtocolError> {
        let sub_type = string_at(data, 0)?
            .parse::<u8>()
            .map_err(|_| ProtocolError::MissingField {
                index: 0,
                expected: "decimal lobby sub-type",
            })?;
        let args = list_at(data, 1)?.to_vec();
        Ok(Self { sub_type, args })
    }

    pub fn kind(&self) -> Option<LobbyMessageType> {
        LobbyMessageType::from_u8(self.sub_type)
    }

    /// The string argument at `index`.
    ///
    /// # Errors
    /// [`LobbyError::Malformed`] if it is absent or not a string.
    pub fn string_arg(&self, index: usize) -> Result<&str, LobbyError> {
        Ok(string_at(&self.args, index)?)
    }
}

/// `[subType, "38", results...]`
pub fn success(sub_type: u8, results: Vec<Value>) -> Vec<Value> {
    let mut data = Vec::with_capacity(results.len() + 2);
    data.push(Value::String(sub_type.to_string()));
    data.push(Value::String(MessageType::GsSuccess.as_u8().to_string()));
    data.extend(results);
    data
}

/// `[subType, "39", [code]]`
pub fn failure(sub_type: u8, code: LobbyErrorCode) -> Vec<Value> {
    vec![
        Value::String(sub_type.to_string()),
        Value::String(MessageType::GsFail.as_u8().to_string()),
        Value::List(vec![Value::String(code.code().to_string())]),
    ]
}
