//! The message dispatch table.
//!
//! Every handler has the same shape: it gets the shared server state, the
//! connection's session and the decoded request, and returns a reply, a
//! [`Failure`], or nothing (drop silently). The table is built once by
//! [`DispatchTable::standard`] and never changes afterwards.

use std::collections::HashMap;
use std::fmt;

use futures_util::future::BoxFuture;
use gameservice_lobby::message as envelope;
use gameservice_lobby::{LobbyError, LobbyErrorCode, LobbyMessageType, LobbyRequest};
use gameservice_protocol::{Message, MessageType, ProtocolError, RouterErrorCode};
use gameservice_session::{AccountStore, HandshakeError, Session, SessionError};

use crate::handlers::{lobby, login, social, system};
use crate::server::ServerState;

/// What a handler produces.
pub type HandlerResult = Result<Option<Message>, Failure>;

/// A boxed async handler.
pub type HandlerFn<S> = for<'a> fn(
    &'a ServerState<S>,
    &'a mut Session,
    &'a Message,
) -> BoxFuture<'a, HandlerResult>;

/// A lobby sub-type handler. Gets the `LOBBY_MSG` already split into
/// sub-type and arguments.
pub type LobbyHandlerFn<S> = for<'a> fn(
    &'a ServerState<S>,
    &'a mut Session,
    &'a Message,
    &'a LobbyRequest,
) -> BoxFuture<'a, HandlerResult>;

/// Turns an `async fn(&ServerState<S>, &mut Session, &Message)` into a
/// [`HandlerFn`].
macro_rules! handler {
    ($f:path) => {{
        fn boxed<'a, S: AccountStore>(
            state: &'a ServerState<S>,
            session: &'a mut Session,
            request: &'a Message,
        ) -> BoxFuture<'a, HandlerResult> {
            Box::pin($f(state, session, request))
        }
        boxed::<S> as HandlerFn<S>
    }};
}

/// Same as [`handler!`] for [`LobbyHandlerFn`].
macro_rules! lobby_handler {
    ($f:path) => {{
        fn boxed<'a, S: AccountStore>(
            state: &'a ServerState<S>,
            session: &'a mut Session,
            request: &'a Message,
            lobby_request: &'a LobbyRequest,
        ) -> BoxFuture<'a, HandlerResult> {
            Box::pin($f(state, session, request, lobby_request))
        }
        boxed::<S> as LobbyHandlerFn<S>
    }};
}

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

/// A refused request. The connection stays open and the client gets a
/// failure envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Reported as `GSFAIL [Binary([request type]), [code]]`.
    Router {
        code: RouterErrorCode,
        message: String,
    },
    /// Reported on `LOBBY_MSG` as `[subType, "39", [code]]`.
    Lobby {
        sub_type: u8,
        code: LobbyErrorCode,
        message: String,
    },
}

impl Failure {
    pub fn router(code: RouterErrorCode, message: impl Into<String>) -> Self {
        Self::Router {
            code,
            message: message.into(),
        }
    }

    pub fn lobby(sub_type: u8, error: &LobbyError) -> Self {
        Self::Lobby {
            sub_type,
            code: error.code(),
            message: error.to_string(),
        }
    }

    /// Builds the failure envelope answering `request`.
    pub fn into_message(self, request: &Message) -> Message {
        match self {
            Self::Router { code, .. } => request.failure(code),
            Self::Lobby { sub_type, code, .. } => {
                request.reply(envelope::failure(sub_type, code))
            }
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Router { code, message } => write!(f, "{code}: {message}"),
            Self::Lobby {
                sub_type,
                code,
                message,
            } => write!(f, "lobby {sub_type} {code:?}: {message}"),
        }
    }
}

impl From<ProtocolError> for Failure {
    fn from(e: ProtocolError) -> Self {
        Self::router(RouterErrorCode::UnknownError, e.to_string())
    }
}

impl From<HandshakeError> for Failure {
    fn from(e: HandshakeError) -> Self {
        Self::router(RouterErrorCode::UnknownError, e.to_string())
    }
}

impl From<SessionError> for Failure {
    fn from(e: SessionError) -> Self {
        let code = match &e {
            SessionError::NameTaken(_) | SessionError::IdTaken(_) => {
                RouterErrorCode::NotDisconnected
            }
            SessionError::PlayerNotFound(_) => RouterErrorCode::NotRegistered,
            SessionError::PendingNotFound(_) => RouterErrorCode::PlayerNotRegistered,
            SessionError::PendingNameMismatch { .. } => RouterErrorCode::PasswordNotCorrect,
            SessionError::InvalidTransition { .. } => RouterErrorCode::UnknownError,
            SessionError::Store(_) => RouterErrorCode::DbProblem,
        };
        Self::router(code, e.to_string())
    }
}

// ---------------------------------------------------------------------------
// DispatchTable
// ---------------------------------------------------------------------------

/// Handlers keyed by message type, plus the lobby sub-table keyed by
/// lobby sub-type.
pub struct DispatchTable<S> {
    handlers: HashMap<u8, HandlerFn<S>>,
    lobby: HashMap<u8, LobbyHandlerFn<S>>,
}

impl<S: AccountStore> DispatchTable<S> {
    /// Every handler the router ships with.
    pub fn standard() -> Self {
        let handlers = HashMap::from([
            (MessageType::KeyExchange.as_u8(), handler!(system::key_exchange)),
            (MessageType::StillAlive.as_u8(), handler!(system::still_alive)),
            (MessageType::Login.as_u8(), handler!(login::login)),
            (MessageType::JoinWaitModule.as_u8(), handler!(login::join_wait_module)),
            (MessageType::LoginWaitModule.as_u8(), handler!(login::login_wait_module)),
            (MessageType::LobbyMsg.as_u8(), handler!(lobby::lobby_msg)),
            (MessageType::LoginFriends.as_u8(), handler!(social::login_friends)),
            (MessageType::FriendList.as_u8(), handler!(social::friend_list)),
            (MessageType::IgnoreList.as_u8(), handler!(social::ignore_list)),
            (MessageType::News.as_u8(), handler!(social::news)),
            (MessageType::GetPlayerInfo.as_u8(), handler!(social::player_info)),
            (MessageType::AddFriend.as_u8(), handler!(social::add_friend)),
            (MessageType::DelFriend.as_u8(), handler!(social::del_friend)),
            (MessageType::AddIgnoreFriend.as_u8(), handler!(social::add_ignore)),
            (MessageType::DelIgnoreFriend.as_u8(), handler!(social::del_ignore)),
        ]);

        let lobby = HashMap::from([
            (LobbyMessageType::Login.as_u8(), lobby_handler!(lobby::join)),
            (LobbyMessageType::Logout.as_u8(), lobby_handler!(lobby::leave)),
            (LobbyMessageType::GameList.as_u8(), lobby_handler!(lobby::game_list)),
        ]);

        Self { handlers, lobby }
    }

    pub fn handler(&self, msg_type: u8) -> Option<HandlerFn<S>> {
        self.handlers.get(&msg_type).copied()
    }

    pub fn lobby_handler(&self, sub_type: u8) -> Option<LobbyHandlerFn<S>> {
        self.lobby.get(&sub_type).copied()
    }

    /// Number of top-level handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
