//! Router message handlers, grouped by concern.
//!
//! Each handler is an `async fn(&ServerState<S>, &mut Session, &Message)
//! -> HandlerResult`; the dispatch table boxes them.

pub(crate) mod lobby;
pub(crate) mod login;
pub(crate) mod social;
pub(crate) mod system;

use gameservice_protocol::{Message, PlayerId, RouterErrorCode, Value};
use gameservice_session::Session;

use crate::Failure;

/// The player bound to `session`, or `NOTREGISTERED`.
fn require_player(session: &Session) -> Result<PlayerId, Failure> {
    session
        .player()
        .ok_or_else(|| Failure::router(RouterErrorCode::NotRegistered, "not logged in"))
}

/// `GSSUCCESS [Binary([request type]), extra...]`
fn ack(request: &Message, extra: Vec<Value>) -> Message {
    let mut data = Vec::with_capacity(extra.len() + 1);
    data.push(Value::Binary(vec![request.msg_type]));
    data.extend(extra);
    request.success(data)
}
