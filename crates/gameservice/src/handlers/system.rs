//! Connection-level handlers: key exchange and keep-alive.

use gameservice_protocol::Message;
use gameservice_session::{AccountStore, Session};

use crate::dispatch::HandlerResult;
use crate::server::ServerState;

/// `KEY_EXCHANGE [requestId, args]`. The reply keeps the request's type
/// and property; later frames may switch to `GS_ENCRYPT`.
pub(crate) async fn key_exchange<S: AccountStore>(
    _state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    let data = session.key_exchange(&request.data)?;
    Ok(Some(request.reply(data)))
}

/// `STILLALIVE` goes back exactly as it came in.
pub(crate) async fn still_alive<S: AccountStore>(
    _state: &ServerState<S>,
    _session: &mut Session,
    request: &Message,
) -> HandlerResult {
    Ok(Some(request.clone()))
}
