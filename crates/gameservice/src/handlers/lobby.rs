//! `LOBBY_MSG` and its sub-type handlers.

use gameservice_lobby::LobbyRequest;
use gameservice_lobby::message as envelope;
use gameservice_protocol::{Message, Value};
use gameservice_session::{AccountStore, Session, SessionState};

use super::require_player;
use crate::Failure;
use crate::dispatch::HandlerResult;
use crate::server::ServerState;

/// Routes a `LOBBY_MSG` through the lobby sub-table.
pub(crate) async fn lobby_msg<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    require_player(session)?;
    let lobby_request = LobbyRequest::parse(&request.data)?;

    match state.dispatch.lobby_handler(lobby_request.sub_type) {
        Some(handler) => handler(state, session, request, &lobby_request).await,
        None => {
            tracing::warn!(
                peer = %session.peer(),
                sub_type = lobby_request.sub_type,
                "unknown lobby sub-type dropped"
            );
            Ok(None)
        }
    }
}

/// Lobby `LOGIN [game]`.
pub(crate) async fn join<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
    lobby_request: &LobbyRequest,
) -> HandlerResult {
    let id = require_player(session)?;
    let sub_type = lobby_request.sub_type;
    let game = lobby_request
        .string_arg(0)
        .map_err(|e| Failure::lobby(sub_type, &e))?
        .to_owned();

    state
        .registry
        .update(id, |player| state.lobby.join(player, &game))
        .await?
        .map_err(|e| Failure::lobby(sub_type, &e))?;
    session.transition(SessionState::LobbyJoined)?;

    Ok(Some(request.reply(envelope::success(
        sub_type,
        vec![Value::String(game)],
    ))))
}

/// Lobby `LOGOUT`.
pub(crate) async fn leave<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
    lobby_request: &LobbyRequest,
) -> HandlerResult {
    let id = require_player(session)?;
    let sub_type = lobby_request.sub_type;

    let game = state
        .registry
        .update(id, |player| state.lobby.leave(player))
        .await?
        .map_err(|e| Failure::lobby(sub_type, &e))?;
    session.transition(SessionState::LoggedIn)?;

    Ok(Some(request.reply(envelope::success(
        sub_type,
        vec![Value::String(game)],
    ))))
}

/// Lobby `GAMELIST`: every supported game, sorted.
pub(crate) async fn game_list<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
    lobby_request: &LobbyRequest,
) -> HandlerResult {
    require_player(session)?;
    let games = state.lobby.catalog().iter().map(Value::from).collect();

    Ok(Some(request.reply(envelope::success(
        lobby_request.sub_type,
        vec![Value::List(games)],
    ))))
}
