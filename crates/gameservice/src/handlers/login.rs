//! The two-connection login flow.
//!
//! `LOGIN` on the first connection stages a provisional player keyed by
//! the client's IP. The client then asks where the wait module lives
//! (`JOINWAITMODULE`), opens a second connection and confirms with
//! `LOGINWAITMODULE`, which moves the player into the registry.

use gameservice_protocol::value::string_at;
use gameservice_protocol::{Message, RouterErrorCode, Value};
use gameservice_session::{AccountStore, Player, Profile, Session, SessionState};

use super::ack;
use crate::Failure;
use crate::dispatch::HandlerResult;
use crate::server::ServerState;

const PUBLIC: usize = 2;
const FIRSTNAME: usize = 3;
const SURNAME: usize = 4;
const COUNTRY: usize = 5;
const EMAIL: usize = 6;

/// `LOGIN [username, version, public, firstname?, surname?, country?, email?]`
pub(crate) async fn login<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    let name = string_at(&request.data, 0)?;
    let version = string_at(&request.data, 1)?;

    if !session.state().can_transition_to(SessionState::PendingConfirmation) {
        return Err(Failure::router(
            RouterErrorCode::NotDisconnected,
            "connection already logged in",
        ));
    }
    if state.registry.contains_name(name).await || state.pending.contains_name(name).await {
        return Err(Failure::router(
            RouterErrorCode::NotDisconnected,
            format!("{name} is already connected"),
        ));
    }

    let address = session.peer().ip();
    let mut player = Player::new(state.registry.next_id(), name, address);
    player.version = version.to_owned();
    player.profile = profile(&request.data);

    state.pending.insert(address, player).await?;
    session.transition(SessionState::PendingConfirmation)?;
    tracing::info!(peer = %session.peer(), %name, %version, "login accepted, awaiting wait module");

    Ok(Some(ack(request, Vec::new())))
}

/// `JOINWAITMODULE`: tells the client where to open its second connection.
pub(crate) async fn join_wait_module<S: AccountStore>(
    state: &ServerState<S>,
    _session: &mut Session,
    request: &Message,
) -> HandlerResult {
    let port = u32::from(state.config.advertised_port);
    Ok(Some(ack(
        request,
        vec![Value::List(vec![
            Value::String(state.config.advertised_host.clone()),
            Value::Binary(port.to_le_bytes().to_vec()),
        ])],
    )))
}

/// `LOGINWAITMODULE [username]`: confirms the staged login from this IP.
pub(crate) async fn login_wait_module<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    let name = string_at(&request.data, 0)?;

    if session.player().is_some() || !session.state().can_transition_to(SessionState::LoggedIn) {
        return Err(Failure::router(
            RouterErrorCode::NotDisconnected,
            "connection already logged in",
        ));
    }

    let address = session.peer().ip();
    let player = state.pending.confirm(address, name).await?;
    let id = player.id();
    if let Err(e) = state.store.record_login(&player).await {
        // Stays staged so the client can retry the wait module.
        if let Err(restage) = state.pending.insert(address, player).await {
            tracing::warn!(%address, error = %restage, "staged login lost");
        }
        return Err(e.into());
    }
    state.registry.add(player).await?;

    if let Err(e) = session.bind_player(id) {
        state.registry.remove(id).await;
        return Err(e.into());
    }
    tracing::info!(peer = %session.peer(), player = %id, %name, "logged in");

    Ok(Some(ack(request, Vec::new())))
}

fn profile(data: &[Value]) -> Profile {
    let field = |index: usize| {
        data.get(index)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };

    Profile {
        firstname: field(FIRSTNAME),
        surname: field(SURNAME),
        country: field(COUNTRY),
        email: field(EMAIL),
        public: data.get(PUBLIC).is_some_and(flag),
    }
}

/// Clients send booleans either as `"1"` or as a one-byte binary.
fn flag(value: &Value) -> bool {
    match value {
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        Value::Binary(b) => b.first().is_some_and(|&b| b != 0),
        Value::List(_) => false,
    }
}
