//! Friends, ignore list, player info and the message of the day.
//!
//! All of these need a logged-in player and leave the session state
//! alone. Friend and ignore entries are contact copies taken when the
//! entry is added; presence is looked up live when the list is read.

use gameservice_protocol::value::string_at;
use gameservice_protocol::{Message, RouterErrorCode, Value};
use gameservice_session::{AccountStore, Player, PlayerCollection, Session};

use super::{ack, require_player};
use crate::Failure;
use crate::dispatch::HandlerResult;
use crate::server::ServerState;

#[derive(Debug, Clone, Copy)]
enum Relation {
    Friends,
    Ignored,
}

impl Relation {
    fn of(self, player: &mut Player) -> &mut PlayerCollection {
        match self {
            Self::Friends => &mut player.friends,
            Self::Ignored => &mut player.ignored,
        }
    }
}

/// `LOGINFRIENDS [status, mood]`
pub(crate) async fn login_friends<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    let id = require_player(session)?;
    let status = string_at(&request.data, 0)?.to_owned();
    let mood = string_at(&request.data, 1)?.to_owned();

    state
        .registry
        .update(id, |player| {
            player.friend_status = status;
            player.friend_mood = mood;
        })
        .await?;

    Ok(Some(ack(request, Vec::new())))
}

/// `FRIENDLIST`: `[name, online, status, mood, game]` per friend.
pub(crate) async fn friend_list<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    let id = require_player(session)?;
    let friends = state
        .registry
        .update(id, |player| player.friends.all())
        .await?;

    let mut entries = Vec::with_capacity(friends.len());
    for friend in friends {
        let live = state.registry.by_name(friend.name()).await;
        let entry = match &live {
            Some(p) => vec![
                Value::from(p.name()),
                Value::from("1"),
                Value::from(p.friend_status.as_str()),
                Value::from(p.friend_mood.as_str()),
                Value::from(p.game.as_deref().unwrap_or_default()),
            ],
            None => vec![
                Value::from(friend.name()),
                Value::from("0"),
                Value::from(""),
                Value::from(""),
                Value::from(""),
            ],
        };
        entries.push(Value::List(entry));
    }

    Ok(Some(ack(request, vec![Value::List(entries)])))
}

/// `IGNORELIST`: sorted names.
pub(crate) async fn ignore_list<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    let id = require_player(session)?;
    let names = state
        .registry
        .update(id, |player| player.ignored.names())
        .await?;

    let names = names.into_iter().map(Value::String).collect();
    Ok(Some(ack(request, vec![Value::List(names)])))
}

/// `NEWS`: the message of the day.
pub(crate) async fn news<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    require_player(session)?;
    Ok(Some(ack(request, vec![Value::from(state.lobby.motd())])))
}

/// `GETPLAYERINFO [name]`
pub(crate) async fn player_info<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    let id = require_player(session)?;
    let name = string_at(&request.data, 0)?;

    let target = state.registry.by_name(name).await.ok_or_else(|| {
        Failure::router(
            RouterErrorCode::PlayerNotConnected,
            format!("{name} is not connected"),
        )
    })?;
    if !target.profile.public && target.id() != id {
        return Err(Failure::router(
            RouterErrorCode::UnknownError,
            "profile not public",
        ));
    }

    let profile = &target.profile;
    let info = vec![
        Value::from(target.name()),
        Value::from(profile.firstname.as_str()),
        Value::from(profile.surname.as_str()),
        Value::from(profile.country.as_str()),
        Value::from(profile.email.as_str()),
        Value::from(target.version.as_str()),
        Value::from(target.game.as_deref().unwrap_or_default()),
    ];
    Ok(Some(ack(request, vec![Value::List(info)])))
}

pub(crate) async fn add_friend<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    add(state, session, request, Relation::Friends).await
}

pub(crate) async fn del_friend<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    remove(state, session, request, Relation::Friends).await
}

pub(crate) async fn add_ignore<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    add(state, session, request, Relation::Ignored).await
}

pub(crate) async fn del_ignore<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
) -> HandlerResult {
    remove(state, session, request, Relation::Ignored).await
}

/// Adds a connected player to one of the caller's lists. Adding someone
/// already listed is a no-op.
async fn add<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
    relation: Relation,
) -> HandlerResult {
    let id = require_player(session)?;
    let name = string_at(&request.data, 0)?;

    let target = state.registry.by_name(name).await.ok_or_else(|| {
        Failure::router(
            RouterErrorCode::PlayerNotConnected,
            format!("{name} is not connected"),
        )
    })?;
    if target.id() == id {
        return Err(Failure::router(
            RouterErrorCode::UnknownError,
            "cannot list yourself",
        ));
    }

    let contact = target.as_contact();
    let snapshot = state
        .registry
        .update(id, |player| {
            let list = relation.of(player);
            if !list.contains_name(contact.name()) {
                if let Err(e) = list.add(contact) {
                    tracing::debug!(error = %e, "contact not added");
                }
            }
            player.clone()
        })
        .await?;

    state.store.record_relations(&snapshot).await?;
    tracing::debug!(player = %id, ?relation, %name, "contact added");
    Ok(Some(ack(request, Vec::new())))
}

/// Removes a name from one of the caller's lists. Unknown names are a
/// no-op.
async fn remove<S: AccountStore>(
    state: &ServerState<S>,
    session: &mut Session,
    request: &Message,
    relation: Relation,
) -> HandlerResult {
    let id = require_player(session)?;
    let name = string_at(&request.data, 0)?;

    let snapshot = state
        .registry
        .update(id, |player| {
            relation.of(player).remove_by_name(name);
            player.clone()
        })
        .await?;

    state.store.record_relations(&snapshot).await?;
    tracing::debug!(player = %id, ?relation, %name, "contact removed");
    Ok(Some(ack(request, Vec::new())))
}
