//! Per-connection loop: receive, open, dispatch, seal, send.
//!
//! Each accepted connection gets its own Tokio task running this loop.
//! Messages on one connection are handled strictly in order. The loop ends
//! when the peer disconnects or a frame cannot be read or decrypted.
//! Domain failures never end it; they become failure replies.

use std::sync::Arc;

use gameservice_protocol::{PlayerId, type_name};
use gameservice_session::{AccountStore, Session};
use gameservice_transport::{Connection, TcpConnection};

use crate::GameServiceError;
use crate::server::ServerState;

/// Drop guard that unregisters the connection's player if the task
/// unwinds before the normal cleanup in [`handle_connection`] runs.
///
/// `Drop` is synchronous, so the removal runs as a spawned task.
struct SessionGuard<S: AccountStore> {
    player: Option<PlayerId>,
    state: Arc<ServerState<S>>,
}

impl<S: AccountStore> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Some(id) = self.player.take() {
            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                state.registry.remove(id).await;
            });
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S: AccountStore>(
    conn: TcpConnection,
    state: Arc<ServerState<S>>,
) -> Result<(), GameServiceError> {
    let conn_id = conn.id();
    let mut session = Session::new(conn.peer_addr());
    let mut guard = SessionGuard {
        player: None,
        state: Arc::clone(&state),
    };

    let result = serve(&conn, &state, &mut session, &mut guard).await;

    guard.player = None;
    if let Some(id) = session.close() {
        state.registry.remove(id).await;
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close failed");
    }
    result
}

async fn serve<S: AccountStore>(
    conn: &TcpConnection,
    state: &ServerState<S>,
    session: &mut Session,
    guard: &mut SessionGuard<S>,
) -> Result<(), GameServiceError> {
    let conn_id = conn.id();

    while let Some(frame) = conn.recv().await? {
        let request = session.open(&frame)?;
        tracing::debug!(%conn_id, "-> {request}");

        let Some(handler) = state.dispatch.handler(request.msg_type) else {
            tracing::warn!(
                %conn_id,
                msg_type = request.msg_type,
                name = %type_name(request.msg_type),
                "no handler, message dropped"
            );
            continue;
        };

        let outcome = handler(state, session, &request).await;
        guard.player = session.player();

        let reply = match outcome {
            Ok(Some(reply)) => reply,
            Ok(None) => continue,
            Err(failure) => {
                tracing::warn!(%conn_id, peer = %session.peer(), %failure, "request refused");
                failure.into_message(&request)
            }
        };

        tracing::debug!(%conn_id, "<- {reply}");
        conn.send(session.seal(&reply)?).await?;
    }

    Ok(())
}
