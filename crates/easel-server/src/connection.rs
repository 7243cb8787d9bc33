//! Per-connection lifecycle.
//!
//! One task owns the socket, the session, and the tick timer, so the
//! session's entry points (`ready`, `recurring`, `reception`) are fully
//! serialized and the engine needs no locking. The tick timer is re-armed
//! to the painter's interval after each `recurring` call — cooperative
//! scheduling, no jitter compensation.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info};

use easel_engine::Session;

use crate::server::AppState;

pub async fn handle_ws_connection(state: Arc<AppState>, ws: WebSocket) {
    let mut session = Session::new(state.painters.create());
    let session_id = session.id();
    state.connection_opened();
    info!(session = session_id, "canvas client connected");

    let (mut ws_tx, mut ws_rx) = ws.split();

    if let Some(frame) = session.ready() {
        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
            state.connection_closed();
            return;
        }
    }

    let mut tick = Box::pin(tokio::time::sleep(session.tick_interval()));
    loop {
        tokio::select! {
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Text(text))) => session.reception(text.as_str()),
                Some(Ok(Message::Close(_))) | None => {
                    debug!(session = session_id, "client closed connection");
                    break;
                }
                // Binary and ping/pong frames are not part of the protocol.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(session = session_id, error = %e, "websocket error");
                    break;
                }
            },
            () = &mut tick => {
                if let Some(frame) = session.recurring() {
                    if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                tick = Box::pin(tokio::time::sleep(session.tick_interval()));
            }
        }
    }

    // Session state is discarded with the task; there is no teardown hook.
    state.connection_closed();
    info!(session = session_id, "canvas client disconnected");
}
