//! Stream upgrade handler
//!
//! Accepts `/ws` upgrades and runs each connection: register with the
//! hub, announce the assigned id, then relay messages until the client
//! leaves or the socket dies.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::StreamHub;
use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;

/// WebSocket upgrade entry point
pub async fn stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = Arc::clone(&state.hub);
    ws.on_upgrade(move |socket| run_connection(socket, hub))
}

/// Serialize a message and write it straight to the socket sink.
///
/// Used before the connection is registered and by the outbound pump;
/// everything after registration goes through the hub.
async fn send_direct(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).map_err(axum::Error::new)?;
    sink.send(Message::Text(text)).await
}

/// Run one stream connection from upgrade to teardown
async fn run_connection(socket: WebSocket, hub: Arc<StreamHub>) {
    let (mut sink, mut stream) = socket.split();

    // Per-connection channel the hub publishes into
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let connection_id = match hub.register(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Refusing stream connection");
            let refusal = ServerMessage::Error {
                message: e.to_string(),
            };
            let _ = send_direct(&mut sink, &refusal).await;
            return;
        }
    };

    let hello = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    if send_direct(&mut sink, &hello).await.is_err() {
        tracing::debug!(connection_id = %connection_id, "Socket dropped during handshake");
        hub.unregister(&connection_id).await;
        return;
    }

    // Outbound pump: everything the hub queues goes out over the sink
    let pump_id = connection_id.clone();
    let mut pump = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if send_direct(&mut sink, &msg).await.is_err() {
                tracing::debug!(connection_id = %pump_id, "Outbound write failed");
                break;
            }
        }
    });

    // Inbound loop runs here until the peer leaves or the pump dies
    loop {
        tokio::select! {
            _ = &mut pump => break,
            frame = stream.next() => match frame {
                Some(Ok(frame)) => {
                    if !handle_frame(&hub, &connection_id, frame).await {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "Socket read error"
                    );
                    break;
                }
                None => break,
            },
        }
    }

    pump.abort();
    hub.unregister(&connection_id).await;
}

/// Process one inbound frame; false means tear the connection down
async fn handle_frame(hub: &Arc<StreamHub>, connection_id: &str, frame: Message) -> bool {
    match frame {
        Message::Text(text) => {
            let reply = match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => client_reply(hub, connection_id, msg).await,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "Unparseable client frame"
                    );
                    ServerMessage::Error {
                        message: format!("invalid message format: {}", e),
                    }
                }
            };
            let _ = hub.send_to(connection_id, reply).await;
            true
        }
        Message::Binary(_) => {
            let reply = ServerMessage::Error {
                message: "binary frames not supported".to_string(),
            };
            let _ = hub.send_to(connection_id, reply).await;
            true
        }
        // axum answers pings on its own
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Peer closed the stream");
            false
        }
    }
}

/// Build the reply for a parsed client message
async fn client_reply(
    hub: &Arc<StreamHub>,
    connection_id: &str,
    message: ClientMessage,
) -> ServerMessage {
    match message {
        ClientMessage::Subscribe { topics } => match hub.subscribe(connection_id, topics).await {
            Ok(topics) => ServerMessage::Subscribed { topics },
            Err(e) => ServerMessage::Error {
                message: e.to_string(),
            },
        },
        ClientMessage::Unsubscribe { topics } => {
            match hub.unsubscribe(connection_id, topics).await {
                Ok(topics) => ServerMessage::Unsubscribed { topics },
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            }
        }
        ClientMessage::Ping => ServerMessage::Pong,
    }
}
