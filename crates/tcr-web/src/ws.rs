use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use tcr_core::{
    protocol::{ClientEvent, ServerEvent},
    relay::Relay,
};

/// Upgrade `GET /ws` to a chat socket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(relay): State<Arc<Relay>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| run_connection(socket, relay))
}

/// Pump frames both ways until either side closes, then drop the session.
async fn run_connection(socket: WebSocket, relay: Arc<Relay>) {
    let (mut tx, mut rx) = socket.split();
    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let conn = relay.connect(outbox).await;

    loop {
        tokio::select! {
            msg = rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(text.as_str()) {
                            Ok(event) => relay.handle_client_event(conn, event).await,
                            Err(e) => warn!(conn = %conn, error = %e, "unreadable frame"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!(conn = %conn, error = %e, "socket error");
                        break;
                    }
                    _ => {}
                }
            }

            event = outbox_rx.recv() => {
                let Some(event) = event else { break };
                if send_json(&mut tx, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    relay.disconnect(conn).await;
}

/// Encode one event as a text frame.
async fn send_json(
    tx: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let json = event.to_json().map_err(axum::Error::new)?;
    tx.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_router, test_support::NullMessenger};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tcr_core::domain::ChatId;
    use tokio::time::timeout;
    use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

    type Client = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn start() -> (String, Arc<Relay>) {
        let relay = Arc::new(Relay::new(ChatId(1), Arc::new(NullMessenger)));
        let dir = std::env::temp_dir().join(format!("tcr-ws-{}", std::process::id()));
        let app = build_router(relay.clone(), &dir);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("ws://{addr}/ws"), relay)
    }

    async fn client(url: &str) -> Client {
        let (ws, _) = connect_async(url).await.unwrap();
        ws
    }

    async fn emit(ws: &mut Client, frame: Value) {
        ws.send(WsMessage::Text(frame.to_string().into()))
            .await
            .unwrap();
    }

    async fn next_event(ws: &mut Client) -> Value {
        loop {
            let msg = timeout(TIMEOUT, ws.next())
                .await
                .expect("timed out waiting for frame")
                .expect("socket closed")
                .unwrap();
            if let WsMessage::Text(text) = msg {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    #[tokio::test]
    async fn join_chat_and_leave_over_the_socket() {
        let (url, relay) = start().await;

        let mut alice = client(&url).await;
        alice
            .send(WsMessage::Text("not json".into()))
            .await
            .unwrap();
        emit(&mut alice, json!({ "event": "add user", "data": "alice" })).await;
        assert_eq!(
            next_event(&mut alice).await,
            json!({ "event": "login", "data": { "numUsers": 1, "history": [] } })
        );

        let mut bob = client(&url).await;
        emit(&mut bob, json!({ "event": "add user", "data": "bob" })).await;
        assert_eq!(
            next_event(&mut bob).await,
            json!({ "event": "login", "data": { "numUsers": 2, "history": [] } })
        );
        assert_eq!(
            next_event(&mut alice).await,
            json!({ "event": "user joined", "data": { "username": "bob", "numUsers": 2 } })
        );

        emit(&mut bob, json!({ "event": "new message", "data": "hi" })).await;
        assert_eq!(
            next_event(&mut alice).await,
            json!({ "event": "new message", "data": { "username": "bob", "message": "hi" } })
        );

        bob.close(None).await.unwrap();
        assert_eq!(
            next_event(&mut alice).await,
            json!({ "event": "user left", "data": { "username": "bob", "numUsers": 1 } })
        );
        assert_eq!(relay.num_users().await, 1);
        assert_eq!(relay.history().await.len(), 1);
    }
}
