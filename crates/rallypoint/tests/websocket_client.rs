//! End-to-end tests: `ChatClient` over a real WebSocket server.
//!
//! The server here is a tiny lobby: it echoes every chat object back to the
//! sender and answers `find_match` with a `match_found` notification.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rallypoint::prelude::*;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

/// Starts a lobby that serves any number of clients, one after another.
///
/// Returns the `ws://` URL and a receiver for the `Authorization` header of
/// each accepted handshake.
async fn start_lobby() -> (String, mpsc::UnboundedReceiver<Option<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (auth_tx, auth_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let auth_tx = auth_tx.clone();
            tokio::spawn(async move {
                let mut seen = None;
                let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(
                    stream,
                    |req: &Request, resp: Response| {
                        seen = req
                            .headers()
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_owned);
                        Ok(resp)
                    },
                )
                .await
                else {
                    return;
                };
                let _ = auth_tx.send(seen);

                while let Some(Ok(msg)) = ws.next().await {
                    let Message::Text(text) = msg else {
                        continue;
                    };
                    let reply = if text.contains("find_match") {
                        r#"{"type":"match_found","opponentId":"bot-1"}"#.to_string()
                    } else {
                        text.to_string()
                    };
                    if ws.send(Message::text(reply)).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    (format!("ws://{addr}/chat"), auth_rx)
}

fn client(user: &str) -> ChatClient {
    let session = Session::new(user, format!("jwt-{user}")).unwrap();
    ChatClient::builder().build(session)
}

/// Ticks until at least `n` chat lines have been drained.
async fn drain_at_least(client: &mut ChatClient, n: usize) -> Vec<ChatMessage> {
    let mut all = Vec::new();
    let mut tick = Vec::new();
    for _ in 0..400 {
        client.drain(&mut tick);
        all.append(&mut tick);
        if all.len() >= n {
            return all;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {n} chat lines, got {all:?}");
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_chat_round_trip_through_echo_server() {
    let (url, mut auth) = start_lobby().await;
    let mut alice = client("alice");

    alice.connect(&url).await.unwrap();
    assert_eq!(
        auth.recv().await.unwrap().as_deref(),
        Some("Bearer jwt-alice")
    );

    alice.send("first");
    alice.send("second");

    let chat = drain_at_least(&mut alice, 2).await;
    assert_eq!(
        chat,
        [
            ChatMessage::new("alice", "first"),
            ChatMessage::new("alice", "second"),
        ]
    );

    let mut history = ChatHistory::default();
    history.extend(chat);
    assert_eq!(history.render("alice"), ["You: first", "You: second"]);

    alice.disconnect().await;
    assert_eq!(alice.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn test_find_opponent_fires_match_handler() {
    let (url, _auth) = start_lobby().await;
    let mut alice = client("alice");
    let (found_tx, mut found_rx) = mpsc::unbounded_channel();
    alice.on_match_found(move |opponent| {
        let _ = found_tx.send(opponent.to_string());
    });

    alice.connect(&url).await.unwrap();
    alice.send_find_opponent();
    alice.send("after matchmaking");

    // The echoed chat line comes after the notification, so once it is
    // drained the handler must already have fired.
    let chat = drain_at_least(&mut alice, 1).await;
    assert_eq!(chat, [ChatMessage::new("alice", "after matchmaking")]);
    assert_eq!(found_rx.try_recv().as_deref(), Ok("bot-1"));
    assert!(found_rx.try_recv().is_err(), "handler fired more than once");
}

#[tokio::test]
async fn test_reconnect_to_same_lobby() {
    let (url, mut auth) = start_lobby().await;
    let mut bob = client("bob");

    bob.connect(&url).await.unwrap();
    bob.connect(&url).await.unwrap();
    assert!(bob.is_connected());
    assert!(auth.recv().await.is_some());
    assert!(auth.recv().await.is_some());

    bob.send("still works");
    let chat = drain_at_least(&mut bob, 1).await;
    assert_eq!(chat[0].message(), "still works");
}

#[tokio::test]
async fn test_unreachable_server_stays_closed() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut carol = client("carol");
    let result = carol.connect(&format!("ws://{addr}/chat")).await;

    assert!(result.is_err());
    assert_eq!(carol.state(), ConnectionState::Closed);
    carol.send("nobody listening");
}
