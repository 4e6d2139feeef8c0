//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::HubEvent;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and answers them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<HubEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(hub_event) => {
                        if !subs.matches(&hub_event) {
                            continue;
                        }
                        let Some(json) = event_message(&hub_event) else {
                            continue;
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn event_message(event: &HubEvent) -> Option<String> {
    let payload = serde_json::to_value(event).ok()?;
    let msg = WsMessage::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload);
    serde_json::to_string(&msg).ok()
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error("", 400, "malformed JSON")).ok();
    };

    let response = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(WsCommand::Subscribe { event_types }) => {
            let unknown = subs.subscribe(&event_types);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": subs.event_types(),
                    "wildcard": subs.is_subscribed_all(),
                    "unknown": unknown,
                }),
            )
        }
        Ok(WsCommand::Unsubscribe { event_types }) => {
            subs.unsubscribe(&event_types);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": subs.event_types(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        Err(_) => WsMessage::error(msg.id, 404, "unknown command"),
    };
    serde_json::to_string(&response).ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn reply(text: &str, subs: &mut SubscriptionManager) -> serde_json::Value {
        let Some(json) = handle_text_message(text, subs) else {
            panic!("expected a reply");
        };
        serde_json::from_str(&json).unwrap_or_default()
    }

    fn command(id: &str, payload: serde_json::Value) -> String {
        serde_json::json!({
            "id": id,
            "type": "command",
            "timestamp": "2024-03-01T18:00:00Z",
            "payload": payload,
        })
        .to_string()
    }

    #[test]
    fn malformed_json_is_rejected() {
        let mut subs = SubscriptionManager::new();
        let value = reply("{not json", &mut subs);
        assert_eq!(value["type"], "error");
        assert_eq!(value["payload"]["code"], 400);
    }

    #[test]
    fn subscribe_then_unsubscribe() {
        let mut subs = SubscriptionManager::new();
        let text = command(
            "a1",
            serde_json::json!({
                "command": "subscribe",
                "event_types": ["caption_recorded", "bogus"],
            }),
        );
        let value = reply(&text, &mut subs);
        assert_eq!(value["id"], "a1");
        assert_eq!(value["type"], "response");
        assert_eq!(value["payload"]["subscribed"][0], "caption_recorded");
        assert_eq!(value["payload"]["unknown"][0], "bogus");

        let text = command(
            "a2",
            serde_json::json!({
                "command": "unsubscribe",
                "event_types": ["caption_recorded"],
            }),
        );
        let value = reply(&text, &mut subs);
        assert_eq!(value["payload"]["subscribed"], serde_json::json!([]));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let mut subs = SubscriptionManager::new();
        let text = command("b1", serde_json::json!({ "command": "rewind" }));
        let value = reply(&text, &mut subs);
        assert_eq!(value["type"], "error");
        assert_eq!(value["payload"]["code"], 404);
    }

    #[test]
    fn event_message_wraps_payload() {
        let event = HubEvent::RecordingsEnded {
            count: 2,
            timestamp: chrono::Utc::now(),
        };
        let Some(json) = event_message(&event) else {
            panic!("serialization failed");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(value["type"], "event");
        assert_eq!(value["payload"]["event_type"], "recordings_ended");
        assert_eq!(value["payload"]["count"], 2);
    }
}
