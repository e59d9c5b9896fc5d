//! WebSocket 连接处理。
//!
//! 每条连接拿到一个无界发送通道；join_room 把通道挂进注册表，
//! 断开时统一从所有频道摘除。入站事件在连接任务内顺序处理，
//! 同一发送方的消息流不会被重排。

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use application::{SendMessageRequest, ServerEvent};
use domain::UserId;

use crate::state::AppState;

/// 客户端发来的实时事件。
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
enum ClientEvent {
    JoinRoom {
        user_id: Uuid,
    },
    SendMessage {
        sender_id: Uuid,
        recipient_id: Uuid,
        content: String,
    },
}

pub async fn websocket_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let (mut sink, mut incoming) = socket.split();

    // 出站：把推送事件序列化成 JSON 文本写回客户端
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to serialize websocket payload");
                    continue;
                }
            };
            if sink.send(WsMessage::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // 入站：逐条处理直至连接关闭
    while let Some(Ok(frame)) = incoming.next().await {
        let text = match frame {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => break,
            _ => continue,
        };

        let event = match serde_json::from_str::<ClientEvent>(&text) {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring malformed client event");
                continue;
            }
        };

        match event {
            ClientEvent::JoinRoom { user_id } => {
                state
                    .registry
                    .join(UserId::from(user_id), connection_id, tx.clone())
                    .await;
            }
            ClientEvent::SendMessage {
                sender_id,
                recipient_id,
                content,
            } => {
                let result = state
                    .chat_service
                    .send_message(SendMessageRequest {
                        sender_id,
                        recipient_id,
                        content,
                    })
                    .await;
                if let Err(err) = result {
                    tracing::warn!(error = %err, "send_message event failed");
                }
            }
        }
    }

    state.registry.leave(connection_id).await;
    send_task.abort();
}
