//! WebSocket 连接管理器
//!
//! 封装单个 WebSocket 连接的完整生命周期：连接建立即分配
//! ConnectionId 并注册出站队列；之后一个任务排空出站帧、
//! 本任务解析入站帧驱动生命周期状态机；连接断开时统一清理。

use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{SinkExt, StreamExt};

use application::{ConnectionLifecycle, Transport};
use domain::{ClientFrame, ConnectionId, InboundEvent};

use crate::state::AppState;

pub struct RelayConnection {
    socket: WebSocket,
    state: AppState,
    connection_id: ConnectionId,
}

impl RelayConnection {
    pub fn new(socket: WebSocket, state: AppState) -> Self {
        let connection_id = ConnectionId::new();
        tracing::info!(connection_id = %connection_id, "WebSocket 连接已建立");
        Self {
            socket,
            state,
            connection_id,
        }
    }

    /// 运行连接主循环；返回即连接结束、资源已清理。
    pub async fn run(self) {
        let RelayConnection {
            socket,
            state,
            connection_id,
        } = self;

        let mut outbound = state.transport.register(connection_id).await;
        let mut lifecycle = ConnectionLifecycle::new(
            connection_id,
            state.registry.clone(),
            state.router.clone(),
            state.notifier.clone(),
            state.transport.clone() as std::sync::Arc<dyn Transport>,
        );

        let (mut sink, mut incoming) = socket.split();

        // 发送任务：排空本连接的出站队列，序列化后写入 socket
        let send_task = tokio::spawn(async move {
            while let Some(frame) = outbound.recv().await {
                let payload = match serde_json::to_string(&frame) {
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
            tracing::debug!("WebSocket 发送任务结束");
        });

        // 接收循环：入站帧翻译为事件，交给状态机
        while let Some(Ok(message)) = incoming.next().await {
            match message {
                WsMessage::Text(text) => match serde_json::from_str::<ClientFrame>(&text) {
                    Ok(frame) => lifecycle.handle_event(frame.into()).await,
                    Err(err) => {
                        tracing::debug!(
                            connection_id = %connection_id,
                            error = %err,
                            "ignoring malformed client frame"
                        );
                    }
                },
                WsMessage::Close(_) => break,
                // ping 由底层自动回应
                WsMessage::Ping(_) | WsMessage::Pong(_) => {}
                WsMessage::Binary(_) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        "binary frames are not part of the protocol"
                    );
                }
            }
        }

        // 先注销传输，之后的离开广播不会再投递给本连接
        state.transport.unregister(connection_id).await;
        lifecycle.handle_event(InboundEvent::Disconnect).await;
        let _ = send_task.await;

        tracing::info!(connection_id = %connection_id, "WebSocket 连接已断开，会话已清理");
    }
}
