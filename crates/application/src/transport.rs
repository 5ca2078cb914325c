//! 传输端口
//!
//! 核心向外投递的唯一出口。投递是尽力而为的 fire-and-forget：
//! 单个连接投递失败只记录日志，绝不阻塞对其他连接的路由，
//! 核心承诺的是"尝试过投递"，不是"确认送达"。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use tracing::warn;

use domain::{ConnectionId, DomainError, OutboundMessage, WireFrame};

/// 传输层回调接口
#[async_trait]
pub trait Transport: Send + Sync {
    /// 投递一条消息到指定连接
    async fn deliver(&self, connection_id: ConnectionId, message: OutboundMessage);

    /// 投递一条消息到所有存活连接
    async fn broadcast(&self, message: OutboundMessage);

    /// 投递在线名单快照到所有存活连接
    async fn broadcast_roster(&self, roster: Vec<String>);

    /// 错误只上报给发起操作的连接，绝不广播
    async fn report_error(&self, connection_id: ConnectionId, error: &DomainError);
}

/// 进程内 mpsc 实现。
///
/// 每个连接注册一个无界发送端；单队列先进先出，保证同一连接
/// 收到的投递顺序与提交顺序一致。
#[derive(Default)]
pub struct MpscTransport {
    senders: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<WireFrame>>>,
}

impl MpscTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册连接，返回它的出站帧接收端。
    pub async fn register(
        &self,
        connection_id: ConnectionId,
    ) -> mpsc::UnboundedReceiver<WireFrame> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut senders = self.senders.write().await;
        senders.insert(connection_id, tx);
        rx
    }

    /// 注销连接；之后对它的投递退化为带日志的空操作。
    pub async fn unregister(&self, connection_id: ConnectionId) {
        let mut senders = self.senders.write().await;
        senders.remove(&connection_id);
    }

    /// 当前存活连接数
    pub async fn connection_count(&self) -> usize {
        self.senders.read().await.len()
    }

    async fn send_frame(&self, connection_id: ConnectionId, frame: WireFrame) {
        let senders = self.senders.read().await;
        match senders.get(&connection_id) {
            Some(sender) => {
                if sender.send(frame).is_err() {
                    warn!(connection_id = %connection_id, "connection closed before delivery");
                }
            }
            None => {
                warn!(connection_id = %connection_id, "no live connection for delivery");
            }
        }
    }

    async fn send_frame_to_all(&self, frame: WireFrame) {
        let senders = self.senders.read().await;
        for (connection_id, sender) in senders.iter() {
            if sender.send(frame.clone()).is_err() {
                warn!(connection_id = %connection_id, "skipping closed connection in broadcast");
            }
        }
    }
}

#[async_trait]
impl Transport for MpscTransport {
    async fn deliver(&self, connection_id: ConnectionId, message: OutboundMessage) {
        self.send_frame(connection_id, message.to_wire()).await;
    }

    async fn broadcast(&self, message: OutboundMessage) {
        self.send_frame_to_all(message.to_wire()).await;
    }

    async fn broadcast_roster(&self, roster: Vec<String>) {
        self.send_frame_to_all(WireFrame::Roster { users: roster }).await;
    }

    async fn report_error(&self, connection_id: ConnectionId, error: &DomainError) {
        let frame = WireFrame::Error {
            code: error.kind(),
            message: error.to_string(),
        };
        self.send_frame(connection_id, frame).await;
    }
}
