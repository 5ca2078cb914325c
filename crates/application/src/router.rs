//! 消息路由器
//!
//! 解析投递目标（广播或单个接收者），盖上服务端时间戳与发送者
//! 元数据后交给传输层发出。路由自身只读注册表，不改共享状态。

use std::sync::Arc;

use tracing::info;

use domain::{ConnectionId, DomainError, DomainResult, OutboundMessage, Payload};

use crate::clock::Clock;
use crate::registry::SessionRegistry;
use crate::transport::Transport;

pub struct MessageRouter {
    registry: Arc<SessionRegistry>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl MessageRouter {
    pub fn new(
        registry: Arc<SessionRegistry>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            transport,
            clock,
        }
    }

    /// 广播给所有存活连接，包括发送者自己。
    ///
    /// 发送者必须已有会话；时间戳在路由时刻由服务端时钟产生，
    /// 从不信任客户端提交的时间。
    pub async fn route_broadcast(
        &self,
        sender: ConnectionId,
        payload: Payload,
    ) -> DomainResult<()> {
        let session = self
            .registry
            .get(sender)
            .await
            .ok_or_else(|| DomainError::unnamed(sender))?;
        let message = OutboundMessage::broadcast(&session, payload, self.clock.now());
        info!(
            connection_id = %sender,
            name = %session.display_name,
            content = %message.payload.display_content(),
            "message sent"
        );
        self.transport.broadcast(message).await;
        Ok(())
    }

    /// 私聊：恰好两份投递——目标一份，发送方回显一份。
    ///
    /// 回显让发送方界面能立即呈现已发出的消息，是有意的双投递。
    /// 目标按显示名解析，当前无人使用该名字时返回 UserNotFound。
    pub async fn route_private(
        &self,
        sender: ConnectionId,
        target_name: &str,
        payload: Payload,
    ) -> DomainResult<()> {
        let session = self
            .registry
            .get(sender)
            .await
            .ok_or_else(|| DomainError::unnamed(sender))?;
        let target = self
            .registry
            .lookup_by_name(target_name)
            .await
            .ok_or_else(|| DomainError::user_not_found(target_name))?;
        let message = OutboundMessage::private(&session, target, payload, self.clock.now());
        info!(
            connection_id = %sender,
            name = %session.display_name,
            target = %target_name,
            content = %message.payload.display_content(),
            "private message sent"
        );
        self.transport.deliver(target, message.clone()).await;
        self.transport.deliver(sender, message).await;
        Ok(())
    }

    /// 系统通知广播。仅供在线通知器使用。
    pub async fn route_system(&self, content: impl Into<String> + Send) {
        let message = OutboundMessage::system(content, self.clock.now());
        self.transport.broadcast(message).await;
    }
}
