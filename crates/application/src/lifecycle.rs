//! 连接生命周期处理器
//!
//! 每个连接一台状态机：Unnamed → Named → Closed。状态机由显式的
//! 入站事件枚举驱动；错误只回报给本连接，从不广播，也不会让
//! 任何连接的处理流程崩溃。

use std::sync::Arc;

use tracing::{debug, info, warn};

use domain::{ConnectionId, DisplayName, DomainError, InboundEvent, Payload};

use crate::notifier::PresenceNotifier;
use crate::registry::SessionRegistry;
use crate::router::MessageRouter;
use crate::transport::Transport;

/// 连接所处的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// 初始态，只接受 join
    Unnamed,
    /// 已注册显示名，可收发消息
    Named,
    /// 终态，断开之后所有事件都是空操作
    Closed,
}

pub struct ConnectionLifecycle {
    connection_id: ConnectionId,
    state: ConnectionState,
    registry: Arc<SessionRegistry>,
    router: Arc<MessageRouter>,
    notifier: Arc<PresenceNotifier>,
    transport: Arc<dyn Transport>,
}

impl ConnectionLifecycle {
    /// 连接建立时创建未命名槽位。
    pub fn new(
        connection_id: ConnectionId,
        registry: Arc<SessionRegistry>,
        router: Arc<MessageRouter>,
        notifier: Arc<PresenceNotifier>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        info!(connection_id = %connection_id, "connection established");
        Self {
            connection_id,
            state: ConnectionState::Unnamed,
            registry,
            router,
            notifier,
            transport,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// 处理一个入站事件。永不失败：错误经传输层回报给本连接。
    pub async fn handle_event(&mut self, event: InboundEvent) {
        if self.state == ConnectionState::Closed {
            debug!(connection_id = %self.connection_id, "event after close ignored");
            return;
        }
        match event {
            InboundEvent::Join { name } => self.handle_join(name).await,
            InboundEvent::Chat { payload } => self.handle_chat(payload).await,
            InboundEvent::Private { target, payload } => {
                self.handle_private(target, payload).await
            }
            InboundEvent::Disconnect => self.handle_disconnect().await,
        }
    }

    async fn handle_join(&mut self, name: String) {
        // 已命名连接的再次 join 是改名，实现为合成的 leave+join 对，
        // 让每份名单快照都与其通知严格配对。新名字先行校验，
        // 改名失败不能把旧会话弄丢。
        if self.state == ConnectionState::Named {
            if let Err(err) = DisplayName::parse(&name) {
                self.report(err).await;
                return;
            }
            if let Some(previous) = self.registry.leave(self.connection_id).await {
                self.notifier.announce_leave(&previous).await;
            }
        }
        match self.registry.join(self.connection_id, &name).await {
            Ok(session) => {
                self.state = ConnectionState::Named;
                self.notifier.announce_join(&session).await;
            }
            Err(err) => self.report(err).await,
        }
    }

    async fn handle_chat(&mut self, payload: Payload) {
        if self.state != ConnectionState::Named {
            self.report(DomainError::unnamed(self.connection_id)).await;
            return;
        }
        if let Err(err) = self.router.route_broadcast(self.connection_id, payload).await {
            self.report(err).await;
        }
    }

    async fn handle_private(&mut self, target: String, payload: Payload) {
        if self.state != ConnectionState::Named {
            self.report(DomainError::unnamed(self.connection_id)).await;
            return;
        }
        if let Err(err) = self
            .router
            .route_private(self.connection_id, &target, payload)
            .await
        {
            self.report(err).await;
        }
    }

    async fn handle_disconnect(&mut self) {
        self.state = ConnectionState::Closed;
        if let Some(session) = self.registry.leave(self.connection_id).await {
            self.notifier.announce_leave(&session).await;
        }
        info!(connection_id = %self.connection_id, "connection closed");
    }

    async fn report(&self, error: DomainError) {
        warn!(connection_id = %self.connection_id, error = %error, "error reported");
        self.transport.report_error(self.connection_id, &error).await;
    }
}
