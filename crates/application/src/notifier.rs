//! 在线通知器
//!
//! 注册表每次成功的 join/leave 都同步触发两件事：向所有连接投递
//! 名单快照，再广播一条系统通知。名单总在通知之前发出，同一连接
//! 上两者的相对顺序由传输层的先进先出队列保持。

use std::sync::Arc;

use tracing::info;

use domain::Session;

use crate::registry::SessionRegistry;
use crate::router::MessageRouter;
use crate::transport::Transport;

pub struct PresenceNotifier {
    registry: Arc<SessionRegistry>,
    router: Arc<MessageRouter>,
    transport: Arc<dyn Transport>,
}

impl PresenceNotifier {
    pub fn new(
        registry: Arc<SessionRegistry>,
        router: Arc<MessageRouter>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            registry,
            router,
            transport,
        }
    }

    /// join 成功后调用：名单快照 + "{name} has joined the chat"。
    pub async fn announce_join(&self, session: &Session) {
        let roster = self.registry.roster().await;
        info!(
            connection_id = %session.connection_id,
            name = %session.display_name,
            online = roster.len(),
            "user joined"
        );
        self.transport.broadcast_roster(roster).await;
        self.router
            .route_system(format!("{} has joined the chat", session.display_name))
            .await;
    }

    /// leave 成功后调用：名单快照 + "{name} has left the chat"。
    pub async fn announce_leave(&self, session: &Session) {
        let roster = self.registry.roster().await;
        info!(
            connection_id = %session.connection_id,
            name = %session.display_name,
            online = roster.len(),
            "user left"
        );
        self.transport.broadcast_roster(roster).await;
        self.router
            .route_system(format!("{} has left the chat", session.display_name))
            .await;
    }
}
