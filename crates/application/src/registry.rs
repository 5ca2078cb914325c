//! 会话注册表
//!
//! 连接标识到会话的映射，是进程内惟一跨连接共享的状态。
//! 变更操作（join/leave）与名单读取经由同一把读写锁串行化，
//! 热路径上的路由查询只需要读锁。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use domain::{ConnectionId, DisplayName, DomainResult, Session};

use crate::clock::Clock;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<ConnectionId, Session>>,
    clock: Arc<dyn Clock>,
}

impl SessionRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// 注册显示名。
    ///
    /// 名称去除首尾空白后必须非空。同一连接重复 join 会替换旧会话
    /// 而不是新增一条。成功后由调用方触发在线通知。
    pub async fn join(&self, connection_id: ConnectionId, raw_name: &str) -> DomainResult<Session> {
        let display_name = DisplayName::parse(raw_name)?;
        let session = Session::new(connection_id, display_name, self.clock.now());
        let mut sessions = self.sessions.write().await;
        sessions.insert(connection_id, session.clone());
        Ok(session)
    }

    /// 移除并返回会话。幂等：会话不存在时返回 None，不是错误。
    ///
    /// 先断开后 join、重复断开都是预期中的竞态。
    pub async fn leave(&self, connection_id: ConnectionId) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&connection_id)
    }

    /// 按连接查会话。
    pub async fn get(&self, connection_id: ConnectionId) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(&connection_id).cloned()
    }

    /// 按显示名解析连接。
    ///
    /// 显示名不要求唯一；重名时取 joined_at 最早的会话，
    /// 时间并列再按 ConnectionId 排序，结果完全确定。
    pub async fn lookup_by_name(&self, name: &str) -> Option<ConnectionId> {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|session| session.display_name.as_str() == name)
            .min_by_key(|session| (session.joined_at, session.connection_id))
            .map(|session| session.connection_id)
    }

    /// 当前在线名单，按加入时间排序。
    ///
    /// 没有变更发生时，连续两次调用返回相同顺序。
    pub async fn roster(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        let mut entries: Vec<&Session> = sessions.values().collect();
        entries.sort_by_key(|session| (session.joined_at, session.connection_id));
        entries
            .into_iter()
            .map(|session| session.display_name.as_str().to_owned())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// 清空所有会话。进程收尾用，不触发任何通知。
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{TimeZone, Utc};
    use domain::Timestamp;

    use super::*;

    /// 每次读取前进一秒，让 joined_at 严格递增
    struct SteppingClock(AtomicI64);

    impl Clock for SteppingClock {
        fn now(&self) -> Timestamp {
            let tick = self.0.fetch_add(1, Ordering::SeqCst);
            Utc.timestamp_opt(tick, 0).unwrap()
        }
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(SteppingClock(AtomicI64::new(0))))
    }

    #[tokio::test]
    async fn join_makes_session_visible_in_roster() {
        let registry = registry();
        let c1 = ConnectionId::new();

        let session = registry.join(c1, " alice ").await.unwrap();
        assert_eq!(session.display_name.as_str(), "alice");
        assert_eq!(registry.roster().await, vec!["alice"]);
        assert_eq!(registry.lookup_by_name("alice").await, Some(c1));
    }

    #[tokio::test]
    async fn join_rejects_blank_name() {
        let registry = registry();
        let c1 = ConnectionId::new();

        assert!(registry.join(c1, "   ").await.is_err());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn leave_is_idempotent() {
        let registry = registry();
        let c1 = ConnectionId::new();
        registry.join(c1, "alice").await.unwrap();

        assert!(registry.leave(c1).await.is_some());
        assert!(registry.leave(c1).await.is_none());
        assert!(registry.roster().await.is_empty());
    }

    #[tokio::test]
    async fn leave_before_join_is_not_an_error() {
        let registry = registry();
        assert!(registry.leave(ConnectionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn rejoin_overwrites_instead_of_duplicating() {
        let registry = registry();
        let c1 = ConnectionId::new();

        registry.join(c1, "alice").await.unwrap();
        registry.join(c1, "alicia").await.unwrap();

        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.roster().await, vec!["alicia"]);
        assert_eq!(registry.lookup_by_name("alice").await, None);
    }

    #[tokio::test]
    async fn duplicate_names_resolve_to_earliest_joined() {
        let registry = registry();
        let first = ConnectionId::new();
        let second = ConnectionId::new();

        registry.join(first, "alice").await.unwrap();
        registry.join(second, "alice").await.unwrap();

        assert_eq!(registry.lookup_by_name("alice").await, Some(first));
        assert_eq!(registry.roster().await, vec!["alice", "alice"]);

        // 最早的会话离开后，解析落到下一个
        registry.leave(first).await;
        assert_eq!(registry.lookup_by_name("alice").await, Some(second));
    }

    #[tokio::test]
    async fn roster_is_stable_between_calls() {
        let registry = registry();
        for name in ["alice", "bob", "carol"] {
            registry.join(ConnectionId::new(), name).await.unwrap();
        }

        let first = registry.roster().await;
        let second = registry.roster().await;
        assert_eq!(first, second);
        assert_eq!(first, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn clear_drops_all_sessions_without_notifications() {
        let registry = registry();
        registry.join(ConnectionId::new(), "alice").await.unwrap();
        registry.join(ConnectionId::new(), "bob").await.unwrap();

        registry.clear().await;
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn lookup_unknown_name_returns_none() {
        let registry = registry();
        registry.join(ConnectionId::new(), "alice").await.unwrap();
        assert_eq!(registry.lookup_by_name("carol").await, None);
    }
}
