use serde::{Deserialize, Serialize};

use crate::value_objects::{ConnectionId, DisplayName, Timestamp};

/// 已命名连接的会话记录。
///
/// 由会话注册表独占管理：join 成功时创建，断开时销毁，
/// 同一连接重复 join 会整体替换而不是新增。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

impl Session {
    pub fn new(
        connection_id: ConnectionId,
        display_name: DisplayName,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            display_name,
            joined_at,
        }
    }
}
