//! 入站事件
//!
//! 每个连接的生命周期处理器由一个显式事件枚举驱动，
//! 取代按事件类型分散注册回调的写法，使合法状态迁移可审计。

use serde::{Deserialize, Serialize};

use crate::payload::Payload;

/// 客户端通过传输层发来的 JSON 帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// 注册显示名（重复发送等同于改名）
    Join { name: String },
    /// 全员广播一条消息
    ChatMessage { payload: Payload },
    /// 私聊指定显示名
    PrivateMessage { target: String, payload: Payload },
}

/// 驱动连接状态机的入站事件
///
/// 客户端帧之外还包含传输层自身产生的断开事件。
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Join { name: String },
    Chat { payload: Payload },
    Private { target: String, payload: Payload },
    /// 传输层连接关闭
    Disconnect,
}

impl From<ClientFrame> for InboundEvent {
    fn from(frame: ClientFrame) -> Self {
        match frame {
            ClientFrame::Join { name } => InboundEvent::Join { name },
            ClientFrame::ChatMessage { payload } => InboundEvent::Chat { payload },
            ClientFrame::PrivateMessage { target, payload } => {
                InboundEvent::Private { target, payload }
            }
        }
    }
}
