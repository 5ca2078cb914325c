//! 领域错误定义
//!
//! 三类错误都只上报给发起操作的连接，绝不广播，
//! 也不会让任何连接的处理器崩溃。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::ConnectionId;

/// 领域错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 加入时显示名为空或不合法
    #[error("invalid name: {reason}")]
    InvalidName { reason: String },

    /// 连接尚未完成 join 就尝试收发消息
    #[error("connection {connection_id} has not joined yet")]
    Unnamed { connection_id: ConnectionId },

    /// 私聊目标当前不在线
    #[error("no participant named \"{name}\"")]
    UserNotFound { name: String },
}

impl DomainError {
    /// 创建显示名错误
    pub fn invalid_name(reason: impl Into<String>) -> Self {
        Self::InvalidName {
            reason: reason.into(),
        }
    }

    /// 创建未命名错误
    pub fn unnamed(connection_id: ConnectionId) -> Self {
        Self::Unnamed { connection_id }
    }

    /// 创建目标不存在错误
    pub fn user_not_found(name: impl Into<String>) -> Self {
        Self::UserNotFound { name: name.into() }
    }

    /// 错误对应的线缆错误码
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::Unnamed { .. } => ErrorKind::Unnamed,
            Self::UserNotFound { .. } => ErrorKind::UserNotFound,
        }
    }
}

/// 上报给客户端的错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidName,
    Unnamed,
    UserNotFound,
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;
