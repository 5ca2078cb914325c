//! 出站消息与线缆帧
//!
//! `OutboundMessage` 由消息路由器在发送时刻构造并盖上服务端时间戳，
//! 不做持久化——交付即丢弃。`WireFrame` 是其面向客户端的 JSON 形态，
//! 另含传输层补充的 roster 与 error 帧。

use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;
use crate::payload::{MediaBlob, MediaKind, Payload};
use crate::session::Session;
use crate::value_objects::{ConnectionId, DisplayName, Timestamp};

/// 出站消息的投递类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// 系统通知（加入/离开）
    System,
    /// 全员广播
    Broadcast,
    /// 私聊（目标 + 发送方回显）
    Private,
}

/// 路由元数据齐备、可直接交给传输层的消息
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    pub sender_name: Option<DisplayName>,
    pub sender_connection_id: Option<ConnectionId>,
    /// 仅私聊消息携带
    pub target_connection_id: Option<ConnectionId>,
    pub payload: Payload,
    pub timestamp: Timestamp,
}

impl OutboundMessage {
    /// 系统通知，没有发送者
    pub fn system(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            kind: MessageKind::System,
            sender_name: None,
            sender_connection_id: None,
            target_connection_id: None,
            payload: Payload::text(content),
            timestamp,
        }
    }

    pub fn broadcast(sender: &Session, payload: Payload, timestamp: Timestamp) -> Self {
        Self {
            kind: MessageKind::Broadcast,
            sender_name: Some(sender.display_name.clone()),
            sender_connection_id: Some(sender.connection_id),
            target_connection_id: None,
            payload,
            timestamp,
        }
    }

    pub fn private(
        sender: &Session,
        target: ConnectionId,
        payload: Payload,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind: MessageKind::Private,
            sender_name: Some(sender.display_name.clone()),
            sender_connection_id: Some(sender.connection_id),
            target_connection_id: Some(target),
            payload,
            timestamp,
        }
    }

    /// 转换为客户端可见的线缆帧
    pub fn to_wire(&self) -> WireFrame {
        let name = self
            .sender_name
            .as_ref()
            .map(|n| n.as_str().to_owned())
            .unwrap_or_default();
        match &self.payload {
            Payload::Text { content } => match self.kind {
                MessageKind::System => WireFrame::System {
                    content: content.clone(),
                    timestamp: self.timestamp,
                },
                MessageKind::Broadcast | MessageKind::Private => WireFrame::User {
                    name,
                    content: content.clone(),
                    timestamp: self.timestamp,
                    sender_id: self.sender_connection_id,
                    target_id: self.target_connection_id,
                },
            },
            Payload::Media {
                media,
                data,
                caption,
            } => WireFrame::Media {
                name,
                content: caption
                    .clone()
                    .unwrap_or_else(|| media.default_label().to_owned()),
                media_type: *media,
                media_data: data.clone(),
                timestamp: self.timestamp,
                sender_id: self.sender_connection_id,
                target_id: self.target_connection_id,
            },
        }
    }
}

/// 发往客户端的 JSON 帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireFrame {
    /// 文本聊天消息
    User {
        name: String,
        content: String,
        timestamp: Timestamp,
        #[serde(rename = "senderId")]
        sender_id: Option<ConnectionId>,
        #[serde(rename = "targetId", default, skip_serializing_if = "Option::is_none")]
        target_id: Option<ConnectionId>,
    },
    /// 图片/语音消息
    Media {
        name: String,
        content: String,
        #[serde(rename = "mediaType")]
        media_type: MediaKind,
        #[serde(rename = "mediaData")]
        media_data: MediaBlob,
        timestamp: Timestamp,
        #[serde(rename = "senderId")]
        sender_id: Option<ConnectionId>,
        #[serde(rename = "targetId", default, skip_serializing_if = "Option::is_none")]
        target_id: Option<ConnectionId>,
    },
    /// 系统通知
    System { content: String, timestamp: Timestamp },
    /// 在线名单快照
    Roster { users: Vec<String> },
    /// 错误上报，只发给发起操作的连接
    Error { code: ErrorKind, message: String },
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn session(name: &str) -> Session {
        Session::new(
            ConnectionId::new(),
            DisplayName::parse(name).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn system_message_serializes_with_system_tag() {
        let message = OutboundMessage::system("alice has joined the chat", Utc::now());
        let json = serde_json::to_value(message.to_wire()).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["content"], "alice has joined the chat");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn broadcast_text_serializes_as_user_frame() {
        let sender = session("alice");
        let message = OutboundMessage::broadcast(&sender, Payload::text("hi"), Utc::now());
        let json = serde_json::to_value(message.to_wire()).unwrap();
        assert_eq!(json["type"], "user");
        assert_eq!(json["name"], "alice");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["senderId"], sender.connection_id.to_string());
        assert!(json.get("targetId").is_none());
    }

    #[test]
    fn private_media_carries_target_and_label() {
        let sender = session("alice");
        let target = ConnectionId::new();
        let message = OutboundMessage::private(
            &sender,
            target,
            Payload::media(MediaKind::Voice, vec![0xAA, 0xBB], None),
            Utc::now(),
        );
        let json = serde_json::to_value(message.to_wire()).unwrap();
        assert_eq!(json["type"], "media");
        assert_eq!(json["mediaType"], "voice");
        assert_eq!(json["content"], "Voice note");
        assert_eq!(json["targetId"], target.to_string());
    }

    #[test]
    fn error_frame_uses_snake_case_codes() {
        let frame = WireFrame::Error {
            code: ErrorKind::UserNotFound,
            message: "no participant named \"carol\"".to_string(),
        };
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "user_not_found");
    }
}
